/// Integration tests for directory listing and server discovery
/// A stub directory speaks the newline-delimited JSON protocol over TCP

use std::{sync::mpsc as std_mpsc, time::Duration};

use serde_json::{json, Value};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpListener,
    runtime::Handle,
    sync::mpsc,
    time::{sleep, timeout},
};
use vista_client::{discover_servers, ClientConfig, DirectoryConfig, VistaClientError};
use vista_server::{Server, ServerConfig, VistaServerError};
use vista_test::{LocalHub, TestRegistry};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn directory_at(port: u16) -> DirectoryConfig {
    DirectoryConfig {
        port,
        connect_timeout: Duration::from_secs(2),
        response_timeout: Duration::from_secs(2),
        ..DirectoryConfig::default()
    }
}

/// Accepts any number of connections and forwards every request line read
/// from them
async fn recording_directory() -> (u16, mpsc::UnboundedReceiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (sender, receiver) = mpsc::unbounded_channel::<Value>();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let sender = sender.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stream).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if sender.send(serde_json::from_str(&line).unwrap()).is_err() {
                        break;
                    }
                }
            });
        }
    });
    (port, receiver)
}

async fn next_request(requests: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    timeout(Duration::from_secs(5), requests.recv())
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_lists_itself_and_sends_updates() {
    init_logging();
    let (port, mut requests) = recording_directory().await;
    let hub = LocalHub::new();
    let config = ServerConfig {
        max_players: 8,
        directory: Some(directory_at(port)),
        ..ServerConfig::default()
    };
    let mut server = Server::new(config, TestRegistry::new(), hub.server_transport()).unwrap();
    let _player = hub.connect_client();
    server.receive();

    server.register_on_directory(Handle::current()).unwrap();
    assert!(server.is_registered());
    assert!(server.directory().is_some());

    let register = next_request(&mut requests).await;
    assert_eq!(register["register"]["id"], json!("myGame"));
    assert_eq!(register["register"]["port"], json!(15937));
    assert_eq!(register["register"]["playerCount"], json!(1));
    assert_eq!(register["register"]["maxPlayers"], json!(8));
    assert_eq!(register["register"]["protocol"], json!("udp"));

    server
        .update_listing(Some("Finals".to_string()), None, None)
        .unwrap();
    assert_eq!(
        next_request(&mut requests).await,
        json!({ "update": { "playerCount": 1, "comment": "Finals", "port": 15937 } })
    );
    assert_eq!(server.config().game.comment, "Finals");

    server.disconnect();
    assert!(!server.is_registered());
    assert!(server.directory().is_none());
    assert_eq!(
        server.update_listing(None, None, None),
        Err(VistaServerError::NotRegistered)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lost_listing_is_dropped_on_the_next_receive() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let _ = lines.next_line().await;
    });
    let hub = LocalHub::new();
    let config = ServerConfig {
        directory: Some(directory_at(port)),
        ..ServerConfig::default()
    };
    let mut server = Server::new(config, TestRegistry::new(), hub.server_transport()).unwrap();
    server.register_on_directory(Handle::current()).unwrap();

    timeout(Duration::from_secs(5), async {
        while server.is_registered() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    server.receive();
    assert!(server.directory().is_none());

    assert_eq!(
        server.update_listing(None, None, None),
        Err(VistaServerError::NotRegistered)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_discovers_listed_servers() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let _ = lines.next_line().await;
        write_half
            .write_all(b"{\"hosts\":[{\"address\":\"10.1.1.4\",\"port\":15937,\"name\":\"Arena\"}]}\n")
            .await
            .unwrap();
    });
    let config = ClientConfig {
        directory: Some(directory_at(port)),
        ..ClientConfig::default()
    };

    let (sender, receiver) = std_mpsc::channel();
    let task = discover_servers(&config, Handle::current(), move |hosts| {
        sender.send(hosts).unwrap();
    })
    .unwrap();
    task.await.unwrap();

    let hosts = receiver.recv().unwrap().unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].address, "10.1.1.4");
    assert_eq!(hosts[0].name, "Arena");
}

#[test]
fn directory_features_need_a_directory() {
    init_logging();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let hub = LocalHub::new();
    let mut server =
        Server::new(ServerConfig::default(), TestRegistry::new(), hub.server_transport()).unwrap();

    assert_eq!(
        server.register_on_directory(runtime.handle().clone()),
        Err(VistaServerError::NoDirectory)
    );
    assert!(matches!(
        discover_servers(&ClientConfig::default(), runtime.handle().clone(), |_| {}),
        Err(VistaClientError::NoDirectory)
    ));
}
