/// Integration tests for peers joining a running session
/// A late peer is replayed the loaded partitions and every known object

use vista_server::{ConnectEvent, DisconnectEvent};
use vista_shared::{AttachCode, PartitionNotice};
use vista_test::{pump, test_client, test_server, AutoLoader, LocalHub, TestListener, TestRegistry};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene() -> TestRegistry {
    let scene = TestRegistry::new();
    scene.place(1, &["spawn"]);
    scene.place(2, &["gate", "flag"]);
    scene
}

#[test]
fn late_peer_is_replayed_partitions_then_objects() {
    init_logging();
    let hub = LocalHub::new();
    let server_scene = scene();
    let mut server = test_server(&hub, &server_scene);
    server.reset_partition(1);
    server.notify_partition_load_complete(1).unwrap();
    server.add_partition(2).unwrap();
    server.notify_partition_load_complete(2).unwrap();
    server.send_all_packets();

    let client_scene = scene();
    let mut clients = vec![test_client(&hub, &client_scene)];
    let listener = TestListener::new();
    let notifier = clients[0].load_notifier();
    clients[0].add_listener(AutoLoader::new(notifier));
    clients[0].add_listener(listener.clone());

    let mut events = server.receive();
    let connected: Vec<_> = events.read::<ConnectEvent>().collect();
    assert_eq!(connected.len(), 1);
    pump(&mut server, &mut clients);

    assert_eq!(
        listener.notices(),
        vec![PartitionNotice::Reset(1), PartitionNotice::Added(2)]
    );
    assert_eq!(clients[0].loaded_partitions(), vec![1, 2]);
    assert_eq!(client_scene.bound(), server_scene.bound());
    assert!(client_scene.destroyed().is_empty());
    assert_eq!(server.peer_partitions(&connected[0]), Some(vec![1, 2]));
}

#[test]
fn late_peer_misses_nothing_loading_on_the_server() {
    init_logging();
    let hub = LocalHub::new();
    let server_scene = scene();
    let mut server = test_server(&hub, &server_scene);
    server.reset_partition(1);
    server.notify_partition_load_complete(1).unwrap();
    server.add_partition(2).unwrap();

    let client_scene = scene();
    let mut clients = vec![test_client(&hub, &client_scene)];
    let notifier = clients[0].load_notifier();
    clients[0].add_listener(AutoLoader::new(notifier));
    pump(&mut server, &mut clients);
    assert_eq!(clients[0].loaded_partitions(), vec![1]);
    assert_eq!(clients[0].partition_state(2), None);

    // partition 2 reaches the peer once it finishes loading on the server
    server.notify_partition_load_complete(2).unwrap();
    pump(&mut server, &mut clients);

    assert_eq!(clients[0].loaded_partitions(), vec![1, 2]);
    assert_eq!(client_scene.object_of("flag"), server_scene.object_of("flag"));
}

#[test]
fn late_peer_sees_objects_created_at_runtime() {
    init_logging();
    let hub = LocalHub::new();
    let server_scene = TestRegistry::new();
    let mut server = test_server(&hub, &server_scene);
    server.reset_partition(3);
    server.notify_partition_load_complete(3).unwrap();
    server.request_create(3, AttachCode::from_i32(12)).unwrap();

    let client_scene = TestRegistry::new();
    let mut clients = vec![test_client(&hub, &client_scene)];
    let notifier = clients[0].load_notifier();
    clients[0].add_listener(AutoLoader::new(notifier));
    pump(&mut server, &mut clients);

    let created = client_scene.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].create_code, AttachCode::from_i32(12));
    assert_eq!(created[0].partition, 3);
    assert_eq!(created, server_scene.created());
}

#[test]
fn timed_out_peer_is_forgotten() {
    init_logging();
    let hub = LocalHub::new();
    let mut server = test_server(&hub, &TestRegistry::new());
    let (peer, _transport) = hub.connect_client();
    server.receive();
    assert_eq!(server.peers_count(), 1);

    hub.time_out(peer);
    let mut events = server.receive();

    assert_eq!(events.read::<DisconnectEvent>().collect::<Vec<_>>(), vec![peer]);
    assert_eq!(server.peers_count(), 0);
    assert_eq!(server.peer_partitions(&peer), None);
}
