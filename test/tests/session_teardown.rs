/// Integration tests for session teardown
/// Once a session ends nothing it owned is left behind and no listener runs

use vista_client::DisconnectEvent;
use vista_test::{pump, test_client, test_server, LocalHub, TestListener, TestRegistry};

#[test]
fn disconnected_client_drops_state_and_listeners() {
    let hub = LocalHub::new();
    let mut server = test_server(&hub, &TestRegistry::new());
    let client_scene = TestRegistry::new();
    client_scene.place(1, &["spawn"]);
    let mut clients = vec![test_client(&hub, &client_scene)];
    let listener = TestListener::new();
    clients[0].add_listener(listener.clone());
    pump(&mut server, &mut clients);

    server.reset_partition(1);
    server.notify_partition_load_complete(1).unwrap();
    pump(&mut server, &mut clients);
    assert_eq!(listener.notices().len(), 1);

    clients[0].disconnect();
    assert!(!clients[0].is_connected());
    assert_eq!(clients[0].partition_state(1), None);
    assert!(!clients[0].creates_suppressed());
    assert_eq!(clients[0].pending_behavior_count(), 0);
    assert_eq!(clients[0].pending_object_count(), 0);

    server.reset_partition(2);
    server.notify_partition_load_complete(2).unwrap();
    pump(&mut server, &mut clients);

    assert_eq!(listener.notices().len(), 1);
    assert_eq!(server.peers_count(), 0);
    assert_eq!(hub.connected_clients(), 0);
}

#[test]
fn server_disconnect_ends_every_client_session() {
    let hub = LocalHub::new();
    let mut server = test_server(&hub, &TestRegistry::new());
    let listener = TestListener::new();
    server.add_listener(listener.clone());
    let mut clients = vec![
        test_client(&hub, &TestRegistry::new()),
        test_client(&hub, &TestRegistry::new()),
    ];
    pump(&mut server, &mut clients);
    server.reset_partition(1);
    server.notify_partition_load_complete(1).unwrap();
    pump(&mut server, &mut clients);
    assert!(clients[0].partition_state(1).is_some());

    server.disconnect();
    assert_eq!(server.peers_count(), 0);
    assert_eq!(server.partition_state(1), None);
    assert!(server.loaded_partitions().is_empty());

    for client in clients.iter_mut() {
        let mut events = client.receive();
        assert_eq!(events.read::<DisconnectEvent>().count(), 1);
        assert_eq!(client.partition_state(1), None);
        assert!(client.loaded_partitions().is_empty());
    }

    // listeners were removed along with the session
    server.reset_partition(4);
    assert_eq!(listener.notices().len(), 1);
}

#[test]
fn removed_listener_is_not_invoked() {
    let hub = LocalHub::new();
    let mut server = test_server(&hub, &TestRegistry::new());
    let mut clients = vec![test_client(&hub, &TestRegistry::new())];
    let kept = TestListener::new();
    let dropped = TestListener::new();
    clients[0].add_listener(kept.clone());
    let key = clients[0].add_listener(dropped.clone());
    pump(&mut server, &mut clients);

    assert!(clients[0].remove_listener(&key));
    server.reset_partition(1);
    server.notify_partition_load_complete(1).unwrap();
    pump(&mut server, &mut clients);

    assert_eq!(kept.notices().len(), 1);
    assert!(dropped.notices().is_empty());
}
