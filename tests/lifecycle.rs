//! End-to-end lifecycle tests over the TCP transport.

use bytes::Bytes;
use pairlink::config::Config;
use pairlink::event::{Event, LinkState};
use pairlink::link::{Link, LinkEvents};
use pairlink::transport::TcpTransport;
use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

/// Helper to initialize tracing for tests.
fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

async fn next_event(events: &mut LinkEvents) -> Event {
    tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

/// Drains events until the given state change is observed.
async fn wait_for_state(events: &mut LinkEvents, state: LinkState) -> Vec<Event> {
    let mut seen = Vec::new();
    loop {
        let event = next_event(events).await;
        let done = event == Event::StateChanged(state);
        seen.push(event);
        if done {
            return seen;
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tcp_listen_dial_exchange() {
    init_tracing();

    // 1. Side A listens.
    let addr_a: SocketAddr = "127.0.0.1:9973".parse().unwrap();
    let (link_a, mut events_a) = Link::new(TcpTransport::new(addr_a), Config::default());
    link_a.start().await.unwrap();
    assert_eq!(link_a.state(), LinkState::Listening);

    // 2. Side B dials A.
    let addr_b: SocketAddr = "127.0.0.1:9974".parse().unwrap();
    let (link_b, mut events_b) = Link::new(TcpTransport::new(addr_b), Config::default());
    link_b.connect(addr_a).await.unwrap();

    // 3. Both sides promote exactly one session.
    let seen_a = wait_for_state(&mut events_a, LinkState::Connected).await;
    assert!(
        seen_a
            .iter()
            .any(|e| matches!(e, Event::PeerIdentified(_))),
        "missing peer identity on A: {seen_a:?}"
    );
    wait_for_state(&mut events_b, LinkState::Connected).await;
    assert_eq!(link_a.state(), LinkState::Connected);
    assert_eq!(link_b.state(), LinkState::Connected);

    // 4. A to B.
    let msg_a = Bytes::from_static(b"hello from a");
    link_a.write(msg_a.clone()).await.unwrap();
    assert_eq!(next_event(&mut events_a).await, Event::DataSent(msg_a.clone()));
    assert_eq!(next_event(&mut events_b).await, Event::DataReceived(msg_a));

    // 5. B to A.
    let msg_b = Bytes::from_static(b"hello from b");
    link_b.write(msg_b.clone()).await.unwrap();
    assert_eq!(next_event(&mut events_b).await, Event::DataSent(msg_b.clone()));
    assert_eq!(next_event(&mut events_a).await, Event::DataReceived(msg_b));

    // 6. B stops; A loses the session and returns to listening on its own.
    link_b.stop().await.unwrap();
    assert_eq!(link_b.state(), LinkState::Idle);

    let seen_a = wait_for_state(&mut events_a, LinkState::Listening).await;
    assert_eq!(
        seen_a,
        vec![
            Event::TransientFailure("Device connection was lost".to_string()),
            Event::StateChanged(LinkState::Idle),
            Event::StateChanged(LinkState::Listening),
        ]
    );
    assert_eq!(link_a.state(), LinkState::Listening);

    link_a.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tcp_dial_failure_reverts_to_listening() {
    init_tracing();

    let addr: SocketAddr = "127.0.0.1:9975".parse().unwrap();
    let (link, mut events) = Link::new(TcpTransport::new(addr), Config::default());

    // Nobody listens on this port.
    let nowhere: SocketAddr = "127.0.0.1:9976".parse().unwrap();
    link.connect(nowhere).await.unwrap();

    let seen = wait_for_state(&mut events, LinkState::Listening).await;
    assert_eq!(
        seen,
        vec![
            Event::StateChanged(LinkState::Connecting),
            Event::TransientFailure("Unable to connect device".to_string()),
            Event::StateChanged(LinkState::Idle),
            Event::StateChanged(LinkState::Listening),
        ]
    );
    assert_eq!(link.state(), LinkState::Listening);

    link.stop().await.unwrap();
}
