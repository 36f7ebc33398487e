//! Round trips between `UdpBridge` and a local socket playing the Max side

use bridge_client::osc::OscMessage;
use bridge_client::{Bridge, BridgeConfig, BridgeError, LiveValue, UdpBridge};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Bind a fake Max patch and a bridge pointed at it
async fn setup() -> (UdpSocket, UdpBridge) {
    let max = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let config = BridgeConfig::new(
        max.local_addr().unwrap(),
        "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
    );
    let bridge = UdpBridge::bind(&config).await.unwrap();
    (max, bridge)
}

async fn receive(max: &UdpSocket) -> (OscMessage, SocketAddr) {
    let mut buffer = vec![0u8; 2048];
    let (size, from) = tokio::time::timeout(Duration::from_secs(2), max.recv_from(&mut buffer))
        .await
        .expect("no datagram from bridge")
        .unwrap();
    (OscMessage::decode(&buffer[..size]).unwrap(), from)
}

fn callback_of(message: &OscMessage) -> String {
    message.args[2].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_get_resolves_with_reply_value() {
    let (max, bridge) = setup().await;

    let read = tokio::spawn(async move {
        let value = bridge
            .get("live_set master_track mixer_device song_tempo", "value")
            .await;
        (value, bridge.pending_requests())
    });

    let (request, from) = receive(&max).await;
    assert_eq!(request.address, "/get");
    assert_eq!(
        request.args[0],
        LiveValue::Str("live_set master_track mixer_device song_tempo".into())
    );
    assert_eq!(request.args[1], LiveValue::Str("value".into()));

    let reply = OscMessage::new(
        "/_get_reply",
        vec![callback_of(&request).into(), LiveValue::Float(120.0)],
    );
    max.send_to(&reply.encode(), from).await.unwrap();

    let (value, pending) = read.await.unwrap();
    assert_eq!(value.unwrap(), LiveValue::Float(120.0));
    assert_eq!(pending, 0);
}

#[tokio::test]
async fn test_count_uses_count_address() {
    let (max, bridge) = setup().await;

    let read = tokio::spawn(async move { bridge.count("live_set", "scenes").await });

    let (request, from) = receive(&max).await;
    assert_eq!(request.address, "/count");
    assert_eq!(request.args[1], LiveValue::Str("scenes".into()));

    let reply = OscMessage::new(
        "/_get_reply",
        vec![callback_of(&request).into(), LiveValue::Int(8)],
    );
    max.send_to(&reply.encode(), from).await.unwrap();

    assert_eq!(read.await.unwrap().unwrap(), LiveValue::Int(8));
}

#[tokio::test]
async fn test_replies_are_matched_by_callback() {
    let (max, bridge) = setup().await;
    let bridge = std::sync::Arc::new(bridge);

    let first = tokio::spawn({
        let bridge = bridge.clone();
        async move { bridge.get("live_set tracks 0", "name").await }
    });
    let (first_request, from) = receive(&max).await;

    let second = tokio::spawn({
        let bridge = bridge.clone();
        async move { bridge.get("live_set tracks 1", "name").await }
    });
    let (second_request, _) = receive(&max).await;

    // Answer in reverse order
    for (request, name) in [(&second_request, "Bass"), (&first_request, "Drums")] {
        let reply = OscMessage::new("/_get_reply", vec![callback_of(request).into(), name.into()]);
        max.send_to(&reply.encode(), from).await.unwrap();
    }

    assert_eq!(first.await.unwrap().unwrap(), LiveValue::Str("Drums".into()));
    assert_eq!(second.await.unwrap().unwrap(), LiveValue::Str("Bass".into()));
}

#[tokio::test]
async fn test_set_and_call_are_fire_and_forget() {
    let (max, bridge) = setup().await;

    bridge
        .set(
            "live_set master_track mixer_device song_tempo",
            "value",
            LiveValue::Float(140.0),
        )
        .await
        .unwrap();
    let (set, _) = receive(&max).await;
    assert_eq!(set.address, "/set");
    assert_eq!(set.args[2], LiveValue::Float(140.0));

    bridge.call("live_set scenes 3", "fire").await.unwrap();
    let (call, _) = receive(&max).await;
    assert_eq!(call.address, "/call");
    assert_eq!(
        call.args,
        vec![LiveValue::Str("live_set scenes 3".into()), LiveValue::Str("fire".into())]
    );

    assert_eq!(bridge.pending_requests(), 0);
}

#[tokio::test]
async fn test_abandoned_read_leaves_no_pending_entry() {
    let (max, bridge) = setup().await;

    let result =
        tokio::time::timeout(Duration::from_millis(50), bridge.get("live_set", "tempo")).await;
    assert!(result.is_err());
    assert_eq!(bridge.pending_requests(), 0);

    // A late reply for the abandoned read is dropped quietly
    let (request, from) = receive(&max).await;
    let reply = OscMessage::new(
        "/_get_reply",
        vec![callback_of(&request).into(), LiveValue::Float(120.0)],
    );
    max.send_to(&reply.encode(), from).await.unwrap();
    assert_eq!(bridge.pending_requests(), 0);
}

#[tokio::test]
async fn test_bind_conflict_is_network_error() {
    let (_max, bridge) = setup().await;
    let taken = bridge.local_addr().unwrap();

    let config = BridgeConfig::new("127.0.0.1:9".parse().unwrap(), taken);
    let error = UdpBridge::bind(&config).await.unwrap_err();
    assert!(matches!(error, BridgeError::Network(_)));
}
