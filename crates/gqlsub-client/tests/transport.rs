#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message;

use gqlsub_client::transport::codec::{decode, Inbound};
use gqlsub_client::transport::memory;
use gqlsub_client::transport::ws::ws_url;
use gqlsub_core::ErrorKind;

#[test]
fn http_schemes_become_ws() {
    assert_eq!(ws_url("http://localhost:8080/query"), "ws://localhost:8080/query");
    assert_eq!(ws_url("https://api.example.com/q"), "wss://api.example.com/q");
    assert_eq!(ws_url("ws://already/ws"), "ws://already/ws");
    assert_eq!(ws_url("wss://already/wss"), "wss://already/wss");
}

#[test]
fn text_and_utf8_binary_are_frames() {
    assert_eq!(
        decode(Message::text("{\"type\":\"connection_ack\"}")).ok(),
        Some(Inbound::Frame("{\"type\":\"connection_ack\"}".into()))
    );
    assert_eq!(
        decode(Message::binary(b"{}".to_vec())).ok(),
        Some(Inbound::Frame("{}".into()))
    );
}

#[test]
fn invalid_binary_is_a_decode_error() {
    let err = decode(Message::binary(vec![0xff, 0xfe])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FrameDecode);
}

#[test]
fn control_and_close_messages() {
    assert_eq!(decode(Message::Ping(Default::default())).ok(), Some(Inbound::Control));
    assert_eq!(decode(Message::Close(None)).ok(), Some(Inbound::Close));
}

#[tokio::test]
async fn memory_frames_flow_both_ways() {
    let (mut conn, mut peer) = memory::pair();
    conn.transport.send("hello".into()).await.unwrap();
    assert_eq!(peer.recv().await.as_deref(), Some("hello"));

    peer.send_raw("world").unwrap();
    assert_eq!(conn.frames.next().await.as_deref(), Some("world"));
}

#[tokio::test]
async fn memory_close_ends_stream_and_keeps_pending_frames_for_peer() {
    let (mut conn, mut peer) = memory::pair();
    conn.transport.send("last".into()).await.unwrap();
    conn.transport.close().await.unwrap();
    conn.transport.close().await.unwrap();

    assert!(conn.frames.next().await.is_none());
    assert!(conn.transport.send("late".into()).await.is_err());
    assert!(peer.send_raw("late").is_err());
    assert_eq!(peer.recv().await.as_deref(), Some("last"));
    assert!(peer.recv().await.is_none());
}

#[tokio::test]
async fn dropped_memory_peer_ends_stream() {
    let (mut conn, peer) = memory::pair();
    drop(peer);
    assert!(conn.frames.next().await.is_none());
}
