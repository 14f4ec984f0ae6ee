#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{Map, Value};

use gqlsub_core::protocol::{raw_payload, Envelope, MessageType, StartPayload};
use gqlsub_core::ErrorKind;

#[test]
fn literals_match_serde_names() {
    let all = [
        MessageType::ConnectionInit,
        MessageType::Start,
        MessageType::Stop,
        MessageType::ConnectionTerminate,
        MessageType::ConnectionAck,
        MessageType::ConnectionError,
        MessageType::Data,
        MessageType::Error,
        MessageType::Complete,
    ];
    for t in all {
        let s = serde_json::to_string(&t).unwrap();
        assert_eq!(s, format!("\"{}\"", t.as_str()));
        assert_eq!(t.to_string(), t.as_str());
        let back: MessageType = serde_json::from_str(&s).unwrap();
        assert_eq!(back, t);
    }
}

#[test]
fn scope_split() {
    assert!(MessageType::Data.is_subscription_scoped());
    assert!(MessageType::Complete.is_subscription_scoped());
    assert!(!MessageType::ConnectionAck.is_subscription_scoped());
    assert!(MessageType::Stop.is_client_to_server());
    assert!(!MessageType::Complete.is_client_to_server());
}

#[test]
fn connection_scoped_frames_omit_id_and_payload() {
    assert_eq!(
        Envelope::terminate().encode().unwrap(),
        r#"{"type":"connection_terminate"}"#
    );
    assert_eq!(Envelope::init(None).encode().unwrap(), r#"{"type":"connection_init"}"#);
    assert_eq!(Envelope::stop("7").encode().unwrap(), r#"{"id":"7","type":"stop"}"#);
}

#[test]
fn start_frame_shape() {
    let mut vars = Map::new();
    vars.insert("q".into(), Value::from("foo"));
    let body = StartPayload {
        query: "subscription ($q: String) { cnt }".into(),
        variables: vars,
    };
    let env = Envelope::start("0", raw_payload(&body).unwrap());
    let s = env.encode().unwrap();
    assert_eq!(
        s,
        r#"{"id":"0","type":"start","payload":{"query":"subscription ($q: String) { cnt }","variables":{"q":"foo"}}}"#
    );

    let back = Envelope::decode(&s).unwrap();
    let p = back.start_payload().unwrap();
    assert_eq!(p.query, "subscription ($q: String) { cnt }");
    assert_eq!(p.variables["q"], "foo");
}

#[test]
fn payload_bytes_are_verbatim() {
    let env = Envelope::decode(r#"{"id":"3","type":"data","payload":{"data": "bar"}}"#).unwrap();
    assert_eq!(&env.payload_bytes()[..], br#"{"data": "bar"}"#);
}

#[test]
fn null_payload_is_absent() {
    let env = Envelope::decode(r#"{"id":null,"type":"connection_ack","payload":null}"#).unwrap();
    assert!(env.id.is_none());
    assert!(env.payload.is_none());
    assert!(env.payload_bytes().is_empty());
}

#[test]
fn unknown_type_is_not_encodable() {
    let env = Envelope::decode(r#"{"type":"ka"}"#).unwrap();
    assert_eq!(env.msg_type, MessageType::Unknown);
    let err = env.encode().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encode);
}
