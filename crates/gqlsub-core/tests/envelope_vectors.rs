//! Envelope decode vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use gqlsub_core::protocol::{Envelope, MessageType};

use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "data_ok.json",
        "ack_no_id.json",
        "complete_no_payload.json",
        "connection_error.json",
        "unknown_type.json",
        "missing_type.json",
        "not_json.json",
    ];

    for f in files {
        let v = load(f);
        let res = Envelope::decode(&v.frame);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.kind().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected ok envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.msg_type.as_str(), ex["type"].as_str().unwrap(), "vector={}", v.description);

        match ex.get("id").and_then(|id| id.as_str()) {
            Some(id) => assert_eq!(env.id.as_deref(), Some(id), "vector={}", v.description),
            None => assert!(env.id.is_none(), "vector={}", v.description),
        }

        match ex.get("payload").and_then(|p| p.as_str()) {
            Some(p) => assert_eq!(&env.payload_bytes()[..], p.as_bytes(), "vector={}", v.description),
            None => assert!(env.payload.is_none(), "vector={}", v.description),
        }
    }
}

#[test]
fn decoded_frames_are_inert_when_type_is_unknown() {
    let env = Envelope::decode(r#"{"id":"1","type":"ka","payload":{}}"#).unwrap();
    assert_eq!(env.msg_type, MessageType::Unknown);
    assert_eq!(env.id.as_deref(), Some("1"));
}
