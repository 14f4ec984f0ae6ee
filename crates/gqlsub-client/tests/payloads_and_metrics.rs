#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;

use gqlsub_client::obs::metrics::CounterVec;
use gqlsub_client::obs::ClientMetrics;
use gqlsub_client::{SubscriptionPayload, SubscriptionRequest};

#[test]
fn request_builder_collects_variables() {
    let req = SubscriptionRequest::new("subscription ($q: String) { cnt }")
        .var("q", "foo")
        .var("n", 3);
    assert_eq!(req.variables["q"], "foo");
    assert_eq!(req.variables["n"], 3);

    let replaced = req.with_variables(serde_json::Map::new());
    assert!(replaced.variables.is_empty());
}

#[test]
fn payload_accessors() {
    let p = SubscriptionPayload::Data(Bytes::from_static(br#"{"data":"bar"}"#));
    assert!(!p.is_error());
    assert!(p.error().is_none());
    assert_eq!(p.data().map(|b| &b[..]), Some(&br#"{"data":"bar"}"#[..]));

    #[derive(Deserialize)]
    struct Body {
        data: String,
    }
    let body: Body = p.decode().expect("decode");
    assert_eq!(body.data, "bar");

    let e = SubscriptionPayload::Error(Bytes::from_static(b"not json"));
    assert!(e.is_error());
    assert!(e.data().is_none());
    assert!(e.decode::<Body>().is_err());
}

#[test]
fn counters_are_keyed_by_sorted_labels() {
    let c = CounterVec::default();
    c.inc(&[("type", "data"), ("dir", "in")]);
    c.add(&[("dir", "in"), ("type", "data")], 2);
    assert_eq!(c.get(&[("type", "data"), ("dir", "in")]), 3);
    assert_eq!(c.get(&[("type", "error")]), 0);
}

#[test]
fn render_includes_every_family() {
    let m = ClientMetrics::default();
    m.frames_dropped.inc(&[("reason", "decode")]);
    m.subscriptions_active.inc();
    m.delivery_wait.observe(Duration::from_millis(2));
    assert_eq!(m.delivery_wait.count(), 1);

    let out = m.render();
    assert!(out.contains("gqlsub_frames_dropped_total{reason=\"decode\"} 1"));
    assert!(out.contains("gqlsub_subscriptions_active 1"));
    assert!(out.contains("gqlsub_delivery_wait_micros_bucket{le=\"10000\"} 1"));
    assert!(out.contains("gqlsub_delivery_wait_micros_count 1"));
}
