#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use gqlsub_client::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
client:
  endpoint: "ws://127.0.0.1:8080/graphql"
  handshake_timeout: 500 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
client:
  endpoint: "http://localhost:4000/graphql"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.client.endpoint, "http://localhost:4000/graphql");
    assert_eq!(cfg.client.handshake_timeout(), Duration::from_secs(10));
    assert!(cfg.client.headers.is_empty());
    assert!(cfg.client.init_payload.is_null());
    assert!(cfg.subscriptions.is_empty());
}

#[test]
fn full_config_builds_requests() {
    let ok = r#"
version: 1
client:
  endpoint: "wss://api.example.com/graphql"
  handshake_timeout_ms: 2500
  headers:
    Authorization: "Bearer abc"
  init_payload:
    token: "abc"
subscriptions:
  - query: "subscription ($q: String) { cnt }"
    variables:
      q: "foo"
  - query: "subscription { ticks }"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.client.handshake_timeout(), Duration::from_millis(2500));
    assert_eq!(cfg.client.headers["Authorization"], "Bearer abc");
    assert_eq!(cfg.client.init_payload["token"], "abc");

    let first = cfg.subscriptions[0].to_request();
    assert_eq!(first.query, "subscription ($q: String) { cnt }");
    assert_eq!(first.variables["q"], "foo");
    assert!(cfg.subscriptions[1].to_request().variables.is_empty());
}

#[test]
fn unsupported_version_is_rejected() {
    let bad = r#"
version: 2
client:
  endpoint: "ws://127.0.0.1:8080"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn endpoint_scheme_is_checked() {
    let bad = r#"
version: 1
client:
  endpoint: "ftp://example.com"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");
}

#[test]
fn handshake_timeout_out_of_range() {
    for ms in [0u64, 99, 120_001] {
        let bad = format!(
            "version: 1\nclient:\n  endpoint: \"ws://h\"\n  handshake_timeout_ms: {ms}\n"
        );
        let err = config::load_from_str(&bad).expect_err("must fail");
        assert_eq!(err.kind().as_str(), "BAD_CONFIG", "ms={ms}");
    }
}

#[test]
fn empty_query_is_rejected() {
    let bad = r#"
version: 1
client:
  endpoint: "ws://h"
subscriptions:
  - query: "   "
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("subscriptions[0].query"));
}

#[test]
fn missing_file_is_bad_config() {
    let err = config::load_from_file("/nonexistent/gqlsub.yaml").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "BAD_CONFIG");
}

#[test]
fn programmatic_section_uses_defaults_and_validates() {
    let section = config::ClientSection::new("http://localhost:4000/graphql");
    assert_eq!(section.handshake_timeout(), Duration::from_secs(10));
    assert!(section.headers.is_empty());
    assert!(section.init_payload.is_null());
    section.validate().expect("defaults are valid");

    let mut bad = config::ClientSection::new("localhost:4000");
    assert_eq!(bad.validate().unwrap_err().kind().as_str(), "BAD_CONFIG");
    bad.endpoint = "ws://localhost:4000".into();
    bad.handshake_timeout_ms = 50;
    assert_eq!(bad.validate().unwrap_err().kind().as_str(), "BAD_CONFIG");
}
