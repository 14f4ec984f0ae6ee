//! Lightweight in-process metrics.
//!
//! Frame and delivery counters stored as atomics, rendered in Prometheus text
//! format by `ClientMetrics::render`.

pub mod metrics;

pub use metrics::ClientMetrics;
