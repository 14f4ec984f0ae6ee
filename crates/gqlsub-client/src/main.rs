//! gqlsub demo client.
//!
//! - Loads `gqlsub.yaml` (or the path given as the first argument)
//! - Opens one connection and starts every configured subscription
//! - Logs each payload until Ctrl-C or until every subscription has ended

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use gqlsub_client::{config, SubscriptionClient};
use gqlsub_core::error::{GqlSubError, Result};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "gqlsub.yaml".to_string());
    if let Err(e) = run(&path).await {
        if e.is_handshake() {
            tracing::error!(kind = e.kind().as_str(), error = %e, "server did not accept the session");
        } else {
            tracing::error!(kind = e.kind().as_str(), error = %e, "gqlsub-client failed");
        }
        std::process::exit(1);
    }
}

async fn run(path: &str) -> Result<()> {
    let cfg = config::load_from_file(path)?;
    if cfg.subscriptions.is_empty() {
        return Err(GqlSubError::BadConfig("no subscriptions configured".into()));
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let client = SubscriptionClient::open_with(&cfg.client, &cfg.client.init_payload, &cancel).await?;
    tracing::info!(endpoint = %cfg.client.endpoint, "gqlsub-client connected");

    let mut streams = Vec::with_capacity(cfg.subscriptions.len());
    for s in &cfg.subscriptions {
        let sub = client.subscribe(s.to_request()).await?;
        let id = sub.id().to_string();
        tracing::info!(%id, query = %s.query, "subscribed");
        streams.push(sub.into_stream().map(move |p| (id.clone(), p)).boxed());
    }
    let mut payloads = stream::select_all(streams);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("interrupted");
                break;
            }
            next = payloads.next() => match next {
                Some((id, payload)) => {
                    let kind = if payload.is_error() { "error" } else { "data" };
                    let body = String::from_utf8_lossy(payload.as_bytes());
                    tracing::info!(%id, kind, %body, "payload");
                }
                None => {
                    tracing::info!("all subscriptions ended");
                    break;
                }
            }
        }
    }

    let res = client.close().await;
    tracing::debug!(metrics = %client.metrics().render(), "final metrics");
    res
}
