use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use tokio::task::JoinHandle;

use gqlsub_core::error::{ErrorKind, Result};
use gqlsub_core::protocol::{Envelope, MessageType};

use crate::client::ClientInner;
use crate::subscription::{DeliveryOutcome, Route, SubscriptionPayload};
use crate::transport::FrameStream;

/// Single reader of the inbound stream for the lifetime of a client.
///
/// Frames are routed one at a time. A delivery blocks until the subscriber
/// takes the payload, so a slow subscriber stalls every other subscription
/// on the connection (head-of-line blocking). Nothing is buffered on its
/// behalf.
pub(crate) struct DispatchLoop {
    inner: Arc<ClientInner>,
    frames: FrameStream,
}

impl DispatchLoop {
    pub(crate) fn new(inner: Arc<ClientInner>, frames: FrameStream) -> Self {
        Self { inner, frames }
    }

    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until the inbound stream ends, then shuts the client down.
    pub(crate) async fn run(self) {
        // The stream is only polled here; routing borrows the shared state alone.
        let DispatchLoop { inner, mut frames } = self;
        let router = FrameRouter { inner };

        while let Some(frame) = frames.next().await {
            if let Err(e) = router.route(&frame).await {
                let reason = match e.kind() {
                    ErrorKind::FrameDecode => "decode",
                    ErrorKind::UnknownSubscription => "unknown_subscription",
                    _ => "error",
                };
                router.drop_frame(reason);
                tracing::trace!(kind = e.kind().as_str(), error = %e, "inbound frame dropped");
            }
        }

        tracing::debug!("inbound stream ended; shutting down client");
        if let Err(e) = router.inner.shutdown().await {
            tracing::debug!(error = %e, "terminate after stream end");
        }
        if let Err(e) = router.inner.transport.close().await {
            tracing::debug!(error = %e, "transport close after stream end");
        }
    }
}

struct FrameRouter {
    inner: Arc<ClientInner>,
}

impl FrameRouter {
    async fn route(&self, frame: &str) -> Result<()> {
        let env = Envelope::decode(frame)?;
        self.inner
            .metrics
            .frames_received
            .inc(&[("type", env.msg_type.as_str())]);

        let Some(id) = env.id.as_deref() else {
            self.drop_frame("no_id");
            return Ok(());
        };

        let route = self.inner.registry.route(id).await?;

        match env.msg_type {
            MessageType::Data => {
                self.deliver(id, &route, SubscriptionPayload::Data(env.payload_bytes()))
                    .await
            }
            MessageType::Error => {
                self.deliver(id, &route, SubscriptionPayload::Error(env.payload_bytes()))
                    .await
            }
            MessageType::Complete => {
                if self.inner.remove(id).await {
                    tracing::debug!(%id, "subscription completed by server");
                }
            }
            other => {
                tracing::trace!(%id, msg_type = %other, "ignoring message type");
                self.drop_frame("ignored_type");
            }
        }
        Ok(())
    }

    async fn deliver(&self, id: &str, route: &Route, payload: SubscriptionPayload) {
        let kind = if payload.is_error() { "error" } else { "data" };
        let started = Instant::now();
        let outcome = route.deliver(payload).await;
        self.inner.metrics.delivery_wait.observe(started.elapsed());

        match outcome {
            DeliveryOutcome::Delivered => {
                self.inner.metrics.payloads_delivered.inc(&[("kind", kind)]);
            }
            DeliveryOutcome::Closed => {
                tracing::trace!(%id, "subscription closed during delivery");
                self.drop_frame("closed");
            }
            DeliveryOutcome::Abandoned => {
                // Handle dropped without unsubscribing: stop it on the server too.
                self.drop_frame("abandoned");
                let _open = self.inner.lifecycle.read().await;
                if self.inner.remove(id).await {
                    tracing::debug!(%id, "subscription handle dropped; sending stop");
                    if let Err(e) = self.inner.send(&Envelope::stop(id)).await {
                        tracing::debug!(%id, error = %e, "stop for abandoned subscription");
                    }
                }
            }
        }
    }

    fn drop_frame(&self, reason: &str) {
        self.inner.metrics.frames_dropped.inc(&[("reason", reason)]);
    }
}
