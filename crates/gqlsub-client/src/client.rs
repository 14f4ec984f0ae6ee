//! Subscription client facade.
//!
//! Lifecycle:
//! - `open`/`start`: handshake synchronously, then spawn the dispatch loop
//! - `subscribe`/`unsubscribe`: callable concurrently from any task
//! - `close`: idempotent; also runs on its own when the inbound stream ends

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use gqlsub_core::error::Result;
use gqlsub_core::protocol::{raw_payload, Envelope, MessageType};

use crate::config::ClientSection;
use crate::dispatch::DispatchLoop;
use crate::obs::ClientMetrics;
use crate::subscription::{Subscription, SubscriptionRegistry, SubscriptionRequest};
use crate::transport::handshake::{handshake, DEFAULT_HANDSHAKE_TIMEOUT};
use crate::transport::{send_envelope, ws, Connection, Transport};

/// How long `close` waits for the dispatch task after closing the transport.
const DISPATCH_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// State shared between the facade and the dispatch task.
pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) registry: SubscriptionRegistry,
    pub(crate) metrics: ClientMetrics,
    /// Held shared by subscribe/unsubscribe across register and send, and
    /// exclusively by shutdown across drain and terminate. No `start` or
    /// `stop` can follow `connection_terminate` on the wire.
    pub(crate) lifecycle: RwLock<()>,
    terminated: AtomicBool,
}

impl ClientInner {
    fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            registry: SubscriptionRegistry::new(),
            metrics: ClientMetrics::default(),
            lifecycle: RwLock::new(()),
            terminated: AtomicBool::new(false),
        }
    }

    pub(crate) async fn send(&self, env: &Envelope) -> Result<()> {
        send_envelope(self.transport.as_ref(), env).await?;
        self.metrics
            .frames_sent
            .inc(&[("type", env.msg_type.as_str())]);
        Ok(())
    }

    /// Remove and close one subscription.
    pub(crate) async fn remove(&self, id: &str) -> bool {
        let removed = self.registry.remove(id).await;
        if removed {
            self.metrics.subscriptions_active.dec();
        }
        removed
    }

    /// Close every subscription, then send `connection_terminate` once.
    pub(crate) async fn shutdown(&self) -> Result<()> {
        let _exclusive = self.lifecycle.write().await;
        let closed = self.registry.drain().await;
        self.metrics.subscriptions_active.add(-(closed as i64));

        if self.terminated.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::debug!(closed, "client shutting down");
        self.send(&Envelope::terminate()).await
    }
}

/// Client for one `graphql-ws` connection, multiplexing any number of
/// subscriptions over it.
pub struct SubscriptionClient {
    inner: Arc<ClientInner>,
    dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriptionClient {
    /// Connect over WebSocket and run the handshake with the default timeout.
    pub async fn open<T: Serialize + ?Sized>(
        endpoint: &str,
        headers: &HashMap<String, String>,
        init_payload: &T,
    ) -> Result<Self> {
        let conn = ws::connect(endpoint, headers).await?;
        Self::start(conn, init_payload, &CancellationToken::new(), DEFAULT_HANDSHAKE_TIMEOUT).await
    }

    /// Connect using a config section; `cancel` aborts the handshake wait.
    pub async fn open_with<T: Serialize + ?Sized>(
        cfg: &ClientSection,
        init_payload: &T,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let conn = ws::connect(&cfg.endpoint, &cfg.headers).await?;
        Self::start(conn, init_payload, cancel, cfg.handshake_timeout()).await
    }

    /// Handshake over an already established connection and start dispatching.
    pub async fn start<T: Serialize + ?Sized>(
        mut conn: Connection,
        init_payload: &T,
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Result<Self> {
        let init = match raw_payload(init_payload) {
            Ok(init) => init,
            Err(e) => {
                let _ = conn.transport.close().await;
                return Err(e);
            }
        };
        handshake(&mut conn, Some(init), cancel, timeout).await?;

        let inner = Arc::new(ClientInner::new(conn.transport));
        inner
            .metrics
            .frames_sent
            .inc(&[("type", MessageType::ConnectionInit.as_str())]);

        let dispatch = DispatchLoop::new(Arc::clone(&inner), conn.frames).spawn();
        Ok(Self {
            inner,
            dispatch: Mutex::new(Some(dispatch)),
        })
    }

    /// Register a subscription and send its `start` frame.
    ///
    /// The subscription is registered before the frame goes out, so no answer
    /// can arrive ahead of its registry entry. If the send fails the entry is
    /// removed again and the error returned. Once `close` has begun this
    /// fails with `Closed` and nothing is sent.
    pub async fn subscribe(&self, req: SubscriptionRequest) -> Result<Subscription> {
        let payload = req.start_payload()?;
        let _open = self.inner.lifecycle.read().await;
        let sub = self.inner.registry.register().await?;
        self.inner.metrics.subscriptions_active.inc();

        if let Err(e) = self.inner.send(&Envelope::start(sub.id(), payload)).await {
            self.inner.remove(sub.id()).await;
            tracing::debug!(id = %sub.id(), error = %e, "start failed; subscription discarded");
            return Err(e);
        }
        tracing::debug!(id = %sub.id(), "subscription started");
        Ok(sub)
    }

    /// Close the subscription locally, then send `stop`.
    ///
    /// The local close happens first and stands even if the send fails; the
    /// send error is returned for the caller's information only.
    pub async fn unsubscribe(&self, sub: &Subscription) -> Result<()> {
        self.unsubscribe_id(sub.id()).await
    }

    /// `unsubscribe` by id, for callers that turned the handle into a stream.
    pub async fn unsubscribe_id(&self, id: &str) -> Result<()> {
        let _open = self.inner.lifecycle.read().await;
        if self.inner.registry.is_closed().await {
            return Ok(());
        }
        if !self.inner.remove(id).await {
            tracing::trace!(%id, "unsubscribe for a subscription that already ended");
        }
        self.inner.send(&Envelope::stop(id)).await
    }

    /// Close every subscription, send `connection_terminate`, close the
    /// transport and wait for the dispatch task. Safe to call repeatedly.
    ///
    /// A terminate send error takes precedence over a transport close error.
    pub async fn close(&self) -> Result<()> {
        let terminated = self.inner.shutdown().await;
        let closed = self.inner.transport.close().await;

        if let Some(mut handle) = self.dispatch.lock().await.take() {
            match tokio::time::timeout(DISPATCH_SHUTDOWN_GRACE, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "dispatch task failed"),
                Err(_) => {
                    tracing::warn!("dispatch task did not stop in time; aborting");
                    handle.abort();
                }
            }
        }

        if let Err(e) = &terminated {
            tracing::debug!(error = %e, "terminate send failed");
        }
        if let Err(e) = &closed {
            tracing::debug!(error = %e, "transport close failed");
        }
        terminated.and(closed)
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.registry.is_closed().await
    }

    pub async fn active_subscriptions(&self) -> usize {
        self.inner.registry.len().await
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.inner.metrics
    }
}

impl Drop for SubscriptionClient {
    fn drop(&mut self) {
        if self.dispatch.get_mut().is_none() {
            return;
        }
        // Not closed explicitly: shut down in the background if a runtime is around.
        let inner = Arc::clone(&self.inner);
        if let Ok(rt) = tokio::runtime::Handle::try_current() {
            rt.spawn(async move {
                let _ = inner.shutdown().await;
                let _ = inner.transport.close().await;
            });
        }
    }
}
