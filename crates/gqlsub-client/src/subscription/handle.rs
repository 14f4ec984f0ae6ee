//! Subscription handle and the dispatch-side route into it.
//!
//! Delivery is a hand-off: the dispatch loop waits until the consumer has
//! taken the payload out of `recv`, so at most one payload per subscription is
//! ever in flight. Closing is signalled through a `CancellationToken` that both
//! sides observe, which lets an in-flight delivery abort and lets `recv`
//! return `None` without waiting on the dispatch loop.

use futures_util::stream::{self, Stream};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::subscription::types::SubscriptionPayload;

pub(crate) struct Delivery {
    payload: SubscriptionPayload,
    taken: oneshot::Sender<()>,
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeliveryOutcome {
    /// The consumer took the payload.
    Delivered,
    /// The subscription was closed before the consumer took it.
    Closed,
    /// The consumer dropped its handle.
    Abandoned,
}

/// Registry-side half: the sender plus the shared close signal.
#[derive(Clone)]
pub(crate) struct Route {
    tx: mpsc::Sender<Delivery>,
    closed: CancellationToken,
}

impl Route {
    /// Blocks until the consumer takes the payload or the subscription closes.
    pub(crate) async fn deliver(&self, payload: SubscriptionPayload) -> DeliveryOutcome {
        let (taken_tx, taken_rx) = oneshot::channel();
        let handoff = async {
            let delivery = Delivery {
                payload,
                taken: taken_tx,
            };
            if self.tx.send(delivery).await.is_err() {
                return DeliveryOutcome::Abandoned;
            }
            match taken_rx.await {
                Ok(()) => DeliveryOutcome::Delivered,
                Err(_) => DeliveryOutcome::Abandoned,
            }
        };

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => DeliveryOutcome::Closed,
            outcome = handoff => outcome,
        }
    }

    /// Only the party that removed the route from the registry calls this.
    pub(crate) fn close(&self) {
        self.closed.cancel();
    }
}

/// Caller-side handle for one subscription.
pub struct Subscription {
    id: String,
    rx: mpsc::Receiver<Delivery>,
    closed: CancellationToken,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Subscription {
    /// Server-visible id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Next payload in server-send order. `None` once the subscription has
    /// been completed, unsubscribed, or the client closed; never blocks after
    /// that point.
    pub async fn recv(&mut self) -> Option<SubscriptionPayload> {
        let delivery = tokio::select! {
            biased;
            _ = self.closed.cancelled() => None,
            d = self.rx.recv() => d,
        }?;
        let _ = delivery.taken.send(());
        Some(delivery.payload)
    }

    /// Consume the handle as a stream of payloads.
    pub fn into_stream(self) -> impl Stream<Item = SubscriptionPayload> + Send + 'static {
        stream::unfold(self, |mut sub| async move {
            let payload = sub.recv().await?;
            Some((payload, sub))
        })
    }
}

pub(crate) fn channel(id: String) -> (Route, Subscription) {
    // One slot: the sender still waits for the `taken` ack.
    let (tx, rx) = mpsc::channel(1);
    let closed = CancellationToken::new();
    (
        Route {
            tx,
            closed: closed.clone(),
        },
        Subscription { id, rx, closed },
    )
}

