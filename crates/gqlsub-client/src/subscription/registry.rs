use std::collections::HashMap;

use tokio::sync::Mutex;

use gqlsub_core::error::{GqlSubError, Result};

use crate::subscription::handle::{channel, Route, Subscription};

struct RegistryState {
    routes: HashMap<String, Route>,
    next_id: u64,
    closed: bool,
}

/// Subscription registry:
/// - `id -> Route` for every live subscription
/// - the sequential id counter
/// - a closed flag set by `drain`
///
/// One lock guards all of it, for lookups as well as mutations. Removing a
/// route and closing it happen in the same critical section, so each
/// subscription is closed exactly once whichever of unsubscribe, `complete`,
/// or shutdown gets there first.
pub struct SubscriptionRegistry {
    state: Mutex<RegistryState>,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState {
                routes: HashMap::new(),
                next_id: 0,
                closed: false,
            }),
        }
    }

    /// Allocate the next id ("0", "1", ...) and register a subscription under it.
    pub async fn register(&self) -> Result<Subscription> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(GqlSubError::Closed);
        }
        let id = state.next_id.to_string();
        state.next_id += 1;

        let (route, sub) = channel(id.clone());
        state.routes.insert(id, route);
        Ok(sub)
    }

    pub(crate) async fn route(&self, id: &str) -> Result<Route> {
        let state = self.state.lock().await;
        state
            .routes
            .get(id)
            .cloned()
            .ok_or_else(|| GqlSubError::UnknownSubscription(id.to_string()))
    }

    /// Remove and close. Returns false if the id was not registered.
    pub async fn remove(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        match state.routes.remove(id) {
            Some(route) => {
                route.close();
                true
            }
            None => false,
        }
    }

    /// Close the registry: no further registrations, every live subscription
    /// removed and closed. Returns how many were closed.
    pub async fn drain(&self) -> usize {
        let mut state = self.state.lock().await;
        state.closed = true;
        let n = state.routes.len();
        for (_, route) in state.routes.drain() {
            route.close();
        }
        n
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.routes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }
}

