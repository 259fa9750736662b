use std::sync::LazyLock;

use tokio::sync::watch;
use tracing::debug;

static GLOBAL: LazyLock<EventBus> = LazyLock::new(EventBus::new);

/// Shared search query for components that do not know about each other.
///
/// Writers call [`EventBus::set_search_query`]; readers either poll
/// [`EventBus::search_query`] or hold a [`SearchQuerySubscription`] and await
/// changes. Subscribers are only woken when the value actually changes.
#[derive(Debug)]
pub struct EventBus {
    search_query: watch::Sender<String>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (search_query, _) = watch::channel(String::new());
        Self { search_query }
    }

    /// The process-wide bus.
    pub fn global() -> &'static EventBus {
        &GLOBAL
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        let changed = self.search_query.send_if_modified(|current| {
            if *current == query {
                false
            } else {
                *current = query;
                true
            }
        });
        if changed {
            debug!(
                subscribers = self.search_query.receiver_count(),
                "search query changed"
            );
        }
    }

    pub fn search_query(&self) -> String {
        self.search_query.borrow().clone()
    }

    pub fn subscribe(&self) -> SearchQuerySubscription {
        SearchQuerySubscription {
            receiver: self.search_query.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchQuerySubscription {
    receiver: watch::Receiver<String>,
}

impl SearchQuerySubscription {
    /// Waits for the next change and returns the new query, or `None` once the
    /// bus has been dropped.
    pub async fn changed(&mut self) -> Option<String> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn current(&self) -> String {
        self.receiver.borrow().clone()
    }
}
