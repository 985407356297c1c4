use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use alloy_primitives::ChainId;
use parking_lot::Mutex;
use tracing::error;

/// Event announced by the session to its subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A connection attempt started. Not a confirmation.
    Connect,
    /// A connection attempt succeeded.
    Connected { address: String },
    /// The stored address changed (connect, disconnect, or wallet-side
    /// account switch).
    AddressChanged { address: String },
    /// A new provider handle was adopted.
    ProviderChanged,
    /// The provider reported a chain switch.
    ChainChanged { chain_id: ChainId },
}

impl SessionEvent {
    /// The kind subscriptions are keyed by.
    pub const fn kind(&self) -> SessionEventKind {
        match self {
            Self::Connect => SessionEventKind::Connect,
            Self::Connected { .. } => SessionEventKind::Connected,
            Self::AddressChanged { .. } => SessionEventKind::AddressChanged,
            Self::ProviderChanged => SessionEventKind::ProviderChanged,
            Self::ChainChanged { .. } => SessionEventKind::ChainChanged,
        }
    }
}

/// Subscription key for [`SessionEvent`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    Connect,
    Connected,
    AddressChanged,
    ProviderChanged,
    ChainChanged,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: HashMap<SessionEventKind, Vec<(SubscriptionId, Handler)>>,
}

/// Minimal synchronous publish/subscribe bus.
///
/// Handlers for one event kind run in subscription order. A panicking
/// handler is isolated: it is logged and the remaining handlers still run.
/// Events with no subscribers are discarded; nothing is buffered.
///
/// The handler list is snapshotted before invocation, so handlers may
/// subscribe, unsubscribe, or emit from inside a callback.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    pub fn subscribe(
        &self,
        kind: SessionEventKind,
        handler: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.handlers.entry(kind).or_default().push((id, Arc::new(handler)));
        id
    }

    /// Removes a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock();
        for handlers in inner.handlers.values_mut() {
            handlers.retain(|(existing, _)| *existing != id);
        }
    }

    /// Synchronously invokes every handler subscribed to the event's kind.
    pub fn emit(&self, event: &SessionEvent) {
        let snapshot: Vec<Handler> = {
            let inner = self.inner.lock();
            match inner.handlers.get(&event.kind()) {
                Some(handlers) => handlers.iter().map(|(_, h)| h.clone()).collect(),
                None => return,
            }
        };

        for handler in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                error!(event = ?event.kind(), "event handler panicked");
            }
        }
    }
}
