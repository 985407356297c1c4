//! # Wallet session manager
//!
//! The stateful core between a dApp and its injected wallet provider:
//! discovers the provider, runs the connection protocol, tracks the active
//! account and network, reconciles provider-originated events with session
//! state, and normalizes outgoing transaction requests before dispatch.
//!
//! ## Architecture
//!
//! ```text
//! consumers ──── on()/off() ────────┐
//!     │                             ▼
//!     │ connect() / disconnect() ┌──────────┐
//!     └──────────────────────────│ WalletSession │── emit ──▶ EventBus
//!        send_transaction()      └──────────┘
//!                                     │ detect / request / listen
//!                                     ▼
//!                              ProviderHandle (hearth-provider)
//! ```
//!
//! A session is constructed explicitly ([`WalletSession::new`]) and shared as
//! an `Arc`; applications that want exactly one session inject that one
//! instance into their consumers, and tests build fresh ones. There is no
//! global state.
//!
//! Concurrency model: every provider interaction is async and uncancelled;
//! session state lives behind a mutex that is never held across an await.
//! Concurrent `connect` calls race last-writer-wins; callers needing
//! exactly-once semantics serialize their own calls.

mod error;
mod events;
mod session;
mod tx;

pub use error::{SessionError, TransactionDispatchError};
pub use events::{EventBus, SessionEvent, SessionEventKind, SubscriptionId};
pub use session::{SessionState, WalletSession};
pub use tx::TransactionRequest;
