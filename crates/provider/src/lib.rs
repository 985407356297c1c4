//! # Injected provider abstraction
//!
//! This crate models the wallet provider object a browser host injects into a
//! dApp, following:
//! - [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193): Ethereum Provider JavaScript API
//! - JSON-RPC 2.0 error codes for the legacy surface
//!
//! Two provider shapes are supported:
//! 1. **Standards-shaped** providers exposing `request({method, params})`.
//! 2. **Legacy** providers exposing `enable()` and a send-style capability.
//!
//! The shape is probed once, when a raw provider is adopted into a
//! [`ProviderHandle`]; after that every account-access call goes through the
//! fixed [`AccountAccess`] variant instead of re-probing capabilities.
//!
//! Discovery ([`detect_provider`]) is asynchronous because the host may still
//! be injecting the provider when the caller asks for it, and it is re-run on
//! every connection attempt: the host can swap the injected object between
//! calls.

mod detect;
mod error;
mod notify;
mod provider;

pub use detect::{DetectOptions, ProviderHost, detect_provider};
pub use error::{DiscoveryError, ProviderRpcError, codes};
pub use notify::{ProviderListener, ProviderNotification, parse_chain_id};
pub use provider::{AccountAccess, Capabilities, InjectedProvider, ProviderHandle, RpcCall};
