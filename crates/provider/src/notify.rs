use std::sync::Arc;

use alloy_primitives::ChainId;

/// Provider-originated notification, delivered through the listener installed
/// with [`InjectedProvider::set_listener`](crate::InjectedProvider::set_listener).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderNotification {
    /// The set of exposed accounts changed. An empty list means the wallet
    /// revoked access entirely.
    AccountsChanged(Vec<String>),
    /// The active chain changed. The payload is forwarded raw; wallets send
    /// either a 0x-hex or a decimal string.
    ChainChanged(String),
}

/// Callback invoked by the provider for every notification.
pub type ProviderListener = Arc<dyn Fn(ProviderNotification) + Send + Sync>;

/// Parses a provider-reported chain id, accepting 0x-hex and decimal forms.
pub fn parse_chain_id(raw: &str) -> Option<ChainId> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => ChainId::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
