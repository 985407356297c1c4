use std::{fmt, sync::Arc};

use alloy_primitives::ChainId;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{
    DiscoveryError, ProviderListener, ProviderRpcError,
    notify::parse_chain_id,
};

/// A call forwarded to the provider's `request` surface.
///
/// Serializes to the EIP-1193 `{method, params}` wire shape.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum RpcCall {
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,

    #[serde(rename = "eth_chainId")]
    ChainId,

    #[serde(rename = "eth_sendTransaction")]
    SendTransaction([Value; 1]),
}

impl RpcCall {
    /// The RPC method name, for logging.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::RequestAccounts => "eth_requestAccounts",
            Self::ChainId => "eth_chainId",
            Self::SendTransaction(_) => "eth_sendTransaction",
        }
    }
}

/// Capability surface probed on a raw injected provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Exposes EIP-1193 `request`.
    pub request: bool,
    /// Exposes the legacy `enable` account grant.
    pub enable: bool,
    /// Exposes a send-style dispatch function. Legacy providers without it
    /// cannot be driven at all.
    pub send: bool,
}

impl Capabilities {
    /// A fully standards-shaped provider.
    pub const STANDARD: Self = Self { request: true, enable: false, send: true };

    /// An `enable`-era legacy provider.
    pub const LEGACY: Self = Self { request: false, enable: true, send: true };
}

/// Raw capability surface of a host-injected provider object.
///
/// Implementations are the boundary to the actual wallet: a wasm-bindgen
/// wrapper in the browser, a scripted mock in tests. Methods mirror what the
/// injected object itself exposes; callers should go through
/// [`ProviderHandle`], which fixes the account-access shape once.
#[async_trait]
pub trait InjectedProvider: Send + Sync {
    /// EIP-1193 `request`. Providers without the capability reject every call
    /// with a method-not-found error.
    async fn request(&self, call: RpcCall) -> Result<Value, ProviderRpcError>;

    /// Legacy account grant (`enable`), resolving to the exposed accounts.
    async fn enable(&self) -> Result<Vec<String>, ProviderRpcError>;

    /// Which parts of the surface this provider actually has.
    fn capabilities(&self) -> Capabilities;

    /// Installs the notification listener for `accountsChanged` and
    /// `chainChanged`, replacing any previously installed one.
    fn set_listener(&self, listener: ProviderListener);
}

/// How account access is requested from the adopted provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountAccess {
    /// `request({method: "eth_requestAccounts"})`.
    Request,
    /// Legacy `enable()`.
    Enable,
}

/// An adopted provider: the raw handle plus the account-access shape selected
/// when it was adopted.
///
/// Cloning shares the underlying provider object.
#[derive(Clone)]
pub struct ProviderHandle {
    raw: Arc<dyn InjectedProvider>,
    access: AccountAccess,
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("access", &self.access)
            .field("capabilities", &self.raw.capabilities())
            .finish()
    }
}

impl ProviderHandle {
    /// Adopts a raw provider, probing its capabilities once.
    ///
    /// Standards-shaped (`request`) providers are preferred over legacy
    /// (`enable`) ones; a provider exposing neither is rejected.
    pub fn adopt(raw: Arc<dyn InjectedProvider>) -> Result<Self, DiscoveryError> {
        let caps = raw.capabilities();
        let access = if caps.request {
            AccountAccess::Request
        } else if caps.enable {
            AccountAccess::Enable
        } else {
            return Err(DiscoveryError::Incompatible(
                "provider exposes neither `request` nor `enable`".into(),
            ));
        };
        Ok(Self { raw, access })
    }

    /// The account-access shape fixed at adoption time.
    pub const fn access(&self) -> AccountAccess {
        self.access
    }

    /// Requests account access, resolving to the accounts the wallet exposes.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ProviderRpcError> {
        match self.access {
            AccountAccess::Request => {
                let result = self.raw.request(RpcCall::RequestAccounts).await?;
                serde_json::from_value(result).map_err(|err| {
                    ProviderRpcError::internal(format!("malformed accounts response: {err}"))
                })
            }
            AccountAccess::Enable => self.raw.enable().await,
        }
    }

    /// Reads the chain id the provider currently reports.
    pub async fn chain_id(&self) -> Result<ChainId, ProviderRpcError> {
        let result = self.raw.request(RpcCall::ChainId).await?;
        let raw = match &result {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(ProviderRpcError::internal(format!(
                    "malformed chain id response: {other}"
                )));
            }
        };
        parse_chain_id(&raw)
            .ok_or_else(|| ProviderRpcError::internal(format!("malformed chain id response: {raw}")))
    }

    /// Submits a transaction request, returning the provider's result
    /// (typically the transaction hash) unmodified.
    pub async fn send_transaction(&self, tx: Value) -> Result<Value, ProviderRpcError> {
        self.raw.request(RpcCall::SendTransaction([tx])).await
    }

    /// Installs `listener` on the underlying provider object.
    pub fn set_listener(&self, listener: ProviderListener) {
        self.raw.set_listener(listener);
    }
}
