//! Scripted provider and host doubles shared by the session tests.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use hearth_provider::{
    Capabilities, DetectOptions, InjectedProvider, ProviderHost, ProviderListener,
    ProviderNotification, ProviderRpcError, RpcCall,
};
use parking_lot::Mutex;
use serde_json::{Value, json};

/// An injected provider whose account-access outcome is scripted up front
/// and whose calls are recorded for assertions.
pub struct MockProvider {
    caps: Capabilities,
    accounts: Mutex<Result<Vec<String>, ProviderRpcError>>,
    chain_id: Mutex<Option<String>>,
    send_result: Mutex<Result<Value, ProviderRpcError>>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<Value>>,
    listener: Mutex<Option<ProviderListener>>,
}

impl MockProvider {
    fn new(caps: Capabilities, accounts: Result<Vec<String>, ProviderRpcError>) -> Arc<Self> {
        Arc::new(Self {
            caps,
            accounts: Mutex::new(accounts),
            chain_id: Mutex::new(None),
            send_result: Mutex::new(Ok(json!(TX_HASH))),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
        })
    }

    /// Standards-shaped provider granting `accounts`.
    pub fn standard(accounts: &[&str]) -> Arc<Self> {
        Self::new(Capabilities::STANDARD, Ok(accounts.iter().map(ToString::to_string).collect()))
    }

    /// Standards-shaped provider whose account request fails with `error`.
    pub fn failing(error: ProviderRpcError) -> Arc<Self> {
        Self::new(Capabilities::STANDARD, Err(error))
    }

    /// Legacy (`enable`) provider granting `accounts`.
    pub fn legacy(accounts: &[&str]) -> Arc<Self> {
        Self::new(Capabilities::LEGACY, Ok(accounts.iter().map(ToString::to_string).collect()))
    }

    /// Scripts the `eth_chainId` response.
    pub fn report_chain_id(&self, raw: &str) {
        *self.chain_id.lock() = Some(raw.to_string());
    }

    /// How many times `method` was called.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|m| *m == method).count()
    }

    /// Transactions received through `eth_sendTransaction`.
    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().clone()
    }

    /// Fires a provider notification through the installed listener.
    pub fn fire(&self, notification: ProviderNotification) {
        let listener = self.listener.lock().clone().expect("no listener installed");
        listener(notification);
    }

    /// Whether a listener is currently installed.
    pub fn has_listener(&self) -> bool {
        self.listener.lock().is_some()
    }
}

pub const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

#[async_trait]
impl InjectedProvider for MockProvider {
    async fn request(&self, call: RpcCall) -> Result<Value, ProviderRpcError> {
        self.calls.lock().push(call.method().to_string());
        if !self.caps.request {
            return Err(ProviderRpcError::unsupported(call.method()));
        }
        match call {
            RpcCall::RequestAccounts => {
                self.accounts.lock().clone().map(|accounts| json!(accounts))
            }
            RpcCall::ChainId => match self.chain_id.lock().clone() {
                Some(raw) => Ok(json!(raw)),
                None => Err(ProviderRpcError::unsupported("eth_chainId")),
            },
            RpcCall::SendTransaction([tx]) => {
                self.sent.lock().push(tx);
                self.send_result.lock().clone()
            }
        }
    }

    async fn enable(&self) -> Result<Vec<String>, ProviderRpcError> {
        self.calls.lock().push("enable".to_string());
        if !self.caps.enable {
            return Err(ProviderRpcError::unsupported("enable"));
        }
        self.accounts.lock().clone()
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn set_listener(&self, listener: ProviderListener) {
        *self.listener.lock() = Some(listener);
    }
}

/// Host environment with swappable injection points.
#[derive(Default)]
pub struct MockHost {
    injected: Mutex<Option<Arc<dyn InjectedProvider>>>,
    legacy: Mutex<Option<Arc<dyn InjectedProvider>>>,
}

impl MockHost {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_injected(provider: Arc<MockProvider>) -> Arc<Self> {
        let host = Self::empty();
        host.inject(provider);
        host
    }

    pub fn with_legacy(provider: Arc<MockProvider>) -> Arc<Self> {
        let host = Self::empty();
        *host.legacy.lock() = Some(provider);
        host
    }

    /// Replaces the standards-shaped injection point, as a host does when it
    /// finishes (or re-does) injection.
    pub fn inject(&self, provider: Arc<MockProvider>) {
        *self.injected.lock() = Some(provider);
    }
}

impl ProviderHost for MockHost {
    fn injected(&self) -> Option<Arc<dyn InjectedProvider>> {
        self.injected.lock().clone()
    }

    fn legacy(&self) -> Option<Arc<dyn InjectedProvider>> {
        self.legacy.lock().clone()
    }
}

/// Discovery budget small enough for the failure tests.
pub fn fast_detect() -> DetectOptions {
    DetectOptions { attempts: 2, interval: Duration::from_millis(1) }
}

/// Polls `condition` until it holds or `timeout` elapses.
pub async fn wait_for(condition: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
