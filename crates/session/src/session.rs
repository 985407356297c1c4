use std::sync::{Arc, Weak};

use hearth_networks::{Network, Networks};
use hearth_provider::{
    DetectOptions, ProviderHandle, ProviderHost, ProviderNotification, detect_provider,
    parse_chain_id,
};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    error::{SessionError, TransactionDispatchError},
    events::{EventBus, SessionEvent, SessionEventKind, SubscriptionId},
    tx::TransactionRequest,
};

/// Connection-protocol state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Discovery failed outright; the last `connect` raised.
    Error,
}

#[derive(Default)]
struct SessionInner {
    provider: Option<ProviderHandle>,
    address: String,
    network: Network,
    state: SessionState,
    /// Bumped on every provider replacement; listeners carry the generation
    /// they were installed under.
    listener_generation: u64,
}

/// The wallet session manager.
///
/// Construct with [`WalletSession::new`] and share the returned `Arc`;
/// consumers read state through the getters and react to the events emitted
/// on the bus surface ([`WalletSession::on`]).
///
/// State is guarded by a mutex that is never held across an await and never
/// held while emitting, so event handlers may freely call back into the
/// session. Concurrent `connect` calls are not serialized: the last writer
/// wins.
pub struct WalletSession {
    bus: EventBus,
    host: Arc<dyn ProviderHost>,
    networks: Networks,
    detect: DetectOptions,
    inner: Mutex<SessionInner>,
    /// Self-reference handed to provider listeners, so a listener installed
    /// on a discarded handle can never keep the session alive.
    weak: Weak<Self>,
}

impl WalletSession {
    /// Creates a session over `host`, starting disconnected on the
    /// registry's current network.
    pub fn new(host: Arc<dyn ProviderHost>, networks: Networks) -> Arc<Self> {
        Self::with_detect_options(host, networks, DetectOptions::default())
    }

    /// Like [`WalletSession::new`] with an explicit discovery budget.
    pub fn with_detect_options(
        host: Arc<dyn ProviderHost>,
        networks: Networks,
        detect: DetectOptions,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            bus: EventBus::new(),
            host,
            networks,
            detect,
            inner: Mutex::new(SessionInner {
                network: networks.current(),
                ..SessionInner::default()
            }),
            weak: weak.clone(),
        })
    }

    /// The connected account address, lowercase, or `""` when disconnected.
    pub fn address(&self) -> String {
        self.inner.lock().address.clone()
    }

    /// The network the provider currently reports.
    pub fn network(&self) -> Network {
        self.inner.lock().network
    }

    /// Current connection-protocol state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// The active provider handle, `None` before the first discovery.
    pub fn provider(&self) -> Option<ProviderHandle> {
        self.inner.lock().provider.clone()
    }

    /// The network registry this session resolves chain ids against.
    pub const fn networks(&self) -> &Networks {
        &self.networks
    }

    /// Subscribes `handler` to events of `kind`.
    pub fn on(
        &self,
        kind: SessionEventKind,
        handler: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, handler)
    }

    /// Removes a subscription.
    pub fn off(&self, id: SubscriptionId) {
        self.bus.unsubscribe(id);
    }

    /// Emits an event to every subscriber of its kind.
    pub fn emit(&self, event: &SessionEvent) {
        self.bus.emit(event);
    }

    /// Runs the connection protocol.
    ///
    /// Re-discovers the provider, requests account access through the shape
    /// fixed at adoption, stores the first granted account and announces it.
    /// Resolves to `Ok(true)` on success and `Ok(false)` on any recovered
    /// failure (user rejection, unsupported method, other provider errors);
    /// the only raising failure is an undiscoverable provider. Safe to call
    /// while already connected: success re-confirms the same or updated
    /// address.
    pub async fn connect(&self) -> Result<bool, SessionError> {
        self.transition(SessionState::Connecting);
        self.bus.emit(&SessionEvent::Connect);

        let handle = match detect_provider(self.host.as_ref(), self.detect).await {
            Ok(handle) => handle,
            Err(err) => {
                error!(%err, "wallet provider discovery failed");
                self.transition(SessionState::Error);
                return Err(err.into());
            }
        };
        self.set_provider(handle.clone());
        debug!(?handle, "provider adopted");

        match handle.request_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) => {
                    self.set_address(account);
                    self.transition(SessionState::Connected);
                    let address = self.address();
                    debug!(%address, "wallet connected");
                    self.bus.emit(&SessionEvent::Connected { address });
                    self.sync_network(&handle).await;
                    Ok(true)
                }
                None => {
                    error!("provider granted access but returned no accounts");
                    self.recover_failed_connect();
                    Ok(false)
                }
            },
            Err(err) if err.is_user_rejection() => {
                error!("connection rejected by user");
                self.recover_failed_connect();
                Ok(false)
            }
            Err(err) if err.is_unsupported_method() => {
                error!(code = err.code, "account access method unsupported by provider");
                self.recover_failed_connect();
                Ok(false)
            }
            Err(err) => {
                error!(%err, "failed to connect");
                self.recover_failed_connect();
                Ok(false)
            }
        }
    }

    /// Clears the connected address. The provider is not asked to revoke
    /// permissions; injected wallets do not support that.
    pub fn disconnect(&self) {
        self.set_address("");
        self.transition(SessionState::Disconnected);
    }

    /// Stores `address` (lowercase-normalized) and announces the change.
    pub fn set_address(&self, address: &str) {
        let address = address.to_ascii_lowercase();
        self.inner.lock().address = address.clone();
        self.bus.emit(&SessionEvent::AddressChanged { address });
    }

    /// Adopts `handle` as the active provider and installs the session's
    /// notification listener on it.
    ///
    /// The previous handle is dropped. Its listener holds only a weak
    /// session reference and a stale generation: even if the discarded
    /// object keeps firing, nothing reaches the session. Chain-change
    /// notifications spawn their follow-on reconnect onto the ambient tokio
    /// runtime.
    pub fn set_provider(&self, handle: ProviderHandle) {
        let generation = {
            let mut inner = self.inner.lock();
            inner.provider = Some(handle.clone());
            inner.listener_generation += 1;
            inner.listener_generation
        };
        self.bus.emit(&SessionEvent::ProviderChanged);

        let weak = self.weak.clone();
        handle.set_listener(Arc::new(move |notification| {
            let Some(session) = weak.upgrade() else { return };
            if session.inner.lock().listener_generation != generation {
                return;
            }
            session.handle_notification(notification);
        }));
    }

    /// Normalizes and submits a transaction request, returning the
    /// provider's result (typically the transaction hash) unmodified.
    ///
    /// No retry, no gas estimation, no nonce management.
    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> Result<serde_json::Value, SessionError> {
        let (handle, from) = {
            let inner = self.inner.lock();
            (inner.provider.clone(), inner.address.clone())
        };
        let handle = handle.ok_or(TransactionDispatchError::NoProvider)?;

        let tx = tx.normalized(&from)?;
        debug!(?tx, "dispatching transaction");
        let params = serde_json::to_value(&tx).map_err(TransactionDispatchError::Serialize)?;

        let result =
            handle.send_transaction(params).await.map_err(TransactionDispatchError::Provider)?;
        Ok(result)
    }

    fn transition(&self, state: SessionState) {
        self.inner.lock().state = state;
    }

    /// Every recovered connect failure ends here: the address is reset so
    /// the UI can never show a stale connected account.
    fn recover_failed_connect(&self) {
        self.set_address("");
        self.transition(SessionState::Disconnected);
    }

    /// Corrects the session network from the provider's reported chain id.
    /// Best-effort: not every provider shape can answer.
    async fn sync_network(&self, handle: &ProviderHandle) {
        match handle.chain_id().await {
            Ok(chain_id) => {
                let network = self.networks.by_chain_id(chain_id);
                self.inner.lock().network = network;
                debug!(chain_id, %network, "network synced from provider");
            }
            Err(err) => debug!(%err, "could not read chain id after connect"),
        }
    }

    fn handle_notification(&self, notification: ProviderNotification) {
        match notification {
            ProviderNotification::AccountsChanged(accounts) => {
                let address = accounts.into_iter().next().unwrap_or_default();
                self.set_address(&address);
            }
            ProviderNotification::ChainChanged(raw) => {
                let chain_id = parse_chain_id(&raw);
                let network = match chain_id {
                    Some(id) => self.networks.by_chain_id(id),
                    None => {
                        error!(payload = %raw, "unparseable chain id in chain-change notification");
                        Network::Unknown
                    }
                };
                self.inner.lock().network = network;
                self.bus.emit(&SessionEvent::ChainChanged {
                    chain_id: chain_id.unwrap_or_default(),
                });

                // Re-validate the account under the new network. Unordered
                // with respect to any in-flight connect.
                if let Some(session) = self.weak.upgrade() {
                    tokio::spawn(async move {
                        match session.connect().await {
                            Ok(true) => {}
                            Ok(false) => error!("reconnect after chain change was not granted"),
                            Err(err) => error!(%err, "reconnect after chain change failed"),
                        }
                    });
                }
            }
        }
    }
}
