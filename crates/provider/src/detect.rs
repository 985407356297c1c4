use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    DiscoveryError,
    provider::{InjectedProvider, ProviderHandle},
};

/// Host environment the provider is injected into.
///
/// In the browser this is backed by the page's global object; tests supply
/// their own hosts. Both accessors are re-read on every probe because the
/// host can replace the injected object at any time.
pub trait ProviderHost: Send + Sync {
    /// The standards-shaped injection point.
    fn injected(&self) -> Option<Arc<dyn InjectedProvider>>;

    /// The legacy injection point.
    fn legacy(&self) -> Option<Arc<dyn InjectedProvider>>;
}

/// Polling budget for [`detect_provider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectOptions {
    /// How many times to probe the host before giving up.
    pub attempts: u32,
    /// Pause between probes.
    pub interval: Duration,
}

impl Default for DetectOptions {
    /// 30 probes at 100ms: the host gets ~3s to finish injecting.
    fn default() -> Self {
        Self { attempts: 30, interval: Duration::from_millis(100) }
    }
}

/// Probes the host environment for an injected provider.
///
/// Policy, in order:
/// 1. A standards-shaped object is adopted as-is.
/// 2. A legacy object must expose a send-style capability; one that does not
///    fails with [`DiscoveryError::Incompatible`] immediately.
/// 3. If neither appears within the polling budget, fails with
///    [`DiscoveryError::NotFound`].
///
/// Results are never cached: callers re-run discovery on every connection
/// attempt.
pub async fn detect_provider(
    host: &dyn ProviderHost,
    options: DetectOptions,
) -> Result<ProviderHandle, DiscoveryError> {
    let attempts = options.attempts.max(1);
    for attempt in 0..attempts {
        if attempt > 0 {
            tokio::time::sleep(options.interval).await;
        }

        if let Some(raw) = host.injected() {
            debug!(attempt, "adopting standards-shaped injected provider");
            return ProviderHandle::adopt(raw);
        }

        if let Some(raw) = host.legacy() {
            if !raw.capabilities().send {
                return Err(DiscoveryError::Incompatible(
                    "legacy provider has no send function; wallet extension not installed or incompatible".into(),
                ));
            }
            debug!(attempt, "adopting legacy injected provider");
            return ProviderHandle::adopt(raw);
        }
    }

    Err(DiscoveryError::NotFound)
}
