use hearth_provider::{DiscoveryError, ProviderRpcError};

/// Failures that `connect` and `send_transaction` raise to the caller.
///
/// Connect-path provider failures (user rejection, unsupported method, any
/// other provider-side error) are deliberately *not* here: they are recovered
/// into a `false` return so the boolean stays authoritative, with the address
/// reset so no stale connected state survives.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No compatible wallet provider could be discovered.
    #[error(transparent)]
    ProviderNotFound(#[from] DiscoveryError),

    /// Transaction submission failed. The caller must react to this
    /// directly, so it is never collapsed into a boolean.
    #[error(transparent)]
    TransactionDispatch(#[from] TransactionDispatchError),
}

/// Failure during `send_transaction`.
#[derive(Debug, thiserror::Error)]
pub enum TransactionDispatchError {
    #[error("no active provider; connect before sending transactions")]
    NoProvider,

    /// The caller-supplied `value` field is not a numeric literal.
    #[error("transaction `value` is not a numeric literal: {0}")]
    InvalidValue(String),

    #[error("transaction request could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The provider rejected the submission.
    #[error(transparent)]
    Provider(#[from] ProviderRpcError),
}
