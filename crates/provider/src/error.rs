use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known provider error codes.
pub mod codes {
    /// EIP-1193: the user rejected the request.
    pub const USER_REJECTED_REQUEST: i64 = 4001;
    /// JSON-RPC 2.0: the method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// JSON-RPC 2.0: internal error.
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// No compatible provider could be discovered in the host environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    /// Nothing was injected within the detection budget.
    #[error("no injected wallet provider found; is the wallet extension installed?")]
    NotFound,
    /// Something was injected but it does not expose the minimum capability
    /// surface.
    #[error("injected wallet provider is not compatible: {0}")]
    Incompatible(String),
}

/// Error returned by a provider call, in EIP-1193 shape.
///
/// Some wallets report capability errors nested under `data.error` instead of
/// in the top-level code; the classification helpers look in both places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    /// An internal-error response, used when a provider returns a payload
    /// that cannot be interpreted.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }

    /// A method-not-found response for `method`.
    pub fn unsupported(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("the method {method} does not exist"))
    }

    /// The wallet user declined a permission prompt.
    pub fn is_user_rejection(&self) -> bool {
        self.code == codes::USER_REJECTED_REQUEST
    }

    /// The provider does not support the requested method.
    pub fn is_unsupported_method(&self) -> bool {
        self.code == codes::METHOD_NOT_FOUND || self.nested_code() == Some(codes::METHOD_NOT_FOUND)
    }

    fn nested_code(&self) -> Option<i64> {
        self.data.as_ref()?.get("error")?.get("code")?.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_user_rejection() {
        assert!(ProviderRpcError::new(4001, "User rejected the request").is_user_rejection());
        assert!(!ProviderRpcError::new(-32603, "boom").is_user_rejection());
    }

    #[test]
    fn classifies_unsupported_method() {
        assert!(ProviderRpcError::unsupported("eth_requestAccounts").is_unsupported_method());

        // Nested under `data.error`, as some wallets report it.
        let nested = ProviderRpcError {
            code: -32603,
            message: "Internal JSON-RPC error".into(),
            data: Some(json!({ "error": { "code": -32601, "message": "method not found" } })),
        };
        assert!(nested.is_unsupported_method());

        let unrelated = ProviderRpcError {
            code: -32603,
            message: "Internal JSON-RPC error".into(),
            data: Some(json!({ "error": { "code": -32000 } })),
        };
        assert!(!unrelated.is_unsupported_method());
    }
}
