use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransactionDispatchError;

/// A caller-supplied transaction request, in provider wire shape.
///
/// Only the fields the session normalizes are typed; everything else the
/// caller sets rides along untouched in `other`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Sender address. Whatever the caller puts here is overwritten with the
    /// session's current address before dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Recipient address, lowercased before dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Amount to transfer. Accepts a decimal number, a decimal string, or a
    /// 0x-hex string; dispatched as a canonical 0x-hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Value>,

    /// Additional provider-defined fields, forwarded as-is.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl TransactionRequest {
    /// Applies the pre-dispatch invariants: `from` is overwritten with the
    /// session address, `to` is lowercased, `value` is canonicalized to hex.
    pub(crate) fn normalized(mut self, from: &str) -> Result<Self, TransactionDispatchError> {
        self.from = Some(from.to_ascii_lowercase());
        if let Some(to) = self.to.take() {
            self.to = Some(to.to_ascii_lowercase());
        }
        if let Some(value) = self.value.take() {
            self.value = Some(Value::String(canonical_value_hex(&value)?));
        }
        Ok(self)
    }
}

/// Canonicalizes a caller-supplied `value` into a `0x`-prefixed hex string.
fn canonical_value_hex(value: &Value) -> Result<String, TransactionDispatchError> {
    let invalid = || TransactionDispatchError::InvalidValue(value.to_string());

    let amount = match value {
        Value::Number(number) => {
            let units = number.as_u64().ok_or_else(invalid)?;
            U256::from(units)
        }
        Value::String(raw) => {
            let raw = raw.trim();
            let (digits, radix) = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
                Some(hex) => (hex, 16),
                None => (raw, 10),
            };
            U256::from_str_radix(digits, radix).map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    Ok(format!("0x{amount:x}"))
}
