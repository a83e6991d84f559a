//! Mozello request signatures
//!
//! Mozello signs a request by concatenating every field value except
//! `signature` (no delimiter), computing HMAC-SHA256 over the result with the
//! shared API key, and base64-encoding the digest.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use serde_json::{Map, Number, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppResult, ValidationError};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_FIELD: &str = "signature";

/// Order in which field values are concatenated into the signed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureOrder {
    /// Fields in the order the sender wrote them
    #[default]
    Insertion,
    /// Fields sorted by key
    Sorted,
}

/// Field name to value pairs in the order they were received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedPayload {
    fields: Vec<(String, String)>,
}

impl SignedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object, keeping its key order.
    ///
    /// Non-string values are rendered the way Mozello's string concatenation
    /// renders them, so `1000.0` contributes `"1000"`, `true` contributes
    /// `"true"` and `["a","b"]` contributes `"a,b"`.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .map(|(key, value)| (key.clone(), render_value(value)))
            .collect();
        Self { fields }
    }

    /// Parse a raw request body. Anything other than a JSON object is rejected.
    pub fn from_json_slice(body: &[u8]) -> AppResult<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            ValidationError::MalformedBody {
                message: e.to_string(),
            }
        })?;

        match value {
            Value::Object(object) => Ok(Self::from_json_object(&object)),
            _ => Err(ValidationError::MalformedBody {
                message: "expected a JSON object".to_string(),
            }
            .into()),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn signature(&self) -> Option<&str> {
        self.get(SIGNATURE_FIELD)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The message that gets signed: every non-signature value, concatenated.
    pub fn message(&self, order: SignatureOrder) -> String {
        let mut fields: Vec<&(String, String)> = self
            .fields
            .iter()
            .filter(|(key, _)| key != SIGNATURE_FIELD)
            .collect();

        if order == SignatureOrder::Sorted {
            fields.sort_by(|a, b| a.0.cmp(&b.0));
        }

        fields.into_iter().map(|(_, value)| value.as_str()).collect()
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => render_element(other),
    }
}

/// JavaScript `String(value)` for an array element, where `null` is empty.
fn render_element(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_element)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JavaScript `Number#toString`: shortest round-trip digits, no trailing
/// `.0`, exponent form outside `[1e-6, 1e21)`.
fn render_number(n: &Number) -> String {
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };

    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }

    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}

/// Compute the base64 HMAC-SHA256 signature of a payload.
pub fn sign(payload: &SignedPayload, secret: &str, order: SignatureOrder) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.message(order).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Check a payload's `signature` field against the one computed from its
/// other fields. A payload without a signature never verifies.
pub fn verify(payload: &SignedPayload, secret: &str, order: SignatureOrder) -> bool {
    let Some(provided) = payload.signature() else {
        return false;
    };

    let computed = sign(payload, secret, order);
    computed.as_bytes().ct_eq(provided.as_bytes()).into()
}
