use crate::utils::error::{GateError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Record handed over by the identity provider before an account is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupEvent {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SignupEvent {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

/// Normalized allow-list of email domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomains {
    domains: HashSet<String>,
}

impl AllowedDomains {
    /// Builds the allow-list from the raw domains document.
    ///
    /// The document must carry a non-empty `domains` array whose entries are
    /// all strings. Entries are lowercased and trimmed.
    pub fn from_document(document: &Value) -> Result<Self> {
        let items = document
            .get("domains")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .ok_or(GateError::InvalidDomainConfig)?;

        let domains = items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|domain| domain.trim().to_lowercase())
                    .ok_or(GateError::InvalidDomainConfig)
            })
            .collect::<Result<HashSet<_>>>()?;

        Ok(Self { domains })
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }
}

/// Callable payload for the verification gate: `{ token, action? }`.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRequest {
    pub token: String,
    pub action: Option<String>,
}

impl VerificationRequest {
    /// Reads the request out of an untyped payload so that a non-string token
    /// is reported as a missing token rather than a decoding failure.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let token = payload
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or(GateError::MissingToken)?;

        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .filter(|action| !action.is_empty())
            .map(str::to_string);

        Ok(Self {
            token: token.to_string(),
            action,
        })
    }
}

/// Body returned by the remote `siteverify` endpoint.
///
/// Fields are read loosely: `success` by truthiness, `score` only when it
/// is a number, and strings only when they are strings. Anything else falls
/// back to the field's default instead of failing the whole body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default, deserialize_with = "number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub action: Option<String>,
    #[serde(rename = "error-codes", default, deserialize_with = "string_list")]
    pub error_codes: Vec<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub hostname: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub challenge_ts: Option<String>,
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn non_empty_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResponse {
    pub success: bool,
}

impl GateResponse {
    pub fn accepted() -> Self {
        Self { success: true }
    }
}
