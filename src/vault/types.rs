//! Wire types and fetch outcomes.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::layered::ConfigMap;

/// Reasons a fetch produced no mapping.
///
/// Every variant except [`FetchError::Cancelled`] means "unchanged": the
/// caller keeps its previous snapshot and tries again on the next cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The store answered with a non-success status.
    #[error("vault returned status {0}")]
    Status(StatusCode),

    /// Connection, timeout, or body read failure.
    #[error("request to vault failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not JSON, or `data.data` was not a string map.
    #[error("response body could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body decoded but `data.data` is absent, null, or not nested in objects.
    #[error("response has no data.data field")]
    MissingData,

    /// The caller's cancellation signal fired.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Decode a KV v2 read response: `{ "data": { "data": { ... }, "metadata": { ... } } }`.
///
/// `data.data` must be reached through objects; any other shape on the way
/// counts as missing.
pub(crate) fn decode_secret(body: &[u8]) -> Result<ConfigMap, FetchError> {
    let mut envelope: Value = serde_json::from_slice(body)?;
    match envelope.pointer_mut("/data/data").map(Value::take) {
        None | Some(Value::Null) => Err(FetchError::MissingData),
        Some(data) => Ok(serde_json::from_value(data)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Result<ConfigMap, FetchError> {
        decode_secret(body.as_bytes())
    }

    #[test]
    fn test_decode_nested_data() {
        let map = decode(r#"{"data":{"data":{"A":"1","B":null},"metadata":{"version":3}}}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("A"), Some(&Some("1".to_string())));
        assert_eq!(map.get("B"), Some(&None));
    }

    #[test]
    fn test_missing_inner_data() {
        assert!(matches!(decode(r#"{"data":{}}"#), Err(FetchError::MissingData)));
        assert!(matches!(decode(r#"{"data":{"data":null}}"#), Err(FetchError::MissingData)));
        assert!(matches!(decode(r#"{}"#), Err(FetchError::MissingData)));
        assert!(matches!(decode(r#"{"data":[{"A":"1"}]}"#), Err(FetchError::MissingData)));
        assert!(matches!(decode(r#"[[{"A":"1"}]]"#), Err(FetchError::MissingData)));
        assert!(matches!(decode(r#"{"data":"oops"}"#), Err(FetchError::MissingData)));
    }

    #[test]
    fn test_shape_mismatch_is_decode_error() {
        assert!(matches!(decode(r#"{"data":{"data":{"port":8200}}}"#), Err(FetchError::Decode(_))));
        assert!(matches!(decode(r#"{"data":{"data":["a"]}}"#), Err(FetchError::Decode(_))));
        assert!(matches!(decode(r#"{"data":{"data":[{"A":"1"}]}}"#), Err(FetchError::Decode(_))));
        assert!(matches!(decode("<html>"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_only_cancelled_is_cancelled() {
        assert!(FetchError::Cancelled.is_cancelled());
        assert!(!FetchError::MissingData.is_cancelled());
        assert!(!FetchError::Status(StatusCode::NOT_FOUND).is_cancelled());
    }
}
