//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for `PUT /cache/:tier`
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in milliseconds (tier default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        if self.ttl == Some(0) {
            return Some("TTL must be a positive number of milliseconds".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_request_deserialize() {
        let body = r#"{"key": "test", "value": {"name": "Ann"}}"#;
        let req: SetRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, json!({"name": "Ann"}));
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let body = r#"{"key": "test", "value": 1, "ttl": 60000}"#;
        let req: SetRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.ttl, Some(60_000));
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: json!("test"),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_long_key() {
        let req = SetRequest {
            key: "x".repeat(MAX_KEY_LENGTH + 1),
            value: json!(null),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_zero_ttl() {
        let req = SetRequest {
            key: "k".to_string(),
            value: json!(1),
            ttl: Some(0),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: json!([1, 2, 3]),
            ttl: Some(60_000),
        };
        assert!(req.validate().is_none());
    }
}
