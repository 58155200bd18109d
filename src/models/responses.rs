//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::Tier;

/// Response body for `GET /cache/:tier/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Access pattern the value was read through
    pub tier: Tier,
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    pub fn new(tier: Tier, key: impl Into<String>, value: Value) -> Self {
        Self {
            tier,
            key: key.into(),
            value,
        }
    }
}

/// Response body for `PUT /cache/:tier`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Human-readable confirmation
    pub message: String,
    pub tier: Tier,
    pub key: String,
}

impl SetResponse {
    pub fn new(tier: Tier, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set in {} tier", key, tier),
            tier,
            key,
        }
    }
}

/// Response body for `GET /cache/:tier/:key/exists`
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub tier: Tier,
    pub key: String,
    pub exists: bool,
}

/// Response body for `DELETE /cache/:tier/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub tier: Tier,
    pub key: String,
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(tier: Tier, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from {} tier", key, tier),
            tier,
            key,
            deleted: true,
        }
    }
}

/// Response body for `DELETE /cache/:tier` and `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// The cleared tier, None when every tier was cleared
    pub tier: Option<Tier>,
}

impl ClearResponse {
    pub fn tier(tier: Tier) -> Self {
        Self {
            message: format!("{} tier cleared", tier),
            tier: Some(tier),
        }
    }

    pub fn all() -> Self {
        Self {
            message: "All tiers cleared".to_string(),
            tier: None,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new(Tier::Smart, "test_key", json!({"n": 1}));
        let body = serde_json::to_value(&resp).unwrap();
        assert_eq!(body["tier"], "smart");
        assert_eq!(body["key"], "test_key");
        assert_eq!(body["value"]["n"], 1);
    }

    #[test]
    fn test_set_response_message() {
        let resp = SetResponse::new(Tier::Persistent, "my_key");
        assert_eq!(resp.message, "Key 'my_key' set in persistent tier");
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new(Tier::Memory, "deleted_key");
        let body = serde_json::to_value(&resp).unwrap();
        assert_eq!(body["deleted"], true);
        assert_eq!(body["tier"], "memory");
    }

    #[test]
    fn test_clear_response() {
        assert_eq!(ClearResponse::tier(Tier::Session).tier, Some(Tier::Session));
        let all = serde_json::to_value(ClearResponse::all()).unwrap();
        assert!(all["tier"].is_null());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let body = serde_json::to_string(&resp).unwrap();
        assert!(body.contains("healthy"));
        assert!(body.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let body = serde_json::to_string(&resp).unwrap();
        assert!(body.contains("error"));
        assert!(body.contains("Something went wrong"));
    }
}
