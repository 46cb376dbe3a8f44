//! JSON envelopes shared by every endpoint

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::ProxyError;

/// `{success: true, data}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{error, message, details?}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new<E: Into<String>, M: Into<String>>(error: E, message: M) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Pair this body with a status code
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl From<&ProxyError> for ApiError {
    fn from(err: &ProxyError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.user_message(),
            details: err.details(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);

        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        ApiError::from(&self).with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let value = serde_json::to_value(ApiSuccess::new(vec![1, 2])).unwrap();
        assert_eq!(value, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_error_without_details_omits_field() {
        let value = serde_json::to_value(ApiError::new("not found", "No route")).unwrap();
        assert_eq!(value, json!({"error": "not found", "message": "No route"}));
    }

    #[test]
    fn test_proxy_error_status_mapping() {
        assert_eq!(
            ProxyError::config("x").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::invalid_city("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::not_found("x").into_response().status(),
            StatusCode::NOT_FOUND
        );

        let upstream = ProxyError::Upstream {
            status: 429,
            body: json!({}),
        };
        assert_eq!(upstream.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
