//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::GatewayError;

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            GatewayError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION"),
            GatewayError::CredentialInvalid(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            GatewayError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            GatewayError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            GatewayError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::Configuration("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GatewayError::CredentialInvalid("x".into()), StatusCode::UNAUTHORIZED),
            (GatewayError::MalformedInput("x".into()), StatusCode::BAD_REQUEST),
            (GatewayError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (GatewayError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (GatewayError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
