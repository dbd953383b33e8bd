//
//  bitbucket-api
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the error and response types shared by every resource
//! handle in the crate.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ApiResponse`] - Opaque pass-through of the HTTP response
//! - [`extract_error_message`] - Pulls a human readable message out of an error body
//!
//! # Example
//!
//! ```rust
//! use bitbucket_api::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::InvalidArgument(reason)) => println!("Rejected locally: {}", reason),
//!         Err(ApiError::NotFound(resource)) => println!("Resource not found: {}", resource),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use std::borrow::Cow;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Unified error type for all Bitbucket API operations.
///
/// Errors fall into two groups:
///
/// | Group | Variants | Raised |
/// |-------|----------|--------|
/// | Input validation | `InvalidArgument`, `InvalidJson` | Before any network call |
/// | Transport | `Network` | Passed through from `reqwest` unchanged |
///
/// The status variants (`AuthFailed`, `NotFound`, ...) are only produced when a
/// caller opts into status checking with [`ApiResponse::error_for_status`];
/// a non-2xx response is otherwise returned as a normal [`ApiResponse`].
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::common::ApiError;
///
/// let err = ApiError::InvalidArgument("Invalid restriction kind.".to_string());
/// assert!(err.is_validation());
/// assert_eq!(err.to_string(), "Invalid argument: Invalid restriction kind.");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required argument was missing or a value was outside its allowed set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A parameter blob supplied as a JSON string could not be decoded.
    #[error("Invalid JSON data provided: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A response body could not be decoded into the requested type.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Authentication failed due to invalid or expired credentials (401).
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API rate limit has been exceeded (429).
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The authenticated user lacks permission for the operation (403).
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The request was rejected by the server as malformed (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal server error occurred on the Bitbucket side (5xx).
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-success status.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Builds a status-mapped error from a non-success response.
    ///
    /// # Parameters
    ///
    /// * `status` - The HTTP status code
    /// * `body` - The raw error response body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(status, body);

        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            429 => Self::RateLimited,
            500..=599 => Self::ServerError(message),
            _ => Self::Unknown(message),
        }
    }

    /// Returns `true` for errors raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidJson(_))
    }
}

/// Parses a Bitbucket API error response and extracts a user-friendly message.
///
/// Bitbucket Cloud returns errors in the format:
/// ```json
/// {"type": "error", "error": {"message": "Human readable message"}}
/// ```
///
/// Bitbucket Server returns errors in the format:
/// ```json
/// {"errors": [{"message": "Human readable message"}]}
/// ```
///
/// If neither shape matches, the status and raw body are returned.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        // Cloud format: {"type": "error", "error": {"message": "..."}}
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        // Server format: {"errors": [{"message": "..."}]}
        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        // Alternative Cloud format: {"error": {"detail": "..."}}
        if let Some(detail) = json
            .get("error")
            .and_then(|e| e.get("detail"))
            .and_then(|m| m.as_str())
        {
            return detail.to_string();
        }

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    format!("API error ({}): {}", status, body)
}

/// Raw response returned by every resource method.
///
/// The response is handed back exactly as the transport produced it: status,
/// headers and body bytes. Nothing is checked or decoded until the caller asks.
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::ApiResponse;
/// use reqwest::header::HeaderMap;
/// use reqwest::StatusCode;
///
/// let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), r#"{"username": "john-doe"}"#);
/// let value: serde_json::Value = response.json()?;
/// assert_eq!(value["username"], "john-doe");
/// # Ok::<(), bitbucket_api::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(ApiError::Decode)
    }

    /// Converts a non-2xx response into the matching [`ApiError`].
    ///
    /// Successful responses are returned unchanged.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cloud_error_message() {
        let body = r#"{"type": "error", "error": {"message": "Repository not found"}}"#;
        assert_eq!(
            extract_error_message(StatusCode::NOT_FOUND, body),
            "Repository not found"
        );
    }

    #[test]
    fn test_extract_server_error_message() {
        let body = r#"{"errors": [{"message": "Project does not exist"}]}"#;
        assert_eq!(
            extract_error_message(StatusCode::BAD_REQUEST, body),
            "Project does not exist"
        );
    }

    #[test]
    fn test_extract_detail_and_plain_messages() {
        let detail = r#"{"error": {"detail": "Token expired"}}"#;
        assert_eq!(
            extract_error_message(StatusCode::UNAUTHORIZED, detail),
            "Token expired"
        );

        let plain = r#"{"message": "Slow down"}"#;
        assert_eq!(
            extract_error_message(StatusCode::TOO_MANY_REQUESTS, plain),
            "Slow down"
        );
    }

    #[test]
    fn test_extract_falls_back_to_raw_body() {
        let message = extract_error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(message, "API error (502 Bad Gateway): <html>oops</html>");
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::AuthFailed(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, ""),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, ""),
            ApiError::Unknown(_)
        ));
    }

    #[test]
    fn test_error_for_status() {
        let ok = ApiResponse::new(StatusCode::CREATED, HeaderMap::new(), "{}");
        assert!(ok.error_for_status().is_ok());

        let missing = ApiResponse::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            r#"{"type": "error", "error": {"message": "No such user"}}"#,
        );
        match missing.error_for_status() {
            Err(ApiError::NotFound(message)) => assert_eq!(message, "No such user"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_json_decode_failure() {
        let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), "not json");
        let result: Result<serde_json::Value, _> = response.json();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
