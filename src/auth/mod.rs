//
//  bitbucket-api
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Authentication strategies for the Bitbucket API. Each strategy turns a set of
//! credentials into the `Authorization` header attached to every request. The
//! strategy is always chosen explicitly by the caller; nothing is inferred from
//! the shape of the credentials.
//!
//! ## Supported Authentication Methods
//!
//! - **Basic**: username and password (or app password) sent as HTTP Basic.
//! - **OAuth**: OAuth 2.0 access token sent as a Bearer token.
//! - **ApiKey**: team account name and API key sent as HTTP Basic.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_api::auth::AuthCredential;
//!
//! let credential = AuthCredential::basic("john", "secret");
//! let header = credential.authorization_header()?;
//! assert_eq!(header.to_str().unwrap(), "Basic am9objpzZWNyZXQ=");
//! # Ok::<(), bitbucket_api::api::ApiError>(())
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::api::ApiError;

/// Credentials for one of the supported authentication strategies.
///
/// # Variants
///
/// - `Basic`: Standard HTTP Basic authentication with username and password.
/// - `OAuth`: OAuth 2.0 access token with optional refresh token and expiry.
/// - `ApiKey`: Team API key, sent as Basic credentials for the team account.
///
/// # Example
///
/// ```rust
/// use bitbucket_api::auth::AuthCredential;
/// use chrono::{Duration, Utc};
///
/// let oauth = AuthCredential::OAuth {
///     access_token: "eyJhbGciOiJIUzI1NiIs...".to_string(),
///     refresh_token: Some("refresh_token_here".to_string()),
///     expires_at: Some(Utc::now() + Duration::hours(1)),
/// };
/// assert!(!oauth.is_expired());
///
/// let key = AuthCredential::api_key("my-team", "0123456789abcdef");
/// assert_eq!(key.scheme(), "Basic");
/// ```
#[derive(Debug, Clone)]
pub enum AuthCredential {
    /// Basic HTTP authentication with username and password.
    Basic {
        /// The Bitbucket username.
        username: String,
        /// The password or app password.
        password: String,
    },
    /// OAuth 2.0 token authentication.
    OAuth {
        /// The OAuth 2.0 access token used for API authentication.
        access_token: String,
        /// Optional refresh token for obtaining new access tokens.
        refresh_token: Option<String>,
        /// Optional expiration timestamp for the access token.
        expires_at: Option<DateTime<Utc>>,
    },
    /// Team API key authentication.
    ApiKey {
        /// The team or individual account that owns the key.
        account: String,
        /// The API key.
        key: String,
    },
}

impl AuthCredential {
    /// Creates Basic credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates OAuth credentials from a bare access token.
    pub fn oauth(access_token: impl Into<String>) -> Self {
        Self::OAuth {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Creates API key credentials.
    pub fn api_key(account: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            account: account.into(),
            key: key.into(),
        }
    }

    /// The HTTP authorization scheme this credential produces.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Basic { .. } | Self::ApiKey { .. } => "Basic",
            Self::OAuth { .. } => "Bearer",
        }
    }

    /// Computes the `Authorization` header value for this credential.
    ///
    /// The returned value is marked sensitive so it is redacted from `Debug`
    /// output of the header map.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] if the credential contains bytes
    /// that are not valid in an HTTP header (for example a newline).
    pub fn authorization_header(&self) -> Result<HeaderValue, ApiError> {
        let raw = match self {
            Self::Basic { username, password } => {
                format!("Basic {}", encode_basic(username, password))
            }
            Self::ApiKey { account, key } => format!("Basic {}", encode_basic(account, key)),
            Self::OAuth { access_token, .. } => format!("Bearer {}", access_token),
        };

        let mut value = HeaderValue::from_str(&raw).map_err(|_| {
            ApiError::InvalidArgument(format!(
                "{} credentials contain characters not allowed in a header",
                self.scheme()
            ))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Inserts the `Authorization` header into `headers`, replacing any
    /// existing value.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), ApiError> {
        headers.insert(AUTHORIZATION, self.authorization_header()?);
        Ok(())
    }

    /// Checks if the credential has expired.
    ///
    /// Only OAuth credentials with an explicit `expires_at` can expire; every
    /// other credential returns `false`. Server-side revocation is not detected.
    pub fn is_expired(&self) -> bool {
        match self {
            Self::OAuth {
                expires_at: Some(exp),
                ..
            } => *exp < Utc::now(),
            _ => false,
        }
    }

    /// Checks if this credential carries a refresh token.
    pub fn can_refresh(&self) -> bool {
        matches!(
            self,
            Self::OAuth {
                refresh_token: Some(_),
                ..
            }
        )
    }
}

fn encode_basic(user: &str, secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", user, secret))
}
