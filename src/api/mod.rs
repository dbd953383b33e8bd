//
//  bitbucket-api
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client and the resource handles for the
//! Bitbucket REST API (`1.0` and `2.0`).
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client: base URL, API version, authentication
//! - [`transport`]: The network seam, with a `reqwest` implementation
//! - [`request`]: Request and version types
//! - [`params`]: JSON-or-map parameter blobs and validation helpers
//! - [`common`]: Error and response types
//! - [`users`], [`user`]: Account endpoints
//! - [`repositories`]: Repository, branch restriction and issue endpoints
//!
//! Every resource method validates its input, formats the endpoint path, and
//! returns the raw [`ApiResponse`]. Validation failures are returned before
//! anything is sent.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_api::api::BitbucketClient;
//! use bitbucket_api::auth::AuthCredential;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
//! let client = BitbucketClient::new()?
//!     .with_auth(AuthCredential::oauth("your-token"));
//!
//! let response = client
//!     .branch_restrictions()
//!     .create("acc", "repo", json!({"pattern": "main"}))
//!     .await?
//!     .error_for_status()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod params;
pub mod repositories;
pub mod request;
pub mod transport;
pub mod user;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{BitbucketClient, ClientOptions, DEFAULT_BASE_URL};
pub use common::{ApiError, ApiResponse};
pub use params::{ParamMap, Params};
pub use request::{ApiVersion, HttpRequest, Request, RequestBody};
pub use transport::{ReqwestTransport, Transport, TransportOptions};
