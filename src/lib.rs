//
//  bitbucket-api
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket API Client Library
//!
//! A thin client for the Bitbucket REST API (`1.0` and `2.0`). Each resource
//! of the API is a small handle whose methods validate their input, build the
//! endpoint path and send one request through a pluggable transport.
//!
//! ## Features
//!
//! - **Resource handles**: users, the authenticated user, repositories,
//!   branch restrictions, issues and issue comments
//! - **Authentication**: Basic, OAuth 2.0 bearer tokens and API keys
//! - **Early validation**: bad JSON, disallowed enum values and missing
//!   arguments fail before anything is sent
//! - **Raw responses**: non-success statuses are returned, not raised
//!
//! ## Module Structure
//!
//! - [`api`]: Client, transport, request types and resource handles
//! - [`auth`]: Authentication strategies
//! - [`config`]: Configuration file and environment handling
//! - [`cli`]: Command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_api::api::BitbucketClient;
//! use bitbucket_api::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
//! let client = BitbucketClient::new()?
//!     .with_auth(AuthCredential::basic("john", "app-password"));
//!
//! let repos = client.repositories().all("john", &[("pagelen", "10")]).await?;
//! println!("{}", repos.text());
//! # Ok(())
//! # }
//! ```

/// API client, transport and resource handles.
///
/// All endpoints are reached through [`api::BitbucketClient`]; requests go
/// through an injectable [`api::Transport`] so they can be recorded in tests.
pub mod api;

/// Authentication strategies applied to every outgoing request.
pub mod auth;

/// Command-line interface definitions.
pub mod cli;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/bitbucket-api/config.toml`
/// - macOS: `~/Library/Application Support/bitbucket-api/config.toml`
/// - Windows: `%APPDATA%\bitbucket-api\config\config.toml`
pub mod config;

pub use api::{ApiError, ApiResponse, BitbucketClient};
pub use auth::AuthCredential;
pub use cli::Cli;
pub use config::Config;

/// Application name, used for the default `User-Agent` and configuration paths.
pub const APP_NAME: &str = "bitbucket-api";

/// Crate version, from Cargo.toml.
///
/// # Example
///
/// ```rust
/// use bitbucket_api::VERSION;
///
/// println!("bitbucket-api version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the `bb-api` binary.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error, including non-success responses not listed below.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments, including rejected parameters.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed (401).
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found (404).
    pub const NOT_FOUND: i32 = 8;

    /// API rate limit exceeded (429).
    pub const RATE_LIMIT: i32 = 32;
}
