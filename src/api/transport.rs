//
//  bitbucket-api
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! The [`Transport`] trait is the single seam between the client and the
//! network. The default [`ReqwestTransport`] sends requests with `reqwest`;
//! anything else implementing the trait can be injected into
//! [`BitbucketClient`](super::BitbucketClient), which is how the resource
//! handles are tested without a server.
//!
//! Transports never retry and never interpret the status code. Whatever the
//! server answers is returned as an [`ApiResponse`]; only failures to get an
//! answer at all become errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::common::{ApiError, ApiResponse};
use super::request::{HttpRequest, RequestBody};

/// Something that can perform one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, ApiError>;
}

/// Connection settings for [`ReqwestTransport`].
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::default();
/// assert_eq!(options.timeout, Duration::from_secs(10));
/// assert!(options.verify_peer);
/// ```
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Total request timeout
    pub timeout: Duration,
    /// Verify the server's TLS certificate
    pub verify_peer: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
            timeout: Duration::from_secs(10),
            verify_peer: true,
        }
    }
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the TLS backend cannot be initialised.
    pub fn new(options: &TransportOptions) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.verify_peer)
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);

        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse::new(status, headers, body.to_vec()))
    }
}
