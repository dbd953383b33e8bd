//
//  bitbucket-api
//  api/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Endpoints for the currently authenticated user.
//!
//! Every call here requires credentials on the client; without them Bitbucket
//! answers `401`, which is returned as a normal response.

use super::client::BitbucketClient;
use super::common::{ApiError, ApiResponse};
use super::params::require_identifier;
use super::request::{ApiVersion, Request};

/// The authenticated user.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_api::api::BitbucketClient;
/// use bitbucket_api::auth::AuthCredential;
///
/// # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
/// let client = BitbucketClient::new()?.with_auth(AuthCredential::basic("john", "app-password"));
/// let me = client.user().get().await?.error_for_status()?;
/// println!("{}", me.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct User<'a> {
    client: &'a BitbucketClient,
}

impl<'a> User<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// `GET /2.0/user`
    pub async fn get(&self) -> Result<ApiResponse, ApiError> {
        self.client
            .send(Request::get("/user").api_version(ApiVersion::V2))
            .await
    }

    /// Lists every email address on the account.
    ///
    /// `GET /2.0/user/emails`
    pub async fn emails(&self) -> Result<ApiResponse, ApiError> {
        self.client
            .send(Request::get("/user/emails").api_version(ApiVersion::V2))
            .await
    }

    /// `GET /2.0/user/emails/{address}`
    pub async fn email(&self, address: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("address", address)?;
        self.client
            .send(Request::get(format!("/user/emails/{}", address)).api_version(ApiVersion::V2))
            .await
    }
}
