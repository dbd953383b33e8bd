//
//  bitbucket-api
//  api/users/account.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::params::require_identifier;
use crate::api::request::{ApiVersion, Request};

/// Profile and follower information for an individual or team account.
///
/// `account` may be an account name or a validated email address.
#[derive(Debug, Clone, Copy)]
pub struct Account<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Account<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// `GET /2.0/users/{account}`
    pub async fn profile(&self, account: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(Request::get(format!("/users/{}", account)).api_version(ApiVersion::V2))
            .await
    }

    /// Gets a count and the list of accounts following `account`.
    ///
    /// `GET /2.0/users/{account}/followers`
    pub async fn followers(&self, account: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(
                Request::get(format!("/users/{}/followers", account))
                    .api_version(ApiVersion::V2),
            )
            .await
    }
}
