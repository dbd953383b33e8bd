//
//  bitbucket-api
//  api/users/invitations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::params::require_identifier;
use crate::api::request::{ApiVersion, Request};

/// Pending invitations sent by an account.
///
/// These endpoints only exist on the 1.0 API.
#[derive(Debug, Clone, Copy)]
pub struct Invitations<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Invitations<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// `GET /1.0/users/{account}/invitations`
    pub async fn all(&self, account: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(
                Request::get(format!("/users/{}/invitations", account))
                    .api_version(ApiVersion::V1),
            )
            .await
    }

    /// `GET /1.0/users/{account}/invitations/{email}`
    pub async fn email(&self, account: &str, email: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        require_identifier("email", email)?;
        self.client
            .send(
                Request::get(format!("/users/{}/invitations/{}", account, email))
                    .api_version(ApiVersion::V1),
            )
            .await
    }

    /// Revokes every pending invitation for `email`.
    ///
    /// `DELETE /1.0/users/{account}/invitations/{email}`
    pub async fn delete(&self, account: &str, email: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        require_identifier("email", email)?;
        self.client
            .send(
                Request::delete(format!("/users/{}/invitations/{}", account, email))
                    .api_version(ApiVersion::V1),
            )
            .await
    }
}
