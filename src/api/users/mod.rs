//
//  bitbucket-api
//  api/users/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User-related endpoints.
//!
//! [`Users`] covers the public information of any account and hands out the
//! sub-resources for account profiles, SSH keys and invitations.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_api::api::BitbucketClient;
//!
//! # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
//! let client = BitbucketClient::new()?;
//! let users = client.users();
//!
//! let profile = users.get("john-doe").await?;
//! let keys = users.ssh_keys().all("john-doe").await?;
//! # Ok(())
//! # }
//! ```

mod account;
mod invitations;
mod ssh_keys;

pub use account::Account;
pub use invitations::Invitations;
pub use ssh_keys::SshKeys;

pub use super::user::User;

use super::client::BitbucketClient;
use super::common::{ApiError, ApiResponse};
use super::params::require_identifier;
use super::request::{ApiVersion, Request};

/// Public user information.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Users<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// Gets the public information of an account.
    ///
    /// `GET /2.0/users/{account}`
    pub async fn get(&self, account: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(Request::get(format!("/users/{}", account)).api_version(ApiVersion::V2))
            .await
    }

    /// Lists the repositories owned by an account.
    ///
    /// `GET /2.0/repositories/{account}`
    pub async fn repositories(&self, account: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(Request::get(format!("/repositories/{}", account)).api_version(ApiVersion::V2))
            .await
    }

    /// Account profile and followers.
    pub fn account(&self) -> Account<'a> {
        Account::new(self.client)
    }

    /// SSH keys of an account.
    pub fn ssh_keys(&self) -> SshKeys<'a> {
        SshKeys::new(self.client)
    }

    /// Pending invitations of an account.
    pub fn invitations(&self) -> Invitations<'a> {
        Invitations::new(self.client)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::recording_client;
    use crate::api::ApiError;
    use reqwest::Method;

    #[tokio::test]
    async fn test_get_user_public_information() {
        let (client, transport) = recording_client();

        client.users().get("john-doe").await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url.path(), "/2.0/users/john-doe");
    }

    #[tokio::test]
    async fn test_get_user_repositories() {
        let (client, transport) = recording_client();

        client.users().repositories("john-doe").await.unwrap();

        assert_eq!(transport.last().url.path(), "/2.0/repositories/john-doe");
    }

    #[tokio::test]
    async fn test_missing_account_is_rejected() {
        let (client, transport) = recording_client();

        let result = client.users().get("").await;

        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
        assert_eq!(transport.count(), 0);
    }
}
