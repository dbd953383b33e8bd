//
//  bitbucket-api
//  api/users/ssh_keys.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! SSH keys API.
//!
//! Manages the SSH public keys attached to a user account. Key identifiers are
//! the UUIDs returned by Bitbucket, including their curly braces
//! (e.g. `{b15b6026-9c02-4626-b4ad-b905f99f763a}`).

use serde_json::{json, Map, Value};

use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::params::require_identifier;
use crate::api::request::{ApiVersion, Request};

/// SSH keys of a user account.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_api::api::BitbucketClient;
///
/// # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
/// let client = BitbucketClient::new()?;
/// let keys = client.users().ssh_keys();
///
/// keys.create("john-doe", "ssh-ed25519 AAAAC3Nza... john@laptop", Some("laptop")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SshKeys<'a> {
    client: &'a BitbucketClient,
}

impl<'a> SshKeys<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// Lists all keys.
    ///
    /// `GET /2.0/users/{account}/ssh-keys`
    pub async fn all(&self, account: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(Request::get(keys_path(account)).api_version(ApiVersion::V2))
            .await
    }

    /// Adds a key, with an optional label.
    ///
    /// `POST /2.0/users/{account}/ssh-keys`
    pub async fn create(
        &self,
        account: &str,
        key: &str,
        label: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        require_identifier("key", key)?;

        let mut body = Map::new();
        body.insert("key".to_string(), json!(key));
        if let Some(label) = label {
            body.insert("label".to_string(), json!(label));
        }

        self.client
            .send(
                Request::post(keys_path(account))
                    .api_version(ApiVersion::V2)
                    .json(Value::Object(body)),
            )
            .await
    }

    /// Gets a single key.
    ///
    /// `GET /2.0/users/{account}/ssh-keys/{key_id}`
    pub async fn get(&self, account: &str, key_id: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        require_identifier("key_id", key_id)?;
        self.client
            .send(Request::get(key_path(account, key_id)).api_version(ApiVersion::V2))
            .await
    }

    /// Changes the label of a key.
    ///
    /// `PUT /2.0/users/{account}/ssh-keys/{key_id}`
    pub async fn update(
        &self,
        account: &str,
        key_id: &str,
        label: &str,
    ) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        require_identifier("key_id", key_id)?;
        self.client
            .send(
                Request::put(key_path(account, key_id))
                    .api_version(ApiVersion::V2)
                    .json(json!({ "label": label })),
            )
            .await
    }

    /// Removes a key.
    ///
    /// `DELETE /2.0/users/{account}/ssh-keys/{key_id}`
    pub async fn delete(&self, account: &str, key_id: &str) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        require_identifier("key_id", key_id)?;
        self.client
            .send(Request::delete(key_path(account, key_id)).api_version(ApiVersion::V2))
            .await
    }
}

fn keys_path(account: &str) -> String {
    format!("/users/{}/ssh-keys", account)
}

fn key_path(account: &str, key_id: &str) -> String {
    format!("/users/{}/ssh-keys/{}", account, key_id)
}
