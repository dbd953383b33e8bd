//
//  bitbucket-api
//  api/repositories/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Single repository API.
//!
//! Create, read, update and delete a repository, plus its forks, watchers,
//! branches and tags.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_api::api::BitbucketClient;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
//! let client = BitbucketClient::new()?;
//!
//! // Private git repository with forking allowed (the defaults)
//! client.repository().create("myworkspace", "new-repo", json!({"language": "rust"})).await?;
//!
//! // Parameters may also be given as a JSON string
//! client.repository().update("myworkspace", "new-repo", r#"{"description": "Updated"}"#).await?;
//! # Ok(())
//! # }
//! ```

use serde_json::json;

use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::params::{merge_defaults, require_identifier, ParamMap, Params};
use crate::api::request::{ApiVersion, Request};

/// A single repository.
#[derive(Debug, Clone, Copy)]
pub struct Repository<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Repository<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// `GET /2.0/repositories/{account}/{repo}`
    pub async fn get(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        let path = repo_path(account, repo)?;
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }

    /// Creates a repository.
    ///
    /// `params` is overlaid on `{"scm": "git", "is_private": true,
    /// "fork_policy": "allow_forks"}`.
    ///
    /// `POST /2.0/repositories/{account}/{repo}`
    pub async fn create(
        &self,
        account: &str,
        repo: &str,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = repo_path(account, repo)?;
        let body = merge_defaults(create_defaults(), params.into().into_map()?);

        self.client
            .send(
                Request::post(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// Updates repository settings.
    ///
    /// `PUT /2.0/repositories/{account}/{repo}`
    pub async fn update(
        &self,
        account: &str,
        repo: &str,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = repo_path(account, repo)?;
        let body = params.into().into_map()?;

        self.client
            .send(
                Request::put(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// `DELETE /2.0/repositories/{account}/{repo}`
    pub async fn delete(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        let path = repo_path(account, repo)?;
        self.client
            .send(Request::delete(path).api_version(ApiVersion::V2))
            .await
    }

    /// `GET /2.0/repositories/{account}/{repo}/forks`
    pub async fn forks(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        self.get_sub(account, repo, "forks").await
    }

    /// Forks the repository; `params` may set `name`, `workspace`, etc.
    ///
    /// `POST /2.0/repositories/{account}/{repo}/forks`
    pub async fn fork(
        &self,
        account: &str,
        repo: &str,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = format!("{}/forks", repo_path(account, repo)?);
        let body = params.into().into_map()?;

        self.client
            .send(
                Request::post(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// `GET /2.0/repositories/{account}/{repo}/watchers`
    pub async fn watchers(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        self.get_sub(account, repo, "watchers").await
    }

    /// `GET /2.0/repositories/{account}/{repo}/refs/branches`
    pub async fn branches(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        self.get_sub(account, repo, "refs/branches").await
    }

    /// `GET /2.0/repositories/{account}/{repo}/refs/tags`
    pub async fn tags(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        self.get_sub(account, repo, "refs/tags").await
    }

    async fn get_sub(
        &self,
        account: &str,
        repo: &str,
        sub: &str,
    ) -> Result<ApiResponse, ApiError> {
        let path = format!("{}/{}", repo_path(account, repo)?, sub);
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }
}

/// Validates both identifiers and formats `/repositories/{account}/{repo}`.
pub(crate) fn repo_path(account: &str, repo: &str) -> Result<String, ApiError> {
    require_identifier("account", account)?;
    require_identifier("repo", repo)?;
    Ok(format!("/repositories/{}/{}", account, repo))
}

fn create_defaults() -> ParamMap {
    let mut defaults = ParamMap::new();
    defaults.insert("scm".to_string(), json!("git"));
    defaults.insert("is_private".to_string(), json!(true));
    defaults.insert("fork_policy".to_string(), json!("allow_forks"));
    defaults
}

#[cfg(test)]
mod tests {
    use crate::api::testing::recording_client;
    use crate::api::ApiError;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_and_delete() {
        let (client, transport) = recording_client();
        let repository = client.repository();

        repository.get("acc", "repo").await.unwrap();
        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo");

        repository.delete("acc", "repo").await.unwrap();
        assert_eq!(transport.last().method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_create_merges_defaults() {
        let (client, transport) = recording_client();

        client
            .repository()
            .create("acc", "repo", json!({"is_private": false, "language": "rust"}))
            .await
            .unwrap();

        assert_eq!(transport.last().method, Method::POST);
        assert_eq!(
            transport.last_json(),
            json!({
                "scm": "git",
                "is_private": false,
                "fork_policy": "allow_forks",
                "language": "rust"
            })
        );
    }

    #[tokio::test]
    async fn test_update_accepts_json_string() {
        let (client, transport) = recording_client();

        client
            .repository()
            .update("acc", "repo", r#"{"description": "new"}"#)
            .await
            .unwrap();

        assert_eq!(transport.last().method, Method::PUT);
        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo");
        assert_eq!(transport.last_json(), json!({"description": "new"}));
    }

    #[tokio::test]
    async fn test_sub_resources() {
        let (client, transport) = recording_client();
        let repository = client.repository();

        repository.forks("acc", "repo").await.unwrap();
        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo/forks");

        repository.watchers("acc", "repo").await.unwrap();
        assert_eq!(
            transport.last().url.path(),
            "/2.0/repositories/acc/repo/watchers"
        );

        repository.branches("acc", "repo").await.unwrap();
        assert_eq!(
            transport.last().url.path(),
            "/2.0/repositories/acc/repo/refs/branches"
        );

        repository.tags("acc", "repo").await.unwrap();
        assert_eq!(
            transport.last().url.path(),
            "/2.0/repositories/acc/repo/refs/tags"
        );

        repository
            .fork("acc", "repo", json!({"name": "repo-fork"}))
            .await
            .unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url.path(), "/2.0/repositories/acc/repo/forks");
    }

    #[tokio::test]
    async fn test_missing_repo_is_rejected() {
        let (client, transport) = recording_client();

        let result = client.repository().get("acc", "").await;

        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
        assert_eq!(transport.count(), 0);
    }
}
