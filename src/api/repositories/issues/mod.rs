//
//  bitbucket-api
//  api/repositories/issues/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository issue tracker API.
//!
//! Issues must be enabled on the repository. Issue numbers are sequential
//! within each repository.
//!
//! # Issue Kinds and Priorities
//!
//! * kind: `bug` (default), `enhancement`, `proposal`, `task`
//! * priority: `trivial` (default), `minor`, `major`, `critical`, `blocker`
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
//! client
//!     .issues()
//!     .create("acc", "repo", json!({
//!         "title": "Login button not responding",
//!         "content": {"raw": "Nothing happens on click."},
//!         "priority": "major"
//!     }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod comments;

pub use comments::Comments;

use serde_json::json;

use super::repository::repo_path;
use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::params::{is_empty_value, merge_defaults, ParamMap, Params};
use crate::api::request::{ApiVersion, Request};

/// The issue tracker of a repository.
#[derive(Debug, Clone, Copy)]
pub struct Issues<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Issues<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// Lists issues. `query` may carry `q`, `sort`, `page`, `pagelen`.
    ///
    /// `GET /2.0/repositories/{account}/{repo}/issues`
    pub async fn all(
        &self,
        account: &str,
        repo: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        let path = issues_path(account, repo)?;
        self.client
            .send(
                Request::get(path)
                    .api_version(ApiVersion::V2)
                    .query_pairs(query.iter().copied()),
            )
            .await
    }

    /// `GET /2.0/repositories/{account}/{repo}/issues/{id}`
    pub async fn get(&self, account: &str, repo: &str, id: u64) -> Result<ApiResponse, ApiError> {
        let path = issue_path(account, repo, id)?;
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }

    /// Opens an issue.
    ///
    /// `params` must contain a non-empty `title`; `kind` and `priority`
    /// default to `bug` and `trivial`.
    ///
    /// `POST /2.0/repositories/{account}/{repo}/issues`
    pub async fn create(
        &self,
        account: &str,
        repo: &str,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = issues_path(account, repo)?;

        let mut defaults = ParamMap::new();
        defaults.insert("kind".to_string(), json!("bug"));
        defaults.insert("priority".to_string(), json!("trivial"));
        let body = merge_defaults(defaults, params.into().into_map()?);

        if body.get("title").map_or(true, is_empty_value) {
            return Err(ApiError::InvalidArgument(
                "Argument \"title\" is mandatory.".to_string(),
            ));
        }

        self.client
            .send(
                Request::post(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// `PUT /2.0/repositories/{account}/{repo}/issues/{id}`
    pub async fn update(
        &self,
        account: &str,
        repo: &str,
        id: u64,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = issue_path(account, repo, id)?;
        let body = params.into().into_map()?;

        self.client
            .send(
                Request::put(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// `DELETE /2.0/repositories/{account}/{repo}/issues/{id}`
    pub async fn delete(
        &self,
        account: &str,
        repo: &str,
        id: u64,
    ) -> Result<ApiResponse, ApiError> {
        let path = issue_path(account, repo, id)?;
        self.client
            .send(Request::delete(path).api_version(ApiVersion::V2))
            .await
    }

    /// Comments on issues.
    pub fn comments(&self) -> Comments<'a> {
        Comments::new(self.client)
    }
}

fn issues_path(account: &str, repo: &str) -> Result<String, ApiError> {
    Ok(format!("{}/issues", repo_path(account, repo)?))
}

pub(super) fn issue_path(account: &str, repo: &str, id: u64) -> Result<String, ApiError> {
    Ok(format!("{}/{}", issues_path(account, repo)?, id))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::recording_client;
    use crate::api::ApiError;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_with_query() {
        let (client, transport) = recording_client();

        client
            .issues()
            .all("acc", "repo", &[("q", "state=\"new\"")])
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.url.path(), "/2.0/repositories/acc/repo/issues");
        let pairs: Vec<(String, String)> = sent.url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("q".to_string(), "state=\"new\"".to_string())]
        );
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (client, transport) = recording_client();

        client
            .issues()
            .create("acc", "repo", json!({"title": "Broken", "priority": "major"}))
            .await
            .unwrap();

        assert_eq!(transport.last().method, Method::POST);
        assert_eq!(
            transport.last_json(),
            json!({"title": "Broken", "kind": "bug", "priority": "major"})
        );
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let (client, transport) = recording_client();

        let result = client
            .issues()
            .create("acc", "repo", json!({"kind": "task"}))
            .await;

        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let (client, transport) = recording_client();
        let issues = client.issues();

        issues.get("acc", "repo", 5).await.unwrap();
        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo/issues/5");

        issues
            .update("acc", "repo", 5, r#"{"state": "resolved"}"#)
            .await
            .unwrap();
        assert_eq!(transport.last().method, Method::PUT);
        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo/issues/5");
        assert_eq!(transport.last_json(), json!({"state": "resolved"}));

        issues.delete("acc", "repo", 5).await.unwrap();
        assert_eq!(transport.last().method, Method::DELETE);
        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo/issues/5");
    }
}
