//
//  bitbucket-api
//  api/repositories/branch_restrictions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch restrictions API.
//!
//! Branch restrictions (branch permissions) limit who can push to, merge
//! into, force-push or delete matching branches. Every restriction has a
//! `kind`, which is fixed once the restriction exists.
//!
//! # Restriction Kinds
//!
//! | Kind | Effect |
//! |------|--------|
//! | `push` | Only listed users/groups may push |
//! | `force` | Prevent rewriting history |
//! | `delete` | Prevent branch deletion |
//! | `restrict_merges` | Only listed users/groups may merge |
//! | `require_approvals_to_merge` | Minimum approvals before merge |
//! | `require_passing_builds_to_merge` | Minimum green builds before merge |
//! | `require_tasks_to_be_completed` | All PR tasks resolved before merge |
//! | `require_all_dependencies_merged` | Dependent PRs merged first |
//! | `enforce_merge_checks` | Block merge when checks fail |
//! | `reset_pullrequest_approvals_on_change` | Drop approvals on new commits |
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_api::api::BitbucketClient;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
//! let client = BitbucketClient::new()?;
//! let restrictions = client.branch_restrictions();
//!
//! // kind defaults to "push"
//! restrictions
//!     .create("acc", "repo", json!({"pattern": "main", "users": [{"username": "john"}]}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use serde_json::{json, Value};

use super::repository::repo_path;
use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::params::{is_empty_value, merge_defaults, ParamMap, Params};
use crate::api::request::{ApiVersion, Request};

/// Restriction kinds accepted by [`BranchRestrictions::create`] out of the box.
pub const DEFAULT_RESTRICTION_KINDS: [&str; 10] = [
    "require_tasks_to_be_completed",
    "require_passing_builds_to_merge",
    "force",
    "require_all_dependencies_merged",
    "push",
    "require_approvals_to_merge",
    "enforce_merge_checks",
    "restrict_merges",
    "reset_pullrequest_approvals_on_change",
    "delete",
];

/// Branch restrictions on a repository.
///
/// Each handle carries its own allow-list of restriction kinds, starting from
/// [`DEFAULT_RESTRICTION_KINDS`]. Kinds Bitbucket adds later can be accepted
/// with [`add_allowed_restriction_types`](Self::add_allowed_restriction_types).
#[derive(Debug, Clone)]
pub struct BranchRestrictions<'a> {
    client: &'a BitbucketClient,
    allowed_kinds: Vec<String>,
}

impl<'a> BranchRestrictions<'a> {
    /// Creates the handle with the default allow-list.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self {
            client,
            allowed_kinds: DEFAULT_RESTRICTION_KINDS
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
        }
    }

    /// The kinds [`create`](Self::create) currently accepts.
    pub fn allowed_restriction_types(&self) -> &[String] {
        &self.allowed_kinds
    }

    /// Extends the allow-list for this handle.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_api::api::BitbucketClient;
    ///
    /// let client = BitbucketClient::new()?;
    /// let mut restrictions = client.branch_restrictions();
    /// restrictions.add_allowed_restriction_types(["require_default_reviewer_approvals_to_merge"]);
    /// # Ok::<(), bitbucket_api::api::ApiError>(())
    /// ```
    pub fn add_allowed_restriction_types<I, S>(&mut self, kinds: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for kind in kinds {
            let kind = kind.into();
            if !self.allowed_kinds.contains(&kind) {
                self.allowed_kinds.push(kind);
            }
        }
    }

    /// Lists the restrictions of a repository.
    ///
    /// `GET /2.0/repositories/{account}/{repo}/branch-restrictions`
    pub async fn all(&self, account: &str, repo: &str) -> Result<ApiResponse, ApiError> {
        let path = restrictions_path(account, repo)?;
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }

    /// Creates a restriction.
    ///
    /// `kind` defaults to `push`. The effective kind must be non-empty and in
    /// the allow-list; otherwise nothing is sent.
    ///
    /// `POST /2.0/repositories/{account}/{repo}/branch-restrictions`
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidArgument`] for an empty JSON string or a disallowed kind
    /// - [`ApiError::InvalidJson`] for a malformed JSON string
    pub async fn create(
        &self,
        account: &str,
        repo: &str,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = restrictions_path(account, repo)?;
        let body = self.creation_body(params.into())?;

        self.client
            .send(
                Request::post(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// `GET /2.0/repositories/{account}/{repo}/branch-restrictions/{id}`
    pub async fn get(&self, account: &str, repo: &str, id: u64) -> Result<ApiResponse, ApiError> {
        let path = restriction_path(account, repo, id)?;
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }

    /// Updates a restriction.
    ///
    /// The kind of an existing restriction cannot change, so params carrying a
    /// non-empty `kind` are rejected.
    ///
    /// `PUT /2.0/repositories/{account}/{repo}/branch-restrictions/{id}`
    pub async fn update(
        &self,
        account: &str,
        repo: &str,
        id: u64,
        params: impl Into<Params>,
    ) -> Result<ApiResponse, ApiError> {
        let path = restriction_path(account, repo, id)?;
        let body = update_body(params.into())?;

        self.client
            .send(
                Request::put(path)
                    .api_version(ApiVersion::V2)
                    .json(body.into()),
            )
            .await
    }

    /// `DELETE /2.0/repositories/{account}/{repo}/branch-restrictions/{id}`
    pub async fn delete(
        &self,
        account: &str,
        repo: &str,
        id: u64,
    ) -> Result<ApiResponse, ApiError> {
        let path = restriction_path(account, repo, id)?;
        self.client
            .send(Request::delete(path).api_version(ApiVersion::V2))
            .await
    }

    fn creation_body(&self, params: Params) -> Result<ParamMap, ApiError> {
        let mut defaults = ParamMap::new();
        defaults.insert("kind".to_string(), json!("push"));

        let body = merge_defaults(defaults, params.into_map()?);

        let allowed = match body.get("kind") {
            Some(kind) if !is_empty_value(kind) => kind
                .as_str()
                .is_some_and(|kind| self.allowed_kinds.iter().any(|k| k == kind)),
            _ => false,
        };
        if !allowed {
            return Err(ApiError::InvalidArgument(
                "Invalid restriction kind.".to_string(),
            ));
        }

        Ok(body)
    }
}

fn update_body(params: Params) -> Result<ParamMap, ApiError> {
    let body = params.into_map()?;

    if body.get("kind").is_some_and(|kind: &Value| !is_empty_value(kind)) {
        return Err(ApiError::InvalidArgument(
            "You cannot change the \"kind\" value.".to_string(),
        ));
    }

    Ok(body)
}

fn restrictions_path(account: &str, repo: &str) -> Result<String, ApiError> {
    Ok(format!("{}/branch-restrictions", repo_path(account, repo)?))
}

fn restriction_path(account: &str, repo: &str, id: u64) -> Result<String, ApiError> {
    Ok(format!("{}/{}", restrictions_path(account, repo)?, id))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::recording_client;
    use crate::api::ApiError;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Method;
    use serde_json::json;

    fn invalid_argument(result: Result<crate::api::ApiResponse, ApiError>) -> String {
        match result {
            Err(ApiError::InvalidArgument(message)) => message,
            other => panic!("expected an invalid argument error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all() {
        let (client, transport) = recording_client();

        client
            .branch_restrictions()
            .all("acc", "repo")
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(
            sent.url.path(),
            "/2.0/repositories/acc/repo/branch-restrictions"
        );
    }

    #[tokio::test]
    async fn test_create_defaults_kind_to_push() {
        let (client, transport) = recording_client();

        client
            .branch_restrictions()
            .create("acc", "repo", json!({}))
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(
            sent.url.path(),
            "/2.0/repositories/acc/repo/branch-restrictions"
        );
        assert_eq!(sent.headers[CONTENT_TYPE], "application/json");
        assert_eq!(transport.last_json(), json!({"kind": "push"}));
    }

    #[tokio::test]
    async fn test_create_from_json_string() {
        let (client, transport) = recording_client();

        client
            .branch_restrictions()
            .create("acc", "repo", r#"{"kind": "force", "pattern": "main"}"#)
            .await
            .unwrap();

        assert_eq!(
            transport.last_json(),
            json!({"kind": "force", "pattern": "main"})
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_and_empty_kinds() {
        let (client, transport) = recording_client();
        let restrictions = client.branch_restrictions();

        for params in [
            json!({"kind": "invalid"}),
            json!({"kind": ""}),
            json!({"kind": null}),
            json!({"kind": 5}),
        ] {
            let message = invalid_argument(restrictions.create("acc", "repo", params).await);
            assert_eq!(message, "Invalid restriction kind.");
        }
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_json_string() {
        let (client, transport) = recording_client();

        let message =
            invalid_argument(client.branch_restrictions().create("acc", "repo", "").await);

        assert_eq!(message, "Invalid JSON provided.");
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let (client, transport) = recording_client();

        let result = client
            .branch_restrictions()
            .create("acc", "repo", "{not json")
            .await;

        assert!(matches!(result, Err(ApiError::InvalidJson(_))));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_added_kind_is_accepted() {
        let (client, transport) = recording_client();
        let mut restrictions = client.branch_restrictions();
        let params = json!({"kind": "require_default_reviewer_approvals_to_merge"});

        assert!(restrictions.create("acc", "repo", params.clone()).await.is_err());

        restrictions.add_allowed_restriction_types(["require_default_reviewer_approvals_to_merge"]);
        restrictions.create("acc", "repo", params.clone()).await.unwrap();

        assert_eq!(transport.last_json(), params);
        assert_eq!(restrictions.allowed_restriction_types().len(), 11);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let (client, transport) = recording_client();
        let restrictions = client.branch_restrictions();

        restrictions.get("acc", "repo", 12).await.unwrap();
        assert_eq!(
            transport.last().url.path(),
            "/2.0/repositories/acc/repo/branch-restrictions/12"
        );

        restrictions.delete("acc", "repo", 12).await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, Method::DELETE);
        assert_eq!(
            sent.url.path(),
            "/2.0/repositories/acc/repo/branch-restrictions/12"
        );
    }

    #[tokio::test]
    async fn test_update() {
        let (client, transport) = recording_client();

        client
            .branch_restrictions()
            .update("acc", "repo", 8, json!({"users": [{"username": "jane"}]}))
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(
            sent.url.path(),
            "/2.0/repositories/acc/repo/branch-restrictions/8"
        );
        assert_eq!(
            transport.last_json(),
            json!({"users": [{"username": "jane"}]})
        );
    }

    #[tokio::test]
    async fn test_update_rejects_kind_change() {
        let (client, transport) = recording_client();
        let restrictions = client.branch_restrictions();

        let message = invalid_argument(
            restrictions
                .update("acc", "repo", 8, r#"{"kind": "push"}"#)
                .await,
        );
        assert_eq!(message, "You cannot change the \"kind\" value.");
        assert_eq!(transport.count(), 0);

        // An empty kind is not a change.
        restrictions
            .update("acc", "repo", 8, json!({"kind": "", "pattern": "dev"}))
            .await
            .unwrap();
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_json_string() {
        let (client, _) = recording_client();

        let message = invalid_argument(
            client
                .branch_restrictions()
                .update("acc", "repo", 8, String::new())
                .await,
        );
        assert_eq!(message, "Invalid JSON provided.");
    }
}
