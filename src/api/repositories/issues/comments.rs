//
//  bitbucket-api
//  api/repositories/issues/comments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::issue_path;
use crate::api::client::BitbucketClient;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::request::{ApiVersion, Request};

/// Comments on a repository issue.
///
/// Comment bodies are sent form-encoded as `content=<text>`.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_api::api::BitbucketClient;
///
/// # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
/// let client = BitbucketClient::new()?;
/// client.issues().comments().create("acc", "repo", 3, "Reproduced on main.").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Comments<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Comments<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// Lists all comments on an issue, newest first.
    ///
    /// `GET /2.0/repositories/{account}/{repo}/issues/{issue_id}/comments`
    pub async fn all(
        &self,
        account: &str,
        repo: &str,
        issue_id: u64,
    ) -> Result<ApiResponse, ApiError> {
        let path = comments_path(account, repo, issue_id)?;
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }

    /// `GET /2.0/repositories/{account}/{repo}/issues/{issue_id}/comments/{comment_id}`
    pub async fn get(
        &self,
        account: &str,
        repo: &str,
        issue_id: u64,
        comment_id: u64,
    ) -> Result<ApiResponse, ApiError> {
        let path = comment_path(account, repo, issue_id, comment_id)?;
        self.client
            .send(Request::get(path).api_version(ApiVersion::V2))
            .await
    }

    /// `POST /2.0/repositories/{account}/{repo}/issues/{issue_id}/comments`
    pub async fn create(
        &self,
        account: &str,
        repo: &str,
        issue_id: u64,
        content: &str,
    ) -> Result<ApiResponse, ApiError> {
        let path = comments_path(account, repo, issue_id)?;
        self.client
            .send(
                Request::post(path)
                    .api_version(ApiVersion::V2)
                    .form([("content", content)]),
            )
            .await
    }

    /// `PUT /2.0/repositories/{account}/{repo}/issues/{issue_id}/comments/{comment_id}`
    pub async fn update(
        &self,
        account: &str,
        repo: &str,
        issue_id: u64,
        comment_id: u64,
        content: &str,
    ) -> Result<ApiResponse, ApiError> {
        let path = comment_path(account, repo, issue_id, comment_id)?;
        self.client
            .send(
                Request::put(path)
                    .api_version(ApiVersion::V2)
                    .form([("content", content)]),
            )
            .await
    }
}

fn comments_path(account: &str, repo: &str, issue_id: u64) -> Result<String, ApiError> {
    Ok(format!("{}/comments", issue_path(account, repo, issue_id)?))
}

fn comment_path(
    account: &str,
    repo: &str,
    issue_id: u64,
    comment_id: u64,
) -> Result<String, ApiError> {
    Ok(format!(
        "{}/{}",
        comments_path(account, repo, issue_id)?,
        comment_id
    ))
}

#[cfg(test)]
mod tests {
    use crate::api::request::RequestBody;
    use crate::api::testing::recording_client;
    use reqwest::Method;

    fn content_body(text: &str) -> Option<RequestBody> {
        Some(RequestBody::Form(vec![(
            "content".to_string(),
            text.to_string(),
        )]))
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let (client, transport) = recording_client();
        let comments = client.issues().comments();

        comments.all("acc", "repo", 3).await.unwrap();
        assert_eq!(
            transport.last().url.path(),
            "/2.0/repositories/acc/repo/issues/3/comments"
        );

        comments.get("acc", "repo", 3, 99).await.unwrap();
        assert_eq!(
            transport.last().url.path(),
            "/2.0/repositories/acc/repo/issues/3/comments/99"
        );
    }

    #[tokio::test]
    async fn test_create_and_update_send_form_content() {
        let (client, transport) = recording_client();
        let comments = client.issues().comments();

        comments.create("acc", "repo", 3, "First!").await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.body, content_body("First!"));

        comments.update("acc", "repo", 3, 99, "Edited").await.unwrap();
        let sent = transport.last();
        assert_eq!(sent.method, Method::PUT);
        assert_eq!(
            sent.url.path(),
            "/2.0/repositories/acc/repo/issues/3/comments/99"
        );
        assert_eq!(sent.body, content_body("Edited"));
    }
}
