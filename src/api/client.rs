//
//  bitbucket-api
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for Bitbucket API
//!
//! This module provides the core HTTP client shared by every resource handle.
//! It tracks the base endpoint and API version, applies authentication, and
//! delegates the actual exchange to an injected [`Transport`].
//!
//! ## Features
//!
//! - Configurable base URL and API version (`1.0` / `2.0`)
//! - Authentication header injection
//! - JSON and form request bodies
//! - Pluggable transport for testing
//! - Raw response pass-through

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use super::common::{ApiError, ApiResponse};
use super::repositories::{BranchRestrictions, Issues, Repositories, Repository};
use super::request::{ApiVersion, HttpRequest, Request, RequestBody};
use super::transport::{ReqwestTransport, Transport, TransportOptions};
use super::user::User;
use super::users::Users;
use crate::auth::AuthCredential;

/// Default API endpoint for Bitbucket Cloud.
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org";

/// Options used to build a [`BitbucketClient`].
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::{ApiVersion, ClientOptions};
///
/// let options = ClientOptions::default();
/// assert_eq!(options.base_url, "https://api.bitbucket.org");
/// assert_eq!(options.api_version, ApiVersion::V2);
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base endpoint, without the version segment
    pub base_url: String,
    /// Version used when a request does not pin one
    pub api_version: ApiVersion,
    /// Connection settings for the default transport
    pub transport: TransportOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: ApiVersion::default(),
            transport: TransportOptions::default(),
        }
    }
}

/// The main HTTP client for interacting with the Bitbucket API.
///
/// Every call is an independent request/response exchange; the client holds
/// configuration only and is never mutated by a request.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use bitbucket_api::api::BitbucketClient;
/// use bitbucket_api::auth::AuthCredential;
///
/// let client = BitbucketClient::new()?
///     .with_auth(AuthCredential::basic("john", "app-password"));
/// # Ok::<(), bitbucket_api::api::ApiError>(())
/// ```
///
/// # Making Requests
///
/// ```rust,no_run
/// use bitbucket_api::api::BitbucketClient;
///
/// # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
/// let client = BitbucketClient::new()?;
/// let response = client.users().get("john-doe").await?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BitbucketClient {
    /// The transport performing the exchange
    transport: Arc<dyn Transport>,
    /// Base endpoint without trailing slash
    base_url: String,
    /// Version used when a request does not pin one
    api_version: ApiVersion,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl std::fmt::Debug for BitbucketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitbucketClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("auth", &self.auth.as_ref().map(AuthCredential::scheme))
            .finish()
    }
}

impl BitbucketClient {
    /// Creates a client for Bitbucket Cloud with default options.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_options(ClientOptions::default())
    }

    /// Creates a client backed by [`ReqwestTransport`] from explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] if `base_url` is not an absolute
    /// URL, or [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn with_options(options: ClientOptions) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&options.transport)?;
        Self::with_transport(transport)
            .with_base_url(&options.base_url)
            .map(|client| client.with_api_version(options.api_version))
    }

    /// Creates a client that sends requests through `transport`.
    ///
    /// The base URL and version start at their defaults.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: ApiVersion::default(),
            auth: None,
        }
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Replaces (or clears) the authentication credentials.
    pub fn set_credentials(&mut self, auth: Option<AuthCredential>) {
        self.auth = auth;
    }

    /// The configured credentials, if any.
    pub fn credentials(&self) -> Option<&AuthCredential> {
        self.auth.as_ref()
    }

    /// Sets the base endpoint.
    ///
    /// A trailing slash is dropped so paths join cleanly.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_api::api::BitbucketClient;
    ///
    /// let client = BitbucketClient::new()?.with_base_url("https://bitbucket.example.com/api/")?;
    /// assert_eq!(client.base_url(), "https://bitbucket.example.com/api");
    /// # Ok::<(), bitbucket_api::api::ApiError>(())
    /// ```
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| {
            ApiError::InvalidArgument(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidArgument(format!(
                "Invalid base URL '{}': not a hierarchical URL",
                base_url
            )));
        }

        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Sets the default API version.
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Sets the default API version from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for anything other than `1.0` or `2.0`.
    pub fn set_api_version(&mut self, version: &str) -> Result<(), ApiError> {
        self.api_version = version.parse()?;
        Ok(())
    }

    /// The default API version.
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// The base endpoint, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL `{base_url}/{version}{path}?{query}`.
    ///
    /// The path is used verbatim apart from a leading slash being added when
    /// missing.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_api::api::{ApiVersion, BitbucketClient};
    ///
    /// let client = BitbucketClient::new()?;
    /// let url = client.url_for(ApiVersion::V2, "/users/john-doe", &[])?;
    /// assert_eq!(url.as_str(), "https://api.bitbucket.org/2.0/users/john-doe");
    /// # Ok::<(), bitbucket_api::api::ApiError>(())
    /// ```
    pub fn url_for(
        &self,
        version: ApiVersion,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Url, ApiError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let raw = format!("{}/{}{}{}", self.base_url, version, separator, path);

        let mut url = Url::parse(&raw).map_err(|e| {
            ApiError::InvalidArgument(format!("Invalid request URL '{}': {}", raw, e))
        })?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Sends a request through the transport.
    ///
    /// Authentication is applied last, so it overrides any `Authorization`
    /// header set on the request. The response is returned whatever its
    /// status; use [`ApiResponse::error_for_status`] to turn failures into
    /// errors.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidArgument`] if the URL or credentials are invalid
    /// - Any error raised by the transport, unchanged
    pub async fn send(&self, request: Request) -> Result<ApiResponse, ApiError> {
        let version = request.api_version.unwrap_or(self.api_version);
        let url = self.url_for(version, &request.path, &request.query)?;

        let mut headers = request.headers;
        if let Some(auth) = &self.auth {
            auth.apply(&mut headers)?;
        }

        tracing::debug!("{} {}", request.method, url);

        let response = self
            .transport
            .execute(HttpRequest {
                method: request.method,
                url,
                headers,
                body: request.body,
            })
            .await?;

        tracing::trace!("Response status {}", response.status());

        Ok(response)
    }

    /// Makes a GET request with optional query parameters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_api::api::BitbucketClient;
    ///
    /// # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
    /// let client = BitbucketClient::new()?;
    /// let response = client.get("/repositories/atlassian", &[("pagelen", "10")]).await?;
    /// println!("{}", response.status());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        self.send(Request::get(path).query_pairs(query.iter().copied()))
            .await
    }

    /// Makes a POST request with the given body.
    pub async fn post(&self, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.send(Request::post(path).body(body)).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post_json(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(Request::post(path).json(body)).await
    }

    /// Makes a PUT request with the given body.
    pub async fn put(&self, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.send(Request::put(path).body(body)).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Request::delete(path)).await
    }

    /// Public user information, SSH keys, invitations and followers.
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// The authenticated user.
    pub fn user(&self) -> User<'_> {
        User::new(self)
    }

    /// Repository listings.
    pub fn repositories(&self) -> Repositories<'_> {
        Repositories::new(self)
    }

    /// A single repository.
    pub fn repository(&self) -> Repository<'_> {
        Repository::new(self)
    }

    /// Branch restrictions with the default allow-list.
    pub fn branch_restrictions(&self) -> BranchRestrictions<'_> {
        BranchRestrictions::new(self)
    }

    /// The repository issue tracker.
    pub fn issues(&self) -> Issues<'_> {
        Issues::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::RecordingTransport;
    use mockito::Matcher;
    use reqwest::header::AUTHORIZATION;
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    fn mock_client(server: &mockito::ServerGuard) -> BitbucketClient {
        BitbucketClient::with_options(ClientOptions {
            base_url: server.url(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_for() {
        let client = BitbucketClient::with_transport(RecordingTransport::default());

        let url = client
            .url_for(ApiVersion::V2, "/users/john-doe", &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.bitbucket.org/2.0/users/john-doe");

        let url = client
            .url_for(
                ApiVersion::V1,
                "users/john-doe/invitations",
                &[("page".to_string(), "2".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.bitbucket.org/1.0/users/john-doe/invitations?page=2"
        );
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = BitbucketClient::with_transport(RecordingTransport::default())
            .with_base_url("https://bitbucket.example.com/api/")
            .unwrap();
        assert_eq!(client.base_url(), "https://bitbucket.example.com/api");

        let url = client.url_for(ApiVersion::V2, "/user", &[]).unwrap();
        assert_eq!(url.as_str(), "https://bitbucket.example.com/api/2.0/user");
    }

    #[test]
    fn test_invalid_base_url() {
        let result =
            BitbucketClient::with_transport(RecordingTransport::default()).with_base_url("nope");
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn test_set_api_version() {
        let mut client = BitbucketClient::with_transport(RecordingTransport::default());
        client.set_api_version("1.0").unwrap();
        assert_eq!(client.api_version(), ApiVersion::V1);

        assert!(client.set_api_version("3.0").is_err());
        assert_eq!(client.api_version(), ApiVersion::V1);
    }

    #[tokio::test]
    async fn test_default_version_and_auth_applied() {
        let transport = RecordingTransport::default();
        let client = BitbucketClient::with_transport(transport.clone())
            .with_api_version(ApiVersion::V1)
            .with_auth(AuthCredential::oauth("token"));

        client.get("/user", &[("fields", "username")]).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url.path(), "/1.0/user");
        assert_eq!(sent.url.query(), Some("fields=username"));
        assert_eq!(sent.headers[AUTHORIZATION], "Bearer token");
    }

    #[tokio::test]
    async fn test_pinned_version_overrides_default() {
        let transport = RecordingTransport::default();
        let client = BitbucketClient::with_transport(transport.clone())
            .with_api_version(ApiVersion::V1);

        client
            .send(Request::delete("/repositories/acc/repo").api_version(ApiVersion::V2))
            .await
            .unwrap();

        assert_eq!(transport.last().url.path(), "/2.0/repositories/acc/repo");
    }

    #[tokio::test]
    async fn test_invalid_credentials_fail_before_sending() {
        let transport = RecordingTransport::default();
        let client = BitbucketClient::with_transport(transport.clone())
            .with_auth(AuthCredential::oauth("line\nbreak"));

        let result = client.get("/user", &[]).await;

        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_basic_credentials_are_always_valid_headers() {
        let transport = RecordingTransport::default();
        let client = BitbucketClient::with_transport(transport.clone())
            .with_auth(AuthCredential::basic("john", "line\nbreak"));

        client.get("/user", &[]).await.unwrap();
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn test_identifiers_cannot_escape_their_path_segment() {
        let transport = RecordingTransport::default();
        let client = BitbucketClient::with_transport(transport.clone());

        assert!(matches!(
            client.users().get("..").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.repository().delete("acc", "repo/../../other").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.users().ssh_keys().get("john", "a?b#c").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.user().email("me#x").await,
            Err(ApiError::InvalidArgument(_))
        ));
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn test_get_over_http_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/users/john-doe")
            .match_header("authorization", "Basic am9objpzZWNyZXQ=")
            .match_header(
                "user-agent",
                Matcher::Regex(format!("^{}/", crate::APP_NAME)),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"username": "john-doe"}"#)
            .create_async()
            .await;

        let client = mock_client(&server).with_auth(AuthCredential::basic("john", "secret"));
        let response = client.users().get("john-doe").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().unwrap();
        assert_eq!(body["username"], "john-doe");
    }

    #[tokio::test]
    async fn test_post_json_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acc/repo/branch-restrictions")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"kind": "push"})))
            .with_status(201)
            .with_body(r#"{"id": 7, "kind": "push"}"#)
            .create_async()
            .await;

        let client = mock_client(&server);
        let response = client
            .branch_restrictions()
            .create("acc", "repo", json!({}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_form_body_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acc/repo/issues/3/comments")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded(
                "content".to_string(),
                "Looks good to me".to_string(),
            ))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let client = mock_client(&server);
        client
            .issues()
            .comments()
            .create("acc", "repo", 3, "Looks good to me")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_passed_through() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/2.0/repositories/acc/repo")
            .with_status(403)
            .with_body(r#"{"type": "error", "error": {"message": "Admin required"}}"#)
            .create_async()
            .await;

        let client = mock_client(&server);
        let response = client.repository().delete("acc", "repo").await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        match response.error_for_status() {
            Err(ApiError::Forbidden(message)) => assert_eq!(message, "Admin required"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_passed_through() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client = BitbucketClient::with_options(ClientOptions {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();

        let result = client.get("/user", &[]).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
