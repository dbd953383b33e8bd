//
//  bitbucket-api
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request description types.
//!
//! A [`Request`] is built fresh for every call: a method, a path relative to
//! the versioned base URL, query parameters, an optional body and any extra
//! headers. The client turns it into an [`HttpRequest`] with an absolute URL
//! and authentication applied, which is what a transport actually sends.

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::common::ApiError;

/// Bitbucket REST API version.
///
/// The version is the first path segment after the base URL
/// (`https://api.bitbucket.org/2.0/...`).
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::ApiVersion;
///
/// let version: ApiVersion = "1.0".parse()?;
/// assert_eq!(version, ApiVersion::V1);
/// assert!("3.0".parse::<ApiVersion>().is_err());
/// # Ok::<(), bitbucket_api::api::ApiError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    /// Legacy 1.0 API
    V1,
    /// Current 2.0 API
    #[default]
    V2,
}

impl ApiVersion {
    /// All versions the client accepts.
    pub const SUPPORTED: [ApiVersion; 2] = [ApiVersion::V1, ApiVersion::V2];

    /// The path segment for this version.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V2 => "2.0",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.0" | "1" => Ok(Self::V1),
            "2.0" | "2" => Ok(Self::V2),
            other => Err(ApiError::InvalidArgument(format!(
                "Unsupported API version: {} (expected one of 1.0, 2.0)",
                other
            ))),
        }
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON-encoded body.
    Json(Value),
    /// `application/x-www-form-urlencoded` body.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Builds a form body from borrowed pairs.
    pub fn form<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A request relative to the client's base URL.
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::{ApiVersion, Request};
/// use serde_json::json;
///
/// let request = Request::post("/repositories/acc/repo/branch-restrictions")
///     .api_version(ApiVersion::V2)
///     .json(json!({"kind": "push"}));
///
/// assert_eq!(request.path, "/repositories/acc/repo/branch-restrictions");
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path below `{base_url}/{api_version}`
    pub path: String,
    /// Version override; `None` uses the client's configured version.
    pub api_version: Option<ApiVersion>,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// Optional body
    pub body: Option<RequestBody>,
    /// Extra headers
    pub headers: HeaderMap,
}

impl Request {
    /// Creates a request with no parameters, body or headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            api_version: None,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Pins the request to an API version.
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Appends a single query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters.
    pub fn query_pairs<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a JSON body and the matching `Content-Type` header.
    pub fn json(mut self, body: Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Sets a form-encoded body.
    pub fn form<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.body = Some(RequestBody::form(pairs));
        self
    }

    /// Sets an arbitrary body.
    pub fn body(mut self, body: RequestBody) -> Self {
        if matches!(body, RequestBody::Json(_)) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        self.body = Some(body);
        self
    }

    /// Adds a header, replacing an existing one with the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully resolved request, as handed to a [`Transport`](super::Transport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including query string
    pub url: Url,
    /// All headers, authentication included
    pub headers: HeaderMap,
    /// Optional body
    pub body: Option<RequestBody>,
}
