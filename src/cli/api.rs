//
//  bitbucket-api
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends an arbitrary request through the configured client, so the base URL
//! and credentials are the same as for every other command. A leading `1.0/`
//! or `2.0/` segment in the endpoint selects the API version; otherwise the
//! configured default is used.
//!
//! ## Examples
//!
//! ```bash
//! # Get repository info
//! bb-api api /2.0/repositories/workspace/repo
//!
//! # Create an issue with POST
//! bb-api api -X POST /2.0/repositories/workspace/repo/issues \
//!     -F title="Bug report" -F content.raw="Description here"
//!
//! # Comment with a form body
//! bb-api api -X POST /2.0/repositories/workspace/repo/issues/1/comments \
//!     --form -F content="Thanks"
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Args;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::{ApiVersion, Request, RequestBody};

use super::{print_response, GlobalOptions};

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API endpoint (e.g., /2.0/repositories/workspace/repo)
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request headers (can be specified multiple times)
    #[arg(long, short = 'H', action = clap::ArgAction::Append)]
    pub header: Vec<String>,

    /// Request body fields (key=value, can be nested with dots)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Raw field values (not JSON-encoded, strings only)
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Send fields form-encoded instead of as JSON
    #[arg(long, conflicts_with = "input")]
    pub form: bool,

    /// Read a JSON request body from file (- for stdin)
    #[arg(long, short = 'f', conflicts_with_all = ["field", "raw_field"])]
    pub input: Option<String>,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let request = self.build_request()?;
        let response = client.send(request).await?;
        print_response(response, global)
    }

    fn build_request(&self) -> Result<Request> {
        let (version, path) = split_version(&self.endpoint);

        let mut request = Request::new(self.parse_method()?, path);
        if let Some(version) = version {
            request = request.api_version(version);
        }

        for header in &self.header {
            let (name, value) = parse_header(header)?;
            request = request.header(name, value);
        }

        if let Some(body) = self.build_body()? {
            request = request.body(body);
        }

        Ok(request)
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn build_body(&self) -> Result<Option<RequestBody>> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
            };

            let value: Value =
                serde_json::from_str(&content).context("Request body is not valid JSON")?;
            return Ok(Some(RequestBody::Json(value)));
        }

        if self.field.is_empty() && self.raw_field.is_empty() {
            return Ok(None);
        }

        if self.form {
            let mut pairs = Vec::new();
            for field in self.field.iter().chain(&self.raw_field) {
                pairs.push(split_pair(field)?);
            }
            return Ok(Some(RequestBody::form(pairs)));
        }

        let mut body = Map::new();
        for field in &self.field {
            let (key, raw) = split_pair(field)?;
            set_nested_value(&mut body, &key, parse_value(&raw));
        }
        for field in &self.raw_field {
            let (key, raw) = split_pair(field)?;
            set_nested_value(&mut body, &key, Value::String(raw));
        }

        Ok(Some(RequestBody::Json(Value::Object(body))))
    }
}

/// Splits an optional leading `1.0`/`2.0` segment off an endpoint.
fn split_version(endpoint: &str) -> (Option<ApiVersion>, String) {
    let trimmed = endpoint.trim_start_matches('/');
    for version in ApiVersion::SUPPORTED {
        if let Some(rest) = trimmed.strip_prefix(version.as_str()) {
            if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
                return (Some(version), rest.to_string());
            }
        }
    }
    (None, format!("/{}", trimmed))
}

fn split_pair(field: &str) -> Result<(String, String)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

fn parse_header(header: &str) -> Result<(HeaderName, HeaderValue)> {
    let Some((name, value)) = header.split_once(':') else {
        bail!("Invalid header format: {}. Expected 'Name: Value'", header);
    };

    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .with_context(|| format!("Invalid header name in '{}'", header))?;
    let value = HeaderValue::from_str(value.trim())
        .with_context(|| format!("Invalid header value in '{}'", header))?;
    Ok((name, value))
}

/// Interprets literals, numbers and JSON arrays/objects; everything else is a string.
fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
            {
                Value::Number(n)
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(endpoint: &str) -> ApiCommand {
        ApiCommand {
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            header: Vec::new(),
            field: Vec::new(),
            raw_field: Vec::new(),
            form: false,
            input: None,
        }
    }

    #[test]
    fn test_split_version() {
        assert_eq!(
            split_version("/2.0/repositories/acc"),
            (Some(ApiVersion::V2), "/repositories/acc".to_string())
        );
        assert_eq!(
            split_version("1.0/users/acc/followers"),
            (Some(ApiVersion::V1), "/users/acc/followers".to_string())
        );
        assert_eq!(split_version("/user"), (None, "/user".to_string()));
        assert_eq!(split_version("/2.0x/user"), (None, "/2.0x/user".to_string()));
    }

    #[test]
    fn test_nested_json_fields() {
        let mut cmd = command("/2.0/repositories/acc/repo/issues");
        cmd.method = "post".to_string();
        cmd.field = vec![
            "title=Bug report".to_string(),
            "content.raw=Description".to_string(),
            "votes=3".to_string(),
        ];
        cmd.raw_field = vec!["version=1.0".to_string()];

        let request = cmd.build_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.api_version, Some(ApiVersion::V2));
        assert_eq!(request.path, "/repositories/acc/repo/issues");
        assert_eq!(
            request.body,
            Some(RequestBody::Json(json!({
                "title": "Bug report",
                "content": {"raw": "Description"},
                "votes": 3,
                "version": "1.0"
            })))
        );
    }

    #[test]
    fn test_form_fields() {
        let mut cmd = command("/2.0/repositories/acc/repo/issues/1/comments");
        cmd.form = true;
        cmd.field = vec!["content=Thanks".to_string()];

        let request = cmd.build_request().unwrap();
        assert_eq!(
            request.body,
            Some(RequestBody::Form(vec![(
                "content".to_string(),
                "Thanks".to_string()
            )]))
        );
    }

    #[test]
    fn test_input_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"kind": "force"}"#).unwrap();

        let mut cmd = command("/2.0/repositories/acc/repo/branch-restrictions");
        cmd.input = Some(file.path().to_string_lossy().to_string());

        let request = cmd.build_request().unwrap();
        assert_eq!(request.body, Some(RequestBody::Json(json!({"kind": "force"}))));
    }

    #[test]
    fn test_headers_and_invalid_input() {
        let mut cmd = command("/user");
        cmd.header = vec!["Accept: application/json".to_string()];
        let request = cmd.build_request().unwrap();
        assert_eq!(request.headers["accept"], "application/json");

        cmd.header = vec!["no-colon".to_string()];
        assert!(cmd.build_request().is_err());

        let mut cmd = command("/user");
        cmd.method = "TRACE".to_string();
        assert!(cmd.build_request().is_err());

        let mut cmd = command("/user");
        cmd.field = vec!["missing-equals".to_string()];
        assert!(cmd.build_request().is_err());
    }

    #[test]
    fn test_input_conflicts_with_fields() {
        use clap::Parser;

        use crate::cli::Cli;

        for flag in ["-F", "--raw-field"] {
            let result = Cli::try_parse_from([
                "bb-api", "api", "/user", "--input", "body.json", flag, "a=b",
            ]);
            assert_eq!(
                result.unwrap_err().kind(),
                clap::error::ErrorKind::ArgumentConflict
            );
        }

        assert!(Cli::try_parse_from(["bb-api", "api", "/user", "--input", "body.json"]).is_ok());
    }
}
