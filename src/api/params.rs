//
//  bitbucket-api
//  api/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Parameter blobs and input validation helpers.
//!
//! Several endpoints accept a free-form parameter object. Callers may hand it
//! over either as a JSON object map or as a JSON string; [`Params`] covers both
//! and [`Params::into_map`] normalises them, failing before any request is made
//! if the string form is empty or not a JSON object.

use serde_json::{Map, Value};

use super::common::ApiError;

/// A JSON object map, the normalised form of [`Params`].
pub type ParamMap = Map<String, Value>;

/// Parameters supplied as a map or as a JSON string.
///
/// # Example
///
/// ```rust
/// use bitbucket_api::api::Params;
///
/// let from_json = Params::from(r#"{"kind": "force"}"#).into_map()?;
/// assert_eq!(from_json["kind"], "force");
///
/// assert!(Params::from("").into_map().is_err());
/// # Ok::<(), bitbucket_api::api::ApiError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Already-structured parameters
    Map(ParamMap),
    /// Parameters as a JSON object string
    Json(String),
}

impl Default for Params {
    fn default() -> Self {
        Self::Map(ParamMap::new())
    }
}

impl From<ParamMap> for Params {
    fn from(map: ParamMap) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for Params {
    fn from(raw: &str) -> Self {
        Self::Json(raw.to_string())
    }
}

impl From<String> for Params {
    fn from(raw: String) -> Self {
        Self::Json(raw)
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(map),
            Value::String(raw) => Self::Json(raw),
            other => Self::Json(other.to_string()),
        }
    }
}

impl Params {
    /// Resolves the parameters to an object map.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidArgument`] for an empty string or JSON that is not an object
    /// - [`ApiError::InvalidJson`] for a string that is not valid JSON
    pub fn into_map(self) -> Result<ParamMap, ApiError> {
        match self {
            Self::Map(map) => Ok(map),
            Self::Json(raw) => {
                if raw.trim().is_empty() {
                    return Err(ApiError::InvalidArgument(
                        "Invalid JSON provided.".to_string(),
                    ));
                }
                decode_json(&raw)
            }
        }
    }
}

/// Decodes a JSON string that must hold an object.
pub fn decode_json(raw: &str) -> Result<ParamMap, ApiError> {
    match serde_json::from_str::<Value>(raw).map_err(ApiError::InvalidJson)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::InvalidArgument(format!(
            "Expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Overlays `params` on `defaults`; keys present in `params` win.
pub fn merge_defaults(defaults: ParamMap, params: ParamMap) -> ParamMap {
    let mut merged = defaults;
    merged.extend(params);
    merged
}

/// Whether a value counts as "not provided".
///
/// Null, `false`, `0`, `""`, `"0"`, and empty arrays or objects are empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Fails when a required path identifier is blank or is not a single path segment.
///
/// Dot segments and values containing `/`, `?` or `#` would change the
/// resolved URL, so they are rejected instead of being sent.
pub(crate) fn require_identifier(name: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidArgument(format!(
            "Missing required argument: {}",
            name
        )));
    }
    if value == "." || value == ".." || value.contains(['/', '?', '#']) {
        return Err(ApiError::InvalidArgument(format!(
            "Invalid {}: {:?} is not a single path segment",
            name, value
        )));
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
