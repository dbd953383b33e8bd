//
//  bitbucket-api
//  api/testing.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! In-memory transport for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;

use super::client::BitbucketClient;
use super::common::{ApiError, ApiResponse};
use super::request::{HttpRequest, RequestBody};
use super::transport::Transport;

/// Records every request and answers `200 {}`.
#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RecordingTransport {
    pub(crate) fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// Body of the last request, which must be JSON.
    pub(crate) fn last_json(&self) -> Value {
        match self.last().body {
            Some(RequestBody::Json(value)) => value,
            other => panic!("expected a JSON body, got {:?}", other),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        Ok(ApiResponse::new(StatusCode::OK, HeaderMap::new(), "{}"))
    }
}

/// A client wired to a fresh recording transport.
pub(crate) fn recording_client() -> (BitbucketClient, RecordingTransport) {
    let transport = RecordingTransport::default();
    (
        BitbucketClient::with_transport(transport.clone()),
        transport,
    )
}
