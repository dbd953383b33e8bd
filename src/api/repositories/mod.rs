//
//  bitbucket-api
//  api/repositories/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository endpoints.
//!
//! # Module Organization
//!
//! - [`Repositories`] - listing repositories (`/repositories`, `/repositories/{account}`)
//! - [`Repository`] - one repository: CRUD, forks, watchers, refs
//! - [`BranchRestrictions`] - branch permissions on a repository
//! - [`Issues`] / [`Comments`] - the repository issue tracker
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_api::api::BitbucketClient;
//!
//! # async fn example() -> Result<(), bitbucket_api::api::ApiError> {
//! let client = BitbucketClient::new()?;
//!
//! let mine = client.repositories().all("myworkspace", &[("role", "member")]).await?;
//! let repo = client.repository().get("myworkspace", "myrepo").await?;
//! # Ok(())
//! # }
//! ```

mod branch_restrictions;
pub mod issues;
mod repository;

pub use branch_restrictions::{BranchRestrictions, DEFAULT_RESTRICTION_KINDS};
pub use issues::{Comments, Issues};
pub use repository::Repository;

use super::client::BitbucketClient;
use super::common::{ApiError, ApiResponse};
use super::params::require_identifier;
use super::request::{ApiVersion, Request};

/// Repository listings.
#[derive(Debug, Clone, Copy)]
pub struct Repositories<'a> {
    client: &'a BitbucketClient,
}

impl<'a> Repositories<'a> {
    /// Creates the handle.
    pub fn new(client: &'a BitbucketClient) -> Self {
        Self { client }
    }

    /// Lists the repositories of an account.
    ///
    /// `query` is passed through as-is; useful keys are `role`, `q`, `sort`,
    /// `page` and `pagelen`.
    ///
    /// `GET /2.0/repositories/{account}`
    pub async fn all(
        &self,
        account: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        require_identifier("account", account)?;
        self.client
            .send(
                Request::get(format!("/repositories/{}", account))
                    .api_version(ApiVersion::V2)
                    .query_pairs(query.iter().copied()),
            )
            .await
    }

    /// Lists all public repositories.
    ///
    /// `GET /2.0/repositories`
    pub async fn public(&self, query: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        self.client
            .send(
                Request::get("/repositories")
                    .api_version(ApiVersion::V2)
                    .query_pairs(query.iter().copied()),
            )
            .await
    }

    /// A single repository.
    pub fn repository(&self) -> Repository<'a> {
        Repository::new(self.client)
    }

    /// Branch restrictions with the default allow-list.
    pub fn branch_restrictions(&self) -> BranchRestrictions<'a> {
        BranchRestrictions::new(self.client)
    }

    /// The issue tracker.
    pub fn issues(&self) -> Issues<'a> {
        Issues::new(self.client)
    }
}
