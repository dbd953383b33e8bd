//
//  bitbucket-api
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository and branch restriction commands.
//!
//! Parameters for create and update are given as a JSON object with
//! `--params`; the library fills in defaults and validates them before
//! anything is sent.
//!
//! ## Examples
//!
//! ```bash
//! bb-api repo create acme widgets --params '{"is_private": false}'
//! bb-api repo list acme --role member
//! bb-api restrictions create acme widgets --params '{"kind": "force", "pattern": "main"}'
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{print_response, GlobalOptions};

/// Repository owner and slug
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Account (workspace) owning the repository
    pub account: String,

    /// Repository slug
    pub repo: String,
}

/// Manage repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// View repository details
    #[command(visible_alias = "view")]
    Get(RepoArgs),

    /// List repositories of an account, or public repositories
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a new repository
    Create(ParamsArgs),

    /// Update repository settings
    Update(ParamsArgs),

    /// Delete a repository
    Delete(RepoArgs),

    /// List forks
    Forks(RepoArgs),

    /// Fork a repository
    Fork(ParamsArgs),

    /// List watchers
    Watchers(RepoArgs),

    /// List branches
    Branches(RepoArgs),

    /// List tags
    Tags(RepoArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Account to list; omit with --public
    #[arg(required_unless_present = "public")]
    pub account: Option<String>,

    /// List all public repositories
    #[arg(long, conflicts_with = "account")]
    pub public: bool,

    /// Filter by role (owner, admin, contributor, member)
    #[arg(long, value_parser = ["owner", "admin", "contributor", "member"])]
    pub role: Option<String>,

    /// Query filter, e.g. 'name ~ "api"'
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Results per page
    #[arg(long)]
    pub pagelen: Option<u32>,
}

impl ListArgs {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(role) = &self.role {
            pairs.push(("role", role.clone()));
        }
        if let Some(query) = &self.query {
            pairs.push(("q", query.clone()));
        }
        if let Some(pagelen) = self.pagelen {
            pairs.push(("pagelen", pagelen.to_string()));
        }
        pairs
    }
}

#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub target: RepoArgs,

    /// Parameters as a JSON object
    #[arg(long, short = 'p', default_value = "{}")]
    pub params: String,
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let repository = client.repository();

        let response = match &self.command {
            RepoSubcommand::Get(t) => repository.get(&t.account, &t.repo).await?,
            RepoSubcommand::List(args) => {
                let owned = args.query_pairs();
                let query: Vec<(&str, &str)> =
                    owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
                match &args.account {
                    Some(account) if !args.public => {
                        client.repositories().all(account, &query).await?
                    }
                    _ => client.repositories().public(&query).await?,
                }
            }
            RepoSubcommand::Create(a) => {
                repository
                    .create(&a.target.account, &a.target.repo, a.params.as_str())
                    .await?
            }
            RepoSubcommand::Update(a) => {
                repository
                    .update(&a.target.account, &a.target.repo, a.params.as_str())
                    .await?
            }
            RepoSubcommand::Delete(t) => repository.delete(&t.account, &t.repo).await?,
            RepoSubcommand::Forks(t) => repository.forks(&t.account, &t.repo).await?,
            RepoSubcommand::Fork(a) => {
                repository
                    .fork(&a.target.account, &a.target.repo, a.params.as_str())
                    .await?
            }
            RepoSubcommand::Watchers(t) => repository.watchers(&t.account, &t.repo).await?,
            RepoSubcommand::Branches(t) => repository.branches(&t.account, &t.repo).await?,
            RepoSubcommand::Tags(t) => repository.tags(&t.account, &t.repo).await?,
        };
        print_response(response, global)
    }
}

/// Manage branch restrictions
#[derive(Args, Debug)]
pub struct RestrictionsCommand {
    #[command(subcommand)]
    pub command: RestrictionsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RestrictionsSubcommand {
    /// List restrictions of a repository
    #[command(visible_alias = "ls")]
    List(RepoArgs),

    /// Create a restriction (kind defaults to push)
    Create(CreateRestrictionArgs),

    /// Show a restriction
    Get(RestrictionArgs),

    /// Update a restriction (its kind cannot change)
    Update(UpdateRestrictionArgs),

    /// Delete a restriction
    Delete(RestrictionArgs),
}

#[derive(Args, Debug)]
pub struct RestrictionArgs {
    #[command(flatten)]
    pub target: RepoArgs,

    /// Restriction ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CreateRestrictionArgs {
    #[command(flatten)]
    pub target: RepoArgs,

    /// Parameters as a JSON object
    #[arg(long, short = 'p', default_value = "{}")]
    pub params: String,

    /// Accept an additional restriction kind (repeatable)
    #[arg(long = "allow-kind", action = clap::ArgAction::Append)]
    pub allow_kinds: Vec<String>,
}

#[derive(Args, Debug)]
pub struct UpdateRestrictionArgs {
    #[command(flatten)]
    pub restriction: RestrictionArgs,

    /// Parameters as a JSON object
    #[arg(long, short = 'p')]
    pub params: String,
}

impl RestrictionsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let mut restrictions = client.branch_restrictions();

        let response = match &self.command {
            RestrictionsSubcommand::List(t) => restrictions.all(&t.account, &t.repo).await?,
            RestrictionsSubcommand::Create(args) => {
                restrictions.add_allowed_restriction_types(args.allow_kinds.iter().cloned());
                restrictions
                    .create(&args.target.account, &args.target.repo, args.params.as_str())
                    .await?
            }
            RestrictionsSubcommand::Get(r) => {
                restrictions
                    .get(&r.target.account, &r.target.repo, r.id)
                    .await?
            }
            RestrictionsSubcommand::Update(args) => {
                let r = &args.restriction;
                restrictions
                    .update(&r.target.account, &r.target.repo, r.id, args.params.as_str())
                    .await?
            }
            RestrictionsSubcommand::Delete(r) => {
                restrictions
                    .delete(&r.target.account, &r.target.repo, r.id)
                    .await?
            }
        };
        print_response(response, global)
    }
}
