//
//  bitbucket-api
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue and issue comment commands

use std::fs;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use super::repo::RepoArgs;
use super::{print_response, GlobalOptions};
use crate::api::{ParamMap, Params};

/// Manage issues
#[derive(Args, Debug)]
pub struct IssuesCommand {
    #[command(subcommand)]
    pub command: IssuesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssuesSubcommand {
    /// List issues
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View an issue
    #[command(visible_alias = "view")]
    Get(IssueArgs),

    /// Create an issue
    Create(CreateArgs),

    /// Update an issue
    #[command(visible_alias = "edit")]
    Update(UpdateArgs),

    /// Delete an issue
    Delete(IssueArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: RepoArgs,

    /// Query filter, e.g. 'state="new"'
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Sort field, e.g. -updated_on
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args, Debug)]
pub struct IssueArgs {
    #[command(flatten)]
    pub target: RepoArgs,

    /// Issue ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: RepoArgs,

    /// Issue title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Issue body (raw markup)
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Priority
    #[arg(long, value_parser = ["trivial", "minor", "major", "critical", "blocker"])]
    pub priority: Option<String>,

    /// Kind
    #[arg(long, short = 'k', value_parser = ["bug", "enhancement", "proposal", "task"])]
    pub kind: Option<String>,

    /// Additional parameters as a JSON object
    #[arg(long, short = 'p', default_value = "{}")]
    pub params: String,
}

impl CreateArgs {
    /// Merges the dedicated flags over `--params`.
    fn to_params(&self) -> Result<ParamMap> {
        let mut params = Params::from(self.params.as_str()).into_map()?;
        if let Some(title) = &self.title {
            params.insert("title".to_string(), json!(title));
        }
        if let Some(body) = &self.body {
            params.insert("content".to_string(), json!({ "raw": body }));
        }
        if let Some(priority) = &self.priority {
            params.insert("priority".to_string(), json!(priority));
        }
        if let Some(kind) = &self.kind {
            params.insert("kind".to_string(), json!(kind));
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub issue: IssueArgs,

    /// Parameters as a JSON object
    #[arg(long, short = 'p')]
    pub params: String,
}

impl IssuesCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let issues = client.issues();

        let response = match &self.command {
            IssuesSubcommand::List(args) => {
                let mut query = Vec::new();
                if let Some(q) = &args.query {
                    query.push(("q", q.as_str()));
                }
                if let Some(sort) = &args.sort {
                    query.push(("sort", sort.as_str()));
                }
                issues
                    .all(&args.target.account, &args.target.repo, &query)
                    .await?
            }
            IssuesSubcommand::Get(i) => issues.get(&i.target.account, &i.target.repo, i.id).await?,
            IssuesSubcommand::Create(args) => {
                issues
                    .create(&args.target.account, &args.target.repo, args.to_params()?)
                    .await?
            }
            IssuesSubcommand::Update(args) => {
                let i = &args.issue;
                issues
                    .update(&i.target.account, &i.target.repo, i.id, args.params.as_str())
                    .await?
            }
            IssuesSubcommand::Delete(i) => {
                issues
                    .delete(&i.target.account, &i.target.repo, i.id)
                    .await?
            }
        };
        print_response(response, global)
    }
}

/// Manage issue comments
#[derive(Args, Debug)]
pub struct CommentsCommand {
    #[command(subcommand)]
    pub command: CommentsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentsSubcommand {
    /// List comments on an issue
    #[command(visible_alias = "ls")]
    List(IssueArgs),

    /// Show a comment
    Get(CommentArgs),

    /// Comment on an issue
    Create(CreateCommentArgs),

    /// Edit a comment
    Update(UpdateCommentArgs),
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub issue: IssueArgs,

    /// Comment ID
    pub comment_id: u64,
}

/// Comment text, inline or from a file (`-` for stdin)
#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Comment text
    #[arg(long, short = 'b', conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read comment text from file
    #[arg(long, short = 'F')]
    pub body_file: Option<String>,
}

impl ContentArgs {
    fn content(&self) -> Result<String> {
        match (&self.body, &self.body_file) {
            (Some(body), _) => Ok(body.clone()),
            (None, Some(path)) if path == "-" => {
                let mut buffer = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
                Ok(buffer)
            }
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path)),
            (None, None) => bail!("Either --body or --body-file is required"),
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateCommentArgs {
    #[command(flatten)]
    pub issue: IssueArgs,

    #[command(flatten)]
    pub content: ContentArgs,
}

#[derive(Args, Debug)]
pub struct UpdateCommentArgs {
    #[command(flatten)]
    pub comment: CommentArgs,

    #[command(flatten)]
    pub content: ContentArgs,
}

impl CommentsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let comments = client.issues().comments();

        let response = match &self.command {
            CommentsSubcommand::List(i) => {
                comments
                    .all(&i.target.account, &i.target.repo, i.id)
                    .await?
            }
            CommentsSubcommand::Get(c) => {
                let i = &c.issue;
                comments
                    .get(&i.target.account, &i.target.repo, i.id, c.comment_id)
                    .await?
            }
            CommentsSubcommand::Create(args) => {
                let i = &args.issue;
                let content = args.content.content()?;
                comments
                    .create(&i.target.account, &i.target.repo, i.id, &content)
                    .await?
            }
            CommentsSubcommand::Update(args) => {
                let c = &args.comment;
                let i = &c.issue;
                let content = args.content.content()?;
                comments
                    .update(&i.target.account, &i.target.repo, i.id, c.comment_id, &content)
                    .await?
            }
        };
        print_response(response, global)
    }
}
