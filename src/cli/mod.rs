//
//  bitbucket-api
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod issue;
mod repo;
mod users;

pub use api::ApiCommand;
pub use issue::{CommentsCommand, IssuesCommand};
pub use repo::{RepoCommand, RestrictionsCommand};
pub use users::{SshKeysCommand, UserCommand, UsersCommand};

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use serde_json::Value;

use crate::api::{ApiResponse, BitbucketClient};
use crate::config::{AuthConfig, Config};

/// bb-api - Call the Bitbucket REST API from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bb-api",
    version,
    about = "Call the Bitbucket REST API from the command line",
    long_about = "bb-api exposes the bitbucket-api client library as commands.\n\n\
                  Responses are printed as returned by the server; JSON is pretty-printed.",
    propagate_version = true,
    after_help = "Use 'bb-api <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
///
/// Flags win over environment variables, which win over the config file.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// API base URL (e.g., https://api.bitbucket.org)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Default API version (1.0 or 2.0)
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Username for Basic authentication
    #[arg(long, short = 'u', global = true, requires = "password")]
    pub username: Option<String>,

    /// Password or app password for Basic authentication
    #[arg(long, global = true, requires = "username")]
    pub password: Option<String>,

    /// OAuth 2.0 access token
    #[arg(long, global = true, conflicts_with_all = ["username", "api_key"])]
    pub token: Option<String>,

    /// API key (requires --account)
    #[arg(long, global = true, requires = "key_account")]
    pub api_key: Option<String>,

    /// Account owning the API key
    #[arg(long = "account", global = true, requires = "api_key")]
    pub key_account: Option<String>,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the HTTP status line before the body
    #[arg(long, short = 'i', global = true)]
    pub include: bool,
}

impl GlobalOptions {
    /// Resolves the effective configuration: file, then environment, then flags.
    pub fn resolve_config(&self) -> Result<Config> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };

        let mut config = Config::load_from(&path)?;
        config.apply_env()?;
        self.apply_to(&mut config);
        Ok(config)
    }

    fn apply_to(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.client.base_url = base_url.clone();
        }
        if let Some(version) = &self.api_version {
            config.client.api_version = version.clone();
        }

        if let Some(token) = &self.token {
            config.auth = Some(AuthConfig::OAuth {
                access_token: token.clone(),
                refresh_token: None,
            });
        } else if let (Some(account), Some(key)) = (&self.key_account, &self.api_key) {
            config.auth = Some(AuthConfig::ApiKey {
                account: account.clone(),
                key: key.clone(),
            });
        } else if let (Some(username), Some(password)) = (&self.username, &self.password) {
            config.auth = Some(AuthConfig::Basic {
                username: username.clone(),
                password: password.clone(),
            });
        }
    }

    /// Builds a client from the effective configuration.
    pub fn client(&self) -> Result<BitbucketClient> {
        self.resolve_config()?.build_client()
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// The authenticated user
    #[command(visible_alias = "me")]
    User(UserCommand),

    /// Public account information
    Users(UsersCommand),

    /// Manage SSH keys of an account
    #[command(name = "ssh-keys")]
    SshKeys(SshKeysCommand),

    /// Manage repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Manage branch restrictions
    Restrictions(RestrictionsCommand),

    /// Manage issues
    #[command(visible_alias = "issue")]
    Issues(IssuesCommand),

    /// Manage issue comments
    Comments(CommentsCommand),

    /// Make raw API requests
    Api(ApiCommand),
}

impl Commands {
    /// Runs the selected command.
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match self {
            Self::User(cmd) => cmd.run(global).await,
            Self::Users(cmd) => cmd.run(global).await,
            Self::SshKeys(cmd) => cmd.run(global).await,
            Self::Repo(cmd) => cmd.run(global).await,
            Self::Restrictions(cmd) => cmd.run(global).await,
            Self::Issues(cmd) => cmd.run(global).await,
            Self::Comments(cmd) => cmd.run(global).await,
            Self::Api(cmd) => cmd.run(global).await,
        }
    }
}

/// Prints a response body and fails on a non-success status.
pub(crate) fn print_response(response: ApiResponse, global: &GlobalOptions) -> Result<()> {
    if global.include {
        println!("{} {}", style("HTTP").dim(), response.status());
        println!();
    }

    let body = format_body(&response)?;
    if !body.is_empty() {
        println!("{}", body);
    }

    response.error_for_status()?;
    Ok(())
}

/// Pretty-prints JSON bodies; anything else is returned as text.
pub(crate) fn format_body(response: &ApiResponse) -> Result<String> {
    let text = response.text();
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json).context("Failed to format response"),
        Err(_) => Ok(text.trim_end().to_string()),
    }
}
