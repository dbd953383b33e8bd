//
//  bitbucket-api
//  cli/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Account commands
//!
//! ## Examples
//!
//! ```bash
//! # The authenticated user
//! bb-api user
//! bb-api user emails
//!
//! # Another account
//! bb-api users get john-doe
//! bb-api users followers john-doe
//!
//! # SSH keys
//! bb-api ssh-keys create john-doe --key-file ~/.ssh/id_ed25519.pub --label "Work Laptop"
//! bb-api ssh-keys delete john-doe 42
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use super::{print_response, GlobalOptions};

/// The authenticated user
#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: Option<UserSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Show the profile (default)
    Get,

    /// List email addresses
    Emails,

    /// Show one email address
    Email {
        /// The email address
        address: String,
    },
}

impl UserCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let user = client.user();

        let response = match &self.command {
            None | Some(UserSubcommand::Get) => user.get().await?,
            Some(UserSubcommand::Emails) => user.emails().await?,
            Some(UserSubcommand::Email { address }) => user.email(address).await?,
        };
        print_response(response, global)
    }
}

/// Public account information
#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// Show an account's public profile
    Get {
        /// Account name
        account: String,
    },

    /// List an account's repositories
    #[command(visible_alias = "repositories")]
    Repos {
        /// Account name
        account: String,
    },

    /// List an account's followers
    Followers {
        /// Account name
        account: String,
    },

    /// List pending invitations of an account (API 1.0)
    Invitations {
        /// Account name
        account: String,

        /// Only the invitation sent to this address
        #[arg(long)]
        email: Option<String>,
    },

    /// Revoke an invitation (API 1.0)
    Uninvite {
        /// Account name
        account: String,

        /// Invited email address
        email: String,
    },
}

impl UsersCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let users = client.users();

        let response = match &self.command {
            UsersSubcommand::Get { account } => users.get(account).await?,
            UsersSubcommand::Repos { account } => users.repositories(account).await?,
            UsersSubcommand::Followers { account } => users.account().followers(account).await?,
            UsersSubcommand::Invitations { account, email } => match email {
                Some(email) => users.invitations().email(account, email).await?,
                None => users.invitations().all(account).await?,
            },
            UsersSubcommand::Uninvite { account, email } => {
                users.invitations().delete(account, email).await?
            }
        };
        print_response(response, global)
    }
}

/// Manage SSH keys of an account
#[derive(Args, Debug)]
pub struct SshKeysCommand {
    #[command(subcommand)]
    pub command: SshKeysSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SshKeysSubcommand {
    /// List SSH keys
    #[command(visible_alias = "ls")]
    List {
        /// Account name
        account: String,
    },

    /// Add an SSH key
    #[command(visible_alias = "add")]
    Create(CreateKeyArgs),

    /// Show an SSH key
    Get {
        /// Account name
        account: String,

        /// Key ID
        key_id: String,
    },

    /// Change the label of an SSH key
    Update {
        /// Account name
        account: String,

        /// Key ID
        key_id: String,

        /// New label
        #[arg(long, short = 'l')]
        label: String,
    },

    /// Delete an SSH key
    Delete {
        /// Account name
        account: String,

        /// Key ID
        key_id: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateKeyArgs {
    /// Account name
    pub account: String,

    /// SSH public key content
    #[arg(long, short = 'k', conflicts_with = "key_file")]
    pub key: Option<String>,

    /// Read key from file
    #[arg(long, short = 'f')]
    pub key_file: Option<String>,

    /// Key label
    #[arg(long, short = 'l')]
    pub label: Option<String>,
}

impl CreateKeyArgs {
    fn key_content(&self) -> Result<String> {
        let key = match (&self.key, &self.key_file) {
            (Some(key), _) => key.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read key file {}", path))?,
            (None, None) => bail!("Either --key or --key-file is required"),
        };
        Ok(key.trim().to_string())
    }
}

impl SshKeysCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let keys = client.users().ssh_keys();

        let response = match &self.command {
            SshKeysSubcommand::List { account } => keys.all(account).await?,
            SshKeysSubcommand::Create(args) => {
                let key = args.key_content()?;
                keys.create(&args.account, &key, args.label.as_deref())
                    .await?
            }
            SshKeysSubcommand::Get { account, key_id } => keys.get(account, key_id).await?,
            SshKeysSubcommand::Update {
                account,
                key_id,
                label,
            } => keys.update(account, key_id, label).await?,
            SshKeysSubcommand::Delete { account, key_id } => keys.delete(account, key_id).await?,
        };
        print_response(response, global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(key: Option<&str>, key_file: Option<String>) -> CreateKeyArgs {
        CreateKeyArgs {
            account: "john-doe".to_string(),
            key: key.map(str::to_string),
            key_file,
            label: None,
        }
    }

    #[test]
    fn test_key_from_flag() {
        let content = args(Some("ssh-ed25519 AAAA "), None).key_content().unwrap();
        assert_eq!(content, "ssh-ed25519 AAAA");
    }

    #[test]
    fn test_key_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ssh-rsa BBBB john@laptop").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let content = args(None, Some(path)).key_content().unwrap();
        assert_eq!(content, "ssh-rsa BBBB john@laptop");
    }

    #[test]
    fn test_key_required() {
        assert!(args(None, None).key_content().is_err());
    }
}
