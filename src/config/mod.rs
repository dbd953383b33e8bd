//
//  bitbucket-api
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads client settings and credentials from a TOML file in the platform
//! config directory, with environment variables layered on top.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bitbucket-api/config.toml`
//! - **macOS**: `~/Library/Application Support/bitbucket-api/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bitbucket-api\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [client]
//! base_url = "https://api.bitbucket.org"
//! api_version = "2.0"
//! timeout = 10
//! verify_peer = true
//!
//! [auth]
//! method = "basic"
//! username = "john"
//! password = "app-password"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `BITBUCKET_BASE_URL` | `client.base_url` |
//! | `BITBUCKET_API_VERSION` | `client.api_version` |
//! | `BITBUCKET_TOKEN` | OAuth credentials |
//! | `BITBUCKET_ACCOUNT` + `BITBUCKET_API_KEY` | API key credentials |
//! | `BITBUCKET_USERNAME` + `BITBUCKET_PASSWORD` | Basic credentials |
//!
//! When several credential variables are set, the token wins, then the API
//! key, then Basic.

mod file;

pub use file::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{ApiVersion, BitbucketClient, ClientOptions, TransportOptions, DEFAULT_BASE_URL};
use crate::auth::AuthCredential;

/// Top-level configuration.
///
/// # Examples
///
/// ```rust
/// use bitbucket_api::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.client.api_version, "2.0");
/// assert!(config.auth.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Connection settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Stored credentials, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

/// Connection settings for the HTTP client.
///
/// | Field | Default |
/// |-------|---------|
/// | `base_url` | `https://api.bitbucket.org` |
/// | `api_version` | `"2.0"` |
/// | `timeout` | `10` (seconds) |
/// | `verify_peer` | `true` |
/// | `user_agent` | `None` (uses `bitbucket-api/<version>`) |
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base endpoint, without the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default API version (`1.0` or `2.0`).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Verify TLS certificates.
    #[serde(default = "default_verify_peer")]
    pub verify_peer: bool,

    /// Custom `User-Agent` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    ApiVersion::default().to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_verify_peer() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout: default_timeout(),
            verify_peer: default_verify_peer(),
            user_agent: None,
        }
    }
}

/// Stored credentials, tagged by `method`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AuthConfig {
    /// `method = "basic"`
    Basic {
        /// Bitbucket username
        username: String,
        /// Password or app password
        password: String,
    },
    /// `method = "oauth"`
    #[serde(rename = "oauth")]
    OAuth {
        /// OAuth 2.0 access token
        access_token: String,
        /// Optional refresh token
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refresh_token: Option<String>,
    },
    /// `method = "api_key"`
    ApiKey {
        /// Team or individual account owning the key
        account: String,
        /// The API key
        key: String,
    },
}

impl AuthConfig {
    /// Converts the stored credentials into an authentication strategy.
    pub fn credential(&self) -> AuthCredential {
        match self {
            Self::Basic { username, password } => AuthCredential::basic(username, password),
            Self::OAuth {
                access_token,
                refresh_token,
            } => AuthCredential::OAuth {
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
                expires_at: None,
            },
            Self::ApiKey { account, key } => AuthCredential::api_key(account, key),
        }
    }
}

impl Config {
    /// Loads the configuration from the default location and applies
    /// environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bitbucket_api::config::Config;
    ///
    /// let client = Config::load()?.build_client()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Loads the configuration from `path` without environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if only one half of a credential pair is present.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(base_url) = get("BITBUCKET_BASE_URL") {
            self.client.base_url = base_url;
        }
        if let Some(version) = get("BITBUCKET_API_VERSION") {
            self.client.api_version = version;
        }

        let basic = pair(
            get("BITBUCKET_USERNAME"),
            get("BITBUCKET_PASSWORD"),
            "BITBUCKET_USERNAME",
            "BITBUCKET_PASSWORD",
        )?;
        let api_key = pair(
            get("BITBUCKET_ACCOUNT"),
            get("BITBUCKET_API_KEY"),
            "BITBUCKET_ACCOUNT",
            "BITBUCKET_API_KEY",
        )?;

        if let Some(access_token) = get("BITBUCKET_TOKEN") {
            self.auth = Some(AuthConfig::OAuth {
                access_token,
                refresh_token: None,
            });
        } else if let Some((account, key)) = api_key {
            self.auth = Some(AuthConfig::ApiKey { account, key });
        } else if let Some((username, password)) = basic {
            self.auth = Some(AuthConfig::Basic { username, password });
        }

        Ok(())
    }

    /// Converts the connection settings into [`ClientOptions`].
    ///
    /// # Errors
    ///
    /// Returns an error if `api_version` is not supported.
    pub fn client_options(&self) -> Result<ClientOptions> {
        let api_version: ApiVersion = self
            .client
            .api_version
            .parse()
            .context("Invalid api_version in configuration")?;

        let mut transport = TransportOptions {
            timeout: Duration::from_secs(self.client.timeout),
            verify_peer: self.client.verify_peer,
            ..Default::default()
        };
        if let Some(user_agent) = &self.client.user_agent {
            transport.user_agent = user_agent.clone();
        }

        Ok(ClientOptions {
            base_url: self.client.base_url.clone(),
            api_version,
            transport,
        })
    }

    /// Builds a client with these settings and credentials.
    pub fn build_client(&self) -> Result<BitbucketClient> {
        let client = BitbucketClient::with_options(self.client_options()?)
            .context("Failed to create Bitbucket client")?;

        Ok(match &self.auth {
            Some(auth) => client.with_auth(auth.credential()),
            None => client,
        })
    }
}

fn pair(
    first: Option<String>,
    second: Option<String>,
    first_name: &str,
    second_name: &str,
) -> Result<Option<(String, String)>> {
    match (first, second) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        (Some(_), None) => bail!("{} is set but {} is not", first_name, second_name),
        (None, Some(_)) => bail!("{} is set but {} is not", second_name, first_name),
    }
}
