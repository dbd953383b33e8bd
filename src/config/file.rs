//
//  bitbucket-api
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O
//!
//! Low-level file operations used by [`Config`](super::Config). Write
//! operations create parent directories as needed.

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::{Context, Result};

/// Reads the contents of a configuration file.
///
/// # Errors
///
/// Returns an error naming the path if the file cannot be read.
pub fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

/// Writes content to a configuration file, creating parent directories.
///
/// Existing files are overwritten. On Unix the file is restricted to its
/// owner (`0600`).
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use bitbucket_api::config::write_config_file;
///
/// write_config_file(Path::new("/tmp/bitbucket-api/config.toml"), "[client]\n")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))?;

    Ok(())
}

/// Checks if a configuration file exists.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}
