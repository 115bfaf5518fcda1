//! Manifest loading
//!
//! Reads the three input files synthesis consumes: the deployment
//! document, optional default settings and the known-network catalogue.
//! The on-disk format follows the file extension (`.toml`, `.json`,
//! `.yaml`/`.yml`). Defaults may also be discovered under the user-level
//! config directory; either way the resolver only ever sees explicit
//! values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;

use crate::domain::{DefaultSettings, DeploymentDoc, StaticNetworkIndex};

/// Reads a deployment document from a file
pub fn read_deployment(path: &Path) -> Result<DeploymentDoc> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read deployment document: {}", path.display()))?;

    parse(path, &content)
        .with_context(|| format!("Failed to parse deployment document: {}", path.display()))
}

/// Loads default settings
///
/// An explicit path wins; otherwise `defaults.toml` under the user config
/// directory is used when present, else the built-in baseline. A partial
/// defaults file overrides only the keys it names.
pub fn read_defaults(path: Option<&Path>) -> Result<DefaultSettings> {
    if let Some(path) = path {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read defaults: {}", path.display()))?;
        return parse(path, &content)
            .with_context(|| format!("Failed to parse defaults: {}", path.display()));
    }

    let user_path = match user_config_dir() {
        Some(dir) => dir.join("defaults.toml"),
        None => return Ok(DefaultSettings::default()),
    };
    if !user_path.exists() {
        return Ok(DefaultSettings::default());
    }

    let content = fs::read_to_string(&user_path)
        .with_context(|| format!("Failed to read defaults: {}", user_path.display()))?;
    parse(&user_path, &content)
        .with_context(|| format!("Failed to parse defaults: {}", user_path.display()))
}

/// Loads the known-network catalogue; no file means no known networks
pub fn read_networks(path: Option<&Path>) -> Result<StaticNetworkIndex> {
    let Some(path) = path else {
        return Ok(StaticNetworkIndex::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read networks file: {}", path.display()))?;
    parse(path, &content)
        .with_context(|| format!("Failed to parse networks file: {}", path.display()))
}

/// Returns the user-level config directory
pub fn user_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "stackplan", "stackplan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Parses file content in the format the extension names
fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        "" => bail!("missing file extension (expected .toml, .json, .yaml or .yml)"),
        other => bail!("unsupported format '.{other}' (expected .toml, .json, .yaml or .yml)"),
    }
}
