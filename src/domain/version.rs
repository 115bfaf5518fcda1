//! Search engine version resolution
//!
//! Version strings resolve leniently: a recognized token maps to its
//! engine version, anything else falls back to the latest known version
//! rather than failing. Contrast with subnet classes, where an unknown
//! token is a hard failure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A known search engine version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
}

impl EngineVersion {
    /// The latest version known to this tool, used as the fallback
    pub const LATEST: EngineVersion = EngineVersion::V1_3;

    /// Resolves a version token, falling back to [`Self::LATEST`]
    /// for anything unrecognized
    pub fn resolve(token: &str) -> Self {
        match token.trim() {
            "1" | "1.0" => EngineVersion::V1_0,
            "1.1" => EngineVersion::V1_1,
            "1.2" => EngineVersion::V1_2,
            "1.3" => EngineVersion::V1_3,
            _ => Self::LATEST,
        }
    }

    /// Returns the version string as the backend expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineVersion::V1_0 => "1.0",
            EngineVersion::V1_1 => "1.1",
            EngineVersion::V1_2 => "1.2",
            EngineVersion::V1_3 => "1.3",
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
