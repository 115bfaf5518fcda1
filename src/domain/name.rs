//! Application naming
//!
//! Every resource and output name in a stack derives from the application
//! name, so the name is validated once and the derivations live here.
//! Names must be lowercase: the search backend rejects mixed-case cluster
//! names, and derived names are embedded verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum app name length, so derived resource names stay within
/// provider limits.
const MAX_LEN: usize = 40;

#[derive(Debug, Error, PartialEq)]
pub enum NameError {
    #[error("app name cannot be empty")]
    Empty,

    #[error("app name '{0}' must start with a lowercase letter")]
    InvalidStart(String),

    #[error("app name '{0}' may only contain lowercase letters, digits and hyphens")]
    InvalidChar(String),

    #[error("app name '{0}' is too long ({1} characters, maximum {MAX_LEN})")]
    TooLong(String, usize),
}

/// Validated application name: `[a-z][a-z0-9-]*`, at most 40 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppName(String);

impl AppName {
    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derived search cluster name
    pub fn cluster_name(&self) -> String {
        format!("{}-search-cluster", self.0)
    }

    /// Derived master user name for fine-grained access control
    pub fn master_user_name(&self) -> String {
        format!("{}-master-user", self.0)
    }

    /// Derived log group name for the delivery pipeline transport
    pub fn log_group(&self) -> String {
        format!("{}/search-delivery-pipeline", self.0)
    }

    /// Derived log stream name for the delivery pipeline transport
    pub fn log_stream(&self) -> String {
        format!("{}-delivery-stream", self.0)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        if s.len() > MAX_LEN {
            return Err(NameError::TooLong(s.to_string(), s.len()));
        }
        let first = s.chars().next().unwrap_or(' ');
        if !first.is_ascii_lowercase() {
            return Err(NameError::InvalidStart(s.to_string()));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(NameError::InvalidChar(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for AppName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AppName> for String {
    fn from(name: AppName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_names() {
        let name: AppName = "acme-logs2".parse().unwrap();
        assert_eq!(name.as_str(), "acme-logs2");
        assert_eq!(name.to_string(), "acme-logs2");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let name: AppName = "  acme  ".parse().unwrap();
        assert_eq!(name.as_str(), "acme");
    }

    #[test]
    fn rejects_empty() {
        let err = "".parse::<AppName>().unwrap_err();
        assert_eq!(err, NameError::Empty);
    }

    #[test]
    fn rejects_uppercase() {
        let err = "Acme".parse::<AppName>().unwrap_err();
        assert!(matches!(err, NameError::InvalidStart(_)));

        let err = "acMe".parse::<AppName>().unwrap_err();
        assert!(matches!(err, NameError::InvalidChar(_)));
    }

    #[test]
    fn rejects_leading_digit_or_hyphen() {
        assert!(matches!(
            "9lives".parse::<AppName>(),
            Err(NameError::InvalidStart(_))
        ));
        assert!(matches!(
            "-acme".parse::<AppName>(),
            Err(NameError::InvalidStart(_))
        ));
    }

    #[test]
    fn rejects_other_characters() {
        assert!(matches!(
            "acme_logs".parse::<AppName>(),
            Err(NameError::InvalidChar(_))
        ));
        assert!(matches!(
            "acme.logs".parse::<AppName>(),
            Err(NameError::InvalidChar(_))
        ));
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "a".repeat(41);
        assert!(matches!(long.parse::<AppName>(), Err(NameError::TooLong(_, 41))));

        let just_fits = "a".repeat(40);
        assert!(just_fits.parse::<AppName>().is_ok());
    }

    #[test]
    fn derived_names() {
        let name: AppName = "acme".parse().unwrap();
        assert_eq!(name.cluster_name(), "acme-search-cluster");
        assert_eq!(name.master_user_name(), "acme-master-user");
        assert_eq!(name.log_group(), "acme/search-delivery-pipeline");
        assert_eq!(name.log_stream(), "acme-delivery-stream");
    }

    #[test]
    fn serde_uses_string_form() {
        let name: AppName = "acme".parse().unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"acme\"");

        let parsed: AppName = serde_json::from_str("\"acme\"").unwrap();
        assert_eq!(parsed, name);

        assert!(serde_json::from_str::<AppName>("\"Not Valid\"").is_err());
    }
}
