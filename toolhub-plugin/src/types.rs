//! Capability type definitions and utilities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grouping used when listing capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Managing remote or local servers
    ServerManagement,
    /// Editing configuration
    Configuration,
    /// Observing health and metrics
    Monitoring,
    /// General purpose tool
    Tool,
    /// Small helpers
    Utility,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 5] = [
        Category::ServerManagement,
        Category::Configuration,
        Category::Monitoring,
        Category::Tool,
        Category::Utility,
    ];

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServerManagement => "server-management",
            Self::Configuration => "configuration",
            Self::Monitoring => "monitoring",
            Self::Tool => "tool",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized || category.as_str().replace('-', "") == normalized)
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

/// Capability version with semantic versioning
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityVersion(pub semver::Version);

impl CapabilityVersion {
    /// Create a new capability version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Create from string
    pub fn parse(s: &str) -> Result<Self, semver::Error> {
        semver::Version::parse(s).map(Self)
    }
}

impl fmt::Display for CapabilityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_version() {
        let version = CapabilityVersion::new(1, 2, 3);
        assert_eq!(version.to_string(), "1.2.3");

        let parsed = CapabilityVersion::parse("2.0.0-beta.1").unwrap();
        assert_eq!(parsed.0.major, 2);
        assert!(parsed < CapabilityVersion::new(2, 0, 0));
        assert!(CapabilityVersion::parse("two").is_err());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::ServerManagement.to_string(), "server-management");
        assert_eq!(Category::Tool.to_string(), "tool");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("monitoring".parse::<Category>().unwrap(), Category::Monitoring);
        assert_eq!("Server_Management".parse::<Category>().unwrap(), Category::ServerManagement);
        assert_eq!("servermanagement".parse::<Category>().unwrap(), Category::ServerManagement);
        assert!("storage".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::ServerManagement).unwrap();
        assert_eq!(json, "\"server-management\"");
    }
}
