//! Typed view of a rendered bootstrap cloud-config
//!
//! Used to check rendered user-data structurally (`lab-bootstrap inspect`)
//! rather than by string matching.

use serde::Deserialize;

/// Header marking a document as cloud-config
pub const CLOUD_CONFIG_HEADER: &str = "#cloud-config";

/// The sections of the bootstrap cloud-config
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BootstrapDocument {
    /// Early boot commands
    pub bootcmd: Vec<String>,

    /// Keep cloud-init from resetting the hostname set by bootcmd
    pub preserve_hostname: bool,

    pub system_info: SystemInfo,

    /// Packages to install
    pub packages: Vec<String>,

    /// Late boot commands, run after package installation
    pub runcmd: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub default_user: DefaultUser,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefaultUser {
    pub name: String,
}

impl BootstrapDocument {
    /// Parse a rendered document from YAML
    ///
    /// Parameter values are substituted without YAML quoting, so a value
    /// containing `: ` or ` #` changes the document's structure. Such a
    /// document fails to parse here or parses with the value truncated.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // Strip #cloud-config header if present
        let yaml = yaml
            .trim_start()
            .strip_prefix(CLOUD_CONFIG_HEADER)
            .map(|s| s.trim_start())
            .unwrap_or(yaml);

        serde_yaml::from_str(yaml)
    }

    /// Check if this looks like a cloud-config (starts with #cloud-config)
    pub fn is_cloud_config(data: &str) -> bool {
        data.trim_start().starts_with(CLOUD_CONFIG_HEADER)
    }

    /// Name of the default user
    pub fn default_user(&self) -> &str {
        &self.system_info.default_user.name
    }
}
