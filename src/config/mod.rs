//! Bootstrap parameters
//!
//! The four values substituted into the cloud-config template, plus the
//! layered overrides they are resolved from.

pub mod loader;

pub use loader::{load_params_file, resolve_params};

use crate::BootstrapError;
use serde::Deserialize;

/// Fully resolved parameters for one rendering
///
/// Every field is guaranteed present. Content is not validated: an invalid
/// IP or domain is rendered as-is, and values are not quoted for YAML or
/// shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapParams {
    /// Nameserver prepended to the DHCP client's resolver list
    pub nameserver: String,
    /// Lab domain, used as search domain and hostname suffix
    pub lab_domain: String,
    /// Default user created on the instance
    pub username: String,
    /// Marker appended to the cloud-init output log once provisioning is done
    pub up: String,
}

impl BootstrapParams {
    pub fn new(
        nameserver: impl Into<String>,
        lab_domain: impl Into<String>,
        username: impl Into<String>,
        up: impl Into<String>,
    ) -> Self {
        Self {
            nameserver: nameserver.into(),
            lab_domain: lab_domain.into(),
            username: username.into(),
            up: up.into(),
        }
    }

    /// Fail with the first empty field, in template order
    pub fn ensure_complete(&self) -> Result<(), BootstrapError> {
        for (name, value) in self.fields() {
            if value.is_empty() {
                return Err(BootstrapError::MissingParameter(name));
            }
        }
        Ok(())
    }

    /// Field names paired with their values, in template order
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("nameserver", &self.nameserver),
            ("lab_domain", &self.lab_domain),
            ("username", &self.username),
            ("up", &self.up),
        ]
    }
}

/// Partially specified parameters from a single source
///
/// Parameter files, environment variables and command-line flags each
/// produce one of these; they are merged and then resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamOverrides {
    pub nameserver: Option<String>,
    pub lab_domain: Option<String>,
    pub username: Option<String>,
    pub up: Option<String>,
}

impl ParamOverrides {
    /// Parse overrides from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Layer `higher` on top of `self`; set fields in `higher` win
    pub fn merge(self, higher: ParamOverrides) -> Self {
        Self {
            nameserver: higher.nameserver.or(self.nameserver),
            lab_domain: higher.lab_domain.or(self.lab_domain),
            username: higher.username.or(self.username),
            up: higher.up.or(self.up),
        }
    }

    /// Resolve into complete parameters
    ///
    /// Absent and empty fields are both reported as missing.
    pub fn resolve(self) -> Result<BootstrapParams, BootstrapError> {
        let params = BootstrapParams {
            nameserver: required("nameserver", self.nameserver)?,
            lab_domain: required("lab_domain", self.lab_domain)?,
            username: required("username", self.username)?,
            up: required("up", self.up)?,
        };
        Ok(params)
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, BootstrapError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BootstrapError::MissingParameter(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ParamOverrides {
        ParamOverrides {
            nameserver: Some("10.0.0.1".to_string()),
            lab_domain: Some("lab.example.com".to_string()),
            username: Some("opuser".to_string()),
            up: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_resolve_complete() {
        let params = full().resolve().unwrap();
        assert_eq!(
            params,
            BootstrapParams::new("10.0.0.1", "lab.example.com", "opuser", "2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_resolve_reports_first_missing() {
        let overrides = ParamOverrides {
            lab_domain: None,
            up: None,
            ..full()
        };
        match overrides.resolve() {
            Err(BootstrapError::MissingParameter(name)) => assert_eq!(name, "lab_domain"),
            other => panic!("expected MissingParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_is_missing() {
        let overrides = ParamOverrides {
            up: Some(String::new()),
            ..full()
        };
        assert!(matches!(
            overrides.resolve(),
            Err(BootstrapError::MissingParameter("up"))
        ));
    }

    #[test]
    fn test_merge_higher_wins() {
        let file = full();
        let flags = ParamOverrides {
            nameserver: Some("192.168.1.1".to_string()),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.nameserver.as_deref(), Some("192.168.1.1"));
        assert_eq!(merged.lab_domain.as_deref(), Some("lab.example.com"));
    }

    #[test]
    fn test_merge_none_does_not_clear() {
        let merged = full().merge(ParamOverrides::default());
        assert_eq!(merged, full());
    }

    #[test]
    fn test_from_yaml_partial() {
        let overrides = ParamOverrides::from_yaml("nameserver: 10.0.0.1\nusername: opuser\n").unwrap();
        assert_eq!(overrides.nameserver.as_deref(), Some("10.0.0.1"));
        assert_eq!(overrides.username.as_deref(), Some("opuser"));
        assert!(overrides.lab_domain.is_none());
    }

    #[test]
    fn test_from_yaml_empty() {
        assert_eq!(ParamOverrides::from_yaml("").unwrap(), ParamOverrides::default());
    }

    #[test]
    fn test_from_yaml_unknown_key() {
        assert!(ParamOverrides::from_yaml("hostname: test\n").is_err());
    }

    #[test]
    fn test_ensure_complete() {
        let mut params = full().resolve().unwrap();
        assert!(params.ensure_complete().is_ok());

        params.username.clear();
        assert!(matches!(
            params.ensure_complete(),
            Err(BootstrapError::MissingParameter("username"))
        ));
    }
}
