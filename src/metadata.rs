//! Instance metadata service access
//!
//! Fetches the two values lab hostnames are derived from: the metadata
//! `hostname` and `local-ipv4`. The versioned path is served by EC2 and by
//! OpenStack's EC2-compatible metadata API.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{BootstrapError, hostname::derive_hostname};

/// Metadata service base URL (link-local address)
pub const METADATA_BASE_URL: &str = "http://169.254.169.254";

/// Versioned metadata path prefix
pub const METADATA_PATH: &str = "/2009-04-04/meta-data";

/// Full metadata URL for a base URL
pub fn metadata_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), METADATA_PATH)
}

/// Source of the metadata values a lab hostname is derived from
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name of this source, for logging
    fn name(&self) -> &'static str;

    /// The hostname reported by the platform
    async fn hostname(&self) -> Result<String, BootstrapError>;

    /// The instance's private IPv4 address
    async fn local_ipv4(&self) -> Result<String, BootstrapError>;
}

/// HTTP client for the instance metadata service
pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    /// Client for the default link-local metadata service
    pub fn new() -> Result<Self, BootstrapError> {
        Self::with_base_url(METADATA_BASE_URL)
    }

    /// Client for a metadata service at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, BootstrapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn fetch_metadata_path(&self, path: &str) -> Result<String, BootstrapError> {
        let url = format!("{}/{}", metadata_url(&self.base_url), path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(response.text().await?.trim().to_string())
        } else {
            Err(BootstrapError::Metadata(format!(
                "failed to fetch {}: {}",
                path,
                response.status()
            )))
        }
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    fn name(&self) -> &'static str {
        "metadata-service"
    }

    async fn hostname(&self) -> Result<String, BootstrapError> {
        self.fetch_metadata_path("hostname").await
    }

    async fn local_ipv4(&self) -> Result<String, BootstrapError> {
        self.fetch_metadata_path("local-ipv4").await
    }
}

/// Metadata values supplied up front instead of fetched
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    pub hostname: String,
    pub local_ipv4: String,
}

#[async_trait]
impl MetadataSource for StaticMetadata {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn hostname(&self) -> Result<String, BootstrapError> {
        Ok(self.hostname.clone())
    }

    async fn local_ipv4(&self) -> Result<String, BootstrapError> {
        Ok(self.local_ipv4.clone())
    }
}

/// Derive the lab hostname from a metadata source
///
/// A value that can't be fetched is treated as empty, so the other one can
/// still produce a name.
pub async fn lab_hostname(
    source: &dyn MetadataSource,
    lab_domain: &str,
) -> Result<String, BootstrapError> {
    let local_ipv4 = source.local_ipv4().await.unwrap_or_else(|e| {
        warn!("{}: local-ipv4 unavailable: {}", source.name(), e);
        String::new()
    });
    let hostname = source.hostname().await.unwrap_or_else(|e| {
        warn!("{}: hostname unavailable: {}", source.name(), e);
        String::new()
    });

    derive_hostname(&hostname, &local_ipv4, lab_domain).ok_or_else(|| {
        BootstrapError::Metadata(format!(
            "no usable hostname from {} (hostname: {:?}, local-ipv4: {:?})",
            source.name(),
            hostname,
            local_ipv4
        ))
    })
}
