//! Parameter file loader

use super::{BootstrapParams, ParamOverrides};
use crate::BootstrapError;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Load parameter overrides from a YAML file
///
/// A missing or malformed file is an error.
pub async fn load_params_file(path: impl AsRef<Path>) -> Result<ParamOverrides, BootstrapError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await?;
    let overrides = ParamOverrides::from_yaml(&content)?;
    debug!("Loaded parameters from {}", path.display());
    Ok(overrides)
}

/// Resolve parameters from an optional file layered under `overrides`
///
/// `overrides` carries the command-line flags and environment variables
/// and wins over the file.
pub async fn resolve_params(
    params_file: Option<&Path>,
    overrides: ParamOverrides,
) -> Result<BootstrapParams, BootstrapError> {
    let base = match params_file {
        Some(path) => load_params_file(path).await?,
        None => ParamOverrides::default(),
    };
    base.merge(overrides).resolve()
}
