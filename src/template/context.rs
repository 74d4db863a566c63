//! Template context building

use super::{MAX_SESSIONS, OUTPUT_LOG, PACKAGES};
use crate::config::BootstrapParams;
use crate::metadata;
use minijinja::value::Value;
use std::collections::HashMap;

/// Build the template context from bootstrap parameters
///
/// Besides the four parameters, the context carries the fixed values the
/// template shares with the rest of the crate.
pub fn build_context(params: &BootstrapParams) -> HashMap<String, Value> {
    let mut ctx = HashMap::new();

    for (name, value) in params.fields() {
        ctx.insert(name.to_string(), Value::from(value));
    }

    ctx.insert("packages".to_string(), Value::from_serialize(&PACKAGES));
    ctx.insert("output_log".to_string(), Value::from(OUTPUT_LOG));
    ctx.insert("max_sessions".to_string(), Value::from(MAX_SESSIONS));
    ctx.insert(
        "metadata_url".to_string(),
        Value::from(metadata::metadata_url(metadata::METADATA_BASE_URL)),
    );

    ctx
}
