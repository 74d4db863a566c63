//! lab-bootstrap library
//!
//! Renders the cloud-config user-data that bootstraps lab test nodes on
//! first boot: DNS/DHCP overrides for the lab nameserver and domain, a
//! hostname derived from instance metadata, a raised sshd session limit,
//! a fixed package set, and a completion marker in the cloud-init log.
//!
//! Rendering is a pure function of [`BootstrapParams`]; everything the
//! document does happens later, when cloud-init on the node interprets it.

pub mod config;
pub mod document;
pub mod encoding;
pub mod hostname;
pub mod metadata;
pub mod template;

mod error;

pub use config::{BootstrapParams, ParamOverrides};
pub use document::BootstrapDocument;
pub use encoding::Encoding;
pub use error::BootstrapError;
pub use template::render_user_data;
