//! Cloud-config user-data rendering
//!
//! Renders the lab bootstrap cloud-config from [`BootstrapParams`] using a
//! Jinja2 template. Substitution is literal: auto-escaping is off and
//! parameter values are inserted as data, never re-parsed as template
//! syntax. Undefined variables are errors.

pub mod context;

pub use context::build_context;

use crate::{BootstrapError, config::BootstrapParams};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::debug;

/// Packages installed on every lab node
pub const PACKAGES: [&str; 4] = ["python", "wget", "git", "ntp"];

/// Log appended to by the package report and the completion marker
pub const OUTPUT_LOG: &str = "/var/log/cloud-init-output.log";

/// sshd `MaxSessions` written by bootcmd
pub const MAX_SESSIONS: u32 = 1000;

const TEMPLATE_NAME: &str = "user-data";

/// The lab bootstrap cloud-config
pub const USER_DATA_TEMPLATE: &str = r##"#cloud-config
bootcmd:
 - apt-get remove --purge -y resolvconf || true
 - echo 'prepend domain-name-servers {{ nameserver }};' | tee -a /etc/dhcp/dhclient.conf
 - echo 'supersede domain-name "{{ lab_domain }}";' | tee -a /etc/dhcp/dhclient.conf
 - ifdown -a ; ifup -a
 - ( o=$(curl --silent --fail {{ metadata_url }}/local-ipv4 | sed -n -e 's/^[0-9]*\.[0-9]*\.\([0-9][0-9]*\)\.\([0-9][0-9]*\)$/\1 \2/p') ; [ -n "$o" ] && printf "%03d%03d.{{ lab_domain }}\n" $o ; curl --silent --fail {{ metadata_url }}/hostname | sed -e 's/[\.-].*//' ) | head -n 1 | tee /etc/hostname
 - hostname $(cat /etc/hostname)
 - ( echo ; echo "MaxSessions {{ max_sessions }}" ) >> /etc/ssh/sshd_config
preserve_hostname: true
system_info:
  default_user:
    name: {{ username }}
packages:
{%- for package in packages %}
 - {{ package }}
{%- endfor %}
runcmd:
 - dpkg -l {{ packages|join(" ") }} >> {{ output_log }}
 - echo >> {{ output_log }} {{ up }}
"##;

/// Render the bootstrap user-data for `params`
///
/// Fails with [`BootstrapError::MissingParameter`] before producing any
/// output if a field is empty.
pub fn render_user_data(params: &BootstrapParams) -> Result<String, BootstrapError> {
    TemplateRenderer::new()?.render(params)
}

/// Template renderer holding the parsed bootstrap template
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer for the built-in template
    pub fn new() -> Result<Self, BootstrapError> {
        Self::with_template(USER_DATA_TEMPLATE)
    }

    /// Create a renderer for a custom template
    pub fn with_template(template: &'static str) -> Result<Self, BootstrapError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_template(TEMPLATE_NAME, template)?;
        Ok(Self { env })
    }

    /// Render the template with `params`
    pub fn render(&self, params: &BootstrapParams) -> Result<String, BootstrapError> {
        params.ensure_complete()?;

        debug!("Rendering bootstrap user-data for {}", params.lab_domain);
        let tmpl = self.env.get_template(TEMPLATE_NAME)?;
        let rendered = tmpl.render(build_context(params))?;
        Ok(rendered)
    }
}
