//! lab-bootstrap - render cloud-config user-data for lab nodes

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

use lab_bootstrap::config::resolve_params;
use lab_bootstrap::metadata::{self, MetadataClient, MetadataSource, StaticMetadata};
use lab_bootstrap::{BootstrapDocument, Encoding, ParamOverrides, render_user_data};

#[derive(Parser)]
#[command(name = "lab-bootstrap")]
#[command(author, version, about = "Render cloud-config user-data for lab nodes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the bootstrap user-data
    Render {
        /// YAML file with default parameter values
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Nameserver prepended to the DHCP resolver list
        #[arg(long, env = "LAB_BOOTSTRAP_NAMESERVER")]
        nameserver: Option<String>,

        /// Lab domain (search domain and hostname suffix)
        #[arg(long, env = "LAB_BOOTSTRAP_LAB_DOMAIN")]
        lab_domain: Option<String>,

        /// Default user created on the node
        #[arg(long, env = "LAB_BOOTSTRAP_USERNAME")]
        username: Option<String>,

        /// Marker written to the cloud-init log when provisioning completes
        #[arg(long, env = "LAB_BOOTSTRAP_UP")]
        up: Option<String>,

        /// Encoding of the emitted user-data
        #[arg(long, value_enum, default_value_t = EncodingArg::Plain)]
        encoding: EncodingArg,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Derive the lab hostname from instance metadata
    Hostname {
        /// Lab domain used as hostname suffix
        #[arg(long, env = "LAB_BOOTSTRAP_LAB_DOMAIN")]
        lab_domain: String,

        /// Metadata service base URL
        #[arg(long, default_value = metadata::METADATA_BASE_URL)]
        metadata_url: String,

        /// Use this metadata hostname instead of querying the service
        #[arg(long)]
        metadata_hostname: Option<String>,

        /// Use this private IPv4 address instead of querying the service
        #[arg(long)]
        local_ipv4: Option<String>,
    },
    /// Summarize a rendered user-data file
    Inspect {
        /// Path to the rendered cloud-config
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Plain,
    Base64,
    GzipBase64,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Plain => Encoding::Plain,
            EncodingArg::Base64 => Encoding::Base64,
            EncodingArg::GzipBase64 => Encoding::GzipBase64,
        }
    }
}

fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // stdout carries the rendered document
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Render {
            params_file,
            nameserver,
            lab_domain,
            username,
            up,
            encoding,
            output,
        } => {
            let overrides = ParamOverrides {
                nameserver,
                lab_domain,
                username,
                up,
            };
            let params = resolve_params(params_file.as_deref(), overrides)
                .await
                .with_context(|| match &params_file {
                    Some(path) => format!("failed to resolve parameters (file: {})", path.display()),
                    None => "failed to resolve parameters".to_string(),
                })?;

            let encoding = Encoding::from(encoding);
            let user_data = render_user_data(&params)?;
            let encoded = encoding.encode(&user_data)?;
            debug!("Rendered {} bytes ({})", encoded.len(), encoding);

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &encoded)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Wrote user-data for {} to {}", params.lab_domain, path.display());
                }
                None if encoded.ends_with('\n') => print!("{}", encoded),
                None => println!("{}", encoded),
            }
        }
        Commands::Hostname {
            lab_domain,
            metadata_url,
            metadata_hostname,
            local_ipv4,
        } => {
            let source: Box<dyn MetadataSource> =
                if metadata_hostname.is_some() || local_ipv4.is_some() {
                    Box::new(StaticMetadata {
                        hostname: metadata_hostname.unwrap_or_default(),
                        local_ipv4: local_ipv4.unwrap_or_default(),
                    })
                } else {
                    Box::new(MetadataClient::with_base_url(metadata_url)?)
                };

            debug!("Deriving hostname from {}", source.name());
            let hostname = metadata::lab_hostname(source.as_ref(), &lab_domain).await?;
            println!("{}", hostname);
        }
        Commands::Inspect { path } => {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;

            if !BootstrapDocument::is_cloud_config(&content) {
                warn!("{} has no #cloud-config header", path.display());
            }

            let doc = BootstrapDocument::from_yaml(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            println!("bootcmd: {}", doc.bootcmd.len());
            println!("preserve_hostname: {}", doc.preserve_hostname);
            println!("default_user: {}", doc.default_user());
            println!("packages: {} ({})", doc.packages.len(), doc.packages.join(" "));
            println!("runcmd: {}", doc.runcmd.len());
        }
    }

    Ok(())
}
