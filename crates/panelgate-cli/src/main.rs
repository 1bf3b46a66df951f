#![deny(unsafe_code)]

//! Panelgate CLI — dual-transport front end for the panel API.
//!
//! On a panel host the commands run against the local binaries; anywhere
//! else they need the panel URL and credentials, from the config file or
//! the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use panelgate_config::AppConfig;
use panelgate_core::{ops, CallContext, HostIdentity, PanelClient};

/// Deadline applied to every panel call the CLI makes. The library itself
/// imposes no timeout; the caller does.
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Panelgate — talk to a hosting panel from its shell or from outside.
#[derive(Parser)]
#[command(name = "panelgate", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "panelgate.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Panel URL (overrides the config file).
    #[arg(long)]
    panel_url: Option<String>,

    /// Panel username (overrides the config file).
    #[arg(long)]
    panel_username: Option<String>,

    /// Panel password (overrides the config file).
    #[arg(long)]
    panel_password: Option<String>,

    /// Access the panel URL without TLS certificate verification.
    #[arg(long)]
    panel_insecure: bool,

    /// Log request targets and raw response bodies.
    #[arg(long)]
    trace_wire: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the environment and verify the account prerequisites.
    Check,

    /// List the account's feature flags.
    Features,

    /// Show the account's domain inventory.
    Domains,

    /// Create a directory under the account's home.
    Mkdir {
        /// Parent directory (e.g. "/home/alice").
        path: String,
        /// Name of the directory to create.
        name: String,
        /// Octal permissions (e.g. "0755").
        permissions: String,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut config = load_config(&cli.config).await?;
    apply_overrides(&mut config, &cli);

    if let Commands::Config { show } = &cli.command {
        return cmd_config(&config, &cli.config, *show);
    }

    let identity = HostIdentity::detect();
    let client = PanelClient::from_config(&config, &identity)?;
    let ctx = CallContext::with_timeout(CALL_TIMEOUT);

    match cli.command {
        Commands::Check => cmd_check(&client, &ctx).await,
        Commands::Features => cmd_features(&client, &ctx).await,
        Commands::Domains => cmd_domains(&client, &ctx).await,
        Commands::Mkdir {
            path,
            name,
            permissions,
        } => cmd_mkdir(&client, &ctx, &path, &name, &permissions).await,
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

async fn cmd_check(client: &PanelClient, ctx: &CallContext) -> Result<()> {
    println!("transport: {}", client.transport_name());
    ops::ensure_issuance_prereqs(client, ctx).await?;
    println!("account prerequisites satisfied (sslinstall, filemanager)");
    Ok(())
}

async fn cmd_features(client: &PanelClient, ctx: &CallContext) -> Result<()> {
    let features = ops::list_features(client, ctx).await?;
    for (name, enabled) in features.iter() {
        println!("{name}: {}", if enabled { "enabled" } else { "disabled" });
    }
    Ok(())
}

async fn cmd_domains(client: &PanelClient, ctx: &CallContext) -> Result<()> {
    let inventory = ops::domains_data(client, ctx).await?;

    print_vhost("main", &inventory.main);
    for entry in &inventory.addons {
        print_vhost("addon", entry);
    }
    for entry in &inventory.subdomains {
        print_vhost("subdomain", entry);
    }
    Ok(())
}

fn print_vhost(kind: &str, entry: &ops::VhostEntry) {
    println!("{kind}: {} -> {}", entry.domain, entry.document_root);
    for alias in entry.server_alias.iter() {
        println!("  alias: {alias}");
    }
}

async fn cmd_mkdir(
    client: &PanelClient,
    ctx: &CallContext,
    path: &str,
    name: &str,
    permissions: &str,
) -> Result<()> {
    ops::mkdir(client, ctx, path, name, permissions).await?;
    println!("created {path}/{name} ({permissions})");
    Ok(())
}

fn cmd_config(config: &AppConfig, config_path: &Path, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(ref url) = cli.panel_url {
        config.panel.url = url.clone();
    }
    if let Some(ref username) = cli.panel_username {
        config.panel.username = username.clone();
    }
    if let Some(ref password) = cli.panel_password {
        config.panel.password = password.clone();
    }
    if cli.panel_insecure {
        config.panel.insecure_tls = true;
    }
    if cli.trace_wire {
        config.panel.trace_wire = true;
    }
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        Ok(AppConfig::load(path).await?)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}
