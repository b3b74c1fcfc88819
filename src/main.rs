use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use storefront::config::{StorefrontConfig, StorefrontToml};
use storefront::telemetry;

mod cmd;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version, about = "Storefront complaint and order intake")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to storefront.toml (defaults to .storefront/storefront.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Intake server URL for the form commands. Overrides client.server_url.
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the intake server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable dev mode (permissive CORS for a local frontend)
        #[arg(long)]
        dev: bool,
    },
    /// Submit a complaint. Prompts for any field not given as a flag.
    Complain {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        complaint: Option<String>,
    },
    /// Place an order for the product
    Buy {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Number of items (at least 1)
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i64>,
    },
    /// View, validate or create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default storefront.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let base_dir = std::env::current_dir().context("Failed to get current directory")?;

    // `config init` may name a file that does not exist yet.
    let initializing = matches!(
        cli.command,
        Commands::Config {
            command: Some(ConfigCommands::Init)
        }
    );
    let mut config = if initializing {
        StorefrontConfig::from_toml(StorefrontToml::default(), None)
    } else {
        StorefrontConfig::load(cli.config.as_deref(), &base_dir)?
    };
    config.cli_server_url = cli.server.clone();
    config.verbose = cli.verbose;

    let base_directive = match cli.command {
        Commands::Serve { .. } => "storefront=info,tower_http=info",
        _ => "storefront=warn",
    };
    let _log_guard = telemetry::init_tracing(
        config.log_format(),
        &telemetry::default_directive(base_directive, cli.verbose),
        config.log_dir(),
    )?;

    match cli.command {
        Commands::Serve { host, port, dev } => {
            config.cli_host = host;
            config.cli_port = port;
            config.cli_dev_mode = dev;
            cmd::cmd_serve(&config).await?;
        }
        Commands::Complain {
            name,
            phone,
            complaint,
        } => cmd::cmd_complain(&config, name, phone, complaint).await?,
        Commands::Buy {
            name,
            phone,
            quantity,
        } => cmd::cmd_buy(&config, name, phone, quantity).await?,
        Commands::Config { command } => {
            cmd::cmd_config(&base_dir, cli.config.as_deref(), &config, command)?
        }
    }

    Ok(())
}
