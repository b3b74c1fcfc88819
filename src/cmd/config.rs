//! Configuration view, validation and scaffolding: `storefront config`.

use anyhow::{Context, Result};
use std::path::Path;

use storefront::config::{StorefrontConfig, StorefrontToml, project_config_path};

use super::super::ConfigCommands;

pub fn cmd_config(
    base_dir: &Path,
    explicit: Option<&Path>,
    config: &StorefrontConfig,
    command: Option<ConfigCommands>,
) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => show(config),
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
            Ok(())
        }
        Some(ConfigCommands::Init) => {
            let path = explicit
                .map(Path::to_path_buf)
                .unwrap_or_else(|| project_config_path(base_dir));

            if path.exists() {
                println!("storefront.toml already exists at {}", path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }

            StorefrontToml::default().save(&path)?;

            println!("Created storefront.toml at {}", path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] host, port, dev_mode");
            println!("  - [client] server_url");
            println!("  - [pricing] unit_price_cents");
            println!("  - [logging] format, dir");
            println!();
            Ok(())
        }
    }
}

fn show(config: &StorefrontConfig) -> Result<()> {
    println!();
    println!("Storefront Configuration");
    println!("========================");
    println!();

    match &config.source {
        Some(path) => println!("Config file: {}", path.display()),
        None => {
            println!("No storefront.toml found, using defaults.");
            println!("Run 'storefront config init' to create one.");
        }
    }
    println!();

    let file = toml::to_string_pretty(&config.toml).context("Failed to render configuration")?;
    println!("{}", file.trim_end());
    println!();

    println!("Effective values (with env/CLI overrides):");
    println!("  host = \"{}\"", config.host());
    println!("  port = {}", config.port());
    println!("  dev_mode = {}", config.dev_mode());
    println!("  server_url = \"{}\"", config.server_url());
    println!("  unit_price = \"{}\"", config.pricing().unit_price());
    println!("  log_format = \"{}\"", config.log_format());
    println!();

    Ok(())
}
