use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doctour_core::DemoConfig;

/// Connection overrides shared by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Config file (default: ~/.doctour/config.toml)
    #[arg(long, global = true, env = "DOCTOUR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// MongoDB connection string
    #[arg(long, global = true, value_name = "URI")]
    pub uri: Option<String>,

    /// Database name
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Collection name
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Connect timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl StoreArgs {
    /// Load config (file + env) then apply flags on top
    pub fn resolve(&self) -> Result<DemoConfig> {
        let mut config = DemoConfig::load(self.config.as_deref()).with_context(|| {
            format!(
                "Failed to load config from {:?}",
                self.config.clone().unwrap_or_else(DemoConfig::config_path)
            )
        })?;
        self.apply(&mut config);
        config.store.validate().context("Invalid store settings")?;
        Ok(config)
    }

    fn apply(&self, config: &mut DemoConfig) {
        if let Some(ref uri) = self.uri {
            config.store.uri = uri.clone();
        }
        if let Some(ref database) = self.database {
            config.store.database = database.clone();
        }
        if let Some(ref collection) = self.collection {
            config.store.collection = collection.clone();
        }
        if let Some(timeout) = self.timeout {
            config.store.connect_timeout_secs = timeout;
        }
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the resolved config (password masked)
    Show,
    /// Write a config file with default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, store: &StoreArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(store),
        ConfigCommands::Show => run_show(store),
        ConfigCommands::Init(init) => run_init(init, store),
    }
}

fn target_path(store: &StoreArgs) -> PathBuf {
    store.config.clone().unwrap_or_else(DemoConfig::config_path)
}

fn run_path(store: &StoreArgs) -> Result<()> {
    println!("{}", target_path(store).display());
    Ok(())
}

fn run_show(store: &StoreArgs) -> Result<()> {
    let mut config = store.resolve()?;
    config.store.uri = config.store.redacted_uri();

    let toml_str =
        toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);
    Ok(())
}

fn run_init(args: InitArgs, store: &StoreArgs) -> Result<()> {
    let path = target_path(store);

    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    DemoConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    println!("✅ Created config at: {:?}", path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", path);
    println!("  2. Point store.uri at your server");
    println!("  3. Run: doctour ping");

    Ok(())
}
