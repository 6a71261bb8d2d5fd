//! CLI Module
//!
//! Command-line interface for churnwatch using Clap v4.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::client::PredictionClient;
use crate::config::Config;
use crate::schema::CustomerProfile;
use crate::tui::render::risk_summary;

/// churnwatch - Terminal wizard for customer churn risk prediction
#[derive(Parser, Debug)]
#[command(name = "churnwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (verbose log files)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Prediction backend base URL (overrides configuration)
    #[arg(long, global = true, env = "CHURNWATCH_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive wizard (default)
    Wizard,

    /// Run one prediction non-interactively and print the result
    Predict {
        /// JSON file with field overrides merged onto the defaults
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Main CLI entry point. The parsed arguments come from `main`, which needs
/// them first for logging setup.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(backend_url) = cli.backend_url {
        config.backend.base_url = backend_url;
    }
    config.validate()?;

    match cli.command {
        None | Some(Commands::Wizard) => crate::tui::run(&config).await,
        Some(Commands::Predict { input, format }) => cmd_predict(&config, input, format).await,
        Some(Commands::Init { force }) => cmd_init(force),
        Some(Commands::Config) => cmd_config(&config),
    }
}

/// Load configuration from file or defaults
fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()
    }
}

/// One prediction round trip without the TUI
async fn cmd_predict(
    config: &Config,
    input: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let profile = match input {
        Some(path) => profile_from_overrides(&path)?,
        None => CustomerProfile::default(),
    };

    let client = PredictionClient::new(&config.backend.base_url)
        .context("Failed to build prediction client")?;
    let result = client
        .predict(&profile)
        .await
        .context("Prediction request failed")?;

    let summary = risk_summary(&result);
    match format {
        OutputFormat::Text => {
            println!("{}: {} ({})", summary.direction, summary.label, summary.probability);
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "prediction": summary.label,
                "probability": result.probability,
                "high_risk": summary.high_risk,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

/// Build a profile from a JSON object of field overrides, layered on top of
/// the default seed values
fn profile_from_overrides(path: &PathBuf) -> Result<CustomerProfile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {:?}", path))?;
    let overrides: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse input file: {:?}", path))?;
    let serde_json::Value::Object(overrides) = overrides else {
        anyhow::bail!("Input file must contain a JSON object of field overrides");
    };

    let mut merged = serde_json::to_value(CustomerProfile::default())?;
    let base = merged
        .as_object_mut()
        .expect("profile serializes to an object");
    for (key, value) in overrides {
        if !base.contains_key(&key) {
            anyhow::bail!("Unknown field in input file: {}", key);
        }
        base.insert(key, value);
    }

    serde_json::from_value(merged).context("Invalid field value in input file")
}

/// Initialize configuration file
fn cmd_init(force: bool) -> Result<()> {
    let config_path =
        Config::system_config_path().context("Could not determine config directory")?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    let default_config = Config::default();
    default_config.save(&config_path)?;

    println!("Configuration initialized at: {}", config_path.display());
    println!("\nNext steps:");
    println!("   1. Point backend.base_url at your prediction service");
    println!("   2. Run 'churnwatch' to start the wizard");

    Ok(())
}

/// Show configuration
fn cmd_config(config: &Config) -> Result<()> {
    println!("churnwatch configuration\n");
    println!("Backend URL: {}", config.backend.base_url);
    println!("Log level:   {}", config.logging.level);
    if let Some(ref dir) = config.logging.dir {
        println!("Log dir:     {}", dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_overrides_merge_onto_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tenure": 2, "Contract": "Two year"}}"#).unwrap();

        let profile = profile_from_overrides(&file.path().to_path_buf()).unwrap();
        assert_eq!(profile.tenure, 2.0);
        assert_eq!(profile.contract, "Two year");
        // Untouched fields keep their seed values
        assert_eq!(profile.gender, "Male");
        assert_eq!(profile.monthly_charges, 70.0);
    }

    #[test]
    fn test_unknown_override_key_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"NotAField": 1}}"#).unwrap();
        assert!(profile_from_overrides(&file.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_non_object_input_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();
        assert!(profile_from_overrides(&file.path().to_path_buf()).is_err());
    }
}
