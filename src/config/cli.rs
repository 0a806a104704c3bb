use crate::config::toml_config::TomlConfig;
use crate::config::GateConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "signup-guard")]
#[command(about = "Run the sign-up domain and reCAPTCHA checks locally")]
pub struct CliConfig {
    /// Optional TOML file layered over the environment
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding documents as `<path>.json`
    #[arg(long, global = true, default_value = "./documents")]
    pub documents_dir: String,

    /// Override the verification endpoint
    #[arg(long, global = true)]
    pub verify_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check an email address against the allow-list
    CheckEmail { email: String },

    /// Verify a reCAPTCHA token
    Verify {
        token: String,
        #[arg(long)]
        action: Option<String>,
    },

    /// Dispatch a raw JSON event read from a file, or stdin when omitted
    Event { path: Option<String> },
}

impl CliConfig {
    /// Environment first, then the TOML file, then command-line flags.
    pub fn gate_config(&self) -> Result<GateConfig> {
        let mut config = GateConfig::from_env()?;

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?.apply_to(&mut config);
        }

        if let Some(verify_url) = &self.verify_url {
            config.verify_url = verify_url.clone();
        }

        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("documents_dir", &self.documents_dir)?;
        if let Some(path) = &self.config {
            validate_non_empty_string("config", path)?;
        }
        Ok(())
    }
}
