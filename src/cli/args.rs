//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract target-script text from components, rewrite them and
//!   update the dictionary
//! - `init`: Write a default `.i18n-extract.json`

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{API_KEY_ENV, Config, KeyNamingConfig};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Overrides for values read from the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Directory to scan for components (overrides config file, repeatable)
    #[arg(long = "scan-dir", value_name = "DIR")]
    pub scan_dirs: Vec<String>,

    /// Dictionary file path (overrides config file)
    #[arg(long, value_name = "FILE")]
    pub dict_path: Option<String>,

    /// Back up each component before it is processed
    #[arg(long)]
    pub backup: bool,

    /// Append one line per processed file to the run log
    #[arg(long)]
    pub log: bool,

    /// Key-naming service endpoint (keys are derived locally when unset)
    #[arg(long, value_name = "URL")]
    pub key_endpoint: Option<String>,

    /// Bearer credential for the key-naming service
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if !self.scan_dirs.is_empty() {
            config.scan_dirs = self.scan_dirs.clone();
        }
        if let Some(dict_path) = &self.dict_path {
            config.dict_path = dict_path.clone();
        }
        if self.backup {
            config.backup = true;
        }
        if self.log {
            config.generate_log = true;
        }
        if let Some(endpoint) = &self.key_endpoint {
            let naming = config
                .key_naming
                .get_or_insert_with(|| KeyNamingConfig::new(endpoint.clone()));
            naming.endpoint = endpoint.clone();
        }
        if let (Some(api_key), Some(naming)) = (&self.api_key, config.key_naming.as_mut()) {
            naming.api_key = Some(api_key.clone());
        }
    }
}

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract hardcoded text into the dictionary and rewrite it as lookup calls
    Extract(ExtractCommand),
    /// Initialize a new .i18n-extract.json configuration file
    Init,
}
