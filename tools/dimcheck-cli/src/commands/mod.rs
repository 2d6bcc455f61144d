//! CLI command implementations.

pub mod config;
pub mod scan;

use clap::{Args, Subcommand};
use dimcheck_catalog::Attribute;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Store URL (overrides config and DIMCHECK_URL).
    #[arg(long)]
    pub url: Option<String>,

    /// REST API consumer key.
    #[arg(long)]
    pub key: Option<String>,

    /// REST API consumer secret.
    #[arg(long)]
    pub secret: Option<String>,

    /// Only report these attributes (comma-separated: weight,height,width,length).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<Attribute>,

    /// Stop after this many pages of 100 products.
    #[arg(long, conflicts_with = "no_limit")]
    pub max_pages: Option<u32>,

    /// Scan until the store returns an empty page, however long that takes.
    #[arg(long)]
    pub no_limit: bool,

    /// Exit with status 2 when any product is missing a reported attribute.
    #[arg(long)]
    pub fail_on_missing: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration (secret masked).
    Show,
    /// Create a config file, prompting for store details.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
