use std::path::PathBuf;

use clap::Args;
use sdkgen_core::{GeneratorConfig, Result};

/// Flags shared by every generator command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory the client source is written to
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Generator settings in TOML
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Go package name, overrides the config file
    #[arg(long)]
    pub package: Option<String>,

    /// Log at debug level unless SDKGEN_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(package) = self
            .package
            .as_deref()
            .map(str::trim)
            .filter(|package| !package.is_empty())
        {
            config.package = package.to_string();
        }
        Ok(config)
    }
}
