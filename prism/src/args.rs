use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "prism.toml";

/// Prism chat completion gateway
#[derive(Debug, Parser)]
#[command(name = "prism", about = "OpenAI-compatible chat completion gateway with response hooks")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PRISM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Environment file loaded before configuration
    #[arg(long, default_value = ".env", env = "PRISM_ENV_FILE")]
    pub env_file: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PRISM_LISTEN")]
    pub listen: Option<SocketAddr>,
}

impl Args {
    /// Config file to load, if any
    ///
    /// An explicit path is always used; the default file only when it exists.
    pub fn config_path(&self) -> Option<&Path> {
        match &self.config {
            Some(path) => Some(path),
            None => Some(Path::new(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
        }
    }
}
