//! Command-line interface argument parsing.

use clap::Parser;

use crate::config::Overrides;

/// Tender dispatcher - routes `action` requests to the tender dataset
/// service or the analysis scripts.
///
/// Examples:
///   tender_dispatch
///   tender_dispatch --config /etc/tender/dispatch --port 9000
///   TENDER__DATASET__TOKEN=hf_xxx tender_dispatch --log-level debug
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path, without extension
    #[arg(short, long, default_value = "config", env = "TENDER_CONFIG")]
    pub config: String,

    /// Override `server.host`
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override `server.port`
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Override `logging.level` (an EnvFilter directive such as `debug` or `tender_dispatch=trace`)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}
