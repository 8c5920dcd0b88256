//! External analyzer module
//!
//! Price prediction, supplier matching and tender scraping are opaque
//! scripts. All three are driven through the same [`Analyzer`] capability:
//! JSON in, JSON out, or a structured failure.

mod process;

pub use process::ScriptCommand;

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::ScriptsConfig;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running script: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}", exit_message(*.code, .stderr))]
    Exit { code: Option<i32>, stderr: String },

    #[error("Script produced invalid JSON: {0}")]
    MalformedOutput(#[source] serde_json::Error),

    #[error("Failed to encode script input: {0}")]
    Input(#[source] serde_json::Error),

    #[error("Script timed out after {0:?}")]
    Timeout(Duration),
}

/// The script's own stderr is the message; fall back to the exit status
fn exit_message(code: Option<i32>, stderr: &str) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match code {
        Some(code) => format!("Script exited with code {code}"),
        None => "Script terminated by signal".to_string(),
    }
}

/// Which external worker an analyzer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    PricePredictor,
    SupplierMatcher,
    TenderScraper,
}

impl AnalyzerKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::PricePredictor => "price-predictor",
            Self::SupplierMatcher => "supplier-matcher",
            Self::TenderScraper => "tender-scraper",
        }
    }

    /// Script path configured for this kind
    pub fn script(self, config: &ScriptsConfig) -> &str {
        match self {
            Self::PricePredictor => &config.predict_price,
            Self::SupplierMatcher => &config.match_suppliers,
            Self::TenderScraper => &config.scrape_tenders,
        }
    }
}

impl std::fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Run an external analysis with a JSON input
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, input: &Value) -> Result<Value, AnalyzerError>;
}

/// Analyzer backed by a script on disk
#[derive(Debug, Clone)]
pub struct ScriptAnalyzer {
    kind: AnalyzerKind,
    command: ScriptCommand,
}

impl ScriptAnalyzer {
    pub fn new(kind: AnalyzerKind, config: &ScriptsConfig) -> Self {
        let script = kind.script(config).to_string();
        let (program, leading_args) = match config.interpreter.as_deref() {
            Some(interpreter) if !interpreter.is_empty() => (interpreter.to_string(), vec![script]),
            _ => (script, Vec::new()),
        };
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));

        Self {
            kind,
            command: ScriptCommand {
                program,
                leading_args,
                working_dir: config.working_dir.as_ref().map(PathBuf::from),
                timeout,
            },
        }
    }
}

#[async_trait]
impl Analyzer for ScriptAnalyzer {
    async fn analyze(&self, input: &Value) -> Result<Value, AnalyzerError> {
        tracing::debug!(analyzer = %self.kind, program = %self.command.program, "running analyzer");
        self.command.run(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_runs_script_path() {
        let config = ScriptsConfig::default();
        let analyzer = ScriptAnalyzer::new(AnalyzerKind::SupplierMatcher, &config);
        assert_eq!(analyzer.kind, AnalyzerKind::SupplierMatcher);
        assert_eq!(analyzer.command.program, "python3");
        assert_eq!(
            analyzer.command.leading_args,
            vec!["scripts/supplier_matching.py".to_string()]
        );
        assert_eq!(analyzer.command.timeout, None);
    }

    #[test]
    fn test_direct_execution_without_interpreter() {
        let config = ScriptsConfig {
            interpreter: None,
            timeout_secs: 90,
            working_dir: Some("/srv/tenders".to_string()),
            ..ScriptsConfig::default()
        };
        let analyzer = ScriptAnalyzer::new(AnalyzerKind::TenderScraper, &config);
        assert_eq!(analyzer.command.program, "scripts/tender_scraper.py");
        assert!(analyzer.command.leading_args.is_empty());
        assert_eq!(analyzer.command.timeout, Some(Duration::from_secs(90)));
        assert_eq!(
            analyzer.command.working_dir,
            Some(PathBuf::from("/srv/tenders"))
        );
    }

    #[test]
    fn test_exit_message() {
        assert_eq!(exit_message(Some(1), "boom"), "boom");
        assert_eq!(exit_message(Some(2), ""), "Script exited with code 2");
        assert_eq!(exit_message(None, ""), "Script terminated by signal");
    }
}
