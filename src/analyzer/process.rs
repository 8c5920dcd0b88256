//! Child process plumbing for external scripts
//!
//! A script receives its whole input as a single JSON argument, writes one
//! JSON document to stdout and reports failures on stderr with a nonzero exit.

use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

use super::AnalyzerError;

/// How to launch one script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub program: String,
    /// Arguments placed before the JSON argument (the script path when an
    /// interpreter is configured)
    pub leading_args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// `None` waits for the child however long it runs
    pub timeout: Option<Duration>,
}

impl ScriptCommand {
    /// Run the script with `input` and parse its stdout as JSON.
    ///
    /// The child is killed if the timeout fires or the returned future is
    /// dropped before it exits.
    pub async fn run(&self, input: &Value) -> Result<Value, AnalyzerError> {
        let argument = serde_json::to_string(input).map_err(AnalyzerError::Input)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg(argument)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let child = cmd.spawn().map_err(|source| AnalyzerError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(program = %self.program, ?limit, "script timed out, killing it");
                    return Err(AnalyzerError::Timeout(limit));
                }
            },
            None => child.wait_with_output().await?,
        };

        debug!(
            program = %self.program,
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "script finished"
        );

        if !output.status.success() {
            return Err(AnalyzerError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(AnalyzerError::MalformedOutput)
    }
}
