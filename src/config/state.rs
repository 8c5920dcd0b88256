// Application state module
// Holds the loaded configuration and the request dispatcher shared by all connections

use chrono::{DateTime, Utc};

use super::types::Config;
use crate::dispatch::{DispatchError, Dispatcher};

/// Application state
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build state with the production dataset client and script analyzers
    pub fn new(config: &Config) -> Result<Self, DispatchError> {
        let dispatcher = Dispatcher::from_config(config)?;
        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Build state around an already constructed dispatcher
    pub fn with_dispatcher(config: &Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: config.clone(),
            dispatcher,
            started_at: Utc::now(),
        }
    }
}
