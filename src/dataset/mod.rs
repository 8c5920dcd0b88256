//! Dataset service module
//!
//! The dataset service hosts the tender datasets and answers paged row
//! queries, optionally narrowed by a `where` condition. The router only depends on the [`DatasetService`] trait; the
//! production implementation is [`HttpDatasetClient`].

mod client;

pub use client::HttpDatasetClient;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::DatasetConfig;

/// Short dataset keys and the dataset ids they stand for
pub const BUILTIN_DATASETS: [(&str, &str); 3] = [
    ("open-tenders", "tenders-ville/kenya-open-tenders"),
    ("awarded-contracts", "tenders-ville/kenya-awarded-contracts"),
    ("procurement-plans", "tenders-ville/kenya-procurement-plans"),
];

/// One paged read from a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetQuery {
    pub dataset_id: String,
    pub split: String,
    pub limit: u64,
    pub offset: u64,
    /// SQL-style `where` condition; `None` reads rows unfiltered
    pub filter: Option<String>,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Dataset service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid dataset service URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Remote collaborator serving dataset rows
#[async_trait]
pub trait DatasetService: Send + Sync {
    async fn fetch_rows(&self, query: &DatasetQuery) -> Result<Value, DatasetError>;
}

/// Mapping from short dataset keys to dataset ids
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    entries: BTreeMap<String, String>,
}

impl DatasetCatalog {
    pub fn builtin() -> Self {
        let entries = BUILTIN_DATASETS
            .iter()
            .map(|(key, id)| ((*key).to_string(), (*id).to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in entries, extended or replaced by the configured ones
    pub fn from_config(config: &DatasetConfig) -> Self {
        let mut catalog = Self::builtin();
        for (key, id) in &config.datasets {
            catalog.entries.insert(key.clone(), id.clone());
        }
        catalog
    }

    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = DatasetCatalog::builtin();
        assert_eq!(
            catalog.resolve("open-tenders"),
            Some("tenders-ville/kenya-open-tenders")
        );
        assert!(catalog.resolve("awarded-contracts").is_some());
        assert!(catalog.resolve("procurement-plans").is_some());
        assert!(catalog.resolve("closed-tenders").is_none());
    }

    #[test]
    fn test_config_overrides_catalog() {
        let mut config = DatasetConfig::default();
        config
            .datasets
            .insert("open-tenders".to_string(), "mirror/open".to_string());
        config
            .datasets
            .insert("tender-notices".to_string(), "mirror/notices".to_string());

        let catalog = DatasetCatalog::from_config(&config);
        assert_eq!(catalog.resolve("open-tenders"), Some("mirror/open"));
        assert_eq!(catalog.resolve("tender-notices"), Some("mirror/notices"));
        assert_eq!(catalog.keys().count(), 4);
    }
}
