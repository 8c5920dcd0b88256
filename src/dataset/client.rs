//! HTTP client for the dataset row API
//!
//! Unfiltered reads go to `/rows`, filtered ones to `/filter` with a `where`
//! parameter. Both answer with `rows` and `num_rows_total`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{DatasetError, DatasetQuery, DatasetService};
use crate::config::DatasetConfig;

/// Dataset service reached over HTTP (`GET {base_url}/rows?...` or `/filter?...`)
pub struct HttpDatasetClient {
    http_client: reqwest::Client,
    base_url: String,
    config_name: String,
    token: Option<String>,
}

impl HttpDatasetClient {
    pub fn new(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("tender-dispatch/", env!("CARGO_PKG_VERSION")));
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config_name: config.config_name.clone(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Build the request URL for a query
    pub fn request_url(&self, query: &DatasetQuery) -> Result<Url, DatasetError> {
        let endpoint = if query.filter.is_some() { "filter" } else { "rows" };
        let mut url = Url::parse(&format!("{}/{endpoint}", self.base_url))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("dataset", &query.dataset_id)
                .append_pair("config", &self.config_name)
                .append_pair("split", &query.split);
            if let Some(condition) = &query.filter {
                pairs.append_pair("where", condition);
            }
            pairs
                .append_pair("offset", &query.offset.to_string())
                .append_pair("length", &query.limit.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl DatasetService for HttpDatasetClient {
    async fn fetch_rows(&self, query: &DatasetQuery) -> Result<Value, DatasetError> {
        let url = self.request_url(query)?;
        debug!(%url, "fetching dataset rows");

        let mut request = self.http_client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DatasetError::Status { status, body });
        }

        Ok(response.json::<Value>().await?)
    }
}
