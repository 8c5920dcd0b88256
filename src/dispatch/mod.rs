//! Request dispatch module
//!
//! Turns an inbound [`Event`] into a [`FunctionResponse`]. The `action` query
//! parameter picks the backend:
//!
//! | action            | input                    | backend              |
//! |-------------------|--------------------------|----------------------|
//! | `get-tenders`     | `dataset`/`limit`/`offset`/filters | dataset service |
//! | `predict-price`   | JSON body                | price predictor      |
//! | `match-suppliers` | JSON body                | supplier matcher     |
//! | `scrape-tenders`  | remaining query params   | tender scraper       |
//!
//! Failures never escape [`Dispatcher::handle`]; they are rendered as
//! `{"success": false, "error": message}` with a 400 or 500 status.

mod error;
mod filter;
mod params;

pub use error::DispatchError;
pub use filter::TenderFilter;
pub use params::Paging;

use hyper::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::analyzer::{Analyzer, AnalyzerKind, ScriptAnalyzer};
use crate::config::{Config, DatasetConfig, ScriptsConfig};
use crate::dataset::{DatasetCatalog, DatasetQuery, DatasetService, HttpDatasetClient};

/// Inbound HTTP-like event: query parameters plus an optional raw body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl Event {
    /// Build an event from a raw (still percent-encoded) query string.
    /// A repeated key keeps its last value.
    pub fn from_query_string(query: Option<&str>, body: Option<String>) -> Self {
        let query = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default();
        Self { query, body }
    }

    /// Raw `action` parameter, if any
    pub fn action(&self) -> Option<&str> {
        self.query.get("action").map(String::as_str)
    }
}

/// Backend branch selected by the `action` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetTenders,
    PredictPrice,
    MatchSuppliers,
    ScrapeTenders,
}

impl Action {
    pub const DEFAULT: Self = Self::GetTenders;

    pub const ALL: [Self; 4] = [
        Self::GetTenders,
        Self::PredictPrice,
        Self::MatchSuppliers,
        Self::ScrapeTenders,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetTenders => "get-tenders",
            Self::PredictPrice => "predict-price",
            Self::MatchSuppliers => "match-suppliers",
            Self::ScrapeTenders => "scrape-tenders",
        }
    }

    /// Script-backed actions and the analyzer they run
    pub const fn analyzer(self) -> Option<AnalyzerKind> {
        match self {
            Self::GetTenders => None,
            Self::PredictPrice => Some(AnalyzerKind::PricePredictor),
            Self::MatchSuppliers => Some(AnalyzerKind::SupplierMatcher),
            Self::ScrapeTenders => Some(AnalyzerKind::TenderScraper),
        }
    }
}

impl FromStr for Action {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DispatchError::InvalidAction(s.to_string()))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status code and JSON body produced for one event
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl FunctionResponse {
    pub fn success(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "success": true, "data": data }),
        }
    }

    /// Script output is returned as-is, without the success envelope
    pub const fn passthrough(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn failure(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            body: json!({ "success": false, "error": message }),
        }
    }
}

impl From<DispatchError> for FunctionResponse {
    fn from(err: DispatchError) -> Self {
        Self::failure(err.status(), &err.to_string())
    }
}

/// The three script-backed analyzers
#[derive(Clone)]
pub struct Analyzers {
    pub price_predictor: Arc<dyn Analyzer>,
    pub supplier_matcher: Arc<dyn Analyzer>,
    pub tender_scraper: Arc<dyn Analyzer>,
}

impl Analyzers {
    pub fn from_config(config: &ScriptsConfig) -> Self {
        let build = |kind| -> Arc<dyn Analyzer> { Arc::new(ScriptAnalyzer::new(kind, config)) };
        Self {
            price_predictor: build(AnalyzerKind::PricePredictor),
            supplier_matcher: build(AnalyzerKind::SupplierMatcher),
            tender_scraper: build(AnalyzerKind::TenderScraper),
        }
    }

    pub fn get(&self, kind: AnalyzerKind) -> &dyn Analyzer {
        match kind {
            AnalyzerKind::PricePredictor => self.price_predictor.as_ref(),
            AnalyzerKind::SupplierMatcher => self.supplier_matcher.as_ref(),
            AnalyzerKind::TenderScraper => self.tender_scraper.as_ref(),
        }
    }
}

/// Stateless router shared by every request
pub struct Dispatcher {
    datasets: Arc<dyn DatasetService>,
    analyzers: Analyzers,
    catalog: DatasetCatalog,
    dataset_config: DatasetConfig,
}

impl Dispatcher {
    pub fn new(
        datasets: Arc<dyn DatasetService>,
        analyzers: Analyzers,
        dataset_config: &DatasetConfig,
    ) -> Self {
        Self {
            datasets,
            analyzers,
            catalog: DatasetCatalog::from_config(dataset_config),
            dataset_config: dataset_config.clone(),
        }
    }

    /// Production wiring: HTTP dataset client and script analyzers
    pub fn from_config(config: &Config) -> Result<Self, DispatchError> {
        let client = HttpDatasetClient::new(&config.dataset)?;
        Ok(Self::new(
            Arc::new(client),
            Analyzers::from_config(&config.scripts),
            &config.dataset,
        ))
    }

    pub const fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    /// Handle one event. Never fails; errors become error responses.
    pub async fn handle(&self, event: Event) -> FunctionResponse {
        self.dispatch(event).await.unwrap_or_else(render_error)
    }

    /// Look up a single tender by reference in the requested dataset
    pub async fn find_tender(
        &self,
        reference: &str,
        params: &BTreeMap<String, String>,
    ) -> FunctionResponse {
        self.lookup_tender(reference, params)
            .await
            .unwrap_or_else(render_error)
    }

    async fn dispatch(&self, mut event: Event) -> Result<FunctionResponse, DispatchError> {
        let action = match event.query.remove("action") {
            Some(raw) => raw.parse::<Action>()?,
            None => Action::DEFAULT,
        };
        debug!(%action, params = ?event.query, "dispatching");

        match action.analyzer() {
            None => self.get_tenders(&event.query).await,
            Some(kind) => {
                let input = match action {
                    Action::ScrapeTenders => params_to_json(event.query),
                    _ => parse_body(event.body.as_deref())?,
                };
                let output = self.analyzers.get(kind).analyze(&input).await?;
                Ok(FunctionResponse::passthrough(output))
            }
        }
    }

    async fn get_tenders(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<FunctionResponse, DispatchError> {
        let query = self.dataset_query(params)?;
        let data = self.datasets.fetch_rows(&query).await?;
        let pagination = pagination(&data, &query);

        let mut response = FunctionResponse::success(data);
        if let (Some(pagination), Some(body)) = (pagination, response.body.as_object_mut()) {
            body.insert("pagination".to_string(), pagination);
        }
        Ok(response)
    }

    async fn lookup_tender(
        &self,
        reference: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<FunctionResponse, DispatchError> {
        let query = DatasetQuery {
            dataset_id: self.resolve_dataset(params)?.to_string(),
            split: self.dataset_config.split.clone(),
            limit: 1,
            offset: 0,
            filter: Some(filter::reference_clause(reference)),
        };
        debug!(reference, dataset = %query.dataset_id, "looking up tender");

        let data = self.datasets.fetch_rows(&query).await?;
        let tender = data
            .get("rows")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .map(|row| row.get("row").unwrap_or(row).clone())
            .ok_or(DispatchError::TenderNotFound)?;
        Ok(FunctionResponse::success(tender))
    }

    fn resolve_dataset(&self, params: &BTreeMap<String, String>) -> Result<&str, DispatchError> {
        let key = params
            .get("dataset")
            .map_or(self.dataset_config.default_dataset.as_str(), String::as_str);
        self.catalog
            .resolve(key)
            .ok_or_else(|| DispatchError::UnknownDataset(key.to_string()))
    }

    /// Resolve the dataset key, page window and filters for a `get-tenders` call
    pub fn dataset_query(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<DatasetQuery, DispatchError> {
        let dataset_id = self.resolve_dataset(params)?;
        let filter = TenderFilter::from_params(params)?;
        let paging = Paging::from_params(
            params,
            self.dataset_config.default_limit,
            self.dataset_config.max_limit,
        );

        Ok(DatasetQuery {
            dataset_id: dataset_id.to_string(),
            split: self.dataset_config.split.clone(),
            limit: paging.limit,
            offset: paging.offset,
            filter: filter.where_clause(),
        })
    }
}

fn render_error(err: DispatchError) -> FunctionResponse {
    if err.status().is_server_error() {
        warn!(error = %err, "dispatch failed");
    } else {
        debug!(error = %err, "request rejected");
    }
    err.into()
}

/// Page summary derived from the service's `num_rows_total`, if it reported one
fn pagination(data: &Value, query: &DatasetQuery) -> Option<Value> {
    let total = data.get("num_rows_total")?.as_u64()?;
    if query.limit == 0 {
        return None;
    }
    Some(json!({
        "total": total,
        "page": query.offset / query.limit + 1,
        "limit": query.limit,
        "total_pages": total.div_ceil(query.limit),
    }))
}

fn parse_body(body: Option<&str>) -> Result<Value, DispatchError> {
    let body = body.ok_or(DispatchError::MissingBody)?;
    serde_json::from_str(body).map_err(DispatchError::MalformedInput)
}

fn params_to_json(params: BTreeMap<String, String>) -> Value {
    Value::Object(
        params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<_, _>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzerError;
    use crate::dataset::DatasetError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Dataset service that records queries and echoes them back
    #[derive(Default)]
    struct RecordingDatasets {
        queries: Mutex<Vec<DatasetQuery>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl DatasetService for RecordingDatasets {
        async fn fetch_rows(&self, query: &DatasetQuery) -> Result<Value, DatasetError> {
            self.queries.lock().unwrap().push(query.clone());
            if let Some(status) = self.fail_with {
                return Err(DatasetError::Status {
                    status,
                    body: "unauthorized".to_string(),
                });
            }
            if let Some(condition) = query.filter.as_deref() {
                if condition.starts_with("\"reference\"") {
                    let rows = if condition.contains("MISSING") {
                        json!([])
                    } else {
                        json!([{ "row_idx": 4, "row": { "reference": "MOH/T/001", "status": "open" } }])
                    };
                    return Ok(json!({ "rows": rows }));
                }
            }
            Ok(json!({
                "dataset": query.dataset_id,
                "split": query.split,
                "limit": query.limit,
                "offset": query.offset,
                "filter": query.filter,
                "num_rows_total": 45,
            }))
        }
    }

    /// Analyzer returning a fixed outcome and recording its input
    struct FakeAnalyzer {
        name: &'static str,
        outcome: fn() -> Result<Value, AnalyzerError>,
        inputs: Mutex<Vec<Value>>,
        delay: Duration,
    }

    impl FakeAnalyzer {
        fn echo(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome: || Ok(Value::Null),
                inputs: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
            })
        }

        fn returning(outcome: fn() -> Result<Value, AnalyzerError>) -> Arc<Self> {
            Arc::new(Self {
                name: "fixed",
                outcome,
                inputs: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl Analyzer for FakeAnalyzer {
        async fn analyze(&self, input: &Value) -> Result<Value, AnalyzerError> {
            tokio::time::sleep(self.delay).await;
            self.inputs.lock().unwrap().push(input.clone());
            match (self.outcome)()? {
                Value::Null => Ok(json!({ "analyzer": self.name, "input": input })),
                other => Ok(other),
            }
        }
    }

    struct Harness {
        datasets: Arc<RecordingDatasets>,
        price: Arc<FakeAnalyzer>,
        suppliers: Arc<FakeAnalyzer>,
        scraper: Arc<FakeAnalyzer>,
        dispatcher: Dispatcher,
    }

    fn harness_with(datasets: RecordingDatasets, price: Arc<FakeAnalyzer>) -> Harness {
        let datasets = Arc::new(datasets);
        let suppliers = FakeAnalyzer::echo("suppliers");
        let scraper = FakeAnalyzer::echo("scraper");
        let analyzers = Analyzers {
            price_predictor: price.clone(),
            supplier_matcher: suppliers.clone(),
            tender_scraper: scraper.clone(),
        };
        let dispatcher = Dispatcher::new(datasets.clone(), analyzers, &DatasetConfig::default());
        Harness {
            datasets,
            price,
            suppliers,
            scraper,
            dispatcher,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingDatasets::default(), FakeAnalyzer::echo("price"))
    }

    fn event(query: &str, body: Option<&str>) -> Event {
        Event::from_query_string(Some(query), body.map(String::from))
    }

    #[test]
    fn test_event_from_query_string() {
        let event = event("action=scrape-tenders&county=Nairobi%20City&q=a+b", None);
        assert_eq!(event.action(), Some("scrape-tenders"));
        assert_eq!(event.query["county"], "Nairobi City");
        assert_eq!(event.query["q"], "a b");

        let empty = Event::from_query_string(None, None);
        assert!(empty.query.is_empty());
        assert_eq!(empty.action(), None);
    }

    #[test]
    fn test_action_parsing() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!(matches!(
            "GET-TENDERS".parse::<Action>(),
            Err(DispatchError::InvalidAction(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_action() {
        let h = harness();
        for raw in ["delete-tenders", "", "Predict-Price"] {
            let resp = h.dispatcher.handle(event(&format!("action={raw}"), None)).await;
            assert_eq!(resp.status, StatusCode::BAD_REQUEST);
            assert_eq!(
                resp.body,
                json!({ "success": false, "error": "Invalid action specified" })
            );
        }
        assert!(h.datasets.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_action_defaults_to_get_tenders() {
        let h = harness();
        let implicit = h.dispatcher.handle(event("limit=5", None)).await;
        let explicit = h
            .dispatcher
            .handle(event("action=get-tenders&limit=5", None))
            .await;
        assert_eq!(implicit, explicit);
        assert_eq!(implicit.status, StatusCode::OK);
        assert_eq!(implicit.body["success"], true);
    }

    #[tokio::test]
    async fn test_get_tenders_default_dataset() {
        let h = harness();
        let resp = h.dispatcher.handle(event("action=get-tenders", None)).await;
        assert_eq!(resp.status, StatusCode::OK);

        let queries = h.datasets.queries.lock().unwrap();
        assert_eq!(
            queries[0],
            DatasetQuery {
                dataset_id: h.dispatcher.catalog().resolve("open-tenders").unwrap().to_string(),
                split: "train".to_string(),
                limit: 100,
                offset: 0,
                filter: None,
            }
        );
        assert_eq!(resp.body["data"]["dataset"], queries[0].dataset_id);
    }

    #[tokio::test]
    async fn test_get_tenders_params() {
        let h = harness();
        h.dispatcher
            .handle(event("dataset=awarded-contracts&limit=abc&offset=30", None))
            .await;
        h.dispatcher
            .handle(event("dataset=procurement-plans&limit=10&page=4", None))
            .await;

        let queries = h.datasets.queries.lock().unwrap();
        assert_eq!(queries[0].dataset_id, "tenders-ville/kenya-awarded-contracts");
        assert_eq!(queries[0].limit, 100);
        assert_eq!(queries[0].offset, 30);
        assert_eq!(queries[1].dataset_id, "tenders-ville/kenya-procurement-plans");
        assert_eq!(queries[1].limit, 10);
        assert_eq!(queries[1].offset, 30);
    }

    #[tokio::test]
    async fn test_get_tenders_pagination() {
        let h = harness();
        let resp = h.dispatcher.handle(event("limit=10&page=3", None)).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            resp.body["pagination"],
            json!({ "total": 45, "page": 3, "limit": 10, "total_pages": 5 })
        );
    }

    #[tokio::test]
    async fn test_get_tenders_filters() {
        let h = harness();
        let resp = h
            .dispatcher
            .handle(event("status=open&category=ICT&days_remaining=14", None))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            h.datasets.queries.lock().unwrap()[0].filter.as_deref(),
            Some("\"status\" = 'open' AND \"category\" ILIKE '%ICT%' AND \"days_remaining\" <= 14")
        );
    }

    #[tokio::test]
    async fn test_invalid_filter_rejected() {
        let h = harness();
        let resp = h.dispatcher.handle(event("status=pending", None)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["error"], "Invalid status: pending");
        assert!(h.datasets.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_tender() {
        let h = harness();
        let resp = h.dispatcher.find_tender("MOH/T/001", &BTreeMap::new()).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"]["reference"], "MOH/T/001");

        let queries = h.datasets.queries.lock().unwrap();
        assert_eq!(queries[0].limit, 1);
        assert_eq!(queries[0].filter.as_deref(), Some("\"reference\" = 'MOH/T/001'"));
    }

    #[tokio::test]
    async fn test_find_tender_missing_is_404() {
        let h = harness();
        let resp = h.dispatcher.find_tender("MISSING", &BTreeMap::new()).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body, json!({ "success": false, "error": "Tender not found" }));
    }

    #[tokio::test]
    async fn test_unknown_dataset_rejected() {
        let h = harness();
        let resp = h.dispatcher.handle(event("dataset=closed-tenders", None)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["success"], false);
        assert_eq!(resp.body["error"], "Unknown dataset: closed-tenders");
        assert!(h.datasets.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let datasets = RecordingDatasets {
            fail_with: Some(401),
            ..RecordingDatasets::default()
        };
        let h = harness_with(datasets, FakeAnalyzer::echo("price"));
        let resp = h.dispatcher.handle(event("", None)).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.body["success"], false);
        assert_eq!(resp.body["error"], "Dataset service returned 401: unauthorized");
    }

    #[tokio::test]
    async fn test_predict_price_passes_body() {
        let h = harness();
        let body = r#"{"item":"laptops","quantity":12}"#;
        let resp = h.dispatcher.handle(event("action=predict-price", Some(body))).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["analyzer"], "price");
        assert_eq!(
            h.price.inputs.lock().unwrap()[0],
            json!({"item": "laptops", "quantity": 12})
        );
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_500() {
        let h = harness();
        let resp = h
            .dispatcher
            .handle(event("action=predict-price", Some("{not json")))
            .await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.body["success"], false);
        assert!(!resp.body["error"].as_str().unwrap().is_empty());
        assert!(h.price.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_body_is_500() {
        let h = harness();
        let resp = h.dispatcher.handle(event("action=match-suppliers", None)).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.body["error"], "Request body is required");
    }

    #[tokio::test]
    async fn test_match_suppliers_uses_supplier_matcher() {
        let h = harness();
        let resp = h
            .dispatcher
            .handle(event("action=match-suppliers", Some(r#"{"category":"ICT"}"#)))
            .await;
        assert_eq!(resp.body["analyzer"], "suppliers");
        assert_eq!(h.suppliers.inputs.lock().unwrap().len(), 1);
        assert!(h.price.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scrape_tenders_forwards_params_without_action() {
        let h = harness();
        let resp = h
            .dispatcher
            .handle(event("action=scrape-tenders&source=mygov&pages=2", Some("ignored")))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            h.scraper.inputs.lock().unwrap()[0],
            json!({"source": "mygov", "pages": "2"})
        );
    }

    #[tokio::test]
    async fn test_script_output_passthrough() {
        let h = harness_with(
            RecordingDatasets::default(),
            FakeAnalyzer::returning(|| Ok(json!({"x": 1}))),
        );
        let resp = h
            .dispatcher
            .handle(event("action=predict-price", Some("{}")))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_script_failure_carries_stderr() {
        let h = harness_with(
            RecordingDatasets::default(),
            FakeAnalyzer::returning(|| {
                Err(AnalyzerError::Exit {
                    code: Some(1),
                    stderr: "boom".to_string(),
                })
            }),
        );
        let resp = h
            .dispatcher
            .handle(event("action=predict-price", Some("{}")))
            .await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.body, json!({"success": false, "error": "boom"}));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let datasets = Arc::new(RecordingDatasets::default());
        let slow = Arc::new(FakeAnalyzer {
            name: "price",
            outcome: || Ok(Value::Null),
            inputs: Mutex::new(Vec::new()),
            delay: Duration::from_millis(50),
        });
        let analyzers = Analyzers {
            price_predictor: slow,
            supplier_matcher: FakeAnalyzer::echo("suppliers"),
            tender_scraper: FakeAnalyzer::echo("scraper"),
        };
        let dispatcher = Arc::new(Dispatcher::new(datasets, analyzers, &DatasetConfig::default()));

        let requests = vec![
            event("action=predict-price", Some(r#"{"n":1}"#)),
            event("action=get-tenders&limit=7", None),
            event("action=scrape-tenders&n=3", None),
            event("action=bogus", None),
            event("action=match-suppliers", Some(r#"{"n":2}"#)),
        ];
        let handles: Vec<_> = requests
            .into_iter()
            .map(|ev| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move { dispatcher.handle(ev).await })
            })
            .collect();

        let mut responses = Vec::new();
        for handle in handles {
            responses.push(handle.await.unwrap());
        }

        assert_eq!(responses[0].body["input"], json!({"n": 1}));
        assert_eq!(responses[0].body["analyzer"], "price");
        assert_eq!(responses[1].body["data"]["limit"], 7);
        assert_eq!(responses[2].body["input"], json!({"n": "3"}));
        assert_eq!(responses[3].status, StatusCode::BAD_REQUEST);
        assert_eq!(responses[4].body["analyzer"], "suppliers");
        assert_eq!(responses[4].body["input"], json!({"n": 2}));
    }
}
