//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! body limits, route matching and handing function calls to the dispatcher.

use crate::config::AppState;
use crate::dispatch::{Action, DispatchError, Event, FunctionResponse};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use chrono::Utc;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for routing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub body: Option<Bytes>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();
    let query = parts.uri.query();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        path.to_string(),
    );
    entry.query = query.map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.user_agent = parts
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = if let Some(resp) =
        check_body_size(&parts.headers, state.config.http.max_body_size)
    {
        resp
    } else {
        match read_body(body, state.config.http.max_body_size).await {
            Ok(body) => {
                let ctx = RequestContext {
                    method: &parts.method,
                    path,
                    query,
                    body,
                };
                if path == state.config.routes.function_path {
                    entry.action = Some(requested_action(query));
                }
                route_request(ctx, &state).await
            }
            Err(resp) => resp,
        }
    };

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    headers: &hyper::HeaderMap,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the request body, enforcing the size limit for chunked uploads too.
/// An empty body is reported as absent.
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Option<Bytes>, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            if bytes.is_empty() {
                Ok(None)
            } else {
                Ok(Some(bytes))
            }
        }
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_500_response())
        }
    }
}

/// Route request based on path and configuration
pub async fn route_request(ctx: RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;
    let http_config = &state.config.http;

    // Health check endpoints first, they never touch the backends
    if routes.health.enabled
        && (ctx.path == routes.health.liveness_path || ctx.path == routes.health.readiness_path)
    {
        return http::build_health_response("ok");
    }

    if ctx.path == routes.function_path {
        return match *ctx.method {
            Method::GET | Method::POST => {
                let result = match body_text(ctx.body) {
                    Ok(body) => {
                        let event = Event::from_query_string(ctx.query, body);
                        state.dispatcher.handle(event).await
                    }
                    Err(err) => {
                        logger::log_warning(&format!("Rejected request body: {err}"));
                        FunctionResponse::from(err)
                    }
                };
                http::build_json_response(result.status, &result.body, http_config)
            }
            Method::OPTIONS => http::build_options_response(http_config.enable_cors),
            _ => {
                logger::log_warning(&format!("Method not allowed: {}", ctx.method));
                http::build_405_response()
            }
        };
    }

    if let Some(reference) = tender_reference(ctx.path, &routes.tender_path) {
        return match *ctx.method {
            Method::GET => {
                let params = Event::from_query_string(ctx.query, None).query;
                let result = state.dispatcher.find_tender(&reference, &params).await;
                http::build_json_response(result.status, &result.body, http_config)
            }
            Method::OPTIONS => http::build_options_response(http_config.enable_cors),
            _ => http::build_405_response(),
        };
    }

    if ctx.path == "/" {
        return match *ctx.method {
            Method::GET => http::build_json_response(StatusCode::OK, &service_info(state), http_config),
            Method::OPTIONS => http::build_options_response(http_config.enable_cors),
            _ => http::build_405_response(),
        };
    }

    http::build_404_response(http_config)
}

/// Service description served on `/`
fn service_info(state: &AppState) -> serde_json::Value {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);
    json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Tender data and analysis dispatcher",
        "status": "running",
        "function_path": state.config.routes.function_path,
        "tender_path": state.config.routes.tender_path,
        "actions": Action::ALL.iter().map(|a| a.as_str()).collect::<Vec<_>>(),
        "datasets": state.dispatcher.catalog().keys().collect::<Vec<_>>(),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime,
    })
}

/// Request body as text; bytes that are not UTF-8 are rejected, never patched up
fn body_text(body: Option<Bytes>) -> Result<Option<String>, DispatchError> {
    body.map(|bytes| String::from_utf8(bytes.to_vec()))
        .transpose()
        .map_err(DispatchError::from)
}

/// Decoded `{reference}` of a `{tender_path}/{reference}` path
fn tender_reference(path: &str, tender_path: &str) -> Option<String> {
    let raw = path
        .strip_prefix(tender_path.trim_end_matches('/'))?
        .strip_prefix('/')?;
    if raw.is_empty() {
        return None;
    }
    urlencoding::decode(raw).ok().map(std::borrow::Cow::into_owned)
}

/// Action name as requested, for the access log
fn requested_action(query: Option<&str>) -> String {
    Event::from_query_string(query, None)
        .action()
        .unwrap_or(Action::DEFAULT.as_str())
        .to_string()
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
