//! Greeting endpoint.
//!
//! Echoes every inbound request header back unmodified. This is intended as a
//! debugging aid behind a load balancer and will reflect credentials such as
//! `authorization` or `cookie` to whoever sent them.
//!
//! Repeated `cookie` headers are joined with `"; "`, every other repeated
//! header with `", "`. A repeated `set-cookie` is therefore a single
//! comma-joined string rather than a list.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::error::AppError;
use crate::state::AppState;

pub const GREETING: &str = "Hello World from EKS!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub environment: String,
    pub hostname: String,
    pub timestamp: String,
    pub headers: BTreeMap<String, String>,
}

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RootResponse>, AppError> {
    let hostname = state.probe.hostname()?;

    Ok(Json(RootResponse {
        message: GREETING.to_string(),
        version: state.info.version.clone(),
        environment: state.info.environment.clone(),
        hostname,
        timestamp: timestamp(),
        headers: echo_headers(&headers),
    }))
}

/// Flatten request headers into a name -> value map.
///
/// Names are already lowercase in `HeaderMap`. Bytes that are not valid
/// UTF-8 are replaced.
pub fn echo_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut echoed: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        let separator = if *name == COOKIE { "; " } else { ", " };
        echoed
            .entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(separator);
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    echoed
}
