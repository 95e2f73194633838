//! App HTTP Routes
//!
//! The caller is identified by headers:
//! - `x-team-id`, `x-tmb-id`: team and member ids
//! - `x-permission`: `read`, `write` or `owner` (absent means none)
//! - `x-root-key`: the configured root key, for root callers
//!
//! Team, member and permission headers are honored only when
//! `identity.trust_headers` is set. Root needs a matching root key;
//! without a configured key no request is root.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::config::IdentityConfig;
use super::errors::{HttpError, HttpResult};
use super::state::ServerState;
use crate::app::{AppDetail, Caller, Permission};

pub const HEADER_TEAM_ID: &str = "x-team-id";
pub const HEADER_TMB_ID: &str = "x-tmb-id";
pub const HEADER_PERMISSION: &str = "x-permission";
pub const HEADER_ROOT_KEY: &str = "x-root-key";

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(rename = "appId", default)]
    pub app_id: Option<String>,
}

pub fn app_routes(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/core/app/detail", get(app_detail_handler))
        .with_state(state)
}

async fn app_detail_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Query(query): Query<DetailQuery>,
) -> HttpResult<Json<AppDetail>> {
    let caller = caller_from_headers(&headers, state.identity())?;
    let app_id = query.app_id.as_deref().unwrap_or_default();
    let detail = state.apps().detail(app_id, &caller)?;
    Ok(Json(detail))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> HttpResult<Option<&'a str>> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value.to_str().map(|v| Some(v.trim())).map_err(|_| {
            HttpError::bad_request("INVALID_HEADER", format!("{} is not valid UTF-8", name))
        }),
    }
}

/// Builds the caller identity from request headers
pub fn caller_from_headers(headers: &HeaderMap, identity: &IdentityConfig) -> HttpResult<Caller> {
    let team_id = header(headers, HEADER_TEAM_ID)?.unwrap_or_default();
    let tmb_id = header(headers, HEADER_TMB_ID)?.unwrap_or_default();

    if let Some(key) = header(headers, HEADER_ROOT_KEY)? {
        if !identity.is_root_key(key) {
            return Err(HttpError::unauthorized("UNAUTHORIZED", "Invalid root key"));
        }
        return Ok(Caller {
            team_id: team_id.to_string(),
            tmb_id: tmb_id.to_string(),
            ..Caller::root()
        });
    }

    if !identity.trust_headers {
        return Err(HttpError::unauthorized(
            "UNAUTHORIZED",
            "Caller identity headers are not trusted",
        ));
    }

    if team_id.is_empty() {
        return Err(HttpError::unauthorized(
            "UNAUTHORIZED",
            format!("Missing {} header", HEADER_TEAM_ID),
        ));
    }

    let permission: Permission = header(headers, HEADER_PERMISSION)?
        .unwrap_or_default()
        .parse()
        .map_err(|e: String| HttpError::bad_request("INVALID_HEADER", e))?;

    Ok(Caller::member(team_id, tmb_id, permission))
}
