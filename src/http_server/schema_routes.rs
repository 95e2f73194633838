//! Schema introspection HTTP Routes
//!
//! Read-only description endpoints for every registered model.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::errors::{HttpError, HttpResult};
use super::state::ServerState;
use crate::describe::{all_descriptions, field_descriptors, DescriptionMap, FieldDescriptors};
use crate::docs::{validation_messages, ApiDoc, TableDoc, ValidationMessages};
use crate::model::Model;

/// All generated documentation for one model
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocs {
    pub table: TableDoc,
    pub api: ApiDoc,
    pub validation_messages: ValidationMessages,
}

#[derive(Debug, Serialize)]
pub struct ModelList {
    pub models: Vec<String>,
}

pub fn schema_routes(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/schema", get(list_models_handler))
        .route("/schema/:model/descriptions", get(descriptions_handler))
        .route("/schema/:model/descriptors", get(descriptors_handler))
        .route("/schema/:model/docs", get(docs_handler))
        .with_state(state)
}

fn lookup(state: &ServerState, name: &str) -> HttpResult<Model> {
    state
        .registry()
        .get(name)
        .ok_or_else(|| HttpError::not_found("SCHEMA_UNKNOWN", format!("Model '{}' not found", name)))
}

async fn list_models_handler(State(state): State<Arc<ServerState>>) -> Json<ModelList> {
    Json(ModelList {
        models: state.registry().names(),
    })
}

async fn descriptions_handler(
    State(state): State<Arc<ServerState>>,
    Path(model): Path<String>,
) -> HttpResult<Json<DescriptionMap>> {
    let model = lookup(&state, &model)?;
    Ok(Json(all_descriptions(&model)))
}

async fn descriptors_handler(
    State(state): State<Arc<ServerState>>,
    Path(model): Path<String>,
) -> HttpResult<Json<FieldDescriptors>> {
    let model = lookup(&state, &model)?;
    Ok(Json(field_descriptors(&model)))
}

async fn docs_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> HttpResult<Json<ModelDocs>> {
    let model = lookup(&state, &name)?;
    Ok(Json(ModelDocs {
        table: TableDoc::generate(&model, &name),
        api: ApiDoc::generate(&model, &name),
        validation_messages: validation_messages(&model),
    }))
}
