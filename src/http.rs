//! JSON adapter for a presentation layer.
//!
//! Delivers user events to in-memory [`Storefront`] sessions and returns the
//! derived view after each one. Sessions live until they are deleted or the
//! process exits; at most `max_sessions` are held at once.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::catalog::{Catalog, CategoryFilter};
use crate::domain::aggregates::order::DeliveryFees;
use crate::services::OrderSubmissionService;
use crate::session::{Action, Storefront};
use crate::view::{ProductCard, StorefrontView};
use crate::StorefrontError;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub fees: DeliveryFees,
    pub submitter: Arc<dyn OrderSubmissionService>,
    pub sessions: Arc<Mutex<HashMap<Uuid, Storefront>>>,
    pub max_sessions: usize,
}

impl AppState {
    pub fn new(catalog: Catalog, fees: DeliveryFees, submitter: Arc<dyn OrderSubmissionService>, max_sessions: usize) -> Self {
        Self { catalog: Arc::new(catalog), fees, submitter, sessions: Arc::default(), max_sessions }
    }
}

type ApiError = (StatusCode, String);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/v1/sessions/:id/actions", post(dispatch_action))
        .route("/api/v1/sessions/:id/checkout", post(submit_checkout))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery { pub search: Option<String>, pub category: Option<CategoryFilter> }

async fn list_products(State(s): State<AppState>, Query(q): Query<ProductQuery>) -> Json<Vec<ProductCard>> {
    let category = q.category.unwrap_or_default();
    let cards = s.catalog.filter(q.search.as_deref().unwrap_or(""), &category).into_iter().map(|p| ProductCard::new(p, false)).collect();
    Json(cards)
}

async fn list_categories(State(s): State<AppState>) -> Json<Vec<CategoryFilter>> {
    Json(s.catalog.categories())
}

#[derive(Debug, Serialize)]
pub struct SessionCreated { pub id: Uuid, pub view: StorefrontView }

async fn create_session(State(s): State<AppState>) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let mut sessions = s.sessions.lock().await;
    if sessions.len() >= s.max_sessions {
        tracing::warn!(limit = s.max_sessions, "session limit reached");
        return Err((StatusCode::SERVICE_UNAVAILABLE, StorefrontError::SessionLimit(s.max_sessions).to_string()));
    }
    let id = Uuid::new_v4();
    let storefront = Storefront::new(s.catalog.clone(), s.fees.clone());
    let view = storefront.view();
    sessions.insert(id, storefront);
    tracing::info!(session = %id, live = sessions.len(), "session created");
    Ok((StatusCode::CREATED, Json(SessionCreated { id, view })))
}

fn not_found() -> ApiError { (StatusCode::NOT_FOUND, StorefrontError::SessionNotFound.to_string()) }

async fn get_session(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<StorefrontView>, ApiError> {
    let sessions = s.sessions.lock().await;
    sessions.get(&id).map(|sf| Json(sf.view())).ok_or_else(not_found)
}

async fn delete_session(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    s.sessions.lock().await.remove(&id).ok_or_else(not_found)?;
    tracing::info!(session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn dispatch_action(State(s): State<AppState>, Path(id): Path<Uuid>, Json(action): Json<Action>) -> Result<Json<StorefrontView>, ApiError> {
    let mut sessions = s.sessions.lock().await;
    let storefront = sessions.get_mut(&id).ok_or_else(not_found)?;
    storefront.dispatch(&action);
    Ok(Json(storefront.view()))
}

async fn submit_checkout(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<StorefrontView>, ApiError> {
    let mut sessions = s.sessions.lock().await;
    let storefront = sessions.get_mut(&id).ok_or_else(not_found)?;
    storefront.submit_order(s.submitter.as_ref());
    Ok(Json(storefront.view()))
}
