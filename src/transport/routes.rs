//! HTTP routes for the proxy.
//!
//! Handlers only decode the path and body and hand off to a
//! [`DocumentProxy`]; failures are rendered by `ProxyError`'s `IntoResponse`.

use crate::db::DocumentProxy;
use crate::error::ProxyError;
use crate::models::{
    FindRequest, FindResult, HealthResult, HomeResponse, InsertRequest, InsertResult,
    UpdateRequest, UpdateResult,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::Method,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router over `proxy`.
pub fn router<P: DocumentProxy>(proxy: Arc<P>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health::<P>))
        .route("/insert/{database}/{collection}", post(insert::<P>))
        .route("/find/{database}/{collection}", post(find::<P>))
        .route("/update/{database}/{collection}", post(update::<P>))
        .with_state(proxy)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn home() -> Json<HomeResponse> {
    Json(HomeResponse::default())
}

async fn health<P: DocumentProxy>(
    State(proxy): State<Arc<P>>,
) -> Result<Json<HealthResult>, ProxyError> {
    Ok(Json(proxy.health_check().await?))
}

async fn insert<P: DocumentProxy>(
    State(proxy): State<Arc<P>>,
    Path((database, collection)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<InsertResult>, ProxyError> {
    let request = InsertRequest::from_body(&body)?;
    Ok(Json(proxy.insert(&database, &collection, request).await?))
}

async fn find<P: DocumentProxy>(
    State(proxy): State<Arc<P>>,
    Path((database, collection)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<FindResult>, ProxyError> {
    let request = FindRequest::from_body(&body)?;
    Ok(Json(proxy.find(&database, &collection, request).await?))
}

async fn update<P: DocumentProxy>(
    State(proxy): State<Arc<P>>,
    Path((database, collection)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<UpdateResult>, ProxyError> {
    let request = UpdateRequest::from_body(&body)?;
    Ok(Json(proxy.update(&database, &collection, request).await?))
}
