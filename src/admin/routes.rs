//! Admin catalog route handlers (regions, role profiles, pricing config).
//!
//! Every mutation targets the active event and drops the catalog cache so
//! the public form converges on the new prices at its next refresh.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{EventCatalog, PricingConfig, Region, RoleProfile};
use crate::AppState;

use super::queries;
use super::requests::{ConfigRequest, RegionRequest, RoleRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/regions", post(create_region))
        .route("/regions/:id", put(update_region).delete(delete_region))
        .route("/roles", post(create_role))
        .route("/roles/:id", put(update_role).delete(delete_role))
        .route("/config", put(update_config))
}

async fn create_region(
    State(state): State<AppState>,
    Json(req): Json<RegionRequest>,
) -> Result<(StatusCode, Json<Region>)> {
    let catalog = active_catalog(&state).await?;
    reject_invalid(req.validate_fields())?;

    let region = queries::create_region(&state.db, catalog.event.id, &req).await?;
    state.cache.invalidate_catalog();
    tracing::info!(region = %region.name, "Region created");

    Ok((StatusCode::CREATED, Json(region)))
}

async fn update_region(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegionRequest>,
) -> Result<Json<Region>> {
    reject_invalid(req.validate_fields())?;

    let region = queries::update_region(&state.db, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_catalog();
    tracing::info!(region = %region.name, "Region updated");

    Ok(Json(region))
}

async fn delete_region(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !queries::delete_region(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    state.cache.invalidate_catalog();
    tracing::info!(%id, "Region deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn create_role(
    State(state): State<AppState>,
    Json(req): Json<RoleRequest>,
) -> Result<(StatusCode, Json<RoleProfile>)> {
    let catalog = active_catalog(&state).await?;
    reject_invalid(req.validate_fields())?;

    let role = queries::create_role_profile(&state.db, catalog.event.id, &req).await?;
    state.cache.invalidate_catalog();
    tracing::info!(role = %role.value_key, "Role profile created");

    Ok((StatusCode::CREATED, Json(role)))
}

async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RoleRequest>,
) -> Result<Json<RoleProfile>> {
    reject_invalid(req.validate_fields())?;

    let role = queries::update_role_profile(&state.db, id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_catalog();
    tracing::info!(role = %role.value_key, "Role profile updated");

    Ok(Json(role))
}

async fn delete_role(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if !queries::delete_role_profile(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    state.cache.invalidate_catalog();
    tracing::info!(%id, "Role profile deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn update_config(
    State(state): State<AppState>,
    Json(req): Json<ConfigRequest>,
) -> Result<Json<PricingConfig>> {
    let catalog = active_catalog(&state).await?;
    reject_invalid(req.validate_fields())?;

    let config = queries::upsert_pricing_config(&state.db, catalog.event.id, &req).await?;
    state.cache.invalidate_catalog();
    tracing::info!(mode = %config.pricing_mode, "Pricing configuration updated");

    Ok(Json(config))
}

async fn active_catalog(state: &AppState) -> Result<Arc<EventCatalog>> {
    state
        .cache
        .active_catalog(&state.db)
        .await?
        .ok_or(AppError::NotFound)
}

fn reject_invalid(fields: Vec<crate::error::FieldError>) -> Result<()> {
    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}
