//! Public pricing route handlers

use axum::{extract::State, routing::get, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::pricing::requests::QuoteRequest;
use crate::pricing::resolver;
use crate::pricing::responses::{
    EventStatusResponse, EventSummary, OptionsResponse, QuoteResponse,
};
use crate::registration::validate::LODGING_YES;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/event", get(active_event))
        .route("/api/event/options", get(options))
        .route("/api/quote", post(quote))
}

/// Active-event probe for the public form. Never errors on "no event":
/// a closed registration window is a normal answer, not a failure.
async fn active_event(State(state): State<AppState>) -> Result<Json<EventStatusResponse>> {
    let catalog = state.cache.active_catalog(&state.db).await?;

    let response = match catalog {
        Some(catalog) => EventStatusResponse {
            open: catalog.config.is_some(),
            event: Some(EventSummary {
                id: catalog.event.id,
                name: catalog.event.name.clone(),
                slug: catalog.event.slug.clone(),
                description: catalog.event.description.clone(),
                start_date: catalog.event.start_date,
            }),
        },
        None => EventStatusResponse {
            open: false,
            event: None,
        },
    };

    Ok(Json(response))
}

/// Option sets for the active event's form selects
async fn options(State(state): State<AppState>) -> Result<Json<OptionsResponse>> {
    let catalog = state
        .cache
        .active_catalog(&state.db)
        .await?
        .ok_or(AppError::RegistrationClosed)?;

    let response =
        OptionsResponse::from_catalog(&catalog).ok_or(AppError::RegistrationClosed)?;

    Ok(Json(response))
}

/// Incremental price preview while the registrant fills the form
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let catalog = state
        .cache
        .active_catalog(&state.db)
        .await?
        .ok_or(AppError::RegistrationClosed)?;
    let config = catalog
        .config
        .as_ref()
        .ok_or(AppError::RegistrationClosed)?;

    let region = req.region.as_deref().and_then(|n| catalog.find_region(n));
    let role = req.role.as_deref().and_then(|k| catalog.find_role(k));
    let wants_lodging = req.lodging.as_deref() == Some(LODGING_YES);

    let breakdown = resolver::resolve(config, region, role, wants_lodging);

    Ok(Json(QuoteResponse { breakdown }))
}
