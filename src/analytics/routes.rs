//! Admin analytics and export route handlers

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::EventCatalog;
use crate::registration::queries::{self, RegistrationFilter};
use crate::AppState;

use super::aggregator::{
    self, GoalProgress, GrowthRate, GroupStat, RevenueSummary, StatusCounts, TrendPoint,
    UNASSIGNED,
};

const DEFAULT_GROWTH_WINDOW_DAYS: i64 = 7;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(summary))
        .route("/analytics/trend", get(trend))
        .route("/analytics/growth", get(growth))
        .route("/export", get(export))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub counts: StatusCounts,
    pub revenue: RevenueSummary,
    pub by_region: Vec<GroupStat>,
    pub by_role: Vec<GroupStat>,
    /// Approved registrants who asked for lodging.
    pub lodging_approved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalProgress>,
}

/// Headline numbers for the admin dashboard
async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>> {
    let catalog = active_catalog(&state).await?;
    let rows =
        queries::list_registrations(&state.db, catalog.event.id, &RegistrationFilter::default())
            .await?;

    let revenue = aggregator::revenue_summary(&rows);
    let goal = aggregator::goal_progress(catalog.event.revenue_goal, revenue.collected);

    Ok(Json(SummaryResponse {
        event_id: catalog.event.id,
        event_name: catalog.event.name.clone(),
        counts: aggregator::status_counts(&rows),
        by_region: aggregator::by_region(&rows),
        by_role: aggregator::by_role(&rows),
        lodging_approved: aggregator::lodging_uptake(&rows),
        revenue,
        goal,
    }))
}

/// Daily sign-up series for the time chart
async fn trend(State(state): State<AppState>) -> Result<Json<Vec<TrendPoint>>> {
    let catalog = active_catalog(&state).await?;
    let rows =
        queries::list_registrations(&state.db, catalog.event.id, &RegistrationFilter::default())
            .await?;

    Ok(Json(aggregator::daily_trend(&rows)))
}

#[derive(Debug, Deserialize)]
pub struct GrowthQuery {
    #[serde(default)]
    pub window: Option<i64>,
}

/// Window-over-window growth of sign-up volume
async fn growth(
    State(state): State<AppState>,
    Query(query): Query<GrowthQuery>,
) -> Result<Json<GrowthRate>> {
    let catalog = active_catalog(&state).await?;
    let rows =
        queries::list_registrations(&state.db, catalog.event.id, &RegistrationFilter::default())
            .await?;

    let window = query.window.unwrap_or(DEFAULT_GROWTH_WINDOW_DAYS);
    Ok(Json(aggregator::growth_rate(&rows, Utc::now(), window)))
}

/// One denormalized spreadsheet-ready row per registration. Region and role
/// references are resolved to display names; a role whose profile was
/// deleted reads as unassigned.
#[derive(Debug, Serialize)]
pub struct ExportRow {
    pub registered_at: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub health_entity: String,
    pub region: String,
    pub role: String,
    pub lodging: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub agreed_price: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub amount_paid: Option<Decimal>,
    pub status: String,
    pub receipt_url: String,
}

/// Full denormalized listing for the external export collaborator
async fn export(State(state): State<AppState>) -> Result<Json<Vec<ExportRow>>> {
    let catalog = active_catalog(&state).await?;
    let rows =
        queries::list_registrations(&state.db, catalog.event.id, &RegistrationFilter::default())
            .await?;

    let export: Vec<ExportRow> = rows
        .into_iter()
        .map(|r| {
            let role = catalog
                .find_role(&r.role_key)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNASSIGNED.to_string());
            let region = if r.region_name.is_empty() {
                UNASSIGNED.to_string()
            } else {
                r.region_name.clone()
            };

            ExportRow {
                registered_at: r.created_at,
                full_name: format!("{} {}", r.first_name, r.last_name),
                email: r.email,
                phone: r.phone,
                health_entity: r.health_entity,
                region,
                role,
                lodging: r.lodging,
                agreed_price: r.agreed_price,
                amount_paid: r.amount_paid,
                status: r.status,
                receipt_url: r.receipt_url,
            }
        })
        .collect();

    Ok(Json(export))
}

async fn active_catalog(state: &AppState) -> Result<std::sync::Arc<EventCatalog>> {
    state
        .cache
        .active_catalog(&state.db)
        .await?
        .ok_or(AppError::NotFound)
}
