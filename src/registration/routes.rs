//! Registration route handlers: public submission, admin review.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, FieldError, Result};
use crate::models::{Registration, RegistrationStatus};
use crate::AppState;

use super::queries::{self, RegistrationFilter};
use super::service;
use super::validate::{ReceiptUpload, RegistrationInput, MAX_RECEIPT_BYTES};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/registrations", post(submit))
        // The receipt alone may be 5 MB; leave headroom for the text fields.
        .layer(DefaultBodyLimit::max(MAX_RECEIPT_BYTES + 512 * 1024))
}

/// Admin review surface, nested under `/api/admin` by the caller.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/registrations", get(list))
        .route("/registrations/:id/status", patch(update_status))
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub status: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub agreed_price: Decimal,
    pub receipt_url: String,
}

/// Public form submission (multipart: registrant fields + receipt image)
async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    let mut input = RegistrationInput::default();
    let mut receipt: Option<ReceiptUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "receipt" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_default();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                receipt = Some(ReceiptUpload {
                    bytes,
                    content_type,
                });
            }
            _ => {
                let value = field.text().await.map_err(bad_multipart)?;
                match name.as_str() {
                    "first_name" => input.first_name = value,
                    "last_name" => input.last_name = value,
                    "email" => input.email = value,
                    "phone" => input.phone = value,
                    "health_entity" => input.health_entity = value,
                    "region" => input.region = value,
                    "role" => input.role = value,
                    "lodging" => input.lodging = value,
                    _ => {}
                }
            }
        }
    }

    let row = service::submit(&state, input, receipt).await?;

    let response = SubmitResponse {
        id: row.id,
        status: row.status.clone(),
        agreed_price: row.agreed_price,
        receipt_url: row.receipt_url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(vec![FieldError::new(
        "form",
        format!("Invalid multipart payload: {}", e),
    )])
}

/// Query parameters for the admin listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

/// List the active event's registrations with optional filters
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Registration>>> {
    let catalog = state
        .cache
        .active_catalog(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;

    let status = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(parse_status(raw)?),
    };

    let filter = RegistrationFilter {
        status,
        region: query.region.filter(|r| !r.is_empty()),
        role: query.role.filter(|r| !r.is_empty()),
        from: query.from,
        to: query.to,
    };

    let rows = queries::list_registrations(&state.db, catalog.event.id, &filter).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    /// Optimistic-concurrency guard: the status the reviewer was looking at.
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount_paid: Option<Decimal>,
}

/// Approve/reject a registration
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Registration>> {
    let new_status = parse_status(&req.status)?;
    let expected = req.expected.as_deref().map(parse_status).transpose()?;

    let updated = service::change_status(&state, id, new_status, expected, req.amount_paid).await?;
    Ok(Json(updated))
}

fn parse_status(raw: &str) -> Result<RegistrationStatus> {
    RegistrationStatus::parse(raw).ok_or_else(|| {
        AppError::Validation(vec![FieldError::new(
            "status",
            format!("Unknown status '{}'", raw),
        )])
    })
}
