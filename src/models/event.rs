//! Event model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An event open for registration. At most one row is marked active at a
/// time; the public form only ever sees the active one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    /// URL-safe identifier, also used to group receipt uploads.
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub revenue_goal: Option<Decimal>,
}
