//! Database queries for registrations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewRegistration, Registration, RegistrationStatus};

const REGISTRATION_COLUMNS: &str = r#"
    id, event_id, first_name, last_name, email, phone, health_entity,
    region_name, role_key, lodging, receipt_url, agreed_price, amount_paid,
    status, created_at
"#;

/// Insert a new registration in `pending` state and return the stored row.
/// Every submission creates a distinct row; there is no deduplication.
pub async fn insert_registration(pool: &PgPool, new: &NewRegistration) -> Result<Registration> {
    let row = sqlx::query_as::<_, Registration>(&format!(
        r#"
        INSERT INTO registrations (
            event_id, first_name, last_name, email, phone, health_entity,
            region_name, role_key, lodging, receipt_url, agreed_price, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {REGISTRATION_COLUMNS}
        "#
    ))
    .bind(new.event_id)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(&new.health_entity)
    .bind(&new.region_name)
    .bind(&new.role_key)
    .bind(new.lodging)
    .bind(&new.receipt_url)
    .bind(new.agreed_price)
    .bind(RegistrationStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Get a registration by id
pub async fn find_registration(pool: &PgPool, id: Uuid) -> Result<Option<Registration>> {
    let row = sqlx::query_as::<_, Registration>(&format!(
        r#"
        SELECT {REGISTRATION_COLUMNS}
        FROM registrations
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Optional filters for the admin listing. All absent means "everything".
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub status: Option<RegistrationStatus>,
    pub region: Option<String>,
    pub role: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// List an event's registrations, oldest first, with optional filters
pub async fn list_registrations(
    pool: &PgPool,
    event_id: Uuid,
    filter: &RegistrationFilter,
) -> Result<Vec<Registration>> {
    let rows = sqlx::query_as::<_, Registration>(&format!(
        r#"
        SELECT {REGISTRATION_COLUMNS}
        FROM registrations
        WHERE event_id = $1
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL OR region_name = $3)
          AND ($4::text IS NULL OR role_key = $4)
          AND ($5::timestamptz IS NULL OR created_at >= $5)
          AND ($6::timestamptz IS NULL OR created_at < $6)
        ORDER BY created_at ASC
        "#
    ))
    .bind(event_id)
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.region.as_deref())
    .bind(filter.role.as_deref())
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Conditionally update a registration's status (and optionally the amount
/// paid). The update only lands if the row is still in `expected` status;
/// `None` on return means another administrator got there first.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    new_status: RegistrationStatus,
    expected: RegistrationStatus,
    amount_paid: Option<Decimal>,
) -> Result<Option<Registration>> {
    let row = sqlx::query_as::<_, Registration>(&format!(
        r#"
        UPDATE registrations
        SET status = $2,
            amount_paid = COALESCE($3, amount_paid)
        WHERE id = $1
          AND status = $4
        RETURNING {REGISTRATION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new_status.as_str())
    .bind(amount_paid)
    .bind(expected.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
