//! Database queries for events and shared lookup lists

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Event, HealthEntity};

/// Get the event currently open for registration, if any.
///
/// The store guarantees at most one active row; if an operator ever leaves
/// two active, the most recently starting one wins deterministically.
pub async fn get_active_event(pool: &PgPool) -> Result<Option<Event>> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, name, slug, description, is_active, start_date, revenue_goal
        FROM events
        WHERE is_active = true
        ORDER BY start_date DESC NULLS LAST
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

/// Get the global health insurance entity list, ordered by name
pub async fn get_health_entities(pool: &PgPool) -> Result<Vec<HealthEntity>> {
    let entities = sqlx::query_as::<_, HealthEntity>(
        r#"
        SELECT id, name
        FROM health_entities
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(entities)
}
