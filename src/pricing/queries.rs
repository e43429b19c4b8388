//! Database queries for the pricing catalog

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{PricingConfig, Region, RoleProfile};

/// Get the pricing configuration row for an event
pub async fn get_pricing_config(pool: &PgPool, event_id: Uuid) -> Result<Option<PricingConfig>> {
    let config = sqlx::query_as::<_, PricingConfig>(
        r#"
        SELECT event_id, pricing_mode, global_base_price,
               lodging_source, global_lodging_price, updated_at
        FROM event_pricing_config
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

/// Get all regions for an event, ordered by name
pub async fn get_regions(pool: &PgPool, event_id: Uuid) -> Result<Vec<Region>> {
    let regions = sqlx::query_as::<_, Region>(
        r#"
        SELECT id, event_id, name, base_price, lodging_price, contact_email
        FROM regions
        WHERE event_id = $1
        ORDER BY name
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(regions)
}

/// Get all role profiles for an event, ordered by name
pub async fn get_role_profiles(pool: &PgPool, event_id: Uuid) -> Result<Vec<RoleProfile>> {
    let roles = sqlx::query_as::<_, RoleProfile>(
        r#"
        SELECT id, event_id, name, value_key, active_method,
               discount_percentage, discount_fixed, capacity, color
        FROM role_profiles
        WHERE event_id = $1
        ORDER BY name
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(roles)
}
