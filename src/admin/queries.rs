//! Database mutations for the admin catalog

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{PricingConfig, Region, RoleProfile};

use super::requests::{ConfigRequest, RegionRequest, RoleRequest};

pub async fn create_region(pool: &PgPool, event_id: Uuid, req: &RegionRequest) -> Result<Region> {
    let region = sqlx::query_as::<_, Region>(
        r#"
        INSERT INTO regions (event_id, name, base_price, lodging_price, contact_email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, event_id, name, base_price, lodging_price, contact_email
        "#,
    )
    .bind(event_id)
    .bind(&req.name)
    .bind(req.base_price)
    .bind(req.lodging_price)
    .bind(&req.contact_email)
    .fetch_one(pool)
    .await?;

    Ok(region)
}

pub async fn update_region(pool: &PgPool, id: Uuid, req: &RegionRequest) -> Result<Option<Region>> {
    let region = sqlx::query_as::<_, Region>(
        r#"
        UPDATE regions
        SET name = $2, base_price = $3, lodging_price = $4, contact_email = $5
        WHERE id = $1
        RETURNING id, event_id, name, base_price, lodging_price, contact_email
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.base_price)
    .bind(req.lodging_price)
    .bind(&req.contact_email)
    .fetch_optional(pool)
    .await?;

    Ok(region)
}

/// Delete a region. Registrations referencing it by name keep that name and
/// read as "unassigned" in reports; referential integrity is deliberately
/// not enforced.
pub async fn delete_region(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM regions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn create_role_profile(
    pool: &PgPool,
    event_id: Uuid,
    req: &RoleRequest,
) -> Result<RoleProfile> {
    let role = sqlx::query_as::<_, RoleProfile>(
        r#"
        INSERT INTO role_profiles (
            event_id, name, value_key, active_method,
            discount_percentage, discount_fixed, capacity, color
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, event_id, name, value_key, active_method,
                  discount_percentage, discount_fixed, capacity, color
        "#,
    )
    .bind(event_id)
    .bind(&req.name)
    .bind(&req.value_key)
    .bind(&req.active_method)
    .bind(req.discount_percentage)
    .bind(req.discount_fixed)
    .bind(req.capacity)
    .bind(&req.color)
    .fetch_one(pool)
    .await?;

    Ok(role)
}

pub async fn update_role_profile(
    pool: &PgPool,
    id: Uuid,
    req: &RoleRequest,
) -> Result<Option<RoleProfile>> {
    let role = sqlx::query_as::<_, RoleProfile>(
        r#"
        UPDATE role_profiles
        SET name = $2, value_key = $3, active_method = $4,
            discount_percentage = $5, discount_fixed = $6, capacity = $7, color = $8
        WHERE id = $1
        RETURNING id, event_id, name, value_key, active_method,
                  discount_percentage, discount_fixed, capacity, color
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.value_key)
    .bind(&req.active_method)
    .bind(req.discount_percentage)
    .bind(req.discount_fixed)
    .bind(req.capacity)
    .bind(&req.color)
    .fetch_optional(pool)
    .await?;

    Ok(role)
}

/// Delete a role profile. Registrants already signed up with it keep their
/// agreed price; nobody new can select it.
pub async fn delete_role_profile(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM role_profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Create or replace the event's pricing configuration (one row per event)
pub async fn upsert_pricing_config(
    pool: &PgPool,
    event_id: Uuid,
    req: &ConfigRequest,
) -> Result<PricingConfig> {
    let config = sqlx::query_as::<_, PricingConfig>(
        r#"
        INSERT INTO event_pricing_config (
            event_id, pricing_mode, global_base_price,
            lodging_source, global_lodging_price, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (event_id) DO UPDATE
        SET pricing_mode = EXCLUDED.pricing_mode,
            global_base_price = EXCLUDED.global_base_price,
            lodging_source = EXCLUDED.lodging_source,
            global_lodging_price = EXCLUDED.global_lodging_price,
            updated_at = now()
        RETURNING event_id, pricing_mode, global_base_price,
                  lodging_source, global_lodging_price, updated_at
        "#,
    )
    .bind(event_id)
    .bind(&req.pricing_mode)
    .bind(req.global_base_price)
    .bind(&req.lodging_source)
    .bind(req.global_lodging_price)
    .fetch_one(pool)
    .await?;

    Ok(config)
}
