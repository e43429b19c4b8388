//! Pricing catalog models: configuration, regions, role profiles.
//!
//! Mode/method columns are stored as text in the database. Parsing is total:
//! unknown values fall back to the conservative variant instead of failing,
//! so a half-migrated configuration row can never break price resolution.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::Event;

/// Where the base price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// One flat price for every registrant.
    Global,
    /// Each region carries its own base price.
    PerRegion,
}

impl PricingMode {
    pub fn parse(value: &str) -> Self {
        match value {
            "global" => PricingMode::Global,
            _ => PricingMode::PerRegion,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PricingMode::Global => "global",
            PricingMode::PerRegion => "per_region",
        }
    }
}

/// Where the lodging surcharge comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LodgingSource {
    PerRegion,
    GlobalFlat,
}

impl LodgingSource {
    pub fn parse(value: &str) -> Self {
        match value {
            "global_flat" => LodgingSource::GlobalFlat,
            _ => LodgingSource::PerRegion,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LodgingSource::PerRegion => "per_region",
            LodgingSource::GlobalFlat => "global_flat",
        }
    }
}

/// How a role profile's discount value is interpreted. The role is the single
/// authority for this; there is no event-wide discount method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMethod {
    Percentage,
    FixedAmount,
    None,
}

impl DiscountMethod {
    pub fn parse(value: &str) -> Self {
        match value {
            "percentage" => DiscountMethod::Percentage,
            "fixed_amount" => DiscountMethod::FixedAmount,
            _ => DiscountMethod::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiscountMethod::Percentage => "percentage",
            DiscountMethod::FixedAmount => "fixed_amount",
            DiscountMethod::None => "none",
        }
    }
}

/// Active pricing configuration for an event (one row per event).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PricingConfig {
    pub event_id: Uuid,
    pub pricing_mode: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub global_base_price: Decimal,
    pub lodging_source: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub global_lodging_price: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PricingConfig {
    pub fn mode(&self) -> PricingMode {
        PricingMode::parse(&self.pricing_mode)
    }

    pub fn lodging(&self) -> LodgingSource {
        LodgingSource::parse(&self.lodging_source)
    }
}

/// A geographic/organizational unit a registrant selects, with its own base
/// price and optional lodging surcharge.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub lodging_price: Option<Decimal>,
    pub contact_email: Option<String>,
}

/// A participant category driving discount eligibility.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleProfile {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    /// Stable identifier stored on registration records and form options.
    pub value_key: String,
    pub active_method: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_fixed: Decimal,
    pub capacity: Option<i32>,
    pub color: Option<String>,
}

impl RoleProfile {
    pub fn method(&self) -> DiscountMethod {
        DiscountMethod::parse(&self.active_method)
    }
}

/// Health insurance entity from the global lookup list
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HealthEntity {
    pub id: i32,
    pub name: String,
}

/// Everything the public form needs for the active event, loaded in one pass
/// and cached together so a quote and the submission that follows it see a
/// consistent snapshot.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    pub event: Event,
    pub config: Option<PricingConfig>,
    pub regions: Vec<Region>,
    pub roles: Vec<RoleProfile>,
    pub health_entities: Vec<HealthEntity>,
}

impl EventCatalog {
    pub fn find_region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn find_role(&self, value_key: &str) -> Option<&RoleProfile> {
        self.roles.iter().find(|r| r.value_key == value_key)
    }

    pub fn has_health_entity(&self, name: &str) -> bool {
        self.health_entities.iter().any(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_mode_parse_defaults_to_per_region() {
        assert_eq!(PricingMode::parse("global"), PricingMode::Global);
        assert_eq!(PricingMode::parse("per_region"), PricingMode::PerRegion);
        assert_eq!(PricingMode::parse("garbage"), PricingMode::PerRegion);
        assert_eq!(PricingMode::parse(""), PricingMode::PerRegion);
    }

    #[test]
    fn test_lodging_source_parse() {
        assert_eq!(LodgingSource::parse("global_flat"), LodgingSource::GlobalFlat);
        assert_eq!(LodgingSource::parse("per_region"), LodgingSource::PerRegion);
        assert_eq!(LodgingSource::parse("unknown"), LodgingSource::PerRegion);
    }

    #[test]
    fn test_discount_method_parse_defaults_to_none() {
        assert_eq!(DiscountMethod::parse("percentage"), DiscountMethod::Percentage);
        assert_eq!(DiscountMethod::parse("fixed_amount"), DiscountMethod::FixedAmount);
        assert_eq!(DiscountMethod::parse("none"), DiscountMethod::None);
        assert_eq!(DiscountMethod::parse("porcentaje"), DiscountMethod::None);
    }

    #[test]
    fn test_round_trip_as_str() {
        for mode in [PricingMode::Global, PricingMode::PerRegion] {
            assert_eq!(PricingMode::parse(mode.as_str()), mode);
        }
        for src in [LodgingSource::PerRegion, LodgingSource::GlobalFlat] {
            assert_eq!(LodgingSource::parse(src.as_str()), src);
        }
        for m in [
            DiscountMethod::Percentage,
            DiscountMethod::FixedAmount,
            DiscountMethod::None,
        ] {
            assert_eq!(DiscountMethod::parse(m.as_str()), m);
        }
    }
}
