//! Response DTOs for the public pricing endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{EventCatalog, LodgingSource, PricingMode};
use crate::pricing::resolver::PriceBreakdown;

/// Active-event probe. `open` is false when there is no active event or the
/// active event has no pricing configuration yet ("registration closed").
#[derive(Debug, Serialize)]
pub struct EventStatusResponse {
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventSummary>,
}

#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
}

/// Option sets the public form renders its selects from.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub regions: Vec<RegionOption>,
    pub roles: Vec<RoleOption>,
    pub health_entities: Vec<String>,
    pub pricing: PricingSummary,
}

#[derive(Debug, Serialize)]
pub struct RegionOption {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RoleOption {
    pub value_key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Which strategies are active, so the form knows whether picking a region
/// affects the preview.
#[derive(Debug, Serialize)]
pub struct PricingSummary {
    pub mode: PricingMode,
    pub lodging_source: LodgingSource,
    #[serde(with = "rust_decimal::serde::str")]
    pub global_lodging_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
}

impl OptionsResponse {
    pub fn from_catalog(catalog: &EventCatalog) -> Option<Self> {
        let config = catalog.config.as_ref()?;

        Some(Self {
            regions: catalog
                .regions
                .iter()
                .map(|r| RegionOption {
                    name: r.name.clone(),
                })
                .collect(),
            roles: catalog
                .roles
                .iter()
                .map(|r| RoleOption {
                    value_key: r.value_key.clone(),
                    name: r.name.clone(),
                    color: r.color.clone(),
                })
                .collect(),
            health_entities: catalog
                .health_entities
                .iter()
                .map(|e| e.name.clone())
                .collect(),
            pricing: PricingSummary {
                mode: config.mode(),
                lodging_source: config.lodging(),
                global_lodging_price: config.global_lodging_price,
            },
        })
    }
}
