//! Core price resolution.
//!
//! Pure functions for pricing math - no database access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{DiscountMethod, LodgingSource, PricingConfig, PricingMode, Region, RoleProfile};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use registra_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Resolved price parts for one registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub base: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub lodging: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Resolve the price for a (region, role, lodging) selection.
///
/// Rules:
/// - base comes from the configuration's global price in `global` mode,
///   from the selected region otherwise; a missing region contributes 0.
/// - the role's `active_method` is the sole discount authority. Percentage
///   discounts apply only on a positive base; fixed discounts apply
///   regardless of the base and may exceed it.
/// - lodging is charged only when requested, from the region or the global
///   flat value depending on configuration.
/// - the total is clamped at zero: a discount larger than the base never
///   produces a negative amount owed.
pub fn resolve(
    config: &PricingConfig,
    region: Option<&Region>,
    role: Option<&RoleProfile>,
    wants_lodging: bool,
) -> PriceBreakdown {
    let base = match config.mode() {
        PricingMode::Global => config.global_base_price,
        PricingMode::PerRegion => region.map(|r| r.base_price).unwrap_or(Decimal::ZERO),
    };

    let discount = match role {
        None => Decimal::ZERO,
        Some(role) => match role.method() {
            DiscountMethod::None => Decimal::ZERO,
            DiscountMethod::Percentage if base > Decimal::ZERO => {
                round_money(base * role.discount_percentage / Decimal::ONE_HUNDRED, 2)
            }
            DiscountMethod::Percentage => Decimal::ZERO,
            DiscountMethod::FixedAmount => role.discount_fixed,
        },
    };

    let lodging = if wants_lodging {
        match config.lodging() {
            LodgingSource::PerRegion => region
                .and_then(|r| r.lodging_price)
                .unwrap_or(Decimal::ZERO),
            LodgingSource::GlobalFlat => config.global_lodging_price,
        }
    } else {
        Decimal::ZERO
    };

    let total = (base - discount + lodging).max(Decimal::ZERO);

    PriceBreakdown {
        base,
        discount,
        lodging,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn config(mode: &str, lodging_source: &str) -> PricingConfig {
        PricingConfig {
            event_id: Uuid::nil(),
            pricing_mode: mode.to_string(),
            global_base_price: dec!(80000),
            lodging_source: lodging_source.to_string(),
            global_lodging_price: dec!(25000),
            updated_at: None,
        }
    }

    fn region(name: &str, base: Decimal, lodging: Option<Decimal>) -> Region {
        Region {
            id: Uuid::nil(),
            event_id: Uuid::nil(),
            name: name.to_string(),
            base_price: base,
            lodging_price: lodging,
            contact_email: None,
        }
    }

    fn role(method: &str, pct: Decimal, fixed: Decimal) -> RoleProfile {
        RoleProfile {
            id: Uuid::nil(),
            event_id: Uuid::nil(),
            name: method.to_string(),
            value_key: method.to_string(),
            active_method: method.to_string(),
            discount_percentage: pct,
            discount_fixed: fixed,
            capacity: None,
            color: None,
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2)); // rounds down to even
        assert_eq!(round_money(dec!(3.5), 0), dec!(4)); // rounds up to even
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    // ==================== resolve tests ====================

    #[test]
    fn test_per_region_with_lodging_no_discount() {
        // Region-driven pricing, role with no discount, lodging from region
        let cfg = config("per_region", "per_region");
        let bogota = region("Bogotá", dec!(120000), Some(dec!(30000)));
        let laico = role("none", dec!(0), dec!(0));

        let quote = resolve(&cfg, Some(&bogota), Some(&laico), true);

        assert_eq!(quote.base, dec!(120000));
        assert_eq!(quote.discount, dec!(0));
        assert_eq!(quote.lodging, dec!(30000));
        assert_eq!(quote.total, dec!(150000));
    }

    #[test]
    fn test_percentage_discount_halves_base() {
        let cfg = config("per_region", "per_region");
        let r = region("Cali", dec!(100000), None);
        let seminarista = role("percentage", dec!(50), dec!(0));

        let quote = resolve(&cfg, Some(&r), Some(&seminarista), false);

        assert_eq!(quote.discount, dec!(50000));
        assert_eq!(quote.lodging, dec!(0));
        assert_eq!(quote.total, dec!(50000));
    }

    #[test]
    fn test_fixed_discount_clamps_total_at_zero() {
        let cfg = config("per_region", "per_region");
        let r = region("Cali", dec!(100000), None);
        let obispo = role("fixed_amount", dec!(0), dec!(200000));

        let quote = resolve(&cfg, Some(&r), Some(&obispo), false);

        assert_eq!(quote.discount, dec!(200000));
        assert_eq!(quote.total, dec!(0)); // never negative
    }

    #[test]
    fn test_full_percentage_discount_total_is_zero() {
        let cfg = config("per_region", "per_region");
        let r = region("Cali", dec!(100000), None);
        let becado = role("percentage", dec!(100), dec!(0));

        let quote = resolve(&cfg, Some(&r), Some(&becado), false);
        assert_eq!(quote.total, dec!(0));
    }

    #[test]
    fn test_global_mode_ignores_region_base() {
        let cfg = config("global", "per_region");
        let r = region("Medellín", dec!(999999), None);

        let quote = resolve(&cfg, Some(&r), None, false);

        assert_eq!(quote.base, dec!(80000));
        assert_eq!(quote.total, dec!(80000));
    }

    #[test]
    fn test_missing_region_degrades_to_zero_base() {
        // Incomplete form: no region picked yet. Not an error.
        let cfg = config("per_region", "per_region");
        let quote = resolve(&cfg, None, None, false);

        assert_eq!(quote.base, dec!(0));
        assert_eq!(quote.total, dec!(0));
    }

    #[test]
    fn test_percentage_on_zero_base_is_not_applied() {
        let cfg = config("per_region", "per_region");
        let seminarista = role("percentage", dec!(50), dec!(0));

        let quote = resolve(&cfg, None, Some(&seminarista), false);
        assert_eq!(quote.discount, dec!(0));
    }

    #[test]
    fn test_fixed_discount_applies_even_on_zero_base_with_lodging() {
        // Fixed discounts ignore the base magnitude; lodging still clamps
        // the total at zero overall.
        let cfg = config("per_region", "global_flat");
        let obispo = role("fixed_amount", dec!(0), dec!(50000));

        let quote = resolve(&cfg, None, Some(&obispo), true);

        assert_eq!(quote.discount, dec!(50000));
        assert_eq!(quote.lodging, dec!(25000));
        assert_eq!(quote.total, dec!(0)); // max(0, 0 - 50000 + 25000)
    }

    #[test]
    fn test_none_method_ignores_stored_discount_fields() {
        let cfg = config("per_region", "per_region");
        let r = region("Cali", dec!(100000), None);
        // Stored values are stale leftovers; method `none` wins.
        let pleno = role("none", dec!(80), dec!(90000));

        let quote = resolve(&cfg, Some(&r), Some(&pleno), false);
        assert_eq!(quote.discount, dec!(0));
        assert_eq!(quote.total, dec!(100000));
    }

    #[test]
    fn test_global_flat_lodging_ignores_region_price() {
        let cfg = config("per_region", "global_flat");
        let r = region("Bogotá", dec!(120000), Some(dec!(30000)));

        let quote = resolve(&cfg, Some(&r), None, true);
        assert_eq!(quote.lodging, dec!(25000));
    }

    #[test]
    fn test_lodging_not_wanted_charges_nothing() {
        let cfg = config("per_region", "per_region");
        let r = region("Bogotá", dec!(120000), Some(dec!(30000)));

        let quote = resolve(&cfg, Some(&r), None, false);
        assert_eq!(quote.lodging, dec!(0));
        assert_eq!(quote.total, dec!(120000));
    }

    #[test]
    fn test_region_without_lodging_price_contributes_zero() {
        let cfg = config("per_region", "per_region");
        let r = region("Pasto", dec!(90000), None);

        let quote = resolve(&cfg, Some(&r), None, true);
        assert_eq!(quote.lodging, dec!(0));
        assert_eq!(quote.total, dec!(90000));
    }

    #[test]
    fn test_fractional_percentage_is_rounded_bankers() {
        let cfg = config("per_region", "per_region");
        let r = region("Tunja", dec!(100.05), None);
        let medio = role("percentage", dec!(50), dec!(0));

        // 100.05 * 0.5 = 50.025 -> banker's rounding to 50.02
        let quote = resolve(&cfg, Some(&r), Some(&medio), false);
        assert_eq!(quote.discount, dec!(50.02));
        assert_eq!(quote.total, dec!(50.03));
    }
}
