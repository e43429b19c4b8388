//! Request DTOs for admin catalog management.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::FieldError;

#[derive(Debug, Deserialize, Validate)]
pub struct RegionRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub lodging_price: Option<Decimal>,
    #[serde(default)]
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
}

impl RegionRequest {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldError::from_validator(&errors),
        };
        non_negative("base_price", self.base_price, &mut fields);
        if let Some(lodging) = self.lodging_price {
            non_negative("lodging_price", lodging, &mut fields);
        }
        fields
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Value key is required"))]
    pub value_key: String,
    pub active_method: String,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub discount_percentage: Decimal,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub discount_fixed: Decimal,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RoleRequest {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldError::from_validator(&errors),
        };
        if !matches!(
            self.active_method.as_str(),
            "percentage" | "fixed_amount" | "none"
        ) {
            fields.push(FieldError::new(
                "active_method",
                "Must be 'percentage', 'fixed_amount' or 'none'",
            ));
        }
        if self.discount_percentage < Decimal::ZERO
            || self.discount_percentage > Decimal::ONE_HUNDRED
        {
            fields.push(FieldError::new(
                "discount_percentage",
                "Must be between 0 and 100",
            ));
        }
        non_negative("discount_fixed", self.discount_fixed, &mut fields);
        if matches!(self.capacity, Some(c) if c < 0) {
            fields.push(FieldError::new("capacity", "Must not be negative"));
        }
        fields
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfigRequest {
    pub pricing_mode: String,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub global_base_price: Decimal,
    pub lodging_source: String,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub global_lodging_price: Decimal,
}

impl ConfigRequest {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut fields = Vec::new();
        if !matches!(self.pricing_mode.as_str(), "global" | "per_region") {
            fields.push(FieldError::new(
                "pricing_mode",
                "Must be 'global' or 'per_region'",
            ));
        }
        if !matches!(self.lodging_source.as_str(), "per_region" | "global_flat") {
            fields.push(FieldError::new(
                "lodging_source",
                "Must be 'per_region' or 'global_flat'",
            ));
        }
        non_negative("global_base_price", self.global_base_price, &mut fields);
        non_negative("global_lodging_price", self.global_lodging_price, &mut fields);
        fields
    }
}

fn non_negative(field: &str, value: Decimal, fields: &mut Vec<FieldError>) {
    if value < Decimal::ZERO {
        fields.push(FieldError::new(field, "Must not be negative"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_region_request_rejects_negative_prices() {
        let req = RegionRequest {
            name: "Bogotá".to_string(),
            base_price: dec!(-1),
            lodging_price: Some(dec!(-5)),
            contact_email: None,
        };
        let errors = req.validate_fields();
        assert!(errors.iter().any(|e| e.field == "base_price"));
        assert!(errors.iter().any(|e| e.field == "lodging_price"));
    }

    #[test]
    fn test_region_request_valid() {
        let req = RegionRequest {
            name: "Bogotá".to_string(),
            base_price: dec!(120000),
            lodging_price: None,
            contact_email: Some("sede@example.com".to_string()),
        };
        assert!(req.validate_fields().is_empty());
    }

    #[test]
    fn test_role_request_checks_method_and_percentage_range() {
        let req = RoleRequest {
            name: "Seminarista".to_string(),
            value_key: "seminarista".to_string(),
            active_method: "porcentaje".to_string(),
            discount_percentage: dec!(150),
            discount_fixed: dec!(0),
            capacity: Some(-1),
            color: None,
        };
        let errors = req.validate_fields();
        assert!(errors.iter().any(|e| e.field == "active_method"));
        assert!(errors.iter().any(|e| e.field == "discount_percentage"));
        assert!(errors.iter().any(|e| e.field == "capacity"));
    }

    #[test]
    fn test_config_request_checks_enums() {
        let req = ConfigRequest {
            pricing_mode: "regional".to_string(),
            global_base_price: dec!(80000),
            lodging_source: "flat".to_string(),
            global_lodging_price: dec!(25000),
        };
        let errors = req.validate_fields();
        assert!(errors.iter().any(|e| e.field == "pricing_mode"));
        assert!(errors.iter().any(|e| e.field == "lodging_source"));
    }
}
