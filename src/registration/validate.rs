//! Submission validation.
//!
//! All checks run before any side effect (upload, insert) and report
//! field-scoped messages, one per failing constraint.

use axum::body::Bytes;
use validator::Validate;

use crate::error::FieldError;
use crate::models::EventCatalog;

pub const LODGING_YES: &str = "si";
pub const LODGING_NO: &str = "no";

/// Receipt images are capped at 5 MB.
pub const MAX_RECEIPT_BYTES: usize = 5_000_000;

/// MIME allow-list for receipt uploads.
pub const ALLOWED_RECEIPT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Raw registrant fields, as collected from the multipart form.
#[derive(Debug, Clone, Default, Validate)]
pub struct RegistrationInput {
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 7, message = "Phone must be at least 7 digits"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Select a health insurance entity"))]
    pub health_entity: String,
    #[validate(length(min = 1, message = "Select a region"))]
    pub region: String,
    #[validate(length(min = 1, message = "Select a participant role"))]
    pub role: String,
    /// Must be exactly `"si"` or `"no"`.
    pub lodging: String,
}

impl RegistrationInput {
    pub fn wants_lodging(&self) -> bool {
        self.lodging == LODGING_YES
    }
}

/// The uploaded receipt image, exactly one per submission.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Field-shape checks that need nothing beyond the input itself.
pub fn validate_input(input: &RegistrationInput) -> Vec<FieldError> {
    let mut fields = Vec::new();

    if let Err(errors) = input.validate() {
        fields.extend(FieldError::from_validator(&errors));
    }

    if input.lodging != LODGING_YES && input.lodging != LODGING_NO {
        fields.push(FieldError::new("lodging", "Lodging must be 'si' or 'no'"));
    }

    fields
}

/// Membership checks against the active event's loaded option sets. A value
/// that passes shape validation but names an option that does not exist (or
/// was deleted mid-session) is rejected here.
pub fn validate_selections(input: &RegistrationInput, catalog: &EventCatalog) -> Vec<FieldError> {
    let mut fields = Vec::new();

    if !input.region.is_empty() && catalog.find_region(&input.region).is_none() {
        fields.push(FieldError::new(
            "region",
            "Selected region is not available for this event",
        ));
    }
    if !input.role.is_empty() && catalog.find_role(&input.role).is_none() {
        fields.push(FieldError::new(
            "role",
            "Selected role is not available for this event",
        ));
    }
    if !input.health_entity.is_empty() && !catalog.has_health_entity(&input.health_entity) {
        fields.push(FieldError::new(
            "health_entity",
            "Unknown health insurance entity",
        ));
    }

    fields
}

/// Receipt constraints: present, within size cap, allowed image type.
pub fn validate_receipt(receipt: Option<&ReceiptUpload>) -> Vec<FieldError> {
    let Some(receipt) = receipt else {
        return vec![FieldError::new("receipt", "Receipt image is required")];
    };

    let mut fields = Vec::new();

    if receipt.bytes.is_empty() {
        fields.push(FieldError::new("receipt", "Receipt image is required"));
    }
    if receipt.bytes.len() > MAX_RECEIPT_BYTES {
        fields.push(FieldError::new("receipt", "Receipt image exceeds 5MB"));
    }
    if !ALLOWED_RECEIPT_TYPES.contains(&receipt.content_type.as_str()) {
        fields.push(FieldError::new(
            "receipt",
            "Receipt must be a JPEG, PNG or WebP image",
        ));
    }

    fields
}
