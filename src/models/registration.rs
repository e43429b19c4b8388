//! Registration record and its status workflow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Review status of a registration.
///
/// `pending` is the only creation state. `rejected` is terminal: re-entry
/// happens through a brand-new submission, not a resurrection of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RegistrationStatus::Pending),
            "approved" => Some(RegistrationStatus::Approved),
            "rejected" => Some(RegistrationStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    /// Whether an administrator may move a record from `self` to `to`.
    /// Same-state "transitions" are handled by the caller as no-ops.
    pub fn can_transition_to(self, to: RegistrationStatus) -> bool {
        use RegistrationStatus::*;
        matches!(
            (self, to),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Rejected)
        )
    }
}

/// A submitted, priced, status-tracked sign-up.
///
/// `agreed_price` is stamped once at submission and never recomputed;
/// later changes to pricing configuration do not touch existing rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub health_entity: String,
    /// Region referenced by name; the region row may since have been deleted.
    pub region_name: String,
    /// Role referenced by its stable value key.
    pub role_key: String,
    pub lodging: bool,
    pub receipt_url: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub agreed_price: Decimal,
    /// Administrator-entered amount, which may differ from `agreed_price`
    /// for partial payments.
    #[serde(with = "rust_decimal::serde::str_option")]
    pub amount_paid: Option<Decimal>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Parsed status; unknown stored values read as `pending` so a bad row
    /// surfaces in the review queue instead of disappearing.
    pub fn workflow_status(&self) -> RegistrationStatus {
        RegistrationStatus::parse(&self.status).unwrap_or(RegistrationStatus::Pending)
    }

    /// The amount that counts toward revenue: what was actually paid if the
    /// administrator recorded it, the agreed price otherwise.
    pub fn effective_amount(&self) -> Decimal {
        self.amount_paid.unwrap_or(self.agreed_price)
    }
}

/// Insert payload for a new registration. Price is already resolved and
/// receipt already uploaded by the time this exists.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub health_entity: String,
    pub region_name: String,
    pub role_key: String,
    pub lodging: bool,
    pub receipt_url: String,
    pub agreed_price: Decimal,
}
