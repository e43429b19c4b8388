//! Registration workflow: submission and status transitions.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewRegistration, Registration, RegistrationStatus};
use crate::pricing::resolver;
use crate::AppState;

use super::queries;
use super::receipts;
use super::validate::{self, RegistrationInput, ReceiptUpload};

/// Submit a registration for the active event.
///
/// Order matters: validation runs before any side effect, the receipt upload
/// runs before the insert. An upload failure therefore leaves no partial
/// record behind, and price resolution itself can never fail the submission.
pub async fn submit(
    state: &AppState,
    input: RegistrationInput,
    receipt: Option<ReceiptUpload>,
) -> Result<Registration> {
    let catalog = state
        .cache
        .active_catalog(&state.db)
        .await?
        .ok_or(AppError::RegistrationClosed)?;
    let config = catalog
        .config
        .as_ref()
        .ok_or(AppError::RegistrationClosed)?;

    let mut fields = validate::validate_input(&input);
    fields.extend(validate::validate_selections(&input, &catalog));
    fields.extend(validate::validate_receipt(receipt.as_ref()));
    if !fields.is_empty() {
        return Err(AppError::Validation(fields));
    }
    let receipt = receipt.expect("receipt presence checked during validation");

    // Stamp the price now; this value is frozen on the record and never
    // recomputed, whatever happens to the configuration afterwards.
    let quote = resolver::resolve(
        config,
        catalog.find_region(&input.region),
        catalog.find_role(&input.role),
        input.wants_lodging(),
    );

    let path = receipts::receipt_path(
        &catalog.event.slug,
        &input.last_name,
        &receipt.content_type,
        Utc::now(),
    );
    let receipt_url = state
        .receipts
        .store(&path, receipt.bytes)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;

    let lodging = input.wants_lodging();
    let new = NewRegistration {
        event_id: catalog.event.id,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        phone: input.phone,
        health_entity: input.health_entity,
        region_name: input.region,
        role_key: input.role,
        lodging,
        receipt_url,
        agreed_price: quote.total,
    };

    let row = queries::insert_registration(&state.db, &new).await?;
    tracing::info!(
        registration = %row.id,
        region = %row.region_name,
        total = %row.agreed_price,
        "Registration submitted"
    );

    Ok(row)
}

/// Transition a registration to a new status under administrator action.
///
/// Semantics:
/// - same-status calls are idempotent no-ops (modulo recording `amount_paid`);
/// - only pending→approved, pending→rejected and approved→rejected exist;
///   `rejected` is terminal and re-entry means a new submission;
/// - when the caller supplies `expected`, the record must still be in that
///   status, otherwise the call fails with a conflict instead of silently
///   overwriting another reviewer's decision;
/// - the write itself is conditional on the status read here, so two
///   concurrent reviewers cannot both land an update.
pub async fn change_status(
    state: &AppState,
    id: Uuid,
    new_status: RegistrationStatus,
    expected: Option<RegistrationStatus>,
    amount_paid: Option<Decimal>,
) -> Result<Registration> {
    let current = queries::find_registration(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let current_status = current.workflow_status();

    if let Some(expected) = expected {
        if expected != current_status {
            return Err(AppError::Conflict(format!(
                "registration is {}, expected {}",
                current_status.as_str(),
                expected.as_str()
            )));
        }
    }

    if current_status == new_status {
        if amount_paid.is_none() {
            // Idempotent: approving an approved record changes nothing.
            return Ok(current);
        }
    } else if !current_status.can_transition_to(new_status) {
        return Err(AppError::Conflict(format!(
            "cannot move a {} registration to {}",
            current_status.as_str(),
            new_status.as_str()
        )));
    }

    let updated = queries::update_status(&state.db, id, new_status, current_status, amount_paid)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("registration was modified by another administrator".to_string())
        })?;

    tracing::info!(
        registration = %updated.id,
        from = current_status.as_str(),
        to = new_status.as_str(),
        "Registration status updated"
    );

    Ok(updated)
}
