//! Backend for the Registra event sign-up platform.
//!
//! A JSON API over an existing PostgreSQL store: the public surface quotes
//! prices and accepts registrations with a payment receipt; the admin
//! surface reviews them, manages the pricing catalog and reads analytics.

use std::sync::Arc;

use sqlx::PgPool;

pub mod admin;
pub mod analytics;
pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod registration;

pub use cache::AppCache;
pub use error::{AppError, FieldError};
pub use registration::ReceiptStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub receipts: Arc<dyn ReceiptStore>,
}
