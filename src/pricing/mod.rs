//! Pricing engine for the registration form.
//!
//! Price resolution is pure and never fails: the public form previews a
//! price incrementally while the registrant fills fields, so missing inputs
//! contribute zero instead of erroring.

pub mod queries;
pub mod requests;
pub mod resolver;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use resolver::{resolve, round_money, PriceBreakdown};
pub use routes::router;
