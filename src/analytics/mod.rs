//! Read-only reporting over the registration collection.

pub mod aggregator;
pub mod routes;

pub use routes::router;
