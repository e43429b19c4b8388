//! Administrator catalog management.

pub mod queries;
pub mod requests;
pub mod routes;

pub use routes::router;
