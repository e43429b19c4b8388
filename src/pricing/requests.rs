//! Request DTOs for the public pricing endpoints.

use serde::Deserialize;

/// Price preview for a partially filled form. Every field is optional;
/// whatever is missing simply contributes nothing to the quote.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// `"si"` or `"no"`; anything else (or absent) reads as no.
    #[serde(default)]
    pub lodging: Option<String>,
}
