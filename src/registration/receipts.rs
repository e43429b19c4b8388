//! Receipt image storage.
//!
//! The store is a seam: submissions only need "bytes in, public URL out".
//! The default implementation writes to a local media directory served by
//! `ServeDir`; swapping in an object-store client is a one-impl change.

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::fs;

/// Blob storage for receipt images.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Store the receipt bytes under `path` and return a retrievable URL.
    async fn store(&self, path: &str, bytes: Bytes) -> anyhow::Result<String>;
}

/// Local-disk receipt store, served statically under `public_base`.
pub struct DiskReceiptStore {
    root: PathBuf,
    public_base: String,
}

impl DiskReceiptStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl ReceiptStore for DiskReceiptStore {
    async fn store(&self, path: &str, bytes: Bytes) -> anyhow::Result<String> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &bytes).await?;

        Ok(format!(
            "{}/{}",
            self.public_base.trim_end_matches('/'),
            path
        ))
    }
}

/// Build the storage path for a receipt: grouped by event slug, named by
/// submission time and registrant surname to avoid collisions.
pub fn receipt_path(
    event_slug: &str,
    last_name: &str,
    content_type: &str,
    when: DateTime<Utc>,
) -> String {
    let ext = match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };

    format!(
        "{}/{}_{}.{}",
        event_slug,
        when.timestamp_millis(),
        sanitize(last_name),
        ext
    )
}

/// Keep surnames filesystem-safe: spaces become underscores, anything
/// outside alphanumerics/dash/underscore is dropped.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_receipt_path_convention() {
        let when = Utc.with_ymd_and_hms(2024, 10, 5, 10, 0, 0).unwrap();
        let path = receipt_path("encuentro-2024", "Gómez Restrepo", "image/jpeg", when);
        assert_eq!(
            path,
            format!("encuentro-2024/{}_Gómez_Restrepo.jpg", when.timestamp_millis())
        );
    }

    #[test]
    fn test_extension_follows_content_type() {
        let when = Utc.with_ymd_and_hms(2024, 10, 5, 10, 0, 0).unwrap();
        assert!(receipt_path("e", "a", "image/png", when).ends_with(".png"));
        assert!(receipt_path("e", "a", "image/webp", when).ends_with(".webp"));
        assert!(receipt_path("e", "a", "image/jpeg", when).ends_with(".jpg"));
    }

    #[test]
    fn test_sanitize_strips_path_hostile_characters() {
        assert_eq!(sanitize("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize("De la Cruz"), "De_la_Cruz");
    }
}
