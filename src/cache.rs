//! In-memory caching using moka
//!
//! Caches the active event's full catalog (pricing configuration, regions,
//! role profiles, health entities) so quoting and submission read one
//! consistent snapshot without a round trip per field.
//!
//! Freshness is best-effort: entries expire on a short TTL and a background
//! task re-polls the store, so admin edits show up within a refresh interval
//! rather than instantly. Admin mutations also invalidate explicitly.

use moka::future::Cache;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::db;
use crate::error::Result;
use crate::models::EventCatalog;
use crate::pricing::queries;

const ACTIVE_KEY: &str = "active";
const CATALOG_TTL_SECS: u64 = 60;
const REFRESH_INTERVAL_SECS: u64 = 60;

/// Application cache holding the active event catalog
#[derive(Clone)]
pub struct AppCache {
    /// Active event catalog (keyed by the fixed "active" slot)
    catalog: Cache<String, Arc<EventCatalog>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            catalog: Cache::builder()
                .max_capacity(4)
                .time_to_live(Duration::from_secs(CATALOG_TTL_SECS))
                .build(),
        }
    }

    /// Get the catalog for the currently active event, loading it from the
    /// store on a miss. `None` means no event is open for registration.
    pub async fn active_catalog(&self, pool: &PgPool) -> Result<Option<Arc<EventCatalog>>> {
        if let Some(cached) = self.catalog.get(ACTIVE_KEY).await {
            return Ok(Some(cached));
        }
        self.reload_active(pool).await
    }

    /// Drop the cached catalog; the next read reloads from the store.
    /// Called after every admin mutation of pricing data.
    pub fn invalidate_catalog(&self) {
        self.catalog.invalidate_all();
        info!("Catalog cache invalidated");
    }

    async fn reload_active(&self, pool: &PgPool) -> Result<Option<Arc<EventCatalog>>> {
        let Some(event) = db::queries::get_active_event(pool).await? else {
            self.catalog.invalidate_all();
            return Ok(None);
        };

        let config = queries::get_pricing_config(pool, event.id).await?;
        let regions = queries::get_regions(pool, event.id).await?;
        let roles = queries::get_role_profiles(pool, event.id).await?;
        let health_entities = db::queries::get_health_entities(pool).await?;

        let catalog = Arc::new(EventCatalog {
            event,
            config,
            regions,
            roles,
            health_entities,
        });

        self.catalog
            .insert(ACTIVE_KEY.to_string(), catalog.clone())
            .await;

        Ok(Some(catalog))
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the background catalog refresher
///
/// Re-polls the store on a fixed interval so admin consoles and long-lived
/// form sessions converge on fresh pricing without push updates.
pub async fn start_catalog_refresher(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(REFRESH_INTERVAL_SECS));
    loop {
        interval.tick().await;
        match cache.reload_active(&db).await {
            Ok(Some(catalog)) => {
                info!(
                    event = %catalog.event.slug,
                    regions = catalog.regions.len(),
                    roles = catalog.roles.len(),
                    "Catalog refreshed"
                );
            }
            Ok(None) => info!("Catalog refresh: no active event"),
            Err(e) => warn!("Catalog refresh failed: {}", e),
        }
    }
}
