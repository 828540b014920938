//! Service wiring: picks the storage backend and builds the access-control
//! service on top of it.

use std::sync::Arc;

use anyhow::Context;

use technia_infra::store::fixtures;
use technia_infra::{AccessControl, PostgresStore, StoreError, Stores, db};

use crate::config::{ApiConfig, StoreBackend};

/// Everything a handler needs, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub access: AccessControl,
    pub stores: Stores,
}

impl AppServices {
    pub fn new(stores: Stores) -> Self {
        Self {
            access: AccessControl::new(stores.identities.clone()),
            stores,
        }
    }

    /// In-memory stores seeded with the demo tenants.
    pub fn in_memory_demo() -> Result<Self, StoreError> {
        let store = Arc::new(fixtures::demo_store()?);
        Ok(Self::new(Stores::from_backend(store)))
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    match &config.backend {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory stores (USE_PERSISTENT_STORES not enabled)");
            Ok(AppServices::in_memory_demo().context("failed to seed in-memory stores")?)
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = db::connect(database_url, *max_connections)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to ensure database schema")?;
            tracing::info!("using Postgres stores");
            Ok(AppServices::new(Stores::from_backend(Arc::new(store))))
        }
    }
}
