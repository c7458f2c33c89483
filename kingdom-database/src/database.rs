use sqlx::{PgPool, migrate::Migrator};

use crate::cache::CacheService;

/// Migrations embedded from `migrations/` at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres pool plus cache, cloned into every command context.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    /// Pool handle for the query modules.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}
