mod redis_store;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use redis_store::RedisCacheStore;

/// How long cached per-guild leveling configs live before a re-read.
/// Writes invalidate explicitly; the TTL only bounds staleness when an
/// invalidation is lost.
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for a guild's leveling config.
pub fn leveling_config_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("leveling:config:{guild_id}"))
}

/// Drop a guild's cached leveling config after a write.
pub async fn invalidate_leveling_config(cache: &CacheService, guild_id: u64) -> anyhow::Result<()> {
    cache.remove(&leveling_config_key(cache, guild_id)).await
}

/// JSON cache in front of Postgres. With the `Off` backend every read
/// misses and every write is a no-op, so callers always fall through to
/// their loader.
#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

#[derive(Clone, Debug)]
enum CacheBackend {
    Off,
    Redis(RedisCacheStore),
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Off,
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        let store = RedisCacheStore::connect(redis_url)?;

        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(store),
        })
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    /// Round-trip a PING so startup can report a dead Redis early.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Off => Ok(()),
            CacheBackend::Redis(store) => store.ping().await,
        }
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn read_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let raw = match &self.backend {
            CacheBackend::Off => None,
            CacheBackend::Redis(store) => store.get(key).await?,
        };

        let Some(bytes) = raw else {
            return Ok(None);
        };

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("bad cached JSON under `{key}`: {e}"))?;

        Ok(Some(value))
    }

    pub async fn write_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let CacheBackend::Redis(store) = &self.backend else {
            return Ok(());
        };

        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow::anyhow!("failed to serialize cache value for `{key}`: {e}"))?;

        store.set(key, payload, ttl.as_secs().max(1)).await
    }

    pub async fn remove(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Off => Ok(()),
            CacheBackend::Redis(store) => store.del(key).await,
        }
    }

    /// Read-through: serve the cached value when present, otherwise run
    /// `loader` and store its result. Cache failures degrade to the loader.
    pub async fn read_json_or_load<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.read_json::<T>(key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(source) => warn!(
                ?source,
                cache_key = key,
                "cache read failed; loading from database"
            ),
        }

        let fresh = loader().await?;

        if let Err(source) = self.write_json(key, &fresh, ttl).await {
            warn!(
                ?source,
                cache_key = key,
                "cache write failed; returning loaded value"
            );
        }

        Ok(fresh)
    }
}
