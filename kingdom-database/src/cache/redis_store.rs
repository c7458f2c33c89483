use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

#[derive(Clone, Debug)]
pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    pub fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("failed to create redis pool: {e}"))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> anyhow::Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("failed to get redis connection: {e}"))
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;

        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis GET failed for key `{key}`: {e}"))?;

        Ok(value)
    }

    pub async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;

        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| anyhow::anyhow!("redis SETEX failed for key `{key}`: {e}"))?;

        Ok(())
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;

        conn.del::<_, u64>(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis DEL failed for key `{key}`: {e}"))?;

        Ok(())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.conn().await?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis PING failed: {e}"))?;

        Ok(())
    }
}
