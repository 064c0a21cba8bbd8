//! PostgreSQL-backed store.
//!
//! Every record is one row of `kv_records`; the hash lives in a JSONB
//! column and expiry is an absolute timestamp checked on every read.

use super::{Fields, KeyValueStore, StoreError};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use std::future::Future;
use std::time::Duration;

pub struct PgKeyValueStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgKeyValueStore {
    /// Create a store on top of an existing pool.
    ///
    /// Each call is abandoned with [`StoreError::Timeout`] after `op_timeout`.
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.op_timeout)),
        }
    }
}

fn push_escaped(pattern: &mut String, literal: &str) {
    for c in literal.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
}

/// `LIKE` pattern matching keys that start with `prefix` and end with
/// `suffix`, both taken literally.
fn like_pattern(prefix: &str, suffix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + suffix.len() + 1);
    push_escaped(&mut pattern, prefix);
    pattern.push('%');
    push_escaped(&mut pattern, suffix);
    pattern
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    #[tracing::instrument(skip_all, err, name = "KV:put_record")]
    async fn put_record(
        &self,
        key: &str,
        fields: Fields,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let ttl_secs = ttl.map(|ttl| ttl.as_secs_f64());
        self.bounded(
            sqlx::query(
                r#"
                INSERT INTO kv_records (key, fields, expires_at)
                VALUES (
                    $1,
                    $2,
                    CASE WHEN $3::float8 IS NULL THEN NULL
                         ELSE NOW() + make_interval(secs => $3::float8)
                    END
                )
                ON CONFLICT (key) DO UPDATE
                SET fields = EXCLUDED.fields, expires_at = EXCLUDED.expires_at
                "#,
            )
            .bind(key)
            .bind(Json(fields))
            .bind(ttl_secs)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, err, name = "KV:get_record")]
    async fn get_record(&self, key: &str) -> Result<Option<Fields>, StoreError> {
        let row = self
            .bounded(
                sqlx::query_scalar::<_, Json<Fields>>(
                    r#"
                    SELECT fields
                    FROM kv_records
                    WHERE key = $1
                      AND (expires_at IS NULL OR expires_at > NOW())
                    "#,
                )
                .bind(key)
                .fetch_optional(&self.pool),
            )
            .await?;
        Ok(row.map(|Json(fields)| fields))
    }

    #[tracing::instrument(skip_all, err, name = "KV:scan_keys")]
    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT key
                FROM kv_records
                WHERE key LIKE $1 ESCAPE '\'
                  AND (expires_at IS NULL OR expires_at > NOW())
                ORDER BY key
                "#,
            )
            .bind(like_pattern(prefix, ""))
            .fetch_all(&self.pool),
        )
        .await
    }

    #[tracing::instrument(skip_all, err, name = "KV:scan_keys_with_suffix")]
    async fn scan_keys_with_suffix(
        &self,
        prefix: &str,
        suffix: &str,
    ) -> Result<Vec<String>, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT key
                FROM kv_records
                WHERE key LIKE $1 ESCAPE '\'
                  AND (expires_at IS NULL OR expires_at > NOW())
                ORDER BY key
                "#,
            )
            .bind(like_pattern(prefix, suffix))
            .fetch_all(&self.pool),
        )
        .await
    }

    #[tracing::instrument(skip_all, err, name = "KV:delete_record")]
    async fn delete_record(&self, key: &str) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    DELETE FROM kv_records
                    WHERE key = $1
                      AND (expires_at IS NULL OR expires_at > NOW())
                    "#,
                )
                .bind(key)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, err, name = "KV:purge_expired")]
    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = self
            .bounded(
                sqlx::query(
                    r#"
                    DELETE FROM kv_records
                    WHERE expires_at IS NOT NULL AND expires_at <= NOW()
                    "#,
                )
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("event:e1:session:", ""), "event:e1:session:%");
        assert_eq!(like_pattern("event:a_b%:", ""), "event:a\\_b\\%:%");
        assert_eq!(like_pattern("x\\y", ""), "x\\\\y%");
    }

    #[test]
    fn test_like_pattern_with_suffix() {
        assert_eq!(like_pattern("event:", ":meta"), "event:%:meta");
        assert_eq!(like_pattern("event:", "_x"), "event:%\\_x");
    }
}
