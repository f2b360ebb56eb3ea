use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Namespaced string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    /// All entries of a namespace, ordered by key.
    fn entries<'a>(
        &'a self,
        namespace: &'a str,
    ) -> BoxFuture<'a, Result<Vec<(String, String)>, StoreError>>;

    fn put<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
        value: String,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Returns whether an entry was removed.
    fn remove<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<bool, StoreError>>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteStore {
    fn get<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            let value = sqlx::query_scalar::<_, String>(
                "SELECT value FROM kv_store WHERE namespace = ? AND key = ?",
            )
            .bind(namespace)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

            Ok(value)
        })
    }

    fn entries<'a>(
        &'a self,
        namespace: &'a str,
    ) -> BoxFuture<'a, Result<Vec<(String, String)>, StoreError>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, (String, String)>(
                "SELECT key, value FROM kv_store WHERE namespace = ? ORDER BY key",
            )
            .bind(namespace)
            .fetch_all(&self.pool)
            .await?;

            Ok(rows)
        })
    }

    fn put<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
        value: String,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            sqlx::query(
                r#"
                INSERT INTO kv_store (namespace, key, value)
                VALUES (?, ?, ?)
                ON CONFLICT(namespace, key)
                DO UPDATE SET value = excluded.value, updated_at = datetime('now')
                "#,
            )
            .bind(namespace)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

            Ok(())
        })
    }

    fn remove<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM kv_store WHERE namespace = ? AND key = ?")
                .bind(namespace)
                .bind(key)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        })
    }
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<(String, String), String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            let entries = self.entries.read().await;
            Ok(entries
                .get(&(namespace.to_string(), key.to_string()))
                .cloned())
        })
    }

    fn entries<'a>(
        &'a self,
        namespace: &'a str,
    ) -> BoxFuture<'a, Result<Vec<(String, String)>, StoreError>> {
        Box::pin(async move {
            let entries = self.entries.read().await;
            Ok(entries
                .iter()
                .filter(|((ns, _), _)| ns == namespace)
                .map(|((_, key), value)| (key.clone(), value.clone()))
                .collect())
        })
    }

    fn put<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
        value: String,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.entries
                .write()
                .await
                .insert((namespace.to_string(), key.to_string()), value);
            Ok(())
        })
    }

    fn remove<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            Ok(self
                .entries
                .write()
                .await
                .remove(&(namespace.to_string(), key.to_string()))
                .is_some())
        })
    }
}
