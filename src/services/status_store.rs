//! services/status_store.rs
//! Registro clave/valor (`status`, `lastCheck`) sobre SQLite.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};

use crate::models::checkin_model::StatusRecord;

const KEY_STATUS: &str = "status";
const KEY_LAST_CHECK: &str = "lastCheck";

#[derive(Clone, Debug)]
pub struct StatusStore {
    db_pool: Pool<Sqlite>,
}

impl StatusStore {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        StatusStore { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo en migraciones del status store")?;
        Ok(())
    }

    /// Sobrescribe ambos campos en una sola transacción; nunca queda a medias.
    pub async fn write(&self, record: &StatusRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self
            .db_pool
            .begin()
            .await
            .context("No se pudo abrir la transacción")?;

        for (key, value) in [
            (KEY_STATUS, record.status_text.as_str()),
            (KEY_LAST_CHECK, record.last_check_time.as_str()),
        ] {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Error escribiendo la clave '{}'", key))?;
        }

        tx.commit().await.context("Error haciendo commit del status")?;
        Ok(())
    }

    /// `None` si todavía no hubo ninguna corrida.
    pub async fn read(&self) -> Result<Option<StatusRecord>> {
        let rows = sqlx::query("SELECT key, value FROM kv_store WHERE key IN (?1, ?2)")
            .bind(KEY_STATUS)
            .bind(KEY_LAST_CHECK)
            .fetch_all(&self.db_pool)
            .await
            .context("Error leyendo el status")?;

        let mut status = None;
        let mut last_check = None;
        for row in rows {
            let key: String = row.try_get("key")?;
            let value: String = row.try_get("value")?;
            match key.as_str() {
                KEY_STATUS => status = Some(value),
                KEY_LAST_CHECK => last_check = Some(value),
                _ => {}
            }
        }

        Ok(match (status, last_check) {
            (Some(status_text), Some(last_check_time)) => Some(StatusRecord {
                status_text,
                last_check_time,
            }),
            _ => None,
        })
    }
}
