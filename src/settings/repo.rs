use sqlx::{PgPool, Postgres, QueryBuilder};

use super::dto::{SettingsPatch, StoreSettings};

pub const SETTINGS_ID: i32 = 1;
pub const DEFAULT_STORE_NAME: &str = "Paper Distributor";

/// Fetch the singleton row, creating it with defaults on first read.
pub async fn get_or_init(db: &PgPool) -> sqlx::Result<StoreSettings> {
    if let Some(settings) = sqlx::query_as::<_, StoreSettings>(
        "SELECT id, store_name, store_logo FROM store_settings WHERE id = $1",
    )
    .bind(SETTINGS_ID)
    .fetch_optional(db)
    .await?
    {
        return Ok(settings);
    }

    sqlx::query_as::<_, StoreSettings>(
        r#"
        INSERT INTO store_settings (id, store_name)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET store_name = store_settings.store_name
        RETURNING id, store_name, store_logo
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(DEFAULT_STORE_NAME)
    .fetch_one(db)
    .await
}

pub async fn update(db: &PgPool, patch: &SettingsPatch) -> sqlx::Result<u64> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE store_settings SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(store_name) = &patch.store_name {
            set.push("store_name = ").push_bind_unseparated(store_name.trim().to_owned());
        }
        if let Some(store_logo) = &patch.store_logo {
            set.push("store_logo = ").push_bind_unseparated(store_logo.clone());
        }
    }
    qb.push(" WHERE id = ").push_bind(SETTINGS_ID);

    let res = qb.build().execute(db).await?;
    Ok(res.rows_affected())
}
