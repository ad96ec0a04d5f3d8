use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::dto::TransactionRecord;
use super::services::TransactionChanges;

const COLUMNS: &str =
    "id, product_name, quantity, unit_price, total, payment_method, product_id, created_at";

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<TransactionRecord>> {
    sqlx::query_as::<_, TransactionRecord>(&format!(
        "SELECT {COLUMNS} FROM transactions ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<TransactionRecord>> {
    sqlx::query_as::<_, TransactionRecord>(&format!(
        "SELECT {COLUMNS} FROM transactions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert inside the caller's transaction so the stock decrement commits
/// (or rolls back) together with the sale.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    product_name: &str,
    quantity: i32,
    unit_price: f64,
    total: f64,
    payment_method: &str,
    product_id: Option<Uuid>,
) -> sqlx::Result<TransactionRecord> {
    sqlx::query_as::<_, TransactionRecord>(&format!(
        r#"
        INSERT INTO transactions
            (id, product_name, quantity, unit_price, total, payment_method, product_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(product_name)
    .bind(quantity)
    .bind(unit_price)
    .bind(total)
    .bind(payment_method)
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await
}

/// Apply normalized changes as a field mask; `total` is always present in
/// `changes` when either of its inputs changed.
pub async fn update(db: &PgPool, id: Uuid, changes: &TransactionChanges) -> sqlx::Result<u64> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE transactions SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(name) = &changes.product_name {
            set.push("product_name = ").push_bind_unseparated(name.trim().to_owned());
        }
        if let Some(quantity) = changes.quantity {
            set.push("quantity = ").push_bind_unseparated(quantity);
        }
        if let Some(unit_price) = changes.unit_price {
            set.push("unit_price = ").push_bind_unseparated(unit_price);
        }
        if let Some(method) = changes.payment_method {
            set.push("payment_method = ").push_bind_unseparated(method.as_str());
        }
        if let Some(total) = changes.total {
            set.push("total = ").push_bind_unseparated(total);
        }
    }
    qb.push(" WHERE id = ").push_bind(id);

    let res = qb.build().execute(db).await?;
    Ok(res.rows_affected())
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
