use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::dto::{Product, ProductPatch};

const COLUMNS: &str =
    "id, code, name, image, purchase_price, selling_price, stock, created_at, updated_at";

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Product>> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM products ORDER BY name ASC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Product>> {
    sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    db: &PgPool,
    id: Uuid,
    code: Option<&str>,
    name: &str,
    image: Option<&str>,
    purchase_price: f64,
    selling_price: f64,
    stock: i32,
) -> sqlx::Result<Product> {
    sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (id, code, name, image, purchase_price, selling_price, stock)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(code)
    .bind(name)
    .bind(image)
    .bind(purchase_price)
    .bind(selling_price)
    .bind(stock)
    .fetch_one(db)
    .await
}

/// Apply a field mask. The SET list is assembled from present fields only,
/// every value going through a bind parameter.
pub async fn update(db: &PgPool, id: Uuid, patch: &ProductPatch) -> sqlx::Result<u64> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE products SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(code) = &patch.code {
            set.push("code = ").push_bind_unseparated(code.trim().to_owned());
        }
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.trim().to_owned());
        }
        if let Some(image) = &patch.image {
            set.push("image = ").push_bind_unseparated(image.clone());
        }
        if let Some(purchase_price) = patch.purchase_price {
            set.push("purchase_price = ").push_bind_unseparated(purchase_price);
        }
        if let Some(selling_price) = patch.selling_price {
            set.push("selling_price = ").push_bind_unseparated(selling_price);
        }
        if let Some(stock) = patch.stock {
            set.push("stock = ").push_bind_unseparated(stock);
        }
        set.push("updated_at = now()");
    }
    qb.push(" WHERE id = ").push_bind(id);

    let res = qb.build().execute(db).await?;
    Ok(res.rows_affected())
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

/// Conditional decrement: only applies when enough stock remains, so stock
/// never goes negative. Returns 0 when the guard (or the id) did not match.
pub async fn decrement_stock(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    qty: i32,
) -> sqlx::Result<u64> {
    let res = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - $1, updated_at = now()
        WHERE id = $2 AND stock >= $1
        "#,
    )
    .bind(qty)
    .bind(product_id)
    .execute(&mut **tx)
    .await?;
    Ok(res.rows_affected())
}
