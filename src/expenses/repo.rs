use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;
use uuid::Uuid;

use super::dto::{Expense, ExpensePatch};

const COLUMNS: &str = "id, category, description, cost, date, notes, created_at, updated_at";

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Expense>> {
    sqlx::query_as::<_, Expense>(&format!(
        "SELECT {COLUMNS} FROM other_expenses ORDER BY date DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    id: Uuid,
    category: &str,
    description: &str,
    cost: f64,
    date: Date,
    notes: &str,
) -> sqlx::Result<Expense> {
    sqlx::query_as::<_, Expense>(&format!(
        r#"
        INSERT INTO other_expenses (id, category, description, cost, date, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(category)
    .bind(description)
    .bind(cost)
    .bind(date)
    .bind(notes)
    .fetch_one(db)
    .await
}

pub async fn update(db: &PgPool, id: Uuid, patch: &ExpensePatch) -> sqlx::Result<u64> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE other_expenses SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(category) = &patch.category {
            set.push("category = ").push_bind_unseparated(category.trim().to_owned());
        }
        if let Some(description) = &patch.description {
            set.push("description = ").push_bind_unseparated(description.trim().to_owned());
        }
        if let Some(cost) = patch.cost {
            set.push("cost = ").push_bind_unseparated(cost);
        }
        if let Some(date) = patch.date {
            set.push("date = ").push_bind_unseparated(date);
        }
        if let Some(notes) = &patch.notes {
            set.push("notes = ").push_bind_unseparated(notes.trim().to_owned());
        }
        set.push("updated_at = now()");
    }
    qb.push(" WHERE id = ").push_bind(id);

    let res = qb.build().execute(db).await?;
    Ok(res.rows_affected())
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM other_expenses WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
