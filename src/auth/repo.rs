use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Find a user by email. Emails are stored lowercase, so callers pass a
    /// lowercased value.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        id: Uuid,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, full_name, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(db)
        .await
    }
}

/// A live session row joined with its user.
#[derive(Debug, FromRow)]
pub struct SessionRow {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

/// All non-expired sessions. Expired rows are simply left behind until the
/// next issuance for that user deletes them.
pub async fn live_sessions(db: &PgPool) -> sqlx::Result<Vec<SessionRow>> {
    sqlx::query_as::<_, SessionRow>(
        r#"
        SELECT t.token, u.id AS user_id, u.email, u.full_name
        FROM user_tokens t
        INNER JOIN users u ON u.id = t.user_id
        WHERE t.expires_at > now()
        "#,
    )
    .fetch_all(db)
    .await
}

/// Persist a fresh token for the user, revoking everything issued before.
/// Delete and insert commit together so there is no window with zero or two
/// live sessions.
pub async fn issue_token(
    db: &PgPool,
    user_id: Uuid,
    token: &str,
    ttl_days: i64,
) -> sqlx::Result<()> {
    let expires_at = OffsetDateTime::now_utc() + Duration::days(ttl_days);

    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM user_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r#"
        INSERT INTO user_tokens (id, user_id, token, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await
}

/// Delete one token by value; returns the number of rows removed so logout
/// can stay idempotent.
pub async fn delete_token(db: &PgPool, token: &str) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM user_tokens WHERE token = $1")
        .bind(token)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
