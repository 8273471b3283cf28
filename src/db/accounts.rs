use sqlx::SqlitePool;
use uuid::Uuid;

use super::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub username: String,
    /// PHC-formatted password hash.
    pub password: String,

    // unique: id
    // unique: username
}

/// Inserts a new account. The `UNIQUE` constraint on `username` is the
/// authority on duplicates, so two racing signups cannot both succeed.
pub async fn create_account(
    db_pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<Account, DbError> {
    let id = Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO accounts (id,username,password) VALUES (?,?,?)")
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .execute(db_pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::DuplicateUsername
            }
            e => DbError::Sqlx(e),
        })?;

    Ok(Account {
        id,
        username: username.to_owned(),
        password: password_hash.to_owned(),
    })
}

pub async fn find_account(
    db_pool: &SqlitePool,
    username: &str,
) -> Result<Option<Account>, DbError> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id,username,password FROM accounts WHERE username=?",
    )
    .bind(username)
    .fetch_optional(db_pool)
    .await?;

    Ok(account)
}
