//! SQLite persistence: accounts and the chat messages they own.
//!
//! Only inserts and reads are exposed; rows are never updated or deleted.

mod accounts;
mod messages;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub use accounts::{create_account, find_account, Account};
pub use messages::{list_messages, record_message, Message};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("username already registered")]
    DuplicateUsername,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens the database (creating the file if needed) and applies migrations.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;

    Ok(db_pool)
}
