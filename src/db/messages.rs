use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub account_id: String,

    pub message: String,
    pub response: String,
    pub created_at: OffsetDateTime,

    // unique: id
}

pub async fn record_message(
    db_pool: &SqlitePool,
    account_id: &str,
    message: &str,
    response: &str,
) -> Result<Message, DbError> {
    let id = Uuid::now_v7().to_string();
    let created_at = OffsetDateTime::now_utc();

    sqlx::query("INSERT INTO messages (id,account_id,message,response,created_at) VALUES (?,?,?,?,?)")
        .bind(&id)
        .bind(account_id)
        .bind(message)
        .bind(response)
        .bind(created_at)
        .execute(db_pool)
        .await?;

    Ok(Message {
        id,
        account_id: account_id.to_owned(),
        message: message.to_owned(),
        response: response.to_owned(),
        created_at,
    })
}

/// All messages owned by the account, in insertion order.
pub async fn list_messages(db_pool: &SqlitePool, account_id: &str) -> Result<Vec<Message>, DbError> {
    let messages = sqlx::query_as::<_, Message>(
        "SELECT id,account_id,message,response,created_at FROM messages WHERE account_id=? ORDER BY rowid",
    )
    .bind(account_id)
    .fetch_all(db_pool)
    .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_account, tests::temp_pool};

    #[tokio::test]
    async fn list_returns_insertion_order() {
        let (_dir, db_pool) = temp_pool().await;
        let alice = create_account(&db_pool, "alice", "h").await.unwrap();

        for i in 0..5 {
            record_message(&db_pool, &alice.id, &format!("q{i}"), &format!("a{i}"))
                .await
                .unwrap();
        }

        let messages = list_messages(&db_pool, &alice.id).await.unwrap();
        let inputs: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(inputs, vec!["q0", "q1", "q2", "q3", "q4"]);
        assert!(messages.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn messages_are_scoped_to_their_account() {
        let (_dir, db_pool) = temp_pool().await;
        let alice = create_account(&db_pool, "alice", "h").await.unwrap();
        let bob = create_account(&db_pool, "bob", "h").await.unwrap();

        record_message(&db_pool, &alice.id, "hello", "hi").await.unwrap();

        assert_eq!(list_messages(&db_pool, &alice.id).await.unwrap().len(), 1);
        assert!(list_messages(&db_pool, &bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recorded_message_round_trips_timestamp_as_utc() {
        let (_dir, db_pool) = temp_pool().await;
        let alice = create_account(&db_pool, "alice", "h").await.unwrap();

        let before = OffsetDateTime::now_utc();
        let recorded = record_message(&db_pool, &alice.id, "hello", "hi").await.unwrap();

        let stored = list_messages(&db_pool, &alice.id).await.unwrap().remove(0);
        assert_eq!(stored.id, recorded.id);
        assert_eq!(stored.response, "hi");
        assert!(stored.created_at.offset().is_utc());
        assert!(stored.created_at >= before - time::Duration::seconds(1));
    }

    #[tokio::test]
    async fn message_requires_existing_account() {
        let (_dir, db_pool) = temp_pool().await;

        let orphan = record_message(&db_pool, "no-such-account", "hello", "hi").await;
        assert!(matches!(orphan, Err(DbError::Sqlx(_))));
    }
}
