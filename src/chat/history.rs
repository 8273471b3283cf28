use axum::{debug_handler, extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::{auth::CurrentUser, db, AppResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub message: String,
    pub response: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

impl From<db::Message> for HistoryEntry {
    fn from(msg: db::Message) -> Self {
        Self {
            message: msg.message,
            response: msg.response,
            timestamp: msg.created_at,
        }
    }
}

/// Every persisted exchange for the caller, read from the store.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn history(
    CurrentUser(account): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<HistoryResponse>> {
    let history = db::list_messages(&db_pool, &account.id)
        .await?
        .into_iter()
        .map(HistoryEntry::from)
        .collect();

    Ok(Json(HistoryResponse { history }))
}
