use axum::{debug_handler, extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{auth::CurrentUser, db, memory::{Exchange, SessionMemory}, provider::BoxChatProvider, AppForm, AppResult};

#[derive(Deserialize)]
pub(crate) struct ChatForm {
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// This process's echo for the user, not the durable record.
    pub history: Vec<Exchange>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn chat(
    CurrentUser(account): CurrentUser,
    State(db_pool): State<SqlitePool>,
    State(provider): State<BoxChatProvider>,
    State(memory): State<SessionMemory>,
    AppForm(ChatForm { message }): AppForm<ChatForm>,
) -> AppResult<Json<ChatResponse>> {
    let response = provider.reply_or_diagnostic(&message).await;

    let history = memory.append(&account.username, &message, &response);
    let saved = db::record_message(&db_pool, &account.id, &message, &response).await?;

    tracing::info!(
        username = %account.username,
        message_id = %saved.id,
        cached = history.len(),
        "chat exchange recorded"
    );

    Ok(Json(ChatResponse { response, history }))
}
