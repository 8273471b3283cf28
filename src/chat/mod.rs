mod history;
mod page;
mod send;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use history::{HistoryEntry, HistoryResponse};
pub use send::ChatResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat-ui", get(page::chat_page))
        .route("/chat", post(send::chat))
        .route("/history", get(history::history))
}
