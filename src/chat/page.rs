use axum::{debug_handler, response::{Html, IntoResponse}};

use crate::include_res;

#[debug_handler]
pub(crate) async fn chat_page() -> impl IntoResponse {
    Html(include_res!(str, "/pages/chat.html"))
}
