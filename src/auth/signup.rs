use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect}};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{db, include_res, AppError, AppForm, AppResult};

use super::password;

#[derive(Deserialize)]
pub(crate) struct SignupForm {
    username: String,
    password: String,
}

#[debug_handler]
pub(crate) async fn signup_page() -> impl IntoResponse {
    Html(include_res!(str, "/pages/signup.html"))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    AppForm(SignupForm { username, password }): AppForm<SignupForm>,
) -> AppResult<Redirect> {
    // skip the hash for names that are obviously taken; the insert still decides
    if db::find_account(&db_pool, &username).await?.is_some() {
        tracing::info!(%username, "signup for taken username");
        return Err(AppError::DuplicateUsername);
    }

    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&password)).await??;
    let account = db::create_account(&db_pool, &username, &password_hash).await?;

    tracing::info!(%username, account_id = %account.id, "account created");

    Ok(Redirect::to("/"))
}
