use axum::{debug_handler, extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{db, AppError, AppForm, AppResult};

use super::{password, TokenKeys};

/// OAuth2 password-grant form; `grant_type` and `scope` are accepted and ignored.
#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(tokens): State<TokenKeys>,
    AppForm(LoginForm { username, password }): AppForm<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let Some(account) = db::find_account(&db_pool, &username).await? else {
        tracing::warn!(%username, "login for unknown username");
        return Err(AppError::InvalidCredentials);
    };

    let password_hash = account.password.clone();
    let verified =
        tokio::task::spawn_blocking(move || password::verify_password(&password, &password_hash))
            .await?;
    if !verified {
        tracing::warn!(%username, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let access_token = tokens.issue(&account.username)?;
    tracing::info!(%username, ttl_minutes = tokens.ttl().whole_minutes(), "access token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}
