pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod index;
pub mod memory;
pub mod provider;
pub mod res;

use axum::{
    extract::{rejection::FormRejection, FromRef, FromRequest},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use auth::TokenKeys;
use memory::SessionMemory;
use provider::BoxChatProvider;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub tokens: TokenKeys,
    pub provider: BoxChatProvider,
    pub memory: SessionMemory,
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .merge(auth::router())
        .merge(chat::router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

pub type AppResult<T> = Result<T, AppError>;

/// `axum::Form` whose rejections answer with the same `{"detail"}` body as
/// every other error.
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct AppForm<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Username already registered")]
    DuplicateUsername,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Could not validate credentials")]
    InvalidCredential,
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DuplicateUsername | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::InvalidCredential => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(json!({ "detail": self.to_string() })),
                )
                    .into_response();
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, backtrace = %err.backtrace(), "request failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<db::DbError> for AppError {
    fn from(err: db::DbError) -> Self {
        match err {
            db::DbError::DuplicateUsername => AppError::DuplicateUsername,
            db::DbError::Sqlx(e) => AppError::Internal(anyhow::Error::from(e)),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!(error = %rejection, "form rejected");
        AppError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(anyhow::Error);
apperr_impl!(serde_json::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(axum::Error);
apperr_impl!(reqwest::Error);
apperr_impl!(tokio::task::JoinError);
apperr_impl!(auth::TokenError);
