use axum::{routing::{get, post}, Router};

use crate::AppState;

mod current_user;
mod login;
mod password;
mod signup;
mod token;

pub use current_user::CurrentUser;
pub use login::TokenResponse;
pub use password::{hash_password, verify_password};
pub use token::{TokenError, TokenKeys};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup::signup_page).post(signup::signup))
        .route("/token", post(login::login))
}
