use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{db, AppError, AppState};

/// The account behind a valid `Authorization: Bearer <token>` header.
///
/// Missing, malformed, expired and badly signed tokens all reject with the
/// same [`AppError::InvalidCredential`]; the reason is only logged.
pub struct CurrentUser(pub db::Account);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            tracing::debug!("missing bearer token");
            return Err(AppError::InvalidCredential);
        };

        let username = state.tokens.verify(token).map_err(|e| {
            tracing::debug!(reason = %e, "rejected bearer token");
            AppError::InvalidCredential
        })?;

        let Some(account) = db::find_account(&state.db_pool, &username).await? else {
            tracing::debug!(%username, "bearer token for unknown account");
            return Err(AppError::InvalidCredential);
        };

        Ok(CurrentUser(account))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/history");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("bearer abc"))), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer_token(&parts(None)), None);
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer"))), None);
    }
}
