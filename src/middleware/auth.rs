use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{bearer_token, JwtError};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

/// JWT authentication middleware that validates tokens and extracts user context.
///
/// When token renewal is enabled the response carries a fresh
/// `Authorization: Bearer <token>` header for the same user.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| JwtError::Malformed)?),
        None => None,
    };

    let claims = bearer_token(header)
        .and_then(|token| state.tokens.verify(token))
        .map_err(|e| {
            tracing::warn!(path = %request.uri().path(), "Rejected request: {}", e);
            ApiError::from(e)
        })?;

    let auth_user = AuthUser {
        username: claims.sub,
    };
    request.extensions_mut().insert(auth_user.clone());

    let mut response = next.run(request).await;

    if state.config.security.renew_tokens {
        match state.tokens.issue(&auth_user.username) {
            Ok(issued) => match HeaderValue::from_str(&issued.bearer()) {
                Ok(value) => {
                    response.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(e) => tracing::warn!("Renewed token is not a valid header value: {}", e),
            },
            Err(e) => tracing::warn!(user = %auth_user.username, "Token renewal failed: {}", e),
        }
    }

    Ok(response)
}
