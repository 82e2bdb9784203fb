//! Extrator [`AuthUser`]: exige `Authorization: Bearer <token>` válido.
//!
//! Qualquer falha (header ausente, esquema errado, token inválido ou
//! expirado) responde `401` com `WWW-Authenticate: Bearer`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::handlers::ApiError;
use super::state::AppState;

/// Titular autenticado da requisição.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Rejeição do [`AuthUser`].
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(ApiError::new(
                "UNAUTHORIZED",
                "Invalid authentication credentials",
            )),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Unauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            tracing::debug!("Requisição sem bearer token");
            return Err(Unauthorized);
        };
        match state.auth.verify_token(token) {
            Ok(username) => Ok(AuthUser { username }),
            Err(e) => {
                tracing::debug!(error = %e, "Token rejeitado");
                Err(Unauthorized)
            }
        }
    }
}

/// Token do header `Authorization`; o esquema não diferencia maiúsculas.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
