//! # Handlers HTTP
//!
//! | Handler | Método | Rota | Retorno |
//! |---------|--------|------|---------|
//! | `root` | GET | `/` | JSON de status |
//! | `signup` | POST | `/api/auth/signup` | [`AuthResponse`] |
//! | `login` | POST | `/api/auth/login` | [`AuthResponse`] |
//! | `chat` | POST | `/api/chat` | [`ChatReply`] (bearer) |
//! | `concept` | GET | `/api/concepts/{name}` | [`ConceptRecord`] (bearer) |
//!
//! Erros respondem `{"code", "message"}`:
//!
//! | Situação | Status | `code` |
//! |----------|--------|--------|
//! | campo vazio ou inválido | 400 | `VALIDATION_ERROR` |
//! | username ou email já cadastrado | 400 | `SIGNUP_REJECTED` |
//! | login incorreto | 401 | `INVALID_CREDENTIALS` |
//! | token ausente ou inválido | 401 | `UNAUTHORIZED` |
//! | falha de disco ou bcrypt | 500 | `INTERNAL_ERROR` |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use super::extract::AuthUser;
use super::state::AppState;
use crate::auth::{Session, UserProfile};
use crate::error::AuthError;
use crate::orchestrator::ChatReply;
use crate::resolver::ConceptRecord;

/// Corpo de erro das rotas da API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    fn validation(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self::new("VALIDATION_ERROR", message)),
        )
    }
}

impl From<AuthError> for (StatusCode, Json<ApiError>) {
    fn from(e: AuthError) -> Self {
        let (status, code) = match &e {
            AuthError::UsernameTaken | AuthError::EmailTaken => {
                (StatusCode::BAD_REQUEST, "SIGNUP_REJECTED")
            }
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            _ => {
                tracing::error!(error = %e, "Falha interna de autenticação");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiError::new("INTERNAL_ERROR", "Authentication backend failed")),
                );
            }
        };
        (status, Json(ApiError::new(code, e.to_string())))
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Resposta de `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    /// Fatos carregados no store.
    pub facts: usize,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Resposta de signup e login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub token: String,
    pub user: UserProfile,
}

impl AuthResponse {
    fn success(session: Session, message: Option<&str>) -> Self {
        Self {
            status: "success".into(),
            message: message.map(str::to_string),
            token: session.token,
            user: session.user,
        }
    }
}

/// Roda uma operação de auth (bcrypt) fora das threads do runtime.
async fn run_blocking<F>(op: F) -> Result<Session, (StatusCode, Json<ApiError>)>
where
    F: FnOnce() -> Result<Session, AuthError> + Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => {
            tracing::error!(error = %e, "Tarefa de autenticação abortada");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("INTERNAL_ERROR", "Authentication backend failed")),
            ))
        }
    }
}

pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
        message: "MeTTa FAQ API is running".into(),
        facts: state.resolver().store().len(),
        started_at: state.started_at,
    })
}

/// Cadastra a conta e já devolve um token (login automático).
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<AuthResponse> {
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_string();
    let password = request.password;
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::validation(
            "Username, email and password are required",
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::validation("Invalid email address"));
    }

    let auth = Arc::clone(&state.auth);
    let session = run_blocking(move || auth.signup(&username, &email, &password)).await?;
    Ok(Json(AuthResponse::success(
        session,
        Some("User created successfully"),
    )))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let username = request.username.trim().to_string();
    let password = request.password;
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let auth = Arc::clone(&state.auth);
    let session = run_blocking(move || auth.login(&username, &password)).await?;
    Ok(Json(AuthResponse::success(session, None)))
}

pub async fn chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatReply> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::validation("Message cannot be empty"));
    }

    let span = tracing::info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        user = %user.username
    );
    let reply = async {
        tracing::info!(len = message.len(), "Pergunta recebida");
        let reply = state.orchestrator.answer(message).await;
        tracing::info!(with_sources = reply.sources.is_some(), "Resposta pronta");
        reply
    }
    .instrument(span)
    .await;
    Ok(Json(reply))
}

/// Acesso direto ao resolver, sem passar pelo LLM.
pub async fn concept(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(name): Path<String>,
) -> ApiResult<ConceptRecord> {
    state
        .resolver()
        .resolve(Some(name.as_str()))
        .map(Json)
        .ok_or_else(|| ApiError::validation("Concept name cannot be empty"))
}
