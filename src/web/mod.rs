//! # Módulo Web — A API do FAQ
//!
//! Camada HTTP fina sobre o [`ChatOrchestrator`](crate::orchestrator::ChatOrchestrator),
//! construída com **Axum**.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Cliente (frontend de chat, curl, ...)                │
//! ├──────────────────────────────────────────────────────┤
//! │ CorsLayer (qualquer origem) + TraceLayer             │
//! ├──────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                            │
//! │  ├── GET  /                    → status JSON         │
//! │  ├── POST /api/auth/signup     → AuthResponse        │
//! │  ├── POST /api/auth/login      → AuthResponse        │
//! │  ├── POST /api/chat            → ChatReply     (*)   │
//! │  └── GET  /api/concepts/{name} → ConceptRecord (*)   │
//! └──────────────────────────────────────────────────────┘
//!   (*) exige Authorization: Bearer <token>
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`extract`] | Extrator `AuthUser` (bearer token) |

pub mod extract;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // ── Auth ──────────────────────────────────────────────
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        // ── API JSON (bearer) ─────────────────────────────────
        .route("/api/chat", post(handlers::chat))
        .route("/api/concepts/{name}", get(handlers::concept))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthService;
    use crate::core::{Fact, FactKind, FactStore};
    use crate::nlu::{IntentExtractor, ResponseGenerator};
    use crate::orchestrator::{ChatOrchestrator, ChatReply, NO_CONCEPT_REPLY};
    use crate::resolver::{ConceptRecord, ConceptResolver};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Devolve a última palavra da pergunta, sem pontuação.
    struct LastWord;

    #[async_trait]
    impl IntentExtractor for LastWord {
        async fn extract_concept(&self, question: &str) -> Option<String> {
            let word = question
                .split_whitespace()
                .last()?
                .trim_matches(|c: char| !c.is_alphanumeric());
            (word != "hello").then(|| word.to_string())
        }
    }

    struct Echo;

    #[async_trait]
    impl ResponseGenerator for Echo {
        async fn generate(&self, _question: &str, record: &ConceptRecord) -> String {
            format!("{}: {}", record.concept, record.description)
        }
    }

    fn app() -> Router {
        app_with_auth(Arc::new(crate::auth::tests::service()))
    }

    fn app_with_auth(auth: Arc<AuthService>) -> Router {
        let store: FactStore = vec![
            Fact::new(FactKind::Description, "Atom", "A base value"),
            Fact::related("Expression", "Atom"),
        ]
        .into_iter()
        .collect();
        let resolver = Arc::new(ConceptResolver::new(Arc::new(store)).with_cache());
        create_router(AppState::new(
            ChatOrchestrator::new(resolver, Arc::new(LastWord), Arc::new(Echo)),
            auth,
        ))
    }

    /// Token aceito por qualquer `auth::tests::service()`.
    fn token() -> String {
        crate::auth::tests::service().issue_token("tester").unwrap()
    }

    fn post_json(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn concept_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", token()))
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chat_request(body: &str) -> Request<Body> {
        post_json("/api/chat", body, Some(&token()))
    }

    #[tokio::test]
    async fn root_reports_status() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: handlers::StatusResponse = json_body(response).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.message, "MeTTa FAQ API is running");
        assert_eq!(body.facts, 2);
    }

    #[tokio::test]
    async fn chat_returns_answer_and_sources() {
        let response = app()
            .oneshot(chat_request(r#"{"message": "What is an atom?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let reply: ChatReply = json_body(response).await;
        assert_eq!(reply.response, "Atom: A base value");
        let sources = reply.sources.unwrap();
        assert_eq!(sources.inferred_relations, vec!["Is a type of Expression"]);
    }

    #[tokio::test]
    async fn chat_without_concept_has_null_sources() {
        let response = app()
            .oneshot(chat_request(r#"{"message": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["response"], NO_CONCEPT_REPLY);
        assert!(body["sources"].is_null());
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let response = app()
            .oneshot(chat_request(r#"{"message": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: handlers::ApiError = json_body(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_client_error() {
        let response = app().oneshot(chat_request("{}")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn concept_route_uses_the_resolver_directly() {
        let response = app()
            .oneshot(concept_request("/api/concepts/variable"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let record: ConceptRecord = json_body(response).await;
        assert_eq!(record.concept, "Variable");
        assert_eq!(record.description, "Not found");
    }

    #[tokio::test]
    async fn blank_concept_name_is_rejected() {
        let response = app()
            .oneshot(concept_request("/api/concepts/%20%20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn chat_without_token_is_unauthorized() {
        let response = app()
            .oneshot(post_json("/api/chat", r#"{"message": "What is an atom?"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["www-authenticate"], "Bearer");
        let error: handlers::ApiError = json_body(response).await;
        assert_eq!(error.message, "Invalid authentication credentials");
    }

    #[tokio::test]
    async fn chat_with_forged_token_is_unauthorized() {
        let forged = crate::auth::TokenIssuer::new(b"other-secret", std::time::Duration::from_secs(60))
            .issue("tester")
            .unwrap();
        let response = app()
            .oneshot(post_json(
                "/api/chat",
                r#"{"message": "What is an atom?"}"#,
                Some(&forged),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(post_json("/api/chat", r#"{"message": "x"}"#, Some("garbage")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn concept_route_requires_a_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/concepts/atom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signup_token_unlocks_chat() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/signup",
                r#"{"username": "alice", "email": "alice@example.com", "password": "pw"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: handlers::AuthResponse = json_body(response).await;
        assert_eq!(body.status, "success");
        assert_eq!(body.message.as_deref(), Some("User created successfully"));
        assert_eq!(body.user.username, "alice");

        let response = app
            .oneshot(post_json(
                "/api/chat",
                r#"{"message": "What is an atom?"}"#,
                Some(&body.token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_signup_is_bad_request() {
        let app = app();
        let body = r#"{"username": "alice", "email": "alice@example.com", "password": "pw"}"#;
        let first = app
            .clone()
            .oneshot(post_json("/api/auth/signup", body, None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(post_json("/api/auth/signup", body, None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let error: handlers::ApiError = json_body(second).await;
        assert_eq!(error.code, "SIGNUP_REJECTED");
        assert_eq!(error.message, "Username already exists");
    }

    #[tokio::test]
    async fn signup_validates_fields() {
        let response = app()
            .oneshot(post_json(
                "/api/auth/signup",
                r#"{"username": " ", "email": "a@b.c", "password": "pw"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app()
            .oneshot(post_json(
                "/api/auth/signup",
                r#"{"username": "bob", "email": "not-an-email", "password": "pw"}"#,
                None,
            ))
            .await
            .unwrap();
        let error: handlers::ApiError = json_body(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn login_returns_token_or_401() {
        let auth = Arc::new(crate::auth::tests::service());
        auth.signup("alice", "alice@example.com", "right").unwrap();
        let app = app_with_auth(auth);

        let ok = app
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                r#"{"username": "alice", "password": "right"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        let body: serde_json::Value = json_body(ok).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["user"]["email"], "alice@example.com");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body.get("message").is_none());

        let bad = app
            .oneshot(post_json(
                "/api/auth/login",
                r#"{"username": "alice", "password": "wrong"}"#,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
        let error: handlers::ApiError = json_body(bad).await;
        assert_eq!(error.message, "Incorrect username or password");
    }
}
