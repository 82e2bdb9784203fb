//! # Estado da Aplicação Web
//!
//! O store é carregado uma vez e o orquestrador não guarda estado de
//! conversa. O único estado mutável é o cadastro de usuários, protegido
//! pelo próprio [`UserStore`](crate::auth::UserStore).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::AuthService;
use crate::orchestrator::ChatOrchestrator;
use crate::resolver::ConceptResolver;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub auth: Arc<AuthService>,
    /// Momento em que o servidor subiu (exposto em `GET /`).
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(orchestrator: ChatOrchestrator, auth: Arc<AuthService>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            auth,
            started_at: Utc::now(),
        }
    }

    pub fn resolver(&self) -> &ConceptResolver {
        self.orchestrator.resolver()
    }
}
