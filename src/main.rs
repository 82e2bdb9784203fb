#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # MeTTa FAQ — Serviço de Perguntas sobre MeTTa
//!
//! **Ponto de entrada principal** do serviço.
//!
//! O usuário pergunta em linguagem natural ("O que é um Atom?"); o serviço
//! identifica o conceito, consulta uma base de fatos curada e devolve uma
//! resposta redigida pelo LLM junto com o registro usado como fonte.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Carrega .env (dotenvy) e configura tracing
//!   ├── Lê AppConfig do ambiente
//!   ├── Carrega a base de fatos (ou inicia vazia)
//!   ├── Monta ConceptResolver (+ cache opcional)
//!   ├── Monta LlmService (desligado sem GEMINI_API_KEY)
//!   ├── Abre o AuthService (users.json ilegível aborta a subida)
//!   ├── Cria ChatOrchestrator e AppState
//!   └── Inicia servidor axum
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! GEMINI_API_KEY=... cargo run
//!
//! # Executar com logs detalhados
//! RUST_LOG=debug cargo run
//!
//! # Criar conta (devolve um token)
//! curl -X POST localhost:8000/api/auth/signup \
//!   -H 'content-type: application/json' \
//!   -d '{"username": "ana", "email": "ana@example.com", "password": "..."}'
//!
//! # Perguntar
//! curl -X POST localhost:8000/api/chat \
//!   -H 'content-type: application/json' \
//!   -H "authorization: Bearer $TOKEN" \
//!   -d '{"message": "What is an Atom?"}'
//! ```

/// Módulo `core` — fatos, store indexado, normalização e consultas.
mod core;

/// Módulo `inference` — relações derivadas das arestas `Related`.
mod inference;

/// Módulo `resolver` — token bruto → `ConceptRecord`.
mod resolver;

/// Módulo `persistence` — leitura da fonte de fatos.
mod persistence;

/// Módulo `config` — configuração via variáveis de ambiente.
mod config;

/// Módulo `error` — tipos de erro.
mod error;

/// Módulo `auth` — contas, senhas (bcrypt) e tokens JWT.
mod auth;

/// Módulo `nlu` — colaboradores de linguagem (Gemini).
mod nlu;

/// Módulo `orchestrator` — ciclo pergunta → conceito → resposta.
mod orchestrator;

/// Módulo `web` — servidor axum e handlers HTTP.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::nlu::LlmService;
use crate::orchestrator::ChatOrchestrator;
use crate::resolver::ConceptResolver;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // .env é opcional
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("MeTTa FAQ — Starting...");

    let config = AppConfig::from_env().context("Configuração inválida")?;
    tracing::debug!(config = ?config, "Configuração carregada");

    // Falha de carga não derruba o servidor: o store fica vazio.
    let store = Arc::new(persistence::load_or_empty(&config.knowledge_path));

    let mut resolver = ConceptResolver::new(store);
    if config.resolver_cache {
        resolver = resolver.with_cache();
    }
    let resolver = Arc::new(resolver);

    let llm = Arc::new(LlmService::from_config(&config.llm));
    let orchestrator = ChatOrchestrator::new(resolver, llm.clone(), llm);

    let auth = AuthService::from_config(&config.auth).with_context(|| {
        format!(
            "Falha ao abrir usuários em {}",
            config.auth.users_path.display()
        )
    })?;

    let app = web::create_router(AppState::new(orchestrator, Arc::new(auth)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Falha ao abrir {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Server running");

    axum::serve(listener, app).await.context("Servidor axum falhou")?;

    Ok(())
}
