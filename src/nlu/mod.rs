//! # Módulo NLU — Colaboradores de Linguagem
//!
//! O núcleo de conhecimento não entende linguagem natural. Duas tarefas
//! ficam com colaboradores externos, atrás de traits:
//!
//! ```text
//! pergunta ──► IntentExtractor::extract_concept ──► Option<token bruto>
//!                                                        │
//!                                         ConceptResolver::resolve
//!                                                        │
//! resposta ◄── ResponseGenerator::generate ◄──── ConceptRecord
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`prompt`] | Prompts e extração do JSON devolvido pelo modelo |
//! | [`gemini`] | Cliente HTTP da API Gemini (`reqwest`) |
//! | [`service`] | [`LlmService`]: implementa as duas traits sobre o Gemini |
//!
//! Nenhum colaborador propaga erro: falhas viram `None` (extração) ou texto
//! de resposta (geração).

pub mod gemini;
pub mod prompt;
pub mod service;

use async_trait::async_trait;

use crate::resolver::ConceptRecord;

pub use gemini::GeminiClient;
pub use service::LlmService;

/// Identifica o conceito principal de uma pergunta.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Token bruto do conceito, ou `None` se nada foi identificado.
    async fn extract_concept(&self, question: &str) -> Option<String>;
}

/// Redige a resposta final a partir do registro resolvido.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, question: &str, record: &ConceptRecord) -> String;
}
