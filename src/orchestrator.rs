//! # Orquestrador — O Ciclo de uma Pergunta
//!
//! O [`ChatOrchestrator`] liga os colaboradores de linguagem ao resolver de
//! conceitos. Cada mensagem percorre:
//!
//! ```text
//! Mensagem do usuário
//!   │
//!   ├── 1. IntentExtractor::extract_concept   → token bruto (ou None)
//!   │
//!   ├── 2. ConceptResolver::resolve           → ConceptRecord (ou None)
//!   │   └── None → resposta fixa pedindo um conceito, sources = null
//!   │
//!   └── 3. ResponseGenerator::generate        → texto final, sources = registro
//! ```
//!
//! O orquestrador não guarda estado entre mensagens: cada pergunta é
//! independente e pode ser atendida em paralelo.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::nlu::{IntentExtractor, ResponseGenerator};
use crate::resolver::{ConceptRecord, ConceptResolver};

/// Resposta quando nenhum conceito é identificado na pergunta.
pub const NO_CONCEPT_REPLY: &str = "I couldn't identify a specific MeTTa concept in your question. Try asking about 'Atom', 'match', or 'unify'.";

/// Resultado de uma mensagem de chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// Registro usado para redigir a resposta; `null` sem conceito.
    pub sources: Option<ConceptRecord>,
}

#[derive(Clone)]
pub struct ChatOrchestrator {
    resolver: Arc<ConceptResolver>,
    extractor: Arc<dyn IntentExtractor>,
    generator: Arc<dyn ResponseGenerator>,
}

impl ChatOrchestrator {
    pub fn new(
        resolver: Arc<ConceptResolver>,
        extractor: Arc<dyn IntentExtractor>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        Self {
            resolver,
            extractor,
            generator,
        }
    }

    /// Responde uma mensagem do usuário.
    pub async fn answer(&self, message: &str) -> ChatReply {
        let raw = self.extractor.extract_concept(message).await;

        let Some(record) = self.resolver.resolve(raw.as_deref()) else {
            tracing::info!(raw = ?raw, "Nenhum conceito identificado");
            return ChatReply {
                response: NO_CONCEPT_REPLY.to_string(),
                sources: None,
            };
        };

        tracing::info!(
            concept = %record.concept,
            found = record.description != crate::core::NOT_FOUND,
            "Conceito resolvido"
        );

        let response = self.generator.generate(message, &record).await;
        ChatReply {
            response,
            sources: Some(record),
        }
    }

    pub fn resolver(&self) -> &ConceptResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fact, FactKind, FactStore};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Extrator fixo para testes.
    struct FixedExtractor(Option<&'static str>);

    #[async_trait]
    impl IntentExtractor for FixedExtractor {
        async fn extract_concept(&self, _question: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    /// Gerador que registra o que recebeu.
    #[derive(Default)]
    struct RecordingGenerator {
        seen: Mutex<Vec<(String, ConceptRecord)>>,
    }

    #[async_trait]
    impl ResponseGenerator for RecordingGenerator {
        async fn generate(&self, question: &str, record: &ConceptRecord) -> String {
            self.seen
                .lock()
                .push((question.to_string(), record.clone()));
            format!("About {}: {}", record.concept, record.description)
        }
    }

    fn store() -> Arc<FactStore> {
        Arc::new(
            vec![
                Fact::new(FactKind::Description, "Atom", "A base value"),
                Fact::related("Atom", "Symbol"),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn orchestrator(
        concept: Option<&'static str>,
        generator: Arc<RecordingGenerator>,
    ) -> ChatOrchestrator {
        ChatOrchestrator::new(
            Arc::new(ConceptResolver::new(store())),
            Arc::new(FixedExtractor(concept)),
            generator,
        )
    }

    #[tokio::test]
    async fn resolved_concept_is_passed_to_the_generator() {
        let generator = Arc::new(RecordingGenerator::default());
        let reply = orchestrator(Some("atom"), generator.clone())
            .answer("What is an atom?")
            .await;

        assert_eq!(reply.response, "About Atom: A base value");
        let sources = reply.sources.unwrap();
        assert_eq!(sources.inferred_relations, vec!["Is typically used with Symbol"]);

        let seen = generator.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "What is an atom?");
        assert_eq!(seen[0].1, sources);
    }

    #[tokio::test]
    async fn no_concept_skips_generation() {
        let generator = Arc::new(RecordingGenerator::default());
        let reply = orchestrator(None, generator.clone()).answer("hello").await;
        assert_eq!(reply.response, NO_CONCEPT_REPLY);
        assert_eq!(reply.sources, None);
        assert!(generator.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn blank_concept_counts_as_none() {
        let generator = Arc::new(RecordingGenerator::default());
        let reply = orchestrator(Some("   "), generator).answer("hm").await;
        assert_eq!(reply.sources, None);
    }

    #[tokio::test]
    async fn unknown_concept_still_reaches_generator_with_sentinels() {
        let generator = Arc::new(RecordingGenerator::default());
        let reply = orchestrator(Some("unify"), generator).answer("unify?").await;
        assert_eq!(reply.response, "About unify: Not found");
        assert_eq!(reply.sources.unwrap().related, Vec::<String>::new());
    }

    #[tokio::test]
    async fn reply_serializes_null_sources() {
        let generator = Arc::new(RecordingGenerator::default());
        let reply = orchestrator(None, generator).answer("hello").await;
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json["sources"].is_null());
    }
}
