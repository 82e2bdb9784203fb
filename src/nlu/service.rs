//! [`LlmService`]: extração de conceito e geração de resposta via Gemini.
//!
//! Sem chave de API o serviço fica desligado e responde com os textos
//! padrão em vez de falhar.

use async_trait::async_trait;

use super::gemini::GeminiClient;
use super::prompt::{answer_prompt, extraction_prompt, parse_concept};
use super::{IntentExtractor, ResponseGenerator};
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::resolver::ConceptRecord;

/// Resposta quando o LLM não está configurado.
pub const LLM_UNAVAILABLE: &str = "LLM service is unavailable due to configuration error.";

pub struct LlmService {
    client: Option<GeminiClient>,
}

impl LlmService {
    /// Monta o serviço; qualquer problema de configuração o deixa desligado.
    pub fn from_config(config: &LlmConfig) -> Self {
        match GeminiClient::from_config(config) {
            Ok(client) => {
                tracing::info!(model = %client.model(), "LLM service inicializado");
                Self::with_client(client)
            }
            Err(LlmError::Disabled) => {
                tracing::warn!("GEMINI_API_KEY ausente, LLM desligado");
                Self::disabled()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falha ao configurar o cliente Gemini, LLM desligado");
                Self::disabled()
            }
        }
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl IntentExtractor for LlmService {
    async fn extract_concept(&self, question: &str) -> Option<String> {
        let client = self.client.as_ref()?;
        match client.generate_content(&extraction_prompt(question)).await {
            Ok(reply) => {
                let concept = parse_concept(reply.trim());
                tracing::debug!(concept = ?concept, "Conceito extraído");
                concept
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falha na extração de conceito");
                None
            }
        }
    }
}

#[async_trait]
impl ResponseGenerator for LlmService {
    async fn generate(&self, question: &str, record: &ConceptRecord) -> String {
        let Some(client) = self.client.as_ref() else {
            return LLM_UNAVAILABLE.to_string();
        };
        match client.generate_content(&answer_prompt(question, record)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, concept = %record.concept, "Falha na geração de resposta");
                format!("Error generating response: {}", e)
            }
        }
    }
}
