//! Tipos de erro do serviço.
//!
//! Falhas de carga degradam para um store vazio e falhas do LLM viram texto
//! de resposta. Só um arquivo de usuários ilegível ([`AuthError`]) impede a
//! subida, para não sobrescrever contas existentes.

use std::path::PathBuf;

/// Falha ao carregar a fonte de fatos.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("fact source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read fact source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fact at line {line}: {reason} ({content:?})")]
    Malformed {
        line: usize,
        content: String,
        reason: String,
    },
}

/// Falha ao falar com o serviço externo de geração de texto.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM integration is disabled")]
    Disabled,

    /// Falha de transporte ou timeout. A URL é removida do erro.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Request(e.without_url())
    }
}

/// Variável de ambiente com valor inválido.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Falha de cadastro, login ou validação de token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Invalid authentication credentials")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("user store I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt user store {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
