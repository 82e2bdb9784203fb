//! # Configuração
//!
//! Lida de variáveis de ambiente (um `.env` opcional é carregado antes por
//! `dotenvy`). Toda variável tem um default; só valores presentes e
//! inválidos geram [`ConfigError`].
//!
//! | Variável | Default |
//! |----------|---------|
//! | `FAQ_BIND_ADDR` | `0.0.0.0:8000` |
//! | `FAQ_KNOWLEDGE_PATH` | `data/knowledge.metta` |
//! | `FAQ_RESOLVER_CACHE` | `true` |
//! | `GEMINI_API_KEY` | ausente (LLM desligado) |
//! | `GEMINI_MODEL` | `gemini-2.0-flash` |
//! | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
//! | `FAQ_LLM_TIMEOUT_SECS` | `30` |
//! | `JWT_SECRET_KEY` | ausente (segredo aleatório por processo) |
//! | `FAQ_USERS_PATH` | `data/users.json` |
//! | `FAQ_TOKEN_TTL_MINUTES` | `1440` |
//! | `FAQ_BCRYPT_COST` | `12` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;

/// Configuração completa do serviço.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub knowledge_path: PathBuf,
    pub resolver_cache: bool,
    pub llm: LlmConfig,
    pub auth: AuthConfig,
}

/// Parâmetros do cliente Gemini.
#[derive(Debug, Clone, Serialize)]
pub struct LlmConfig {
    /// `None` desliga a integração.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Parâmetros de cadastro, login e tokens.
#[derive(Debug, Clone, Serialize)]
pub struct AuthConfig {
    /// `None` gera um segredo aleatório na subida (tokens não sobrevivem a
    /// um restart).
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub users_path: PathBuf,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("data/knowledge.metta")
}

fn default_resolver_cache() -> bool {
    true
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_users_path() -> PathBuf {
    PathBuf::from("data/users.json")
}

/// Um ano.
const MAX_TOKEN_TTL_MINUTES: u64 = 60 * 24 * 365;

fn default_token_ttl_minutes() -> u64 {
    60 * 24
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            knowledge_path: default_knowledge_path(),
            resolver_cache: default_resolver_cache(),
            llm: LlmConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            users_path: default_users_path(),
            token_ttl: Duration::from_secs(default_token_ttl_minutes() * 60),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout: Duration::from_secs(default_timeout_secs()),
        }
    }
}

impl LlmConfig {
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl AppConfig {
    /// Lê a configuração do ambiente do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Lê a configuração a partir de uma função de busca qualquer.
    ///
    /// Valores vazios (ou só espaços) contam como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = match get("FAQ_BIND_ADDR") {
            Some(v) => v.parse::<SocketAddr>().map_err(|_| ConfigError {
                key: "FAQ_BIND_ADDR",
                value: v.clone(),
                reason: "expected host:port".into(),
            })?,
            None => default_bind_addr(),
        };

        let resolver_cache = match get("FAQ_RESOLVER_CACHE") {
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError {
                key: "FAQ_RESOLVER_CACHE",
                value: v.clone(),
                reason: "expected true/false".into(),
            })?,
            None => default_resolver_cache(),
        };

        let timeout_secs = match get("FAQ_LLM_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError {
                        key: "FAQ_LLM_TIMEOUT_SECS",
                        value: v,
                        reason: "expected a positive number of seconds".into(),
                    })
                }
            },
            None => default_timeout_secs(),
        };

        let ttl_minutes = match get("FAQ_TOKEN_TTL_MINUTES") {
            Some(v) => match v.parse::<u64>() {
                Ok(n) if (1..=MAX_TOKEN_TTL_MINUTES).contains(&n) => n,
                _ => {
                    return Err(ConfigError {
                        key: "FAQ_TOKEN_TTL_MINUTES",
                        value: v,
                        reason: format!("expected 1..={} minutes", MAX_TOKEN_TTL_MINUTES),
                    })
                }
            },
            None => default_token_ttl_minutes(),
        };

        let bcrypt_cost = match get("FAQ_BCRYPT_COST") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if (4..=31).contains(&n) => n,
                _ => {
                    return Err(ConfigError {
                        key: "FAQ_BCRYPT_COST",
                        value: v,
                        reason: "expected a cost between 4 and 31".into(),
                    })
                }
            },
            None => default_bcrypt_cost(),
        };

        Ok(Self {
            bind_addr,
            knowledge_path: get("FAQ_KNOWLEDGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_knowledge_path),
            resolver_cache,
            llm: LlmConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(default_model),
                base_url: get("GEMINI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_base_url),
                timeout: Duration::from_secs(timeout_secs),
            },
            auth: AuthConfig {
                jwt_secret: get("JWT_SECRET_KEY"),
                users_path: get("FAQ_USERS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_users_path),
                token_ttl: Duration::from_secs(ttl_minutes * 60),
                bcrypt_cost,
            },
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
