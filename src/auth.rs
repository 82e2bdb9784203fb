//! # Autenticação — Contas, Senhas e Tokens
//!
//! Cadastro e login por usuário/senha. As rotas de consulta exigem
//! `Authorization: Bearer <token>`.
//!
//! ```text
//! POST /api/auth/signup ──► bcrypt::hash ──► UserStore::insert ──► TokenIssuer::issue
//! POST /api/auth/login  ──► UserStore::get ──► bcrypt::verify  ──► TokenIssuer::issue
//! Authorization: Bearer ──► TokenIssuer::verify ──► username
//! ```
//!
//! ## Armazenamento
//!
//! `users.json` é um mapa `username → UserRecord` em JSON pretty-printed.
//! Cada cadastro regrava o arquivo inteiro num temporário e faz `rename`,
//! então um crash no meio da escrita não corrompe as contas existentes.
//! Senhas só existem como hash bcrypt.
//!
//! ## Tokens
//!
//! HS256 com claims `{sub, iat, exp}`. Sem `JWT_SECRET_KEY` o segredo é
//! aleatório por processo e todo token morre num restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Conta persistida em `users.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    /// Hash bcrypt (`$2b$...`).
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Parte pública de uma conta, devolvida nas respostas de auth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: record.email.clone(),
        }
    }
}

/// Resultado de um cadastro ou login bem-sucedido.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

// ── UserStore ────────────────────────────────────────────────

/// Contas em memória com espelho em disco.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: RwLock<BTreeMap<String, UserRecord>>,
}

impl UserStore {
    /// Abre o arquivo de usuários; arquivo ausente é um store vazio.
    ///
    /// # Erros
    ///
    /// - [`AuthError::Io`] se a leitura falhar
    /// - [`AuthError::Corrupt`] se o JSON não for um mapa de contas
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let users = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| AuthError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Nenhum arquivo de usuários, iniciando vazio");
                BTreeMap::new()
            }
            Err(source) => return Err(AuthError::Io { path, source }),
        };
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.users.read().get(username).cloned()
    }

    pub fn contains_username(&self, username: &str) -> bool {
        self.users.read().contains_key(username)
    }

    /// Emails são comparados sem diferenciar maiúsculas.
    pub fn contains_email(&self, email: &str) -> bool {
        self.users
            .read()
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    /// Insere a conta e regrava o arquivo.
    ///
    /// Checagem de unicidade e inserção acontecem sob o mesmo write lock.
    /// Se a escrita falhar a conta é removida da memória.
    pub fn insert(&self, record: UserRecord) -> Result<(), AuthError> {
        let mut users = self.users.write();
        if users.contains_key(&record.username) {
            return Err(AuthError::UsernameTaken);
        }
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(AuthError::EmailTaken);
        }

        let username = record.username.clone();
        users.insert(username.clone(), record);
        if let Err(e) = self.save(&users) {
            users.remove(&username);
            return Err(e);
        }
        Ok(())
    }

    fn save(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), AuthError> {
        let io = |source: std::io::Error| AuthError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let json = serde_json::to_string_pretty(users).map_err(|e| io(std::io::Error::other(e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io)?;
        std::fs::rename(&tmp, &self.path).map_err(io)?;
        Ok(())
    }
}

// ── TokenIssuer ──────────────────────────────────────────────

/// Claims dos tokens emitidos.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username do titular.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Emite e valida tokens HS256.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: username.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Valida assinatura, algoritmo e expiração.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }
}

// ── AuthService ──────────────────────────────────────────────

/// Cadastro, login e validação de tokens.
///
/// As operações com bcrypt são CPU-bound e bloqueantes: os handlers as
/// chamam via `spawn_blocking`.
pub struct AuthService {
    users: UserStore,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: UserStore, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Monta o serviço a partir da configuração, abrindo o arquivo de usuários.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let secret = match &config.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!("JWT_SECRET_KEY ausente, usando segredo aleatório (tokens não sobrevivem a restart)");
                format!(
                    "{}{}",
                    uuid::Uuid::new_v4().simple(),
                    uuid::Uuid::new_v4().simple()
                )
            }
        };

        let users = UserStore::open(&config.users_path)?;
        tracing::info!(
            path = %users.path().display(),
            users = users.len(),
            ttl_secs = config.token_ttl.as_secs(),
            "Auth service inicializado"
        );

        Ok(Self::new(
            users,
            TokenIssuer::new(secret.as_bytes(), config.token_ttl),
            config.bcrypt_cost,
        ))
    }

    /// Cria a conta e já devolve uma sessão (login automático).
    pub fn signup(&self, username: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        // evita o custo do bcrypt; insert revalida sob o lock
        if self.users.contains_username(username) {
            return Err(AuthError::UsernameTaken);
        }
        if self.users.contains_email(email) {
            return Err(AuthError::EmailTaken);
        }

        let record = UserRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: bcrypt::hash(password, self.bcrypt_cost)?,
            created_at: Utc::now(),
        };
        let user = UserProfile::from(&record);
        self.users.insert(record)?;
        tracing::info!(username, "Usuário cadastrado");

        Ok(Session {
            token: self.tokens.issue(username)?,
            user,
        })
    }

    /// Usuário inexistente e senha errada dão o mesmo erro.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let Some(record) = self.users.get(username) else {
            tracing::debug!(username, "Login: usuário inexistente");
            return Err(AuthError::InvalidCredentials);
        };
        if !bcrypt::verify(password, &record.password_hash)? {
            tracing::warn!(username, "Login: senha incorreta");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(Session {
            token: self.tokens.issue(username)?,
            user: UserProfile::from(&record),
        })
    }

    /// Devolve o username do titular de um token válido.
    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.verify(token).map(|claims| claims.sub)
    }

    pub fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        self.tokens.issue(username)
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_users_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("users-{}", uuid::Uuid::new_v4()))
            .join("users.json")
    }

    /// Serviço com custo bcrypt mínimo sobre um arquivo temporário.
    pub(crate) fn service() -> AuthService {
        AuthService::new(
            UserStore::open(temp_users_path()).unwrap(),
            TokenIssuer::new(b"test-secret", Duration::from_secs(3600)),
            4,
        )
    }

    #[test]
    fn signup_then_login_yields_valid_tokens() {
        let auth = service();
        let session = auth.signup("alice", "alice@example.com", "pw-1").unwrap();
        assert_eq!(session.user.username, "alice");
        assert_eq!(session.user.email, "alice@example.com");
        assert_eq!(auth.verify_token(&session.token).unwrap(), "alice");

        let again = auth.login("alice", "pw-1").unwrap();
        assert_eq!(auth.verify_token(&again.token).unwrap(), "alice");
    }

    #[test]
    fn duplicate_username_and_email_are_rejected() {
        let auth = service();
        auth.signup("alice", "alice@example.com", "pw").unwrap();
        assert!(matches!(
            auth.signup("alice", "other@example.com", "pw"),
            Err(AuthError::UsernameTaken)
        ));
        assert!(matches!(
            auth.signup("bob", "ALICE@example.com", "pw"),
            Err(AuthError::EmailTaken)
        ));
        assert_eq!(auth.users().len(), 1);
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let auth = service();
        auth.signup("alice", "alice@example.com", "right").unwrap();
        let wrong = auth.login("alice", "wrong").unwrap_err();
        let unknown = auth.login("nobody", "right").unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn password_is_stored_only_as_hash() {
        let auth = service();
        auth.signup("alice", "alice@example.com", "plain-text-pw").unwrap();
        let json = std::fs::read_to_string(auth.users().path()).unwrap();
        assert!(!json.contains("plain-text-pw"));

        let record = auth.users().get("alice").unwrap();
        assert!(record.password_hash.starts_with("$2"));
        assert!(bcrypt::verify("plain-text-pw", &record.password_hash).unwrap());
    }

    #[test]
    fn accounts_survive_reopening_the_file() {
        let path = temp_users_path();
        {
            let auth = AuthService::new(
                UserStore::open(&path).unwrap(),
                TokenIssuer::new(b"s", Duration::from_secs(60)),
                4,
            );
            auth.signup("alice", "alice@example.com", "pw").unwrap();
        }
        let reopened = UserStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        let record = reopened.get("alice").unwrap();
        assert_eq!(record.email, "alice@example.com");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["alice"]["password"].is_string());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_store() {
        let path = temp_users_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[not, a, map").unwrap();
        assert!(matches!(UserStore::open(&path), Err(AuthError::Corrupt { .. })));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = b"test-secret";
        let past = Utc::now().timestamp() - 3600;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                sub: "alice".into(),
                iat: past - 60,
                exp: past,
            },
            &EncodingKey::from_secret(secret),
        )
        .unwrap();
        let issuer = TokenIssuer::new(secret, Duration::from_secs(60));
        assert!(matches!(issuer.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let ours = TokenIssuer::new(b"ours", Duration::from_secs(60));
        let theirs = TokenIssuer::new(b"theirs", Duration::from_secs(60));
        let token = theirs.issue("alice").unwrap();
        assert!(matches!(ours.verify(&token), Err(AuthError::InvalidToken(_))));
        assert!(ours.verify("not-a-jwt").is_err());
    }

    #[test]
    fn issued_claims_carry_the_ttl() {
        let issuer = TokenIssuer::new(b"s", Duration::from_secs(900));
        let claims = issuer.verify(&issuer.issue("alice").unwrap()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn from_config_without_secret_still_issues_tokens() {
        let auth = AuthService::from_config(&AuthConfig {
            jwt_secret: None,
            users_path: temp_users_path(),
            token_ttl: Duration::from_secs(60),
            bcrypt_cost: 4,
        })
        .unwrap();
        let token = auth.issue_token("alice").unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), "alice");
        assert!(auth.users().is_empty());
    }
}
