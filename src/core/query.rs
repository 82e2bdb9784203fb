//! # QueryEngine — Consultas de Atributos e Relações
//!
//! Camada fina sobre o [`FactStore`] que aplica a política de leitura:
//! para `Description`, `Syntax` e `Example` o **primeiro** fato carregado
//! vence e a ausência vira o sentinela [`NOT_FOUND`]; para `Related`
//! todos os alvos são devolvidos em ordem, sem deduplicação.

use serde::{Deserialize, Serialize};

use super::fact::FactKind;
use super::fact_store::FactStore;

/// Valor usado no lugar de um atributo ausente. Não é um erro.
pub const NOT_FOUND: &str = "Not found";

/// Os três atributos textuais de um conceito.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptAttributes {
    pub description: String,
    pub syntax: String,
    pub example: String,
}

impl Default for ConceptAttributes {
    fn default() -> Self {
        Self {
            description: NOT_FOUND.to_string(),
            syntax: NOT_FOUND.to_string(),
            example: NOT_FOUND.to_string(),
        }
    }
}

/// Motor de consulta sobre um store emprestado.
#[derive(Clone, Copy)]
pub struct QueryEngine<'a> {
    store: &'a FactStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a FactStore) -> Self {
        Self { store }
    }

    /// Busca `Description`, `Syntax` e `Example` de um subject já normalizado.
    pub fn resolve_attributes(&self, subject: &str) -> ConceptAttributes {
        ConceptAttributes {
            description: self.attribute(FactKind::Description, subject),
            syntax: self.attribute(FactKind::Syntax, subject),
            example: self.attribute(FactKind::Example, subject),
        }
    }

    /// Primeiro valor de `(kind, subject)` ou [`NOT_FOUND`].
    pub fn attribute(&self, kind: FactKind, subject: &str) -> String {
        self.store
            .first(kind, subject)
            .unwrap_or(NOT_FOUND)
            .to_string()
    }

    /// Alvos de `Related(subject, *)` em ordem de carregamento, com duplicatas.
    pub fn resolve_direct_related(&self, subject: &str) -> Vec<String> {
        self.store.edges_from(subject).to_vec()
    }

    pub fn store(&self) -> &'a FactStore {
        self.store
    }
}
