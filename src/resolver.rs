//! # ConceptResolver — Ponto de Entrada do Conhecimento
//!
//! O [`ConceptResolver`] transforma um token de conceito bruto (vindo do
//! extrator de intenção) num [`ConceptRecord`] completo.
//!
//! ## Fluxo
//!
//! ```text
//! token bruto
//!   ├── 1. ConceptNormalizer::normalize  → None? devolve None (sem consulta)
//!   ├── 2. QueryEngine::resolve_attributes  → description / syntax / example
//!   ├── 3. QueryEngine::resolve_direct_related  → related
//!   └── 4. RelationInference::infer_hints  → inferred_relations
//! ```
//!
//! Nenhum erro atravessa [`resolve`](ConceptResolver::resolve): ausência de
//! dados vira o sentinela `"Not found"` e listas vazias.
//!
//! ## Cache
//!
//! Como o [`FactStore`] nunca muda depois de carregado, o resultado de um
//! conceito canônico também nunca muda. Com [`with_cache`](ConceptResolver::with_cache)
//! os registros são memorizados num `RwLock<HashMap>`, o único lock do resolver,
//! segurado apenas durante o lookup/insert. Só conceitos mencionados no store
//! (ver [`FactStore::mentions`]) são memorizados, então o cache nunca passa do
//! tamanho do vocabulário carregado.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::{ConceptNormalizer, FactStore, QueryEngine};
use crate::inference::RelationInference;

/// Registro resolvido de um conceito, entregue ao gerador de respostas.
///
/// Todos os campos são sempre preenchidos: atributos ausentes usam
/// `"Not found"` e relações ausentes são listas vazias.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    /// Nome canônico consultado no store.
    pub concept: String,
    pub description: String,
    pub syntax: String,
    pub example: String,
    /// Alvos das arestas diretas, em ordem de carregamento.
    pub related: Vec<String>,
    /// Dicas derivadas (nunca armazenadas).
    pub inferred_relations: Vec<String>,
}

/// Resolver de conceitos sobre um store imutável compartilhado.
pub struct ConceptResolver {
    store: Arc<FactStore>,
    normalizer: ConceptNormalizer,
    cache: Option<RwLock<HashMap<String, ConceptRecord>>>,
}

impl ConceptResolver {
    pub fn new(store: Arc<FactStore>) -> Self {
        Self {
            store,
            normalizer: ConceptNormalizer::new(),
            cache: None,
        }
    }

    /// Substitui o normalizador padrão (ex.: allow-list estendida).
    pub fn with_normalizer(mut self, normalizer: ConceptNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Liga a memorização de registros por nome canônico.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(RwLock::new(HashMap::new()));
        self
    }

    /// Resolve um token bruto.
    ///
    /// Retorna `None` quando o token é `None`, vazio ou só espaços
    /// ("nenhum conceito identificado"). Caso contrário, sempre retorna um
    /// registro completo.
    pub fn resolve(&self, raw_concept: Option<&str>) -> Option<ConceptRecord> {
        let concept = self.normalizer.normalize(raw_concept)?;
        tracing::debug!(concept = %concept, "Resolver: conceito normalizado");

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.read().get(&concept) {
                return Some(hit.clone());
            }
        }

        let record = self.build_record(concept);

        // só nomes presentes no store entram no cache
        if let Some(cache) = &self.cache {
            if self.store.mentions(&record.concept) {
                cache
                    .write()
                    .entry(record.concept.clone())
                    .or_insert_with(|| record.clone());
            }
        }
        Some(record)
    }

    fn build_record(&self, concept: String) -> ConceptRecord {
        let engine = QueryEngine::new(&self.store);
        let attrs = engine.resolve_attributes(&concept);
        let related = engine.resolve_direct_related(&concept);
        let inferred_relations =
            RelationInference::infer_hints(&self.store, &concept, Some(related.as_slice()));

        tracing::debug!(
            concept = %concept,
            related = related.len(),
            inferred = ?inferred_relations,
            "Resolver: relações inferidas"
        );

        ConceptRecord {
            concept,
            description: attrs.description,
            syntax: attrs.syntax,
            example: attrs.example,
            related,
            inferred_relations,
        }
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// Quantidade de registros memorizados (0 sem cache).
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map(|c| c.read().len()).unwrap_or(0)
    }
}
