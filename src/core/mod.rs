//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Tudo que o resolver de conceitos consulta vive aqui:
//!
//! - [`Fact`] / [`FactKind`] — tripla `(kind, subject, value)`
//! - [`FactStoreBuilder`] / [`FactStore`] — base de fatos (carregando → carregada)
//! - [`ConceptNormalizer`] — canonicalização do nome do conceito
//! - [`QueryEngine`] — leitura de atributos e arestas diretas
//!
//! ```rust,ignore
//! use crate::core::{Fact, FactKind, FactStore, QueryEngine};
//!
//! let store: FactStore = vec![
//!     Fact::new(FactKind::Description, "Atom", "A base value"),
//!     Fact::related("Atom", "Symbol"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let attrs = QueryEngine::new(&store).resolve_attributes("Atom");
//! assert_eq!(attrs.description, "A base value");
//! ```

pub mod fact;
pub mod fact_store;
pub mod normalizer;
pub mod query;

pub use fact::{Fact, FactKind};
pub use fact_store::{FactStore, FactStoreBuilder};
pub use normalizer::ConceptNormalizer;
pub use query::{ConceptAttributes, QueryEngine, NOT_FOUND};
