//! # Módulo Inference — Dicas Relacionais
//!
//! Deriva, a partir das arestas `Related`, as relações "é um tipo de" e
//! "é usado com" que acompanham cada conceito resolvido.
//!
//! | Regra | Padrão | Dica |
//! |-------|--------|------|
//! | **Inversa** | `Related(P, S)` | `Is a type of P` |
//! | **Direta** (fallback) | `Related(S, T)` | `Is typically used with T` |
//!
//! Veja [`RelationInference`] para detalhes.

pub mod rules;

pub use rules::{InferredRelation, RelationInference};
