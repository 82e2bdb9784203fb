//! # Regras de Inferência Relacional
//!
//! A base de fatos tem um único tipo de aresta (`Related`), sem semântica
//! própria. A inferência lê essa aresta nas **duas direções** para produzir
//! dicas legíveis sobre o conceito consultado:
//!
//! ### Regra 1 — Aresta inversa: `Related(P, S) ⊢ S é um tipo de P`
//!
//! ```text
//! (Related "Expression" "Atom")
//! ─────────────────────────────
//! Atom: "Is a type of Expression"
//! ```
//!
//! ### Regra 2 — Aresta direta (fallback): `Related(S, T) ⊢ S é usado com T`
//!
//! Só dispara quando a regra 1 não produz nada.
//!
//! ```text
//! (Related "Atom" "Symbol")  (sem nenhuma aresta chegando em Atom)
//! ─────────────────────────
//! Atom: "Is typically used with Symbol"
//! ```
//!
//! As regras são **mutuamente exclusivas**: o resultado nunca mistura
//! "Is a type of" com "Is typically used with". Conceitos filhos numa
//! taxonomia mostram o pai; conceitos raiz mostram seus parceiros de uso.
//! Não há fecho transitivo: apenas um salto em cada direção.

use std::fmt;

use crate::core::FactStore;

/// Relação derivada para um conceito. A forma textual é a dica mostrada ao
/// gerador de respostas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InferredRelation {
    /// O conceito é alvo de `Related(parent, conceito)`.
    TypeOf(String),
    /// O conceito tem `Related(conceito, partner)` e nenhum pai.
    UsedWith(String),
}

impl fmt::Display for InferredRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredRelation::TypeOf(parent) => write!(f, "Is a type of {}", parent),
            InferredRelation::UsedWith(partner) => {
                write!(f, "Is typically used with {}", partner)
            }
        }
    }
}

/// Motor de inferência relacional. Sem estado, recebe o store por referência.
pub struct RelationInference;

impl RelationInference {
    /// Deriva as relações de `subject` (já normalizado).
    ///
    /// `direct_related` são os alvos de `Related(subject, *)` quando o
    /// chamador já os tem em mãos; com `None` eles são recalculados no store.
    pub fn infer(
        store: &FactStore,
        subject: &str,
        direct_related: Option<&[String]>,
    ) -> Vec<InferredRelation> {
        // Regra 1: arestas chegando no conceito
        let parents: Vec<InferredRelation> = store
            .edges_to(subject)
            .iter()
            .map(|p| InferredRelation::TypeOf(p.clone()))
            .collect();
        if !parents.is_empty() {
            return parents;
        }

        // Regra 2: arestas saindo do conceito
        let targets = direct_related.unwrap_or_else(|| store.edges_from(subject));
        targets
            .iter()
            .map(|t| InferredRelation::UsedWith(t.clone()))
            .collect()
    }

    /// Mesmo que [`infer`](Self::infer), já convertido em texto.
    pub fn infer_hints(
        store: &FactStore,
        subject: &str,
        direct_related: Option<&[String]>,
    ) -> Vec<String> {
        Self::infer(store, subject, direct_related)
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
