//! # FactStore — Base de Fatos Indexada
//!
//! O [`FactStore`] guarda todos os fatos carregados na inicialização, com
//! dois índices para consulta por igualdade exata de strings:
//!
//! - **Índice direto**: `kind → subject → [value]`: "quais valores este
//!   conceito tem para este tipo de fato?"
//! - **Índice reverso**: `kind → value → [subject]`: "quais conceitos apontam
//!   para este valor?" (usado nas arestas inversas da inferência)
//!
//! Ambos preservam a **ordem de carregamento**, o que torna determinística a
//! política "o primeiro fato vence" do [`QueryEngine`](super::QueryEngine).
//!
//! ## Ciclo de Vida em Dois Estados
//!
//! ```text
//! FactStoreBuilder (carregando)  ──build()──▶  FactStore (carregado)
//!   ├── insert(fact)                             ├── query / query_subjects
//!   └── extend(facts)                            ├── edges_from / edges_to
//!                                                └── (nenhum método &mut)
//! ```
//!
//! O estado "carregado" não expõe nenhuma mutação, então o store pode ser
//! compartilhado entre requisições como `Arc<FactStore>` sem lock algum.
//!
//! ## Exemplo
//!
//! ```rust,ignore
//! let mut builder = FactStoreBuilder::new();
//! builder.insert(Fact::related("Atom", "Symbol"));
//! builder.insert(Fact::related("Expression", "Atom"));
//! let store = builder.build();
//!
//! assert_eq!(store.edges_from("Atom"), ["Symbol".to_string()]);
//! assert_eq!(store.edges_to("Atom"), ["Expression".to_string()]);
//! ```

use std::collections::{HashMap, HashSet};

use super::fact::{Fact, FactKind};

/// Índice `kind → chave → [strings]`, em ordem de inserção.
type Index = HashMap<FactKind, HashMap<String, Vec<String>>>;

/// Estado de carregamento: acumula fatos antes de congelar o store.
#[derive(Debug, Default)]
pub struct FactStoreBuilder {
    facts: Vec<Fact>,
}

impl FactStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um fato ao final da ordem de carregamento.
    pub fn insert(&mut self, fact: Fact) -> &mut Self {
        tracing::trace!(fact = %fact, "FactStore: fato recebido");
        self.facts.push(fact);
        self
    }

    pub fn extend<I: IntoIterator<Item = Fact>>(&mut self, facts: I) -> &mut Self {
        for fact in facts {
            self.insert(fact);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Congela os fatos e constrói os índices direto e reverso.
    pub fn build(self) -> FactStore {
        let mut forward: Index = HashMap::new();
        let mut inverse: Index = HashMap::new();

        for fact in &self.facts {
            forward
                .entry(fact.kind)
                .or_default()
                .entry(fact.subject.clone())
                .or_default()
                .push(fact.value.clone());
            inverse
                .entry(fact.kind)
                .or_default()
                .entry(fact.value.clone())
                .or_default()
                .push(fact.subject.clone());
        }

        FactStore {
            facts: self.facts,
            forward,
            inverse,
        }
    }
}

impl FromIterator<Fact> for FactStore {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut builder = FactStoreBuilder::new();
        builder.extend(iter);
        builder.build()
    }
}

/// Base de fatos carregada e imutável.
///
/// Todas as consultas são por igualdade exata e case-sensitive; nenhuma
/// busca fuzzy ou por substring é feita aqui. Quem chama é responsável por
/// normalizar o nome do conceito antes (ver
/// [`ConceptNormalizer`](super::ConceptNormalizer)).
#[derive(Debug)]
pub struct FactStore {
    /// Fatos em ordem de carregamento.
    facts: Vec<Fact>,
    forward: Index,
    inverse: Index,
}

impl FactStore {
    /// Store vazio, adotado quando o carregamento falha.
    pub fn empty() -> Self {
        FactStoreBuilder::new().build()
    }

    /// Todos os valores de `(kind, subject)`, em ordem de carregamento.
    ///
    /// Retorna slice vazio quando não há correspondência.
    pub fn query(&self, kind: FactKind, subject: &str) -> &[String] {
        lookup(&self.forward, kind, subject)
    }

    /// Consulta inversa: todos os subjects com `(kind, *, value)`, em ordem
    /// de carregamento.
    pub fn query_subjects(&self, kind: FactKind, value: &str) -> &[String] {
        lookup(&self.inverse, kind, value)
    }

    /// Primeiro valor de `(kind, subject)`, se houver.
    pub fn first(&self, kind: FactKind, subject: &str) -> Option<&str> {
        self.query(kind, subject).first().map(String::as_str)
    }

    /// Arestas diretas: alvos de `Related(subject, *)`.
    pub fn edges_from(&self, subject: &str) -> &[String] {
        self.query(FactKind::Related, subject)
    }

    /// Arestas inversas: origens de `Related(*, subject)`.
    pub fn edges_to(&self, subject: &str) -> &[String] {
        self.query_subjects(FactKind::Related, subject)
    }

    /// `true` se `name` é subject de algum fato ou alvo de alguma aresta.
    ///
    /// Fora desse conjunto o registro resolvido é só sentinelas.
    pub fn mentions(&self, name: &str) -> bool {
        self.forward.values().any(|by_subject| by_subject.contains_key(name))
            || !self.edges_to(name).is_empty()
    }

    /// Itera sobre os fatos na ordem em que foram carregados.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    /// Subjects distintos, na ordem em que aparecem pela primeira vez.
    pub fn subjects(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.facts
            .iter()
            .map(|f| f.subject.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Total de fatos carregados.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Total de arestas `Related`.
    pub fn edge_count(&self) -> usize {
        self.facts.iter().filter(|f| f.is_edge()).count()
    }
}

fn lookup<'a>(index: &'a Index, kind: FactKind, key: &str) -> &'a [String] {
    index
        .get(&kind)
        .and_then(|by_key| by_key.get(key))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
