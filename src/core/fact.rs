//! # Fact — Tripla Tipada sobre Conceitos
//!
//! Um [`Fact`] é a menor unidade de conhecimento da base de FAQ: uma tripla
//! `(kind, subject, value)` escrita pela equipe de documentação.
//!
//! | Kind | `value` | Cardinalidade por subject |
//! |------|---------|---------------------------|
//! | [`FactKind::Description`] | texto livre | no máximo 1 (o primeiro vence) |
//! | [`FactKind::Syntax`] | texto livre | no máximo 1 (o primeiro vence) |
//! | [`FactKind::Example`] | texto livre | no máximo 1 (o primeiro vence) |
//! | [`FactKind::Related`] | nome de conceito | N (cada fato é uma aresta) |
//!
//! Os fatos `Related` formam um grafo dirigido sobre nomes de conceitos:
//!
//! ```text
//! (Related "Atom" "Symbol")   →   Atom ──▶ Symbol
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tipo de um fato. Os nomes coincidem com a cabeça da expressão no arquivo
/// de conhecimento (`Description`, `Syntax`, `Example`, `Related`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    /// Descrição em prosa do conceito.
    Description,
    /// Forma sintática (assinatura) do conceito.
    Syntax,
    /// Exemplo de uso.
    Example,
    /// Aresta dirigida para outro conceito.
    Related,
}

impl FactKind {
    /// Nome canônico, idêntico ao usado no arquivo de fatos.
    pub fn label(&self) -> &'static str {
        match self {
            FactKind::Description => "Description",
            FactKind::Syntax => "Syntax",
            FactKind::Example => "Example",
            FactKind::Related => "Related",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cabeça de expressão que não corresponde a nenhum [`FactKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFactKind(pub String);

impl FromStr for FactKind {
    type Err = UnknownFactKind;

    /// Comparação exata (case-sensitive), igual ao pattern-matching do arquivo.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Description" => Ok(FactKind::Description),
            "Syntax" => Ok(FactKind::Syntax),
            "Example" => Ok(FactKind::Example),
            "Related" => Ok(FactKind::Related),
            other => Err(UnknownFactKind(other.to_string())),
        }
    }
}

/// Tripla imutável `(kind, subject, value)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub kind: FactKind,
    pub subject: String,
    pub value: String,
}

impl Fact {
    pub fn new(kind: FactKind, subject: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            value: value.into(),
        }
    }

    /// Atalho para uma aresta `Related(subject, target)`.
    pub fn related(subject: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(FactKind::Related, subject, target)
    }

    /// `true` se o fato é uma aresta do grafo de conceitos.
    pub fn is_edge(&self) -> bool {
        self.kind == FactKind::Related
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {:?} {:?})", self.kind, self.subject, self.value)
    }
}
