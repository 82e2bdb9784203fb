//! # ConceptNormalizer — Canonicalização de Nomes de Conceitos
//!
//! A base de fatos segue uma convenção de capitalização:
//!
//! - **Tipos** são substantivos capitalizados: `Atom`, `Symbol`, `Expression`, `Variable`
//! - **Funções** já chegam em minúsculas: `match`, `unify`
//!
//! O extrator de intenção tenta respeitar essa convenção, mas não há garantia.
//! O normalizador reescreve os substantivos da allow-list para a forma
//! canônica (comparação case-insensitive, após NFC) e deixa qualquer outro
//! token **exatamente** como veio.
//!
//! ```text
//! "atom"   → "Atom"       (allow-list)
//! "ATOM"   → "Atom"       (allow-list)
//! "match"  → "match"      (passa direto)
//! "Match"  → "Match"      (passa direto, funções não são reescritas)
//! ""       → None         (nenhum conceito identificado)
//! ```

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

/// Substantivos do domínio reconhecidos por padrão.
pub const CANONICAL_NOUNS: &[&str] = &["Atom", "Symbol", "Expression", "Variable"];

/// Normalizador baseado em allow-list.
#[derive(Clone, Debug)]
pub struct ConceptNormalizer {
    /// chave dobrada (NFC + lowercase) → forma canônica
    canonical: HashMap<String, String>,
}

impl Default for ConceptNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptNormalizer {
    /// Normalizador com a allow-list padrão ([`CANONICAL_NOUNS`]).
    pub fn new() -> Self {
        Self {
            canonical: HashMap::new(),
        }
        .with_nouns(CANONICAL_NOUNS.iter().copied())
    }

    /// Acrescenta substantivos à allow-list. Um substantivo já presente
    /// (ignorando caixa) tem sua forma canônica substituída.
    pub fn with_nouns<I, S>(mut self, nouns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for noun in nouns {
            let noun = noun.as_ref();
            if noun.trim().is_empty() {
                continue;
            }
            self.canonical.insert(fold(noun), noun.nfc().collect());
        }
        self
    }

    /// Canonicaliza um token bruto.
    ///
    /// Retorna `None` para `None`, string vazia ou só espaços: o sinal de
    /// "nenhum conceito identificado", que não deve chegar ao store.
    pub fn normalize(&self, token: Option<&str>) -> Option<String> {
        let token = token?;
        if token.trim().is_empty() {
            return None;
        }
        match self.canonical.get(&fold(token)) {
            Some(canonical) => Some(canonical.clone()),
            None => Some(token.to_string()),
        }
    }

    /// `true` se o token corresponde a um substantivo da allow-list.
    pub fn is_canonical_noun(&self, token: &str) -> bool {
        self.canonical.contains_key(&fold(token))
    }
}

fn fold(token: &str) -> String {
    token.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_listed_nouns_are_case_insensitive() {
        let n = ConceptNormalizer::new();
        for raw in ["atom", "Atom", "ATOM", "aToM"] {
            assert_eq!(n.normalize(Some(raw)).as_deref(), Some("Atom"));
        }
        assert_eq!(n.normalize(Some("variable")).as_deref(), Some("Variable"));
        assert_eq!(n.normalize(Some("EXPRESSION")).as_deref(), Some("Expression"));
        assert_eq!(n.normalize(Some("symbol")).as_deref(), Some("Symbol"));
    }

    #[test]
    fn other_tokens_pass_through_unchanged() {
        let n = ConceptNormalizer::new();
        assert_eq!(n.normalize(Some("match")).as_deref(), Some("match"));
        assert_eq!(n.normalize(Some("Match")).as_deref(), Some("Match"));
        assert_eq!(n.normalize(Some(" atom")).as_deref(), Some(" atom"));
    }

    #[test]
    fn empty_input_means_no_concept() {
        let n = ConceptNormalizer::new();
        assert_eq!(n.normalize(None), None);
        assert_eq!(n.normalize(Some("")), None);
        assert_eq!(n.normalize(Some("   ")), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = ConceptNormalizer::new();
        for raw in ["atom", "ATOM", "match", "Grounded", "ação", "", "x y"] {
            let once = n.normalize(Some(raw));
            let twice = n.normalize(once.as_deref());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn extra_nouns_extend_the_allow_list() {
        let n = ConceptNormalizer::new().with_nouns(["Grounded", "  "]);
        assert_eq!(n.normalize(Some("grounded")).as_deref(), Some("Grounded"));
        assert!(n.is_canonical_noun("GROUNDED"));
        assert!(n.is_canonical_noun("atom"));
        assert!(!n.is_canonical_noun("match"));
    }

    #[test]
    fn decomposed_unicode_matches_composed_noun() {
        let n = ConceptNormalizer::new().with_nouns(["Função"]);
        // "c" + cedilha combinante, "a" + til combinante
        let decomposed = "func\u{0327}a\u{0303}o";
        assert_eq!(n.normalize(Some(decomposed)).as_deref(), Some("Função"));
    }
}
