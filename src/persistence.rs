//! # Persistência — Carregamento da Fonte de Fatos
//!
//! A base de conhecimento é um arquivo texto orientado a linhas, no estilo
//! de expressões MeTTa, mantido pela equipe de documentação:
//!
//! ```text
//! ; Tipos fundamentais
//! (Description "Atom" "The fundamental unit of MeTTa knowledge.")
//! (Syntax "match" "(match <space> <pattern> <template>)")
//! (Related "Atom" "Symbol")
//! ```
//!
//! ## Regras de Leitura
//!
//! | Linha | Tratamento |
//! |-------|------------|
//! | vazia ou começando com `;` | ignorada |
//! | `(Kind "subject" "value")` com Kind conhecido | vira um [`Fact`] |
//! | outra expressão balanceada (`(: match ...)`, `!(...)`) | ignorada (log debug) |
//! | qualquer outra coisa | [`LoadError::Malformed`] com o número da linha |
//!
//! Strings aceitam os escapes `\"`, `\\`, `\n` e `\t`.
//!
//! Toda expressão ocupa uma linha só. Uma forma MeTTa quebrada em várias
//! linhas fica desbalanceada na primeira delas e é rejeitada.
//!
//! ## Falha Segura
//!
//! O servidor nunca cai por causa da fonte de fatos: [`load_or_empty`]
//! registra o erro e devolve um store vazio, e o resolver passa a responder
//! `"Not found"` para tudo.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::{Fact, FactKind, FactStore, FactStoreBuilder};
use crate::error::LoadError;

static FACT_RE: OnceLock<Regex> = OnceLock::new();

/// `(Head "subject" "value")`, com comentário opcional no fim da linha.
fn fact_re() -> &'static Regex {
    FACT_RE.get_or_init(|| {
        Regex::new(
            r#"^\(\s*([A-Za-z_][A-Za-z0-9_-]*)\s+"((?:[^"\\]|\\.)*)"\s+"((?:[^"\\]|\\.)*)"\s*\)\s*(?:;.*)?$"#,
        )
        .unwrap()
    })
}

/// Lê e interpreta o arquivo de fatos em `path`.
///
/// # Erros
///
/// - [`LoadError::NotFound`] se o arquivo não existir
/// - [`LoadError::Io`] se a leitura falhar
/// - [`LoadError::Malformed`] na primeira linha inválida
pub fn load_facts(path: &Path) -> Result<FactStore, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_facts(&source)
}

/// Carrega os fatos ou, em caso de falha, registra o erro e devolve um
/// store vazio.
pub fn load_or_empty(path: &Path) -> FactStore {
    match load_facts(path) {
        Ok(store) => {
            tracing::info!(
                path = %path.display(),
                facts = store.len(),
                edges = store.edge_count(),
                concepts = store.subjects().len(),
                "Base de fatos carregada"
            );
            store
        }
        Err(e) => {
            tracing::warn!(error = %e, "Falha ao carregar base de fatos, iniciando vazia");
            FactStore::empty()
        }
    }
}

/// Interpreta o conteúdo completo de uma fonte de fatos.
pub fn parse_facts(source: &str) -> Result<FactStore, LoadError> {
    let mut builder = FactStoreBuilder::new();
    for (idx, raw) in source.lines().enumerate() {
        if let Some(fact) = parse_line(idx + 1, raw)? {
            builder.insert(fact);
        }
    }
    Ok(builder.build())
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Fact>, LoadError> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with(';') {
        return Ok(None);
    }

    let malformed = |reason: &str| LoadError::Malformed {
        line,
        content: text.to_string(),
        reason: reason.to_string(),
    };

    if let Some(caps) = fact_re().captures(text) {
        let head = &caps[1];
        return match head.parse::<FactKind>() {
            Ok(kind) => {
                let subject = unescape(&caps[2]).map_err(|r| malformed(&r))?;
                let value = unescape(&caps[3]).map_err(|r| malformed(&r))?;
                Ok(Some(Fact::new(kind, subject, value)))
            }
            Err(_) => {
                tracing::debug!(line, head, "Expressão ignorada (tipo desconhecido)");
                Ok(None)
            }
        };
    }

    if !is_balanced_expression(text) {
        return Err(malformed("expected a balanced S-expression"));
    }
    match expression_head(text) {
        Some(head) if head.parse::<FactKind>().is_ok() => Err(malformed(
            "expected (Kind \"subject\" \"value\") with two quoted strings",
        )),
        Some(head) => {
            tracing::debug!(line, head, "Expressão ignorada (não é fato)");
            Ok(None)
        }
        None => Err(malformed("expected an expression head")),
    }
}

/// `true` se a linha é `(...)` ou `!(...)` com parênteses balanceados
/// (ignorando os que estão dentro de strings).
fn is_balanced_expression(text: &str) -> bool {
    let body = text.strip_prefix('!').unwrap_or(text);
    if !body.starts_with('(') {
        return false;
    }

    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in body.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            ';' if depth == 0 => break,
            _ => {}
        }
    }
    depth == 0 && !in_string
}

/// Primeiro símbolo depois do `(` de abertura.
fn expression_head(text: &str) -> Option<&str> {
    let body = text.strip_prefix('!').unwrap_or(text).strip_prefix('(')?;
    let head = body
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == '"')
        .next()?;
    (!head.is_empty()).then_some(head)
}

fn unescape(literal: &str) -> Result<String, String> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => return Err(format!("unsupported escape \\{}", other)),
            None => return Err("dangling backslash".to_string()),
        }
    }
    Ok(out)
}
