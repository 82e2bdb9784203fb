//! Prompts enviados ao modelo e leitura tolerante das respostas.

use crate::resolver::ConceptRecord;

/// Prompt de extração: o modelo deve responder `{"concept": ...}`.
pub fn extraction_prompt(question: &str) -> String {
    format!(
        r#"You are a helper for a MeTTa programming language documentation bot.
Extract the main concept the user is asking about.
Return a JSON object with a single key "concept".

Rules:
- If the user asks about a function (e.g., "match", "unify"), return that function name.
- If the user asks about a type (e.g., "Atom", "Symbol"), return that type name.
- Capitalize concepts like "Atom", "Symbol", "Expression", "Variable" properly as they appear in documentation.
- Lowercase functions like "match", "unify".
- If no MeTTa concept is mentioned, return {{"concept": null}}.

Examples:
"What is the match function?" -> {{"concept": "match"}}
"Explain Atoms" -> {{"concept": "Atom"}}
"How do I use variables?" -> {{"concept": "Variable"}}

User Question: {question}
"#
    )
}

/// Prompt de resposta montado a partir do registro resolvido.
pub fn answer_prompt(question: &str, record: &ConceptRecord) -> String {
    let inferred = if record.inferred_relations.is_empty() {
        "None".to_string()
    } else {
        record.inferred_relations.join("; ")
    };

    format!(
        r#"You are a helpful assistant for the MeTTa programming language.

User Question: "{question}"

Information retrieved from Knowledge Base:
Concept: {concept}
Description: {description}
Syntax: {syntax}
Example: {example}
Related Concepts: {related}
Inferred Relationships: {inferred}

Instructions:
- Answer the user's question using the provided Description, Syntax, and Example.
- If the Description is "Not found", politely say you don't have information on that specific concept yet.
- Always include the 'Inferred Relationships' to give a complete hierarchical context.
- Provide code examples if the syntax is available.
- Keep it concise and friendly.
"#,
        concept = record.concept,
        description = record.description,
        syntax = record.syntax,
        example = record.example,
        related = record.related.join(", "),
    )
}

/// Trecho entre o primeiro `{` e o último `}` do texto.
///
/// Modelos costumam envolver o JSON em cercas markdown ou comentários.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

/// Lê `concept` da resposta de extração.
///
/// `null`, ausência da chave, valor não-string ou JSON inválido dão `None`.
pub fn parse_concept(reply: &str) -> Option<String> {
    let Some(json) = extract_json_object(reply) else {
        tracing::warn!(reply = %reply, "Nenhum JSON na resposta de extração");
        return None;
    };
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "JSON inválido na resposta de extração");
            return None;
        }
    };
    value
        .get("concept")
        .and_then(|c| c.as_str())
        .map(str::to_string)
}
