//! Prompt templates.

/// The grounding sentinel.
///
/// Emitted verbatim when retrieval finds nothing, and demanded verbatim from
/// the generator when the context does not contain the answer.
pub const NOT_FOUND_ANSWER: &str = "No encontré información sobre eso en los documentos.";

/// Handlebars template for the grounded answer prompt.
///
/// Variables: `sentinel`, `context`, `query`.
pub const GROUNDED_ANSWER_TEMPLATE: &str = r#"Eres un asistente que ÚNICAMENTE responde basándose en el contexto proporcionado.
Si la respuesta no se encuentra en el contexto, responde exactamente: "{{sentinel}}"
No uses conocimiento externo bajo ninguna circunstancia.

Contexto:
{{context}}

Pregunta: {{query}}
Respuesta:"#;
