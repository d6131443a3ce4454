//! Placeholder extraction, field resolution, substitution and prompt assembly.
//!
//! Every function here is total: malformed braces are treated as literal text
//! and never produce an error.

use super::model::Prompt;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Values typed by the user, keyed by field name.
pub type FieldValues = HashMap<String, String>;

/// `{name}` where `name` holds neither brace.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// The five prompt text blocks that may carry placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBlock {
    Body,
    Persona,
    OutputFormat,
    Example,
    Reference,
}

impl TextBlock {
    /// Order in which blocks contribute to the template placeholder set.
    pub const ALL: [TextBlock; 5] = [
        TextBlock::Body,
        TextBlock::Persona,
        TextBlock::OutputFormat,
        TextBlock::Example,
        TextBlock::Reference,
    ];

    pub fn text(self, prompt: &Prompt) -> &str {
        match self {
            TextBlock::Body => &prompt.prompt,
            TextBlock::Persona => &prompt.ai_persona,
            TextBlock::OutputFormat => &prompt.output_format,
            TextBlock::Example => &prompt.example,
            TextBlock::Reference => &prompt.reference,
        }
    }
}

/// Where a customizable field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldOrigin {
    /// Only referenced as `{name}` in the prompt text.
    Template,
    /// Only declared in the prompt's custom fields.
    Declared,
    /// Declared and referenced in the text.
    Both,
}

impl FieldOrigin {
    pub fn is_placeholder(self) -> bool {
        matches!(self, FieldOrigin::Template | FieldOrigin::Both)
    }
}

/// A field presented for customization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Field {
    pub name: String,
    pub origin: FieldOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Human label: camelCase split into words, first letter upper-cased.
    pub fn display_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 4);
        for c in self.name.chars() {
            if c.is_ascii_uppercase() && !out.is_empty() {
                out.push(' ');
            }
            out.push(c);
        }
        let mut chars = out.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => out,
        }
    }
}

/// Distinct placeholder names in `text`, in order of first appearance.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    push_placeholders(text, &mut names);
    names
}

fn push_placeholders(text: &str, names: &mut Vec<String>) {
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
}

/// Union of the placeholders of all five text blocks of `prompt`.
pub fn template_placeholders(prompt: &Prompt) -> Vec<String> {
    let mut names = Vec::new();
    for block in TextBlock::ALL {
        push_placeholders(block.text(prompt), &mut names);
    }
    names
}

/// Template placeholders followed by declared custom fields not already listed.
pub fn resolve_fields(prompt: &Prompt) -> Vec<Field> {
    let placeholders = template_placeholders(prompt);
    let placeholder_set: HashSet<&str> = placeholders.iter().map(String::as_str).collect();
    let declared: HashSet<&str> = declared_names(prompt).collect();

    let mut fields: Vec<Field> = placeholders
        .iter()
        .map(|name| Field {
            name: name.clone(),
            origin: if declared.contains(name.as_str()) {
                FieldOrigin::Both
            } else {
                FieldOrigin::Template
            },
            description: description_for(prompt, name),
        })
        .collect();

    for name in declared_names(prompt) {
        if placeholder_set.contains(name) || fields.iter().any(|f| f.name == name) {
            continue;
        }
        fields.push(Field {
            name: name.to_string(),
            origin: FieldOrigin::Declared,
            description: description_for(prompt, name),
        });
    }
    fields
}

/// Declared field names with surrounding whitespace removed; blank names are skipped.
fn declared_names(prompt: &Prompt) -> impl Iterator<Item = &str> {
    prompt
        .custom_fields
        .iter()
        .map(|f| f.name.trim())
        .filter(|name| !name.is_empty())
}

fn description_for(prompt: &Prompt, name: &str) -> Option<String> {
    prompt
        .custom_fields
        .iter()
        .find(|f| f.name.trim() == name)
        .map(|f| f.description.clone())
        .filter(|d| !d.is_empty())
}

/// Replaces each `{name}` with its value in one pass. Placeholders without a
/// value (absent or empty) are kept verbatim.
pub fn substitute(text: &str, values: &FieldValues) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Builds the final prompt text:
/// persona, input details, body, output format, example, reference.
pub fn assemble(prompt: &Prompt, values: &FieldValues) -> String {
    let placeholders = template_placeholders(prompt);
    let mut out = String::new();

    if !prompt.ai_persona.is_empty() {
        out.push_str(&substitute(&prompt.ai_persona, values));
        out.push_str("\n\n");
    }

    let details = input_details(prompt, &placeholders, values);
    if !details.is_empty() {
        out.push_str("Input Details:\n");
        for (name, value) in details {
            out.push_str(&format!("- {}: {}\n", name, value));
        }
        out.push('\n');
    }

    out.push_str(&substitute(&prompt.prompt, values));

    let sections = [
        ("Output Format", &prompt.output_format),
        ("Example", &prompt.example),
        ("Reference Context", &prompt.reference),
    ];
    for (header, text) in sections {
        if !text.is_empty() {
            out.push_str(&format!("\n\n{}:\n{}", header, substitute(text, values)));
        }
    }
    out
}

/// Declared fields that are not placeholders and carry a non-blank value.
fn input_details<'a>(
    prompt: &'a Prompt,
    placeholders: &[String],
    values: &'a FieldValues,
) -> Vec<(&'a str, &'a str)> {
    let mut seen = HashSet::new();
    prompt
        .custom_fields
        .iter()
        .filter_map(|field| {
            let name = field.name.trim();
            if name.is_empty() || placeholders.iter().any(|p| p == name) || !seen.insert(name) {
                return None;
            }
            let value = values.get(name).map(String::as_str).unwrap_or_default();
            if value.trim().is_empty() {
                return None;
            }
            Some((name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CustomField, NewPrompt};
    use chrono::Utc;

    fn prompt(draft: NewPrompt) -> Prompt {
        draft.into_prompt("p".into(), Utc::now())
    }

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn extracts_distinct_names_in_order() {
        let names = extract_placeholders("{b} and {a}, then {b} again");
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn extraction_handles_empty_and_malformed_text() {
        assert!(extract_placeholders("").is_empty());
        assert!(extract_placeholders("no braces {} here").is_empty());
        assert!(extract_placeholders("unclosed {topic").is_empty());
        assert_eq!(extract_placeholders("{outer {inner}}"), vec!["inner"]);
        assert_eq!(extract_placeholders("}{x}{"), vec!["x"]);
    }

    #[test]
    fn names_are_not_validated() {
        let names = extract_placeholders("{target audience} {tone!?}");
        assert_eq!(names, vec!["target audience", "tone!?"]);
    }

    #[test]
    fn placeholder_set_spans_all_blocks() {
        let p = prompt(NewPrompt {
            prompt: "{topic}".into(),
            ai_persona: "You are {role}".into(),
            output_format: "{format} about {topic}".into(),
            example: "{sample}".into(),
            reference: "{source}".into(),
            ..NewPrompt::default()
        });
        assert_eq!(
            template_placeholders(&p),
            vec!["topic", "role", "format", "sample", "source"]
        );
    }

    #[test]
    fn fields_are_tagged_by_origin() {
        let p = prompt(NewPrompt {
            prompt: "Write about {topic} for {audience}".into(),
            custom_fields: vec![
                CustomField::new("audience", "Who reads it"),
                CustomField::new("level", ""),
            ],
            ..NewPrompt::default()
        });
        let fields = resolve_fields(&p);
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.origin, f.description.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("topic", FieldOrigin::Template, None),
                ("audience", FieldOrigin::Both, Some("Who reads it")),
                ("level", FieldOrigin::Declared, None),
            ]
        );
        assert_eq!(resolve_fields(&p), fields);
    }

    #[test]
    fn substitute_without_values_is_identity() {
        let text = "Hello {name}, {unfilled} {";
        assert_eq!(substitute(text, &FieldValues::new()), text);
    }

    #[test]
    fn substitute_replaces_every_occurrence_only_of_filled_fields() {
        let out = substitute(
            "{x} and {x} but not {y} or {z}",
            &values(&[("x", "v"), ("z", "")]),
        );
        assert_eq!(out, "v and v but not {y} or {z}");
    }

    #[test]
    fn substitute_does_not_rescan_inserted_values() {
        let out = substitute("{a}", &values(&[("a", "{b}"), ("b", "nope")]));
        assert_eq!(out, "{b}");
    }

    #[test]
    fn assembles_body_only_with_partial_values() {
        let p = prompt(NewPrompt {
            prompt: "Write about {topic} for {audience}".into(),
            ..NewPrompt::default()
        });
        let out = assemble(&p, &values(&[("topic", "cats"), ("audience", "")]));
        assert_eq!(out, "Write about cats for {audience}");
    }

    #[test]
    fn declared_field_goes_to_input_details() {
        let p = prompt(NewPrompt {
            prompt: "Review this code.".into(),
            custom_fields: vec![CustomField::new("level", "")],
            ..NewPrompt::default()
        });
        let out = assemble(&p, &values(&[("level", "senior")]));
        assert_eq!(out, "Input Details:\n- level: senior\n\nReview this code.");
    }

    #[test]
    fn placeholder_fields_never_appear_in_input_details() {
        let p = prompt(NewPrompt {
            prompt: "Write for {audience}".into(),
            custom_fields: vec![CustomField::new("audience", "")],
            ..NewPrompt::default()
        });
        let out = assemble(&p, &values(&[("audience", "kids")]));
        assert_eq!(out, "Write for kids");
        assert!(!out.contains("Input Details"));
    }

    #[test]
    fn blank_declared_values_are_skipped() {
        let p = prompt(NewPrompt {
            prompt: "Body".into(),
            custom_fields: vec![CustomField::new("level", ""), CustomField::new("tone", "")],
            ..NewPrompt::default()
        });
        let out = assemble(&p, &values(&[("level", "   "), ("tone", "dry")]));
        assert_eq!(out, "Input Details:\n- tone: dry\n\nBody");
    }

    #[test]
    fn sections_follow_fixed_order() {
        let p = prompt(NewPrompt {
            prompt: "Explain {topic}".into(),
            ai_persona: "You are a {role}.".into(),
            output_format: "Bullets about {topic}".into(),
            example: "- {topic} is neat".into(),
            reference: "See {source}".into(),
            custom_fields: vec![CustomField::new("depth", "")],
            ..NewPrompt::default()
        });
        let out = assemble(
            &p,
            &values(&[("topic", "rust"), ("role", "mentor"), ("depth", "deep")]),
        );
        assert_eq!(
            out,
            "You are a mentor.\n\n\
             Input Details:\n- depth: deep\n\n\
             Explain rust\n\n\
             Output Format:\nBullets about rust\n\n\
             Example:\n- rust is neat\n\n\
             Reference Context:\nSee {source}"
        );
    }

    #[test]
    fn empty_optional_sections_emit_no_headers() {
        let p = prompt(NewPrompt {
            prompt: "Body".into(),
            example: "Sample".into(),
            ..NewPrompt::default()
        });
        let out = assemble(&p, &FieldValues::new());
        assert_eq!(out, "Body\n\nExample:\nSample");
        assert!(!out.contains("Output Format"));
        assert!(!out.contains("Reference Context"));
    }

    #[test]
    fn declared_names_are_trimmed_before_matching() {
        let p = prompt(NewPrompt {
            prompt: "Body about {topic}".into(),
            custom_fields: vec![
                CustomField::new(" tone ", "Voice"),
                CustomField::new(" topic", ""),
                CustomField::new("   ", ""),
            ],
            ..NewPrompt::default()
        });
        let fields = resolve_fields(&p);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["topic", "tone"]);
        assert_eq!(fields[0].origin, FieldOrigin::Both);
        assert_eq!(fields[1].description.as_deref(), Some("Voice"));

        let out = assemble(&p, &values(&[("topic", "rust"), ("tone", "dry")]));
        assert_eq!(out, "Input Details:\n- tone: dry\n\nBody about rust");
    }

    #[test]
    fn display_name_splits_camel_case() {
        let field = Field {
            name: "targetAudience".into(),
            origin: FieldOrigin::Template,
            description: None,
        };
        assert_eq!(field.display_name(), "Target Audience");
    }
}
