//! Create/edit form normalization.
//!
//! A form collects the raw inputs of the prompt editor. Submitting it validates
//! the required inputs, synthesizes the purpose sentence, and reconciles the
//! manually declared fields with the placeholders found in the text.

use super::model::{CustomField, NewPrompt, Prompt};
use super::template::extract_placeholders;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

const WHEN_PREFIX: &str = "When I need to ";
const WANT_SEPARATOR: &str = ", I want ";
const SO_SEPARATOR: &str = " so I can ";

/// Inputs of the editor that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    WhenINeedTo,
    IWant,
    SoICan,
    Prompt,
    OutputFormat,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::WhenINeedTo => "when I need to",
            FormField::IWant => "I want",
            FormField::SoICan => "so I can",
            FormField::Prompt => "prompt",
            FormField::OutputFormat => "output format",
        }
    }
}

/// Every required input that was left blank, with its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_errors(.0))]
pub struct ValidationError(pub Vec<(FormField, &'static str)>);

impl ValidationError {
    pub fn message_for(&self, field: FormField) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }
}

fn render_errors(errors: &[(FormField, &'static str)]) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field.label(), msg))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A field row typed into the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInput {
    pub name: String,
    pub description: String,
}

impl FieldInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Raw editor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    pub title: String,
    pub when_i_need_to: String,
    pub i_want: String,
    pub so_i_can: String,
    pub ai_persona: String,
    pub prompt: String,
    pub reference: String,
    pub output_format: String,
    pub example: String,
    pub custom_fields: Vec<FieldInput>,
}

impl PromptForm {
    /// Pre-fills the editor from a stored prompt, splitting its purpose back
    /// into the three sub-fields.
    pub fn from_prompt(prompt: &Prompt) -> Self {
        let (when_i_need_to, i_want, so_i_can) = split_purpose(&prompt.purpose);
        Self {
            title: prompt.title.clone(),
            when_i_need_to,
            i_want,
            so_i_can,
            ai_persona: prompt.ai_persona.clone(),
            prompt: prompt.prompt.clone(),
            reference: prompt.reference.clone(),
            output_format: prompt.output_format.clone(),
            example: prompt.example.clone(),
            custom_fields: prompt
                .custom_fields
                .iter()
                .map(|f| FieldInput::new(f.name.clone(), f.description.clone()))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            (FormField::Title, &self.title, "Title is required"),
            (FormField::WhenINeedTo, &self.when_i_need_to, "This field is required"),
            (FormField::IWant, &self.i_want, "This field is required"),
            (FormField::SoICan, &self.so_i_can, "This field is required"),
            (FormField::Prompt, &self.prompt, "Prompt template is required"),
            (FormField::OutputFormat, &self.output_format, "Output format is required"),
        ];
        let errors: Vec<_> = required
            .into_iter()
            .filter(|(_, value, _)| value.trim().is_empty())
            .map(|(field, _, msg)| (field, msg))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(errors))
        }
    }

    /// Validates and normalizes the form into a prompt payload.
    ///
    /// `editing` is the stored prompt being edited, if any; descriptions it
    /// holds survive when the form leaves them blank. `category_id` is the
    /// currently selected category, falling back to the edited prompt's.
    pub fn submit(
        &self,
        editing: Option<&Prompt>,
        category_id: Option<&str>,
    ) -> Result<NewPrompt, ValidationError> {
        self.validate()?;

        let purpose = compose_purpose(
            self.when_i_need_to.trim(),
            self.i_want.trim(),
            self.so_i_can.trim(),
        );

        Ok(NewPrompt {
            title: self.title.trim().to_string(),
            purpose,
            prompt: self.prompt.trim().to_string(),
            ai_persona: self.ai_persona.trim().to_string(),
            output_format: self.output_format.trim().to_string(),
            example: self.example.trim().to_string(),
            reference: self.reference.trim().to_string(),
            custom_fields: self.merged_fields(editing),
            category_id: category_id
                .map(str::to_string)
                .or_else(|| editing.and_then(|p| p.category_id.clone())),
        })
    }

    /// Placeholders currently typed in the text blocks.
    pub fn detected_placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for text in [
            &self.prompt,
            &self.ai_persona,
            &self.output_format,
            &self.example,
            &self.reference,
        ] {
            for name in extract_placeholders(text) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn merged_fields(&self, editing: Option<&Prompt>) -> Vec<CustomField> {
        let manual: Vec<(&str, &str)> = self
            .custom_fields
            .iter()
            .map(|f| (f.name.trim(), f.description.trim()))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let mut descriptions: HashMap<&str, &str> = HashMap::new();
        for &(name, description) in &manual {
            descriptions.insert(name, description);
        }
        if let Some(previous) = editing {
            for field in &previous.custom_fields {
                let slot = descriptions.entry(field.name.as_str()).or_insert("");
                if slot.is_empty() {
                    *slot = field.description.as_str();
                }
            }
        }

        let mut names = self.detected_placeholders();
        for &(name, _) in &manual {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        names
            .into_iter()
            .map(|name| {
                let description = descriptions.get(name.as_str()).copied().unwrap_or_default();
                CustomField::new(name, description)
            })
            .collect()
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `When I need to {A}, I want {B} so I can {C}`.
pub fn compose_purpose(when_i_need_to: &str, i_want: &str, so_i_can: &str) -> String {
    format!(
        "{}{}{}{}{}{}",
        WHEN_PREFIX, when_i_need_to, WANT_SEPARATOR, i_want, SO_SEPARATOR, so_i_can
    )
}

/// Inverse of [`compose_purpose`]. Pieces that cannot be located come back empty.
pub fn split_purpose(purpose: &str) -> (String, String, String) {
    if purpose.is_empty() {
        return Default::default();
    }
    let (head, rest) = match purpose.split_once(WANT_SEPARATOR) {
        Some((head, rest)) => (head, Some(rest)),
        None => (purpose, None),
    };
    let when = head.strip_prefix(WHEN_PREFIX).unwrap_or(head).to_string();
    let want = rest
        .map(|r| r.split_once(SO_SEPARATOR).map_or(r, |(w, _)| w))
        .unwrap_or_default()
        .to_string();
    let so = purpose
        .split_once(SO_SEPARATOR)
        .map(|(_, s)| s.to_string())
        .unwrap_or_default();
    (when, want, so)
}
