//! Entities persisted by the library and the payloads used to create or patch them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Type tag stored with every custom field. Only free text exists today.
pub const DEFAULT_FIELD_TYPE: &str = "text";

/// An explicitly declared, optionally described customization field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

impl CustomField {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DEFAULT_FIELD_TYPE.to_string(),
            description: description.into(),
        }
    }
}

fn default_field_type() -> String {
    DEFAULT_FIELD_TYPE.to_string()
}

/// A stored prompt template.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub purpose: String,
    pub prompt: String,
    #[serde(default)]
    pub ai_persona: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    /// Title if set, purpose otherwise. Used wherever a prompt needs a label.
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.purpose
        } else {
            &self.title
        }
    }
}

/// A named group of prompts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a prompt; the store assigns id and timestamps.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPrompt {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub purpose: String,
    pub prompt: String,
    #[serde(default)]
    pub ai_persona: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl NewPrompt {
    pub fn into_prompt(self, id: String, now: DateTime<Utc>) -> Prompt {
        Prompt {
            id,
            title: self.title,
            purpose: self.purpose,
            prompt: self.prompt,
            ai_persona: self.ai_persona,
            output_format: self.output_format,
            example: self.example,
            reference: self.reference,
            custom_fields: self.custom_fields,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating a category.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
}

impl NewCategory {
    pub fn into_category(self, id: String, now: DateTime<Utc>) -> Category {
        Category {
            id,
            name: self.name,
            purpose: self.purpose,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a prompt. Absent fields are left untouched.
///
/// `category_id` distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`), which unassigns the prompt.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<Option<String>>,
}

impl PromptPatch {
    /// Patch that only reassigns the category.
    pub fn move_to(category_id: Option<String>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    /// Patch that replaces every editable field with the draft's values.
    pub fn replace_with(draft: NewPrompt) -> Self {
        Self {
            title: Some(draft.title),
            purpose: Some(draft.purpose),
            prompt: Some(draft.prompt),
            ai_persona: Some(draft.ai_persona),
            output_format: Some(draft.output_format),
            example: Some(draft.example),
            reference: Some(draft.reference),
            custom_fields: Some(draft.custom_fields),
            category_id: Some(draft.category_id),
        }
    }

    pub fn apply(self, prompt: &mut Prompt, now: DateTime<Utc>) {
        if let Some(v) = self.title {
            prompt.title = v;
        }
        if let Some(v) = self.purpose {
            prompt.purpose = v;
        }
        if let Some(v) = self.prompt {
            prompt.prompt = v;
        }
        if let Some(v) = self.ai_persona {
            prompt.ai_persona = v;
        }
        if let Some(v) = self.output_format {
            prompt.output_format = v;
        }
        if let Some(v) = self.example {
            prompt.example = v;
        }
        if let Some(v) = self.reference {
            prompt.reference = v;
        }
        if let Some(v) = self.custom_fields {
            prompt.custom_fields = v;
        }
        if let Some(v) = self.category_id {
            prompt.category_id = v;
        }
        prompt.updated_at = now;
    }
}

/// Partial update for a category.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl CategoryPatch {
    pub fn apply(self, category: &mut Category, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            category.name = v;
        }
        if let Some(v) = self.purpose {
            category.purpose = v;
        }
        category.updated_at = now;
    }
}

/// How dependent prompts are resolved when their category is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDeletion {
    /// Remove every prompt of the category along with it.
    DeletePrompts,
    /// Reassign every prompt of the category to another, existing category.
    MovePrompts { to: String },
}

/// Outcome of a category deletion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub removed_prompts: usize,
    pub moved_prompts: usize,
}

/// Full export of a library, used for backups and migrations between stores.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
}

/// Wraps any present value, including `null`, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
