//! A customization session: one prompt and the values typed for its fields.

use crate::core::model::Prompt;
use crate::core::template::{self, Field, FieldValues};

/// Holds a prompt and user input; the output is recomputed on every call to
/// [`CustomizeSession::render`], so it can never go stale.
///
/// Sessions share nothing with each other. Dropping one discards its input.
#[derive(Debug, Clone)]
pub struct CustomizeSession {
    prompt: Prompt,
    fields: Vec<Field>,
    values: FieldValues,
}

impl CustomizeSession {
    /// Starts a session with every field empty.
    pub fn new(prompt: Prompt) -> Self {
        let fields = template::resolve_fields(&prompt);
        let values = fields
            .iter()
            .map(|f| (f.name.clone(), String::new()))
            .collect();
        Self {
            prompt,
            fields,
            values,
        }
    }

    /// Sets several values at once, builder style. Unknown names are ignored.
    pub fn vars(
        mut self,
        vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (name, value) in vars {
            self.set(name.into(), value.into());
        }
        self
    }

    /// Sets one field. Returns `false` if the prompt has no such field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name: String = name.into();
        match self.values.get_mut(&name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// Swaps in an updated version of the prompt. Values of fields that
    /// still exist are kept; new fields start empty.
    pub fn replace_prompt(&mut self, prompt: Prompt) {
        let fields = template::resolve_fields(&prompt);
        let mut values = FieldValues::with_capacity(fields.len());
        for field in &fields {
            let kept = self.values.remove(&field.name).unwrap_or_default();
            values.insert(field.name.clone(), kept);
        }
        self.prompt = prompt;
        self.fields = fields;
        self.values = values;
    }

    /// Placeholder fields still without a value.
    pub fn unfilled(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.origin.is_placeholder() && self.value(&f.name).is_empty())
            .collect()
    }

    /// The assembled prompt for the current values.
    pub fn render(&self) -> String {
        template::assemble(&self.prompt, &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CustomField, NewPrompt};
    use chrono::Utc;

    fn prompt(body: &str, fields: Vec<CustomField>) -> Prompt {
        NewPrompt {
            prompt: body.into(),
            custom_fields: fields,
            ..NewPrompt::default()
        }
        .into_prompt("p".into(), Utc::now())
    }

    #[test]
    fn starts_with_every_field_empty() {
        let session = CustomizeSession::new(prompt(
            "Write about {topic}",
            vec![CustomField::new("level", "")],
        ));
        assert_eq!(session.fields().len(), 2);
        assert_eq!(session.value("topic"), "");
        assert_eq!(session.render(), "Write about {topic}");
    }

    #[test]
    fn render_tracks_every_change() {
        let mut session = CustomizeSession::new(prompt("Hi {name}", vec![]));
        assert!(session.set("name", "Ada"));
        assert_eq!(session.render(), "Hi Ada");
        session.set("name", "");
        assert_eq!(session.render(), "Hi {name}");
    }

    #[test]
    fn padded_declared_field_reaches_input_details() {
        let mut session = CustomizeSession::new(prompt("Body", vec![CustomField::new(" tone ", "")]));
        let names: Vec<String> = session.fields().iter().map(|f| f.name.clone()).collect();
        for name in &names {
            session.set(name.as_str(), "dry");
        }
        assert_eq!(names, ["tone"]);
        assert_eq!(session.render(), "Input Details:\n- tone: dry\n\nBody");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut session = CustomizeSession::new(prompt("Hi {name}", vec![]));
        assert!(!session.set("other", "x"));
        let session = session.vars([("other", "x"), ("name", "Bob")]);
        assert_eq!(session.render(), "Hi Bob");
        assert!(session.values().get("other").is_none());
    }

    #[test]
    fn replacing_the_prompt_keeps_surviving_values() {
        let mut session =
            CustomizeSession::new(prompt("{a} {b}", vec![])).vars([("a", "1"), ("b", "2")]);
        session.replace_prompt(prompt("{b} {c}", vec![]));
        assert_eq!(session.value("a"), "");
        assert_eq!(session.value("b"), "2");
        assert_eq!(session.render(), "2 {c}");
        let unfilled: Vec<_> = session.unfilled().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(unfilled, vec!["c"]);
    }
}
