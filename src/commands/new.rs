use crate::core::form::{FieldInput, PromptForm};
use crate::core::model::Category;
use crate::core::storage::AppCtx;
use crate::ui;
use console::style;
use dialoguer::{Confirm, Editor, Input, Select};

/// Create a new prompt, optionally filed under `category`.
pub async fn run(ctx: &AppCtx, category: Option<&str>) -> Result<(), String> {
    let categories = ctx
        .store
        .get_categories()
        .await
        .map_err(|e| format!("Category load error: {}", e))?;
    let category_id = match category {
        Some(id) => {
            if !categories.iter().any(|c| c.id == id) {
                return Err(format!("No category with ID {}", id));
            }
            Some(id.to_string())
        }
        None => choose_category(&categories, None)?,
    };

    let mut form = PromptForm::default();
    let draft = loop {
        fill_form(&mut form)?;
        match form.submit(None, category_id.as_deref()) {
            Ok(draft) => break draft,
            Err(errors) => {
                ui::print_validation(&errors);
                if !retry()? {
                    return Err("Prompt not saved".to_string());
                }
            }
        }
    };

    let prompt = ctx
        .store
        .save_prompt(draft)
        .await
        .map_err(|e| format!("Save error: {}", e))?;
    println!(
        "{} Prompt saved with ID {} and title '{}'",
        style("•").green().bold(),
        style(&prompt.id).yellow(),
        prompt.title
    );
    Ok(())
}

fn retry() -> Result<bool, String> {
    Confirm::with_theme(&ui::theme())
        .with_prompt("Edit the form again?")
        .default(true)
        .interact()
        .map_err(|e| format!("Prompt error: {}", e))
}

/// Picks a category interactively. Index 0 is "Uncategorized".
pub(crate) fn choose_category(
    categories: &[Category],
    current: Option<&str>,
) -> Result<Option<String>, String> {
    if categories.is_empty() {
        return Ok(None);
    }
    let mut labels = vec!["Uncategorized".to_string()];
    labels.extend(categories.iter().map(|c| c.name.clone()));
    let default = current
        .and_then(|id| categories.iter().position(|c| c.id == id))
        .map_or(0, |i| i + 1);

    let picked = Select::with_theme(&ui::theme())
        .with_prompt("Category")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(|e| format!("Category error: {}", e))?;
    Ok(picked.checked_sub(1).map(|i| categories[i].id.clone()))
}

fn text(prompt: &str, initial: &str, required: bool) -> Result<String, String> {
    let theme = ui::theme();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(!required);
    if !initial.is_empty() {
        input = input.with_initial_text(initial);
    }
    input
        .interact_text()
        .map_err(|e| format!("{} error: {}", prompt, e))
}

fn long_text(label: &str, current: &str) -> Result<String, String> {
    println!("{}", style(format!("Opening editor for {}...", label)).yellow());
    let edited = Editor::new()
        .extension(".md")
        .edit(current)
        .map_err(|e| format!("Editor error: {}", e))?;
    // Closing the editor without saving keeps the previous text.
    Ok(edited.unwrap_or_else(|| current.to_string()))
}

/// Walks the user through every input of the form, pre-filled with its
/// current values.
pub(crate) fn fill_form(form: &mut PromptForm) -> Result<(), String> {
    form.title = text("Title", &form.title, false)?;

    println!("{}", style("Purpose").cyan().bold());
    form.when_i_need_to = text("When I need to", &form.when_i_need_to, false)?;
    form.i_want = text("I want", &form.i_want, false)?;
    form.so_i_can = text("So I can", &form.so_i_can, false)?;

    form.ai_persona = text("AI persona (optional)", &form.ai_persona, false)?;
    form.prompt = long_text("the prompt template", &form.prompt)?;
    form.output_format = text("Output format", &form.output_format, false)?;
    form.example = long_text("an example (optional)", &form.example)?;
    form.reference = long_text("reference context (optional)", &form.reference)?;

    let detected = form.detected_placeholders();
    if !detected.is_empty() {
        println!(
            "{} Detected fields: {}",
            style("•").cyan(),
            detected
                .iter()
                .map(|n| format!("{{{}}}", n))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut fields: Vec<FieldInput> = Vec::new();
    for name in &detected {
        let current = described(form, name);
        let description = text(&format!("Description for {{{}}}", name), &current, false)?;
        fields.push(FieldInput::new(name.clone(), description));
    }
    for existing in &form.custom_fields {
        if detected.contains(&existing.name) {
            continue;
        }
        let keep = Confirm::with_theme(&ui::theme())
            .with_prompt(format!("Keep extra field '{}'?", existing.name))
            .default(true)
            .interact()
            .map_err(|e| format!("Prompt error: {}", e))?;
        if keep {
            fields.push(existing.clone());
        }
    }
    while Confirm::with_theme(&ui::theme())
        .with_prompt("Add another field?")
        .default(false)
        .interact()
        .map_err(|e| format!("Prompt error: {}", e))?
    {
        let name = text("Field name", "", true)?;
        let description = text("Field description (optional)", "", false)?;
        fields.push(FieldInput::new(name.trim(), description));
    }
    form.custom_fields = fields;
    Ok(())
}

fn described(form: &PromptForm, name: &str) -> String {
    form.custom_fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.description.clone())
        .unwrap_or_default()
}
