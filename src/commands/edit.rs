use super::new::{choose_category, fill_form};
use crate::core::form::PromptForm;
use crate::core::model::PromptPatch;
use crate::core::storage::AppCtx;
use crate::ui;
use console::style;
use dialoguer::Confirm;

/// Edit an existing prompt.
pub async fn run(ctx: &AppCtx, id: &str) -> Result<(), String> {
    let prompt = ctx
        .store
        .get_prompt(id)
        .await
        .map_err(|e| format!("No prompt with ID {}: {}", id, e))?;
    let categories = ctx
        .store
        .get_categories()
        .await
        .map_err(|e| format!("Category load error: {}", e))?;

    println!(
        "{} Editing '{}' ({})",
        style("•").cyan(),
        prompt.label(),
        ui::category_name(&categories, prompt.category_id.as_deref())
    );
    let category_id = choose_category(&categories, prompt.category_id.as_deref())?;

    let mut form = PromptForm::from_prompt(&prompt);
    let draft = loop {
        fill_form(&mut form)?;
        match form.submit(Some(&prompt), category_id.as_deref()) {
            Ok(draft) => break draft,
            Err(errors) => {
                ui::print_validation(&errors);
                let again = Confirm::with_theme(&ui::theme())
                    .with_prompt("Edit the form again?")
                    .default(true)
                    .interact()
                    .map_err(|e| format!("Prompt error: {}", e))?;
                if !again {
                    return Err("Prompt not updated".to_string());
                }
            }
        }
    };

    // Choosing "Uncategorized" must clear the category rather than keep the old one.
    let mut patch = PromptPatch::replace_with(draft);
    patch.category_id = Some(category_id);

    ctx.store
        .update_prompt(id, patch)
        .await
        .map_err(|e| format!("Update error: {}", e))?;
    println!(
        "{} Prompt '{}' updated successfully.",
        style("✔").green().bold(),
        id
    );
    Ok(())
}
