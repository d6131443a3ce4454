use crate::core::model::PromptPatch;
use crate::core::storage::AppCtx;
use console::style;

/// Reassign a prompt to another category.
pub async fn run(ctx: &AppCtx, id: &str, to: &str) -> Result<(), String> {
    let category = ctx
        .store
        .get_category(to)
        .await
        .map_err(|e| format!("No category with ID {}: {}", to, e))?;
    let prompt = ctx
        .store
        .update_prompt(id, PromptPatch::move_to(Some(category.id.clone())))
        .await
        .map_err(|e| format!("Move error: {}", e))?;
    println!(
        "{} '{}' moved to {}",
        style("•").green().bold(),
        prompt.label(),
        style(&category.name).yellow()
    );
    Ok(())
}
