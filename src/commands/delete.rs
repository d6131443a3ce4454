use crate::core::storage::AppCtx;
use crate::ui;
use console::style;
use dialoguer::Confirm;

/// Delete a prompt.
pub async fn run(ctx: &AppCtx, id: &str, yes: bool) -> Result<(), String> {
    let prompt = ctx
        .store
        .get_prompt(id)
        .await
        .map_err(|e| format!("No prompt with ID {}: {}", id, e))?;

    if !yes {
        let confirmed = Confirm::with_theme(&ui::theme())
            .with_prompt(format!("Delete '{}'?", prompt.label()))
            .default(false)
            .interact()
            .map_err(|e| format!("Prompt error: {}", e))?;
        if !confirmed {
            println!("{}", style("Aborted").yellow());
            return Ok(());
        }
    }

    ctx.store
        .delete_prompt(id)
        .await
        .map_err(|e| format!("Delete error: {}", e))?;
    println!("{} prompt {} deleted", style("•").green().bold(), id);
    Ok(())
}
