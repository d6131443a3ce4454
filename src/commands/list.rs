use crate::core::model::Prompt;
use crate::core::storage::AppCtx;
use console::style;

/// List prompts grouped by category, or the prompts of a single category.
pub async fn run(ctx: &AppCtx, category: Option<&str>) -> Result<(), String> {
    if let Some(id) = category {
        let category = ctx
            .store
            .get_category(id)
            .await
            .map_err(|e| format!("No category with ID {}: {}", id, e))?;
        let prompts = ctx
            .store
            .prompts_in_category(id)
            .await
            .map_err(|e| format!("Prompt load error: {}", e))?;
        print_group(&category.name, &category.id, &prompts);
        return Ok(());
    }

    let snapshot = ctx
        .store
        .snapshot()
        .await
        .map_err(|e| format!("Load error: {}", e))?;
    if snapshot.categories.is_empty() && snapshot.prompts.is_empty() {
        println!("{}", style("No saved prompts or categories").green().bold());
        return Ok(());
    }

    for category in &snapshot.categories {
        let prompts: Vec<Prompt> = snapshot
            .prompts
            .iter()
            .filter(|p| p.category_id.as_deref() == Some(category.id.as_str()))
            .cloned()
            .collect();
        print_group(&category.name, &category.id, &prompts);
    }

    // Prompts without a category, or pointing at one that no longer exists.
    let orphans: Vec<Prompt> = snapshot
        .prompts
        .iter()
        .filter(|p| match p.category_id.as_deref() {
            None => true,
            Some(id) => !snapshot.categories.iter().any(|c| c.id == id),
        })
        .cloned()
        .collect();
    if !orphans.is_empty() {
        println!("{}", style("Uncategorized").green().bold());
        print_prompts(&orphans);
    }
    Ok(())
}

fn print_group(name: &str, id: &str, prompts: &[Prompt]) {
    println!(
        "{} {} ({})",
        style(name).green().bold(),
        style(id).dim(),
        prompts.len()
    );
    print_prompts(prompts);
}

fn print_prompts(prompts: &[Prompt]) {
    if prompts.is_empty() {
        println!("  {}", style("no prompts").dim());
    }
    for prompt in prompts {
        println!(
            "  {} {} - {}",
            style("•").green(),
            style(&prompt.id).yellow(),
            prompt.label()
        );
    }
}
