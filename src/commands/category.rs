use crate::cli::CategoryCmd;
use crate::core::model::{Category, CategoryDeletion, CategoryPatch, NewCategory};
use crate::core::storage::AppCtx;
use crate::ui;
use console::style;
use dialoguer::{Confirm, Select};

pub async fn dispatch(command: CategoryCmd, ctx: &AppCtx) -> Result<(), String> {
    match command {
        CategoryCmd::New { name, purpose } => create(ctx, name, purpose).await,
        CategoryCmd::List => list(ctx).await,
        CategoryCmd::Rename { id, name, purpose } => rename(ctx, &id, name, purpose).await,
        CategoryCmd::Delete { id, move_to, yes } => delete(ctx, &id, move_to, yes).await,
    }
}

async fn create(ctx: &AppCtx, name: String, purpose: String) -> Result<(), String> {
    let category = ctx
        .store
        .save_category(NewCategory { name, purpose })
        .await
        .map_err(|e| format!("Save error: {}", e))?;
    println!(
        "{} Category '{}' created with ID {}",
        style("•").green().bold(),
        category.name,
        style(&category.id).yellow()
    );
    Ok(())
}

async fn list(ctx: &AppCtx) -> Result<(), String> {
    let snapshot = ctx
        .store
        .snapshot()
        .await
        .map_err(|e| format!("Load error: {}", e))?;
    if snapshot.categories.is_empty() {
        println!("{}", style("No categories").green().bold());
        return Ok(());
    }
    println!("{}", style("Categories:").green().bold());
    for category in &snapshot.categories {
        let count = snapshot
            .prompts
            .iter()
            .filter(|p| p.category_id.as_deref() == Some(category.id.as_str()))
            .count();
        println!(
            "  {} {} - {} ({} prompts)",
            style("•").green(),
            style(&category.id).yellow(),
            category.name,
            count
        );
        if !category.purpose.is_empty() {
            println!("    {}", style(&category.purpose).dim());
        }
    }
    Ok(())
}

async fn rename(
    ctx: &AppCtx,
    id: &str,
    name: Option<String>,
    purpose: Option<String>,
) -> Result<(), String> {
    if name.is_none() && purpose.is_none() {
        return Err("Nothing to change: pass --name and/or --purpose".to_string());
    }
    if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err("Category name cannot be empty".to_string());
    }
    let category = ctx
        .store
        .update_category(id, CategoryPatch { name, purpose })
        .await
        .map_err(|e| format!("Update error: {}", e))?;
    println!(
        "{} Category {} is now '{}'",
        style("✔").green().bold(),
        style(&category.id).yellow(),
        category.name
    );
    Ok(())
}

async fn delete(
    ctx: &AppCtx,
    id: &str,
    move_to: Option<String>,
    yes: bool,
) -> Result<(), String> {
    let categories = ctx
        .store
        .get_categories()
        .await
        .map_err(|e| format!("Category load error: {}", e))?;
    let Some(category) = categories.iter().find(|c| c.id == id) else {
        return Err(format!("No category with ID {}", id));
    };
    let dependents = ctx
        .store
        .prompts_in_category(id)
        .await
        .map_err(|e| format!("Prompt load error: {}", e))?
        .len();

    let resolution = match move_to {
        Some(to) => CategoryDeletion::MovePrompts { to },
        None if dependents > 0 && !yes => ask_resolution(&categories, id, dependents)?,
        None => CategoryDeletion::DeletePrompts,
    };

    if !yes {
        let summary = match &resolution {
            CategoryDeletion::DeletePrompts if dependents > 0 => {
                format!("Delete '{}' and its {} prompts?", category.name, dependents)
            }
            CategoryDeletion::DeletePrompts => format!("Delete '{}'?", category.name),
            CategoryDeletion::MovePrompts { to } => format!(
                "Delete '{}' and move its prompts to '{}'?",
                category.name,
                ui::category_name(&categories, Some(to))
            ),
        };
        let confirmed = Confirm::with_theme(&ui::theme())
            .with_prompt(summary)
            .default(false)
            .interact()
            .map_err(|e| format!("Prompt error: {}", e))?;
        if !confirmed {
            println!("{}", style("Aborted").yellow());
            return Ok(());
        }
    }

    let report = ctx
        .store
        .delete_category(id, resolution)
        .await
        .map_err(|e| format!("Delete error: {}", e))?;
    println!(
        "{} category {} deleted ({} prompts removed, {} moved)",
        style("•").green().bold(),
        id,
        report.removed_prompts,
        report.moved_prompts
    );
    Ok(())
}

fn ask_resolution(
    categories: &[Category],
    id: &str,
    dependents: usize,
) -> Result<CategoryDeletion, String> {
    let others: Vec<_> = categories.iter().filter(|c| c.id != id).collect();
    if others.is_empty() {
        return Ok(CategoryDeletion::DeletePrompts);
    }
    let theme = ui::theme();
    let choice = Select::with_theme(&theme)
        .with_prompt(format!("This category holds {} prompts", dependents))
        .items(&["Delete them", "Move them to another category"])
        .default(0)
        .interact()
        .map_err(|e| format!("Prompt error: {}", e))?;
    if choice == 0 {
        return Ok(CategoryDeletion::DeletePrompts);
    }
    let names: Vec<&str> = others.iter().map(|c| c.name.as_str()).collect();
    let target = Select::with_theme(&theme)
        .with_prompt("Move prompts to")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| format!("Prompt error: {}", e))?;
    Ok(CategoryDeletion::MovePrompts {
        to: others[target].id.clone(),
    })
}
