use crate::api::{PromptStore, StoreError};
use crate::core::model::{NewCategory, NewPrompt, Snapshot};
use crate::core::storage::AppCtx;
use console::style;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Import categories and prompts from an export file.
pub async fn run(ctx: &AppCtx, file: &Path) -> Result<(), String> {
    let raw = fs::read_to_string(file).map_err(|e| format!("Read error: {}", e))?;
    let snapshot: Snapshot =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid export file: {}", e))?;
    let (categories, prompts) = import_snapshot(ctx.store.as_ref(), snapshot)
        .await
        .map_err(|e| format!("Import error: {}", e))?;
    println!(
        "{} imported {} categories and {} prompts",
        style("•").green().bold(),
        categories,
        prompts
    );
    Ok(())
}

/// Recreates every entity of `snapshot` under fresh ids.
///
/// Prompts follow their category to its new id; a prompt whose category is
/// not part of the snapshot lands uncategorized.
pub async fn import_snapshot(
    store: &dyn PromptStore,
    snapshot: Snapshot,
) -> Result<(usize, usize), StoreError> {
    let mut ids: HashMap<String, String> = HashMap::new();
    for category in snapshot.categories {
        let created = store
            .save_category(NewCategory {
                name: category.name,
                purpose: category.purpose,
            })
            .await?;
        ids.insert(category.id, created.id);
    }

    let mut imported = 0;
    for prompt in snapshot.prompts {
        let category_id = prompt
            .category_id
            .as_ref()
            .and_then(|old| ids.get(old))
            .cloned();
        store
            .save_prompt(NewPrompt {
                title: prompt.title,
                purpose: prompt.purpose,
                prompt: prompt.prompt,
                ai_persona: prompt.ai_persona,
                output_format: prompt.output_format,
                example: prompt.example,
                reference: prompt.reference,
                custom_fields: prompt.custom_fields,
                category_id,
            })
            .await?;
        imported += 1;
    }
    tracing::info!(categories = ids.len(), prompts = imported, "snapshot imported");
    Ok((ids.len(), imported))
}
