use crate::core::storage::AppCtx;
use console::style;
use std::fs;
use std::path::Path;

/// Export every category and prompt as one JSON document.
pub async fn run(ctx: &AppCtx, out_path: &Path) -> Result<(), String> {
    let snapshot = ctx
        .store
        .snapshot()
        .await
        .map_err(|e| format!("Load error: {}", e))?;
    let serialized =
        serde_json::to_vec_pretty(&snapshot).map_err(|e| format!("Serialize error: {}", e))?;
    fs::write(out_path, serialized).map_err(|e| format!("Write error: {}", e))?;
    println!(
        "{} exported {} categories and {} prompts to {}",
        style("•").green().bold(),
        snapshot.categories.len(),
        snapshot.prompts.len(),
        out_path.display()
    );
    Ok(())
}
