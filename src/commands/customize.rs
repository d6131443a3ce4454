use crate::core::storage::AppCtx;
use crate::core::utils::parse_vars;
use crate::ui;
use console::style;
use copypasta::{ClipboardContext, ClipboardProvider};
use dialoguer::Input;

/// Fill a prompt's fields and print the assembled text.
///
/// Values given with `--var` are applied first; when none are given and a
/// terminal is attached, every field is asked for in turn.
pub async fn run(ctx: &AppCtx, id: &str, vars: &[String], copy: bool) -> Result<(), String> {
    let mut session = ctx
        .store
        .customize(id)
        .await
        .map_err(|e| format!("No prompt with ID {}: {}", id, e))?;

    for (name, value) in parse_vars(vars) {
        if !session.set(name.as_str(), value) {
            eprintln!(
                "{} '{}' is not a field of this prompt",
                style("•").yellow(),
                name
            );
        }
    }

    if vars.is_empty() && console::user_attended() && !session.fields().is_empty() {
        let theme = ui::theme();
        let fields = session.fields().to_vec();
        for field in &fields {
            let label = match &field.description {
                Some(d) => format!("{} ({})", field.display_name(), d),
                None => field.display_name(),
            };
            let value: String = Input::with_theme(&theme)
                .with_prompt(label)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| format!("Input error: {}", e))?;
            session.set(field.name.as_str(), value);
        }
    }

    let unfilled: Vec<String> = session
        .unfilled()
        .iter()
        .map(|f| format!("{{{}}}", f.name))
        .collect();
    if !unfilled.is_empty() {
        eprintln!(
            "{} left as-is: {}",
            style("•").yellow(),
            unfilled.join(", ")
        );
    }

    let text = session.render();
    println!("{}", text);

    if copy {
        let mut clipboard =
            ClipboardContext::new().map_err(|e| format!("Clipboard error: {}", e))?;
        clipboard
            .set_contents(text)
            .map_err(|e| format!("Clipboard set error: {}", e))?;
        eprintln!("{} copied to clipboard", style("•").green().bold());
    }
    Ok(())
}
