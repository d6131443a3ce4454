use crate::core::router::{LinkHints, Route, RouteAction, UrlRouter};
use crate::core::storage::AppCtx;
use console::style;

/// Print the shareable link of a prompt.
pub async fn run(
    ctx: &AppCtx,
    id: &str,
    action: Option<&str>,
    with_category: bool,
    base: Option<String>,
) -> Result<(), String> {
    let prompt = ctx
        .store
        .get_prompt(id)
        .await
        .map_err(|e| format!("No prompt with ID {}: {}", id, e))?;
    let action = action.and_then(|a| a.parse::<RouteAction>().ok());
    let hints = LinkHints {
        title: Some(&prompt.title),
        purpose: Some(&prompt.purpose),
        category_id: prompt.category_id.as_deref().filter(|_| with_category),
        action,
    };
    let url = match base {
        Some(base) => UrlRouter::new(base).shareable_url(&prompt.id, &hints),
        None => ctx.router.shareable_url(&prompt.id, &hints),
    };
    println!("{}", url);
    Ok(())
}

/// Resolve a link produced by `share` and show what it points to.
pub async fn open(ctx: &AppCtx, location: &str) -> Result<(), String> {
    match ctx.router.parse(location) {
        Route::Home => {
            println!("{}", style("Link points to the library home").green());
            super::list::run(ctx, None).await
        }
        Route::Prompt {
            prompt_id,
            category_id,
            action,
            ..
        } => {
            tracing::debug!(%prompt_id, ?category_id, ?action, "resolved link");
            let prompt = ctx
                .store
                .get_prompt(&prompt_id)
                .await
                .map_err(|e| format!("Link points to unknown prompt {}: {}", prompt_id, e))?;
            if let Some(action) = action {
                println!("{} {}", style("Action:").dim(), action);
            }
            super::get::show(ctx, &prompt).await
        }
        Route::Unknown(fragment) => Err(format!("Unrecognized link: {}", fragment)),
    }
}
