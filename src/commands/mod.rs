use crate::cli::Cmd;
use crate::core::storage::AppCtx;

pub mod category;
pub mod customize;
pub mod delete;
pub mod edit;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod move_prompt;
pub mod new;
pub mod serve;
pub mod share;

/// Dispatches the parsed command to the appropriate handler.
pub async fn dispatch(command: Cmd, ctx: &AppCtx) -> Result<(), String> {
    match command {
        Cmd::Serve { bind, memory } => serve::run(ctx, bind.as_deref(), memory).await,
        Cmd::List { category } => list::run(ctx, category.as_deref()).await,
        Cmd::Get { id } => get::run(ctx, &id).await,
        Cmd::New { category } => new::run(ctx, category.as_deref()).await,
        Cmd::Edit { id } => edit::run(ctx, &id).await,
        Cmd::Delete { id, yes } => delete::run(ctx, &id, yes).await,
        Cmd::Move { id, to } => move_prompt::run(ctx, &id, &to).await,
        Cmd::Customize { id, vars, copy } => customize::run(ctx, &id, &vars, copy).await,
        Cmd::Share {
            id,
            action,
            with_category,
            base,
        } => share::run(ctx, &id, action.as_deref(), with_category, base).await,
        Cmd::Open { location } => share::open(ctx, &location).await,
        Cmd::Category(category_cmd) => category::dispatch(category_cmd, ctx).await,
        Cmd::Export { out } => export::run(ctx, &out).await,
        Cmd::Import { file } => import::run(ctx, &file).await,
    }
}
