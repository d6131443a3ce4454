use crate::api::PromptStore;
use crate::core::kv::MemoryKv;
use crate::core::storage::{AppCtx, KvPromptStore};
use crate::server;
use console::style;
use std::sync::Arc;

/// Serve the REST API over the local store until interrupted.
pub async fn run(ctx: &AppCtx, bind: Option<&str>, memory: bool) -> Result<(), String> {
    if ctx.config.remote.api_url.is_some() {
        return Err("serve runs on a local store; drop --api-url".to_string());
    }
    let store: Arc<dyn PromptStore> = if memory {
        Arc::new(KvPromptStore::new(MemoryKv::new()))
    } else {
        Arc::clone(&ctx.store)
    };
    let bind = bind.unwrap_or(&ctx.config.server.bind);

    println!(
        "{} serving on http://{}{}",
        style("•").green().bold(),
        bind,
        if memory { " (in-memory)" } else { "" }
    );
    server::serve(store, bind)
        .await
        .map_err(|e| format!("Server error: {}", e))
}
