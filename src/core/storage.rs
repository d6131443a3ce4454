//! Whole-array persistence of categories and prompts on a key-value backend,
//! and the runtime context handed to every command.

use super::config::Config;
use super::kv::{FileKv, KvBackend};
use super::model::{
    Category, CategoryDeletion, CategoryPatch, CustomField, DeletionReport, NewCategory,
    NewPrompt, Prompt, PromptPatch,
};
use super::router::UrlRouter;
use super::utils::new_id;
use crate::api::{PromptStore, RemotePromptStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CATEGORIES_KEY: &str = "categories";
pub const PROMPTS_KEY: &str = "prompts";

/// Stores each entity kind as one JSON array under a single key.
///
/// Every write reads the full array, mutates it and writes it back. Writers
/// in this process are serialized; separate processes sharing a backend
/// still race, and the last writer wins.
pub struct KvPromptStore<K> {
    kv: K,
    write_lock: Mutex<()>,
}

impl<K: KvBackend> KvPromptStore<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.kv.get(key).await? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.kv.put(key, raw).await?;
        tracing::debug!(key, count = items.len(), "rewrote array");
        Ok(())
    }

    async fn ensure_category(&self, id: Option<&str>) -> Result<(), StoreError> {
        let Some(id) = id else {
            return Ok(());
        };
        let categories: Vec<Category> = self.load(CATEGORIES_KEY).await?;
        if categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::InvalidTarget(format!(
                "category '{}' does not exist",
                id
            )))
        }
    }
}

#[async_trait]
impl<K: KvBackend> PromptStore for KvPromptStore<K> {
    async fn get_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.load(CATEGORIES_KEY).await
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.get_categories()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::category_not_found(id))
    }

    async fn save_category(&self, data: NewCategory) -> Result<Category, StoreError> {
        if data.name.trim().is_empty() {
            return Err(StoreError::Validation("category name is required".into()));
        }
        let _guard = self.write_lock.lock().await;
        let mut categories: Vec<Category> = self.load(CATEGORIES_KEY).await?;
        let category = data.into_category(new_id(), Utc::now());
        categories.push(category.clone());
        self.write(CATEGORIES_KEY, &categories).await?;
        tracing::info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Category, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut categories: Vec<Category> = self.load(CATEGORIES_KEY).await?;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::category_not_found(id))?;
        patch.apply(category, Utc::now());
        let updated = category.clone();
        self.write(CATEGORIES_KEY, &categories).await?;
        tracing::info!(id, "category updated");
        Ok(updated)
    }

    async fn delete_category(
        &self,
        id: &str,
        resolution: CategoryDeletion,
    ) -> Result<DeletionReport, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut categories: Vec<Category> = self.load(CATEGORIES_KEY).await?;
        let Some(index) = categories.iter().position(|c| c.id == id) else {
            return Err(StoreError::category_not_found(id));
        };
        if let CategoryDeletion::MovePrompts { to } = &resolution {
            if to == id {
                return Err(StoreError::InvalidTarget(
                    "cannot move prompts into the category being deleted".into(),
                ));
            }
            if !categories.iter().any(|c| &c.id == to) {
                return Err(StoreError::InvalidTarget(format!(
                    "category '{}' does not exist",
                    to
                )));
            }
        }

        let mut prompts: Vec<Prompt> = self.load(PROMPTS_KEY).await?;
        let mut report = DeletionReport::default();
        match &resolution {
            CategoryDeletion::DeletePrompts => {
                let before = prompts.len();
                prompts.retain(|p| p.category_id.as_deref() != Some(id));
                report.removed_prompts = before - prompts.len();
            }
            CategoryDeletion::MovePrompts { to } => {
                let now = Utc::now();
                for prompt in prompts
                    .iter_mut()
                    .filter(|p| p.category_id.as_deref() == Some(id))
                {
                    prompt.category_id = Some(to.clone());
                    prompt.updated_at = now;
                    report.moved_prompts += 1;
                }
            }
        }

        // Prompts first: if the second write fails the category survives
        // and no prompt is left dangling.
        if report.removed_prompts > 0 || report.moved_prompts > 0 {
            self.write(PROMPTS_KEY, &prompts).await?;
        }
        categories.remove(index);
        self.write(CATEGORIES_KEY, &categories).await?;
        tracing::info!(
            id,
            removed = report.removed_prompts,
            moved = report.moved_prompts,
            "category deleted"
        );
        Ok(report)
    }

    async fn get_prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        self.load(PROMPTS_KEY).await
    }

    async fn get_prompt(&self, id: &str) -> Result<Prompt, StoreError> {
        self.get_prompts()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::prompt_not_found(id))
    }

    async fn save_prompt(&self, mut data: NewPrompt) -> Result<Prompt, StoreError> {
        if data.prompt.trim().is_empty() {
            return Err(StoreError::Validation("prompt body is required".into()));
        }
        normalize_fields(&mut data.custom_fields)?;
        let _guard = self.write_lock.lock().await;
        self.ensure_category(data.category_id.as_deref()).await?;
        let mut prompts: Vec<Prompt> = self.load(PROMPTS_KEY).await?;
        let prompt = data.into_prompt(new_id(), Utc::now());
        prompts.push(prompt.clone());
        self.write(PROMPTS_KEY, &prompts).await?;
        tracing::info!(id = %prompt.id, title = %prompt.title, "prompt created");
        Ok(prompt)
    }

    async fn update_prompt(&self, id: &str, mut patch: PromptPatch) -> Result<Prompt, StoreError> {
        if let Some(body) = &patch.prompt {
            if body.trim().is_empty() {
                return Err(StoreError::Validation("prompt body is required".into()));
            }
        }
        if let Some(fields) = patch.custom_fields.as_mut() {
            normalize_fields(fields)?;
        }
        let _guard = self.write_lock.lock().await;
        if let Some(category_id) = &patch.category_id {
            self.ensure_category(category_id.as_deref()).await?;
        }
        let mut prompts: Vec<Prompt> = self.load(PROMPTS_KEY).await?;
        let prompt = prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::prompt_not_found(id))?;
        patch.apply(prompt, Utc::now());
        let updated = prompt.clone();
        self.write(PROMPTS_KEY, &prompts).await?;
        tracing::info!(id, "prompt updated");
        Ok(updated)
    }

    async fn delete_prompt(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut prompts: Vec<Prompt> = self.load(PROMPTS_KEY).await?;
        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        if prompts.len() == before {
            return Err(StoreError::prompt_not_found(id));
        }
        self.write(PROMPTS_KEY, &prompts).await?;
        tracing::info!(id, "prompt deleted");
        Ok(())
    }
}

/// Runtime context: configuration plus the store and router built from it.
///
/// Created once at startup and passed by reference.
/// Trims declared field names in place; a blank name is rejected.
fn normalize_fields(fields: &mut [CustomField]) -> Result<(), StoreError> {
    for field in fields.iter_mut() {
        let trimmed = field.name.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Validation("custom field name is required".into()));
        }
        if trimmed.len() != field.name.len() {
            field.name = trimmed.to_string();
        }
    }
    Ok(())
}

pub struct AppCtx {
    pub config: Config,
    pub store: Arc<dyn PromptStore>,
    pub router: UrlRouter,
}

impl AppCtx {
    /// Builds the context. A configured API URL selects the remote store,
    /// otherwise prompts live in files under the data directory.
    pub fn init(config: Config) -> Result<Self, String> {
        let store: Arc<dyn PromptStore> = match config.remote.api_url.as_deref() {
            Some(url) => Arc::new(RemotePromptStore::new(url).map_err(|e| e.to_string())?),
            None => Arc::new(KvPromptStore::new(Self::open_file_kv(&config)?)),
        };
        let router = UrlRouter::new(config.share.base_url.clone());
        Ok(Self {
            config,
            store,
            router,
        })
    }

    /// Opens the file backend under the configured data directory.
    pub fn open_file_kv(config: &Config) -> Result<FileKv, String> {
        let dir: PathBuf = config.resolved_data_dir().map_err(|e| e.to_string())?;
        let kv = FileKv::open(dir).map_err(|e| e.to_string())?;
        tracing::debug!(dir = %kv.dir().display(), "opened local store");
        Ok(kv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kv::MemoryKv;

    async fn seeded() -> (KvPromptStore<MemoryKv>, Category, Category) {
        let store = KvPromptStore::new(MemoryKv::new());
        let writing = store
            .save_category(NewCategory {
                name: "Writing".into(),
                purpose: "Drafts".into(),
            })
            .await
            .unwrap();
        let coding = store
            .save_category(NewCategory {
                name: "Coding".into(),
                purpose: String::new(),
            })
            .await
            .unwrap();
        for title in ["Blog", "Essay"] {
            store
                .save_prompt(NewPrompt {
                    title: title.into(),
                    prompt: "Write about {topic}".into(),
                    category_id: Some(writing.id.clone()),
                    ..NewPrompt::default()
                })
                .await
                .unwrap();
        }
        store
            .save_prompt(NewPrompt {
                title: "Review".into(),
                prompt: "Review {code}".into(),
                category_id: Some(coding.id.clone()),
                ..NewPrompt::default()
            })
            .await
            .unwrap();
        (store, writing, coding)
    }

    #[tokio::test]
    async fn create_assigns_ids_and_timestamps() {
        let (store, writing, _) = seeded().await;
        assert!(!writing.id.is_empty());
        assert_eq!(writing.created_at, writing.updated_at);
        assert_eq!(store.get_prompts().await.unwrap().len(), 3);
        assert_eq!(store.get_category(&writing.id).await.unwrap(), writing);
    }

    #[tokio::test]
    async fn update_merges_and_preserves_id() {
        let (store, writing, _) = seeded().await;
        let updated = store
            .update_category(
                &writing.id,
                CategoryPatch {
                    name: Some("Prose".into()),
                    purpose: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, writing.id);
        assert_eq!(updated.name, "Prose");
        assert_eq!(updated.purpose, "Drafts");
        assert!(updated.updated_at >= writing.updated_at);
    }

    #[tokio::test]
    async fn deleting_with_move_reassigns_dependents() {
        let (store, writing, coding) = seeded().await;
        let report = store
            .delete_category(
                &writing.id,
                CategoryDeletion::MovePrompts {
                    to: coding.id.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(report.moved_prompts, 2);
        assert_eq!(report.removed_prompts, 0);
        assert!(store.get_category(&writing.id).await.is_err());
        let prompts = store.get_prompts().await.unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts
            .iter()
            .all(|p| p.category_id.as_deref() == Some(coding.id.as_str())));
    }

    #[tokio::test]
    async fn deleting_with_cascade_removes_dependents() {
        let (store, writing, coding) = seeded().await;
        let before = store.get_prompts().await.unwrap().len();
        let report = store
            .delete_category(&writing.id, CategoryDeletion::DeletePrompts)
            .await
            .unwrap();

        assert_eq!(report.removed_prompts, 2);
        let prompts = store.get_prompts().await.unwrap();
        assert_eq!(prompts.len(), before - 2);
        assert_eq!(prompts[0].category_id.as_deref(), Some(coding.id.as_str()));
    }

    #[tokio::test]
    async fn move_to_missing_or_same_category_changes_nothing() {
        let (store, writing, _) = seeded().await;
        for target in [writing.id.clone(), "missing".to_string()] {
            let err = store
                .delete_category(&writing.id, CategoryDeletion::MovePrompts { to: target })
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidTarget(_)));
        }
        assert_eq!(store.prompts_in_category(&writing.id).await.unwrap().len(), 2);
        assert!(store.get_category(&writing.id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (store, _, _) = seeded().await;
        assert!(matches!(
            store.delete_prompt("nope").await,
            Err(StoreError::NotFound { kind: "Prompt", .. })
        ));
        assert!(matches!(
            store
                .delete_category("nope", CategoryDeletion::DeletePrompts)
                .await,
            Err(StoreError::NotFound { kind: "Category", .. })
        ));
        assert!(store
            .update_prompt("nope", PromptPatch::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn prompts_cannot_point_at_missing_categories() {
        let (store, _, _) = seeded().await;
        let err = store
            .save_prompt(NewPrompt {
                prompt: "x".into(),
                category_id: Some("ghost".into()),
                ..NewPrompt::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTarget(_)));

        let prompt = store.get_prompts().await.unwrap().remove(0);
        let moved = store
            .update_prompt(&prompt.id, PromptPatch::move_to(None))
            .await
            .unwrap();
        assert_eq!(moved.category_id, None);
    }

    #[tokio::test]
    async fn custom_field_names_are_trimmed_on_write() {
        let store = KvPromptStore::new(MemoryKv::new());
        let saved = store
            .save_prompt(NewPrompt {
                prompt: "Body".into(),
                custom_fields: vec![CustomField::new(" tone ", "Voice")],
                ..NewPrompt::default()
            })
            .await
            .unwrap();
        assert_eq!(saved.custom_fields[0].name, "tone");

        let patch = PromptPatch {
            custom_fields: Some(vec![CustomField::new("  level", "")]),
            ..PromptPatch::default()
        };
        let updated = store.update_prompt(&saved.id, patch).await.unwrap();
        assert_eq!(updated.custom_fields[0].name, "level");

        let blank = PromptPatch {
            custom_fields: Some(vec![CustomField::new("   ", "")]),
            ..PromptPatch::default()
        };
        assert!(matches!(
            store.update_prompt(&saved.id, blank).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(
            store.get_prompt(&saved.id).await.unwrap().custom_fields[0].name,
            "level"
        );
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_updates() {
        let store = Arc::new(KvPromptStore::new(MemoryKv::new()));
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .save_prompt(NewPrompt {
                            title: format!("p{}", i),
                            prompt: "body".into(),
                            custom_fields: vec![CustomField::new("x", "")],
                            ..NewPrompt::default()
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(store.get_prompts().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn session_renders_stored_prompt() {
        let (store, _, coding) = seeded().await;
        let prompt = store.prompts_in_category(&coding.id).await.unwrap().remove(0);
        let session = store
            .customize(&prompt.id)
            .await
            .unwrap()
            .vars([("code", "fn main() {}")]);
        assert_eq!(session.render(), "Review fn main() {}");
    }
}
