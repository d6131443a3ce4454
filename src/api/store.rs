//! The store contract shared by the local KV store and the HTTP client.

use async_trait::async_trait;

use super::error::StoreError;
use super::session::CustomizeSession;
use crate::core::model::{
    Category, CategoryDeletion, CategoryPatch, DeletionReport, NewCategory, NewPrompt, Prompt,
    PromptPatch, Snapshot,
};

/// Persistence of categories and prompts.
///
/// Implementations never retry; a failed call leaves nothing half-applied on
/// the caller's side and the error is handed back as is.
#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn get_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn get_category(&self, id: &str) -> Result<Category, StoreError>;

    /// Creates a category with a generated id and timestamps.
    async fn save_category(&self, data: NewCategory) -> Result<Category, StoreError>;

    async fn update_category(&self, id: &str, patch: CategoryPatch)
        -> Result<Category, StoreError>;

    /// Deletes a category and resolves its prompts so that none is left
    /// pointing at the removed id.
    async fn delete_category(
        &self,
        id: &str,
        resolution: CategoryDeletion,
    ) -> Result<DeletionReport, StoreError>;

    async fn get_prompts(&self) -> Result<Vec<Prompt>, StoreError>;

    async fn get_prompt(&self, id: &str) -> Result<Prompt, StoreError>;

    /// Creates a prompt with a generated id and timestamps.
    async fn save_prompt(&self, data: NewPrompt) -> Result<Prompt, StoreError>;

    async fn update_prompt(&self, id: &str, patch: PromptPatch) -> Result<Prompt, StoreError>;

    async fn delete_prompt(&self, id: &str) -> Result<(), StoreError>;

    async fn prompts_in_category(&self, category_id: &str) -> Result<Vec<Prompt>, StoreError> {
        Ok(self
            .get_prompts()
            .await?
            .into_iter()
            .filter(|p| p.category_id.as_deref() == Some(category_id))
            .collect())
    }

    /// Everything in the store, for backups.
    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot {
            categories: self.get_categories().await?,
            prompts: self.get_prompts().await?,
        })
    }

    /// Opens a customization session for a stored prompt.
    async fn customize(&self, id: &str) -> Result<CustomizeSession, StoreError> {
        Ok(CustomizeSession::new(self.get_prompt(id).await?))
    }
}
