//! Store implementation that talks to a running REST API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::StoreError;
use super::store::PromptStore;
use crate::core::model::{
    Category, CategoryDeletion, CategoryPatch, DeletionReport, NewCategory, NewPrompt, Prompt,
    PromptPatch,
};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for `/api/categories` and `/api/prompts`.
///
/// Requests are sent once; failures are returned, never retried.
pub struct RemotePromptStore {
    client: Client,
    base_url: Url,
}

impl RemotePromptStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(concat!("prompt-library/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let parsed = Url::parse(base_url)
            .map_err(|e| StoreError::Backend(format!("invalid API URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(StoreError::Backend(format!(
                "invalid API URL '{}': not a base URL",
                base_url
            )));
        }
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// `<base>/api/<segments...>`, each segment percent-encoded on its own.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        kind: &'static str,
        id: &str,
    ) -> Result<T, StoreError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "request to prompt API failed");
            StoreError::Http(e)
        })?;
        let response = check(response, kind, id).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Maps error statuses to store errors using the `{ "error": ... }` body.
async fn check(response: Response, kind: &'static str, id: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound {
            kind,
            id: id.to_string(),
        });
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    tracing::warn!(status = status.as_u16(), %message, "prompt API returned an error");
    match status {
        StatusCode::BAD_REQUEST => Err(StoreError::InvalidTarget(message)),
        StatusCode::UNPROCESSABLE_ENTITY => Err(StoreError::Validation(message)),
        _ => Err(StoreError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

#[async_trait]
impl PromptStore for RemotePromptStore {
    async fn get_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.send(self.request(Method::GET, &["categories"]), "Category", "")
            .await
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.send(
            self.request(Method::GET, &["categories", id]),
            "Category",
            id,
        )
        .await
    }

    async fn save_category(&self, data: NewCategory) -> Result<Category, StoreError> {
        self.send(
            self.request(Method::POST, &["categories"]).json(&data),
            "Category",
            "",
        )
        .await
    }

    async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Category, StoreError> {
        self.send(
            self.request(Method::PUT, &["categories", id])
                .json(&patch),
            "Category",
            id,
        )
        .await
    }

    async fn delete_category(
        &self,
        id: &str,
        resolution: CategoryDeletion,
    ) -> Result<DeletionReport, StoreError> {
        let builder = self.request(Method::DELETE, &["categories", id]);
        let builder = match &resolution {
            CategoryDeletion::DeletePrompts => builder.query(&[("action", "delete")]),
            CategoryDeletion::MovePrompts { to } => {
                builder.query(&[("action", "move"), ("target", to.as_str())])
            }
        };
        self.send(builder, "Category", id).await
    }

    async fn get_prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        self.send(self.request(Method::GET, &["prompts"]), "Prompt", "")
            .await
    }

    async fn get_prompt(&self, id: &str) -> Result<Prompt, StoreError> {
        self.send(
            self.request(Method::GET, &["prompts", id]),
            "Prompt",
            id,
        )
        .await
    }

    async fn save_prompt(&self, data: NewPrompt) -> Result<Prompt, StoreError> {
        self.send(
            self.request(Method::POST, &["prompts"]).json(&data),
            "Prompt",
            "",
        )
        .await
    }

    async fn update_prompt(&self, id: &str, patch: PromptPatch) -> Result<Prompt, StoreError> {
        self.send(
            self.request(Method::PUT, &["prompts", id])
                .json(&patch),
            "Prompt",
            id,
        )
        .await
    }

    async fn delete_prompt(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, &["prompts", id])
            .send()
            .await?;
        check(response, "Prompt", id).await?;
        Ok(())
    }

    async fn prompts_in_category(&self, category_id: &str) -> Result<Vec<Prompt>, StoreError> {
        self.send(
            self.request(
                Method::GET,
                &["categories", category_id, "prompts"],
            ),
            "Category",
            category_id,
        )
        .await
    }
}
