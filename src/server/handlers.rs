use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use crate::api::{CustomizeSession, PromptStore};
use crate::core::model::{
    Category, CategoryDeletion, CategoryPatch, NewCategory, NewPrompt, Prompt, PromptPatch,
};
use crate::core::template::Field;

pub type SharedStore = Arc<dyn PromptStore>;
type ApiResult<T> = Result<T, ApiError>;

pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "AI Prompt Library API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "categories": "/api/categories",
            "prompts": "/api/prompts",
        },
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

// --- categories ---

pub async fn list_categories(State(store): State<SharedStore>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(store.get_categories().await?))
}

pub async fn get_category(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    Ok(Json(store.get_category(&id).await?))
}

pub async fn create_category(
    State(store): State<SharedStore>,
    Json(data): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = store.save_category(data).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> ApiResult<Json<Category>> {
    Ok(Json(store.update_category(&id, patch).await?))
}

#[derive(Deserialize)]
pub struct DeleteCategoryParams {
    action: Option<String>,
    target: Option<String>,
}

impl DeleteCategoryParams {
    fn resolution(self) -> ApiResult<CategoryDeletion> {
        match (self.action.as_deref(), self.target) {
            (None | Some("delete"), _) => Ok(CategoryDeletion::DeletePrompts),
            (Some("move"), Some(to)) if !to.is_empty() => Ok(CategoryDeletion::MovePrompts { to }),
            (Some("move"), _) => Err(ApiError::BadRequest(
                "action 'move' requires a target category".into(),
            )),
            (Some(other), _) => Err(ApiError::BadRequest(format!(
                "unknown action '{}', expected 'delete' or 'move'",
                other
            ))),
        }
    }
}

pub async fn delete_category(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Query(params): Query<DeleteCategoryParams>,
) -> ApiResult<Json<Value>> {
    let report = store.delete_category(&id, params.resolution()?).await?;
    Ok(Json(json!({
        "message": "Category deleted successfully",
        "removedPrompts": report.removed_prompts,
        "movedPrompts": report.moved_prompts,
    })))
}

pub async fn category_prompts(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Prompt>>> {
    store.get_category(&id).await?;
    Ok(Json(store.prompts_in_category(&id).await?))
}

// --- prompts ---

pub async fn list_prompts(State(store): State<SharedStore>) -> ApiResult<Json<Vec<Prompt>>> {
    Ok(Json(store.get_prompts().await?))
}

pub async fn get_prompt(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Prompt>> {
    Ok(Json(store.get_prompt(&id).await?))
}

pub async fn create_prompt(
    State(store): State<SharedStore>,
    Json(data): Json<NewPrompt>,
) -> ApiResult<(StatusCode, Json<Prompt>)> {
    let prompt = store.save_prompt(data).await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub async fn update_prompt(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(patch): Json<PromptPatch>,
) -> ApiResult<Json<Prompt>> {
    Ok(Json(store.update_prompt(&id, patch).await?))
}

pub async fn delete_prompt(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    store.delete_prompt(&id).await?;
    Ok(Json(json!({ "message": "Prompt deleted successfully" })))
}

#[derive(Deserialize, Default)]
pub struct CustomizeRequest {
    #[serde(default)]
    values: HashMap<String, String>,
}

#[derive(Serialize)]
pub struct CustomizeResponse {
    fields: Vec<Field>,
    text: String,
}

pub async fn customize_prompt(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(request): Json<CustomizeRequest>,
) -> ApiResult<Json<CustomizeResponse>> {
    let session: CustomizeSession = store.customize(&id).await?.vars(request.values);
    Ok(Json(CustomizeResponse {
        text: session.render(),
        fields: session.fields().to_vec(),
    }))
}
