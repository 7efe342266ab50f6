//! Todo handlers - validation, identity scoping and cache upkeep.

use listsync_engine::validation::validate;
use listsync_engine::wire::messages;
use listsync_engine::{ApiResponse, TaskData, TodoPayload, TodoRecord};

use crate::auth::Identity;
use crate::db;
use crate::error::{AppError, Result};
use crate::AppState;

/// The user's list, newest first. Empty without an identity.
pub async fn handle_list(state: &AppState, identity: &Identity) -> Result<Vec<TodoRecord>> {
    let Some(user_id) = identity.user_id() else {
        return Ok(Vec::new());
    };

    if let Some(list) = state.cache.get(user_id) {
        return Ok(list.as_ref().clone());
    }

    let generation = state.cache.generation(user_id);
    let list: Vec<TodoRecord> = db::list_todos(&state.pool, user_id)
        .await?
        .iter()
        .map(db::StoredTodo::to_record)
        .collect();
    state.cache.store(user_id, generation, list.clone());

    Ok(list)
}

pub async fn handle_create(
    state: &AppState,
    user_id: &str,
    payload: TodoPayload,
) -> Result<ApiResponse> {
    let data = TaskData::from(payload);
    validate(&data)?;

    let stored = db::insert_todo(&state.pool, user_id, &data).await?;
    state.cache.invalidate(user_id);

    tracing::info!(todo_id = %stored.id, "Todo created");
    Ok(ApiResponse::ok(messages::CREATED).with_todo(stored.to_record()))
}

pub async fn handle_update(
    state: &AppState,
    identity: &Identity,
    id: &str,
    payload: TodoPayload,
) -> Result<ApiResponse> {
    let data = TaskData::from(payload);
    validate(&data)?;

    let user_id = identity.user_id().ok_or(AppError::NotFound)?;
    let stored = db::update_todo(&state.pool, user_id, id, &data)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate(user_id);

    tracing::info!(todo_id = %id, "Todo updated");
    Ok(ApiResponse::ok(messages::UPDATED).with_todo(stored.to_record()))
}

pub async fn handle_delete(state: &AppState, identity: &Identity, id: &str) -> Result<ApiResponse> {
    let user_id = identity.user_id().ok_or(AppError::NotFound)?;

    if !db::delete_todo(&state.pool, user_id, id).await? {
        return Err(AppError::NotFound);
    }
    state.cache.invalidate(user_id);

    tracing::info!(todo_id = %id, "Todo deleted");
    Ok(ApiResponse::ok(messages::DELETED))
}
