use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::model::{UserPayload, UsersPayload};
use crate::AppState;
use crate::error::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::result::{Resp, success, success_empty};
use crate::routes::read_json;

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<Resp<UserPayload>>, AppError> {
    let req = read_json(payload)?;
    let user = state.users.create(req).await?;
    Ok(success(UserPayload::from(user)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resp<UserPayload>>, AppError> {
    let user = state.users.get(&id).await?;
    Ok(success(UserPayload::from(user)))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Resp<UsersPayload>>, AppError> {
    let users = state.users.list().await?;
    Ok(success(UsersPayload::from(users)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Resp<UserPayload>>, AppError> {
    let req = read_json(payload)?;
    let user = state.users.update(&id, req).await?;
    Ok(success(UserPayload::from(user)))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resp<()>>, AppError> {
    state.users.delete(&id).await?;
    Ok(success_empty())
}
