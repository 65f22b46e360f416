use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{User, UserUpdate};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub user_name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<User>>, AppError> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(20).min(100).max(1);

    let users = state.users.get_users(offset, limit).await?;
    Ok(Json(users))
}

pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateUser>,
) -> Result<Json<User>, AppError> {
    let user_name = req.user_name.trim();
    let email = req.email.trim();
    if user_name.is_empty() || email.is_empty() {
        return Err(AppError::BadRequest("user_name and email are required".to_string()));
    }

    let user = state.users.add_user(user_name, email).await?;
    Ok(Json(user))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let user_name = req.user_name.as_deref().map(str::trim);
    let email = req.email.as_deref().map(str::trim);
    if user_name == Some("") || email == Some("") {
        return Err(AppError::BadRequest("user_name and email must not be blank".to_string()));
    }

    let update = UserUpdate {
        id,
        user_name: user_name.map(str::to_string),
        email: email.map(str::to_string),
        active: req.active,
    };

    let user = state
        .users
        .update_user(&update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .delete_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}
