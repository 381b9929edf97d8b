use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use skybook_core::model::{NewUser, User, UserPatch};

use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/{mobile_number}/",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list().await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(mobile_number): Path<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.get(mobile_number).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(mobile_number): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, AppError> {
    Ok(Json(state.users.update(mobile_number, patch).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(mobile_number): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.users.delete(mobile_number).await?;
    Ok(StatusCode::NO_CONTENT)
}
