use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use skybook_core::model::{Seat, SeatPatch};

use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/seats/", get(list_seats).post(create_seat))
        .route(
            "/seats/{seat_id}/",
            get(get_seat)
                .put(update_seat)
                .patch(update_seat)
                .delete(delete_seat),
        )
}

async fn create_seat(
    State(state): State<AppState>,
    Json(req): Json<Seat>,
) -> Result<(StatusCode, Json<Seat>), AppError> {
    let seat = state.seats.create(req).await?;
    Ok((StatusCode::CREATED, Json(seat)))
}

async fn list_seats(State(state): State<AppState>) -> Result<Json<Vec<Seat>>, AppError> {
    Ok(Json(state.seats.list().await?))
}

async fn get_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
) -> Result<Json<Seat>, AppError> {
    Ok(Json(state.seats.get(&seat_id).await?))
}

async fn update_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    Json(patch): Json<SeatPatch>,
) -> Result<Json<Seat>, AppError> {
    Ok(Json(state.seats.update(&seat_id, patch).await?))
}

async fn delete_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.seats.delete(&seat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
