use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use skybook_core::model::{Flight, FlightPatch};

use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights/", get(list_flights).post(create_flight))
        .route(
            "/flights/{flight_id}/",
            get(get_flight)
                .put(update_flight)
                .patch(update_flight)
                .delete(delete_flight),
        )
}

async fn create_flight(
    State(state): State<AppState>,
    Json(req): Json<Flight>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    let flight = state.flights.create(req).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(state.flights.list().await?))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(state.flights.get(&flight_id).await?))
}

async fn update_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
    Json(patch): Json<FlightPatch>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(state.flights.update(&flight_id, patch).await?))
}

async fn delete_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.flights.delete(&flight_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
