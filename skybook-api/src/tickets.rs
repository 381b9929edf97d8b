use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use skybook_core::model::{NewTicket, Ticket, TicketPatch};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/", get(list_tickets).post(create_ticket))
        .route(
            "/tickets/{ticket_id}/",
            get(get_ticket)
                .put(update_ticket)
                .patch(update_ticket)
                .delete(delete_ticket),
        )
}

async fn create_ticket(
    State(state): State<AppState>,
    Json(req): Json<NewTicket>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let ticket = state.tickets.create(req).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn list_tickets(State(state): State<AppState>) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.tickets.list().await?))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.tickets.get(ticket_id).await?))
}

async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
    Json(patch): Json<TicketPatch>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.tickets.update(ticket_id, patch).await?))
}

async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.tickets.delete(ticket_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
