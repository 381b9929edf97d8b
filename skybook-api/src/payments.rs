use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use skybook_core::model::{NewPayment, Payment, PaymentPatch};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::Json;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/", get(list_payments).post(create_payment))
        .route(
            "/payments/{payment_id}/",
            get(get_payment)
                .put(update_payment)
                .patch(update_payment)
                .delete(delete_payment),
        )
}

async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = state.payments.create(req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn list_payments(State(state): State<AppState>) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(state.payments.list().await?))
}

async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.payments.get(payment_id).await?))
}

async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(patch): Json<PaymentPatch>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.payments.update(payment_id, patch).await?))
}

async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.payments.delete(payment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
