//! Delay check API handler.

use axum::{extract::State, Json};
use delaywatch_core::{CheckOutcome, OrderContext};
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;

/// Run one delay check for the posted order.
///
/// Collaborator failures never turn into HTTP errors; they are reported in
/// the outcome's `errors` list.
pub async fn run_check(
    State(state): State<Arc<AppState>>,
    Json(order): Json<OrderContext>,
) -> Json<CheckOutcome> {
    info!(order_id = %order.order_id, "Received delay check request");
    let outcome = state.notifier().check(&order).await;
    Json(outcome)
}
