use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, lifecycle, state::AppState, unauthorized};

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoCancelResponse {
    pub success: bool,
    pub cancelled_count: usize,
    pub order_numbers: Vec<String>,
}

/// Scheduler entry point: cancels every order that sat in `pending` past
/// the confirmation window. Gated by a shared secret rather than a user
/// token because the caller is a cron job, not a person.
#[utoipa::path(
    post,
    path = "/orders/auto-cancel",
    tag = "orders",
    responses(
        (status = 200, description = "Sweep completed", body = AutoCancelResponse),
        (status = 401, description = "Missing or wrong shared secret")
    ),
    security(
        ("cron_secret" = [])
    )
)]
#[tracing::instrument(name = "POST /orders/auto-cancel", skip(state, headers))]
pub async fn auto_cancel_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AutoCancelResponse>, ApiError> {
    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized!("Missing {} header", CRON_SECRET_HEADER))?;

    if provided != state.cron_secret {
        return Err(unauthorized!("Invalid cron secret"));
    }

    let outcome = lifecycle::auto_cancel_expired(&state.db).await?;

    Ok(Json(AutoCancelResponse {
        success: true,
        cancelled_count: outcome.cancelled.len(),
        order_numbers: outcome.cancelled,
    }))
}
