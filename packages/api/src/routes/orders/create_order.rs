use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::order::{DeliveryAddress, GuestInfo, Order, OrderItem, PaymentMethod},
    error::ApiError,
    lifecycle::{self, NewOrder, OrderOwner},
    middleware::jwt::AppUser,
    state::AppState,
    validation,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub delivery_address: DeliveryAddress,
    #[serde(default)]
    pub delivery_charge: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub guest_info: Option<GuestInfo>,
}

#[derive(Debug, Serialize)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: Order,
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = CreateOrderInput,
    responses(
        (status = 200, description = "Order created", body = Object),
        (status = 400, description = "Invalid order payload")
    ),
    security(
        (),
        ("bearer_auth" = []),
        ("cookie_token" = [])
    )
)]
#[tracing::instrument(name = "POST /orders", skip(state, user, input))]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<CreateOrderInput>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    // A signed-in identity wins over any guest details in the payload.
    let owner = match user.sub() {
        Ok(sub) => OrderOwner::Customer(sub),
        Err(_) => match input.guest_info {
            Some(guest) => OrderOwner::Guest(guest),
            None => {
                return Err(validation!(
                    "Sign in or provide guest information to place an order"
                ));
            }
        },
    };

    let new_order = NewOrder {
        items: input.items,
        total_amount: input.total_amount,
        delivery_address: input.delivery_address,
        delivery_charge: input.delivery_charge.unwrap_or(0.0),
        payment_method: input.payment_method.unwrap_or_default(),
        notes: input.notes,
    };

    let orders = state.orders();

    // The unique index on orderNumber is the final word; on the rare
    // collision, regenerate and retry.
    let mut order = lifecycle::build_order(owner, new_order)?;
    for attempt in 0..3 {
        match orders.insert_one(&order).await {
            Ok(_) => {
                tracing::info!("Order {} placed", order.order_number);
                return Ok(Json(OrderEnvelope {
                    success: true,
                    order,
                }));
            }
            Err(err) if crate::error::is_duplicate_key(&err) && attempt < 2 => {
                order.order_number = lifecycle::generate_order_number();
            }
            Err(err) => return Err(err.into()),
        }
    }
    unreachable!("insert loop either returns or errors");
}
