//! Order lifecycle: construction invariants, the status state machine,
//! cancellation (customer, guest and time-based) and administrative
//! progression.
//!
//! All transitions are applied through a conditional single-document update
//! gated on the current status, so two racing cancellations can never both
//! land; the loser observes an `INVALID_STATE` error.

use chrono::{Duration, Utc};
use glowcart_types::{create_id, rand::Rng};
use mongodb::{
    Collection, Database,
    bson::{DateTime, Document, doc, to_bson},
    options::ReturnDocument,
};

use crate::entity::{
    self,
    order::{
        DeliveryAddress, GuestInfo, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
        TrackingUpdate,
    },
};
use crate::error::ApiError;
use crate::{forbidden, invalid_state, not_found, validation};

pub const AUTO_CANCEL_WINDOW_HOURS: i64 = 24;

pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";
pub const CANCELLED_BY_CUSTOMER_MESSAGE: &str = "Order cancelled by customer";
pub const AUTO_CANCELLED_MESSAGE: &str =
    "Order auto-cancelled due to no confirmation within 24 hours";

/// Human-readable order number: `ORD` + 8 time-derived digits + 3 random
/// digits. Distinct from the internal document id and immutable once
/// assigned; the unique index is the final word on collisions.
pub fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = glowcart_types::rand::rng().random_range(0..1000);
    format!("ORD{:08}{:03}", millis % 100_000_000, suffix)
}

/// The single definition of which status moves are legal. `cancelled` is
/// reachable only from `pending`; nothing leaves `cancelled` or `delivered`.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Cancelled)
            | (Confirmed, Processing)
            | (Processing, Shipped)
            | (Shipped, Delivered)
    )
}

/// Tracking message recorded when an order enters a status.
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => ORDER_PLACED_MESSAGE,
        OrderStatus::Confirmed => "Order confirmed",
        OrderStatus::Processing => "Order is being processed",
        OrderStatus::Shipped => "Order has been shipped",
        OrderStatus::Delivered => "Order delivered successfully",
        OrderStatus::Cancelled => "Order cancelled",
    }
}

/// Who an order belongs to. Making this an enum (instead of two optional
/// fields) is what enforces the exactly-one-of user/guest invariant at
/// construction.
#[derive(Debug, Clone)]
pub enum OrderOwner {
    Customer(String),
    Guest(GuestInfo),
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub delivery_address: DeliveryAddress,
    pub delivery_charge: f64,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Validates the input and assembles a new `pending` order with its seeded
/// tracking entry. Payment status starts `pending` regardless of method;
/// online capture is handled elsewhere, if at all.
pub fn build_order(owner: OrderOwner, input: NewOrder) -> Result<Order, ApiError> {
    if input.items.is_empty() {
        return Err(validation!("Order must contain at least one item"));
    }
    for item in &input.items {
        if item.quantity < 1 {
            return Err(validation!("Item quantity must be at least 1"));
        }
        if item.price < 0.0 {
            return Err(validation!("Item price cannot be negative"));
        }
        if item.name.trim().is_empty() {
            return Err(validation!("Item name is required"));
        }
    }
    if input.total_amount < 0.0 {
        return Err(validation!("Total amount cannot be negative"));
    }
    if input.delivery_charge < 0.0 {
        return Err(validation!("Delivery charge cannot be negative"));
    }

    let address = &input.delivery_address;
    for (value, field) in [
        (&address.street, "street"),
        (&address.city, "city"),
        (&address.state, "state"),
        (&address.pincode, "pincode"),
    ] {
        if value.trim().is_empty() {
            return Err(validation!("Delivery address is missing {}", field));
        }
    }

    let (user, guest_info) = match owner {
        OrderOwner::Customer(sub) => (Some(sub), None),
        OrderOwner::Guest(guest) => {
            if guest.name.trim().is_empty() || guest.phone.trim().is_empty() {
                return Err(validation!("Guest orders require a name and phone number"));
            }
            (None, Some(guest))
        }
    };

    let now = DateTime::now();
    Ok(Order {
        id: create_id(),
        order_number: generate_order_number(),
        user,
        guest_info,
        items: input.items,
        total_amount: input.total_amount,
        delivery_address: input.delivery_address,
        delivery_charge: input.delivery_charge,
        payment_method: input.payment_method,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Pending,
        notes: input.notes,
        tracking_updates: vec![TrackingUpdate {
            status: OrderStatus::Pending,
            message: ORDER_PLACED_MESSAGE.to_string(),
            timestamp: now,
        }],
        created_at: now,
        updated_at: now,
    })
}

/// The acting identity of a cancellation request.
///
/// `Guest` carries no credential at all: possession of the order number is
/// the only thing gating guest cancellation. That is a deliberate weakness
/// inherited from the storefront's checkout design, since guest orders have
/// no recoverable identity to check against.
#[derive(Debug, Clone)]
pub enum CancelActor {
    Customer(String),
    Guest,
}

pub async fn cancel_order(
    db: &Database,
    order_number: &str,
    actor: CancelActor,
) -> Result<Order, ApiError> {
    let orders = db.collection::<Order>(entity::ORDERS);
    let order = orders
        .find_one(doc! { "orderNumber": order_number })
        .await?
        .ok_or_else(|| not_found!("Order {} not found", order_number))?;

    match &actor {
        CancelActor::Customer(sub) => {
            if let Some(owner) = &order.user
                && owner != sub
            {
                return Err(forbidden!("You can only cancel your own orders"));
            }
        }
        CancelActor::Guest => {
            if order.user.is_some() {
                return Err(forbidden!(
                    "Order {} belongs to a registered account",
                    order_number
                ));
            }
        }
    }

    if order.status != OrderStatus::Pending {
        return Err(invalid_state!(
            "Order cannot be cancelled in {} status",
            order.status
        ));
    }

    match apply_cancellation(&orders, doc! { "_id": &order.id }, CANCELLED_BY_CUSTOMER_MESSAGE)
        .await?
    {
        Some(updated) => Ok(updated),
        // Lost the race against another transition; report the state that won.
        None => {
            let current = orders
                .find_one(doc! { "_id": &order.id })
                .await?
                .ok_or_else(|| not_found!("Order {} not found", order_number))?;
            Err(invalid_state!(
                "Order cannot be cancelled in {} status",
                current.status
            ))
        }
    }
}

/// Conditional cancel: only fires while the order is still `pending`.
/// Returns `None` when another transition got there first.
async fn apply_cancellation(
    orders: &Collection<Order>,
    mut filter: Document,
    message: &str,
) -> Result<Option<Order>, ApiError> {
    filter.insert("status", OrderStatus::Pending.as_str());
    let now = DateTime::now();
    let entry = TrackingUpdate {
        status: OrderStatus::Cancelled,
        message: message.to_string(),
        timestamp: now,
    };
    let updated = orders
        .find_one_and_update(
            filter,
            doc! {
                "$set": { "status": OrderStatus::Cancelled.as_str(), "updatedAt": now },
                "$push": { "trackingUpdates": to_bson(&entry)? },
            },
        )
        .return_document(ReturnDocument::After)
        .await?;
    Ok(updated)
}

/// Orders created before this instant are eligible for auto-cancellation.
pub fn cancellation_cutoff(now: chrono::DateTime<Utc>) -> DateTime {
    DateTime::from_millis((now - Duration::hours(AUTO_CANCEL_WINDOW_HOURS)).timestamp_millis())
}

#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub cancelled: Vec<String>,
    pub failed: Vec<String>,
}

/// Cancels every `pending` order older than the confirmation window. Each
/// order is processed independently: a failure is logged and collected, it
/// never aborts the rest of the sweep. Orders that leave `pending`
/// concurrently (e.g. a customer cancellation racing the sweep) are simply
/// skipped, which also makes back-to-back sweeps idempotent.
pub async fn auto_cancel_expired(db: &Database) -> Result<SweepOutcome, ApiError> {
    use futures::TryStreamExt;

    let orders = db.collection::<Order>(entity::ORDERS);
    let cutoff = cancellation_cutoff(Utc::now());

    let mut cursor = orders
        .find(doc! {
            "status": OrderStatus::Pending.as_str(),
            "createdAt": { "$lt": cutoff },
        })
        .await?;

    let mut outcome = SweepOutcome::default();
    while let Some(order) = cursor.try_next().await? {
        match apply_cancellation(&orders, doc! { "_id": &order.id }, AUTO_CANCELLED_MESSAGE).await {
            Ok(Some(_)) => outcome.cancelled.push(order.order_number),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(
                    "Auto-cancel failed for order {}: {}",
                    order.order_number,
                    err
                );
                outcome.failed.push(order.order_number);
            }
        }
    }

    tracing::info!(
        "Auto-cancel sweep cancelled {} order(s), {} failure(s)",
        outcome.cancelled.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

/// Administrative status progression. Validates the move against the state
/// machine, then applies it with the same conditional-update guard as
/// cancellation.
pub async fn progress_order(
    db: &Database,
    order_number: &str,
    next: OrderStatus,
) -> Result<Order, ApiError> {
    let orders = db.collection::<Order>(entity::ORDERS);
    let order = orders
        .find_one(doc! { "orderNumber": order_number })
        .await?
        .ok_or_else(|| not_found!("Order {} not found", order_number))?;

    if !can_transition(order.status, next) {
        return Err(invalid_state!(
            "Order cannot move from {} to {}",
            order.status,
            next
        ));
    }

    let now = DateTime::now();
    let entry = TrackingUpdate {
        status: next,
        message: status_message(next).to_string(),
        timestamp: now,
    };
    let updated = orders
        .find_one_and_update(
            doc! { "orderNumber": order_number, "status": order.status.as_str() },
            doc! {
                "$set": { "status": next.as_str(), "updatedAt": now },
                "$push": { "trackingUpdates": to_bson(&entry)? },
            },
        )
        .return_document(ReturnDocument::After)
        .await?;

    match updated {
        Some(order) => Ok(order),
        None => {
            let current = orders
                .find_one(doc! { "orderNumber": order_number })
                .await?
                .ok_or_else(|| not_found!("Order {} not found", order_number))?;
            Err(invalid_state!(
                "Order cannot move from {} to {}",
                current.status,
                next
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> NewOrder {
        NewOrder {
            items: vec![OrderItem {
                product: "prod-1".to_string(),
                name: "Rose Lip Balm".to_string(),
                price: 250.0,
                quantity: 2,
                image: None,
            }],
            total_amount: 500.0,
            delivery_address: DeliveryAddress {
                street: "1 Main St".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                pincode: "411001".to_string(),
            },
            delivery_charge: 0.0,
            payment_method: PaymentMethod::Cod,
            notes: None,
        }
    }

    #[test]
    fn transition_matrix_matches_the_state_machine() {
        use OrderStatus::*;
        assert!(can_transition(Pending, Confirmed));
        assert!(can_transition(Pending, Cancelled));
        assert!(can_transition(Confirmed, Processing));
        assert!(can_transition(Processing, Shipped));
        assert!(can_transition(Shipped, Delivered));

        assert!(!can_transition(Confirmed, Cancelled));
        assert!(!can_transition(Shipped, Cancelled));
        assert!(!can_transition(Delivered, Cancelled));
        assert!(!can_transition(Cancelled, Pending));
        assert!(!can_transition(Cancelled, Confirmed));
        assert!(!can_transition(Delivered, Pending));
        assert!(!can_transition(Pending, Shipped));
    }

    #[test]
    fn order_numbers_have_the_documented_shape() {
        let number = generate_order_number();
        assert_eq!(number.len(), 14);
        assert!(number.starts_with("ORD"));
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn new_orders_start_pending_with_one_tracking_entry() {
        let order = build_order(
            OrderOwner::Customer("user-1".to_string()),
            sample_input(),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.tracking_updates.len(), 1);
        assert_eq!(order.tracking_updates[0].message, ORDER_PLACED_MESSAGE);
        assert_eq!(order.user.as_deref(), Some("user-1"));
        assert!(order.guest_info.is_none());
    }

    #[test]
    fn guest_orders_carry_guest_info_and_no_user() {
        let order = build_order(
            OrderOwner::Guest(GuestInfo {
                name: "A".to_string(),
                phone: "999".to_string(),
                email: None,
            }),
            sample_input(),
        )
        .unwrap();

        assert!(order.user.is_none());
        assert!(order.guest_info.is_some());
    }

    #[test]
    fn online_orders_still_start_with_pending_payment() {
        let mut input = sample_input();
        input.payment_method = PaymentMethod::Online;
        let order = build_order(OrderOwner::Customer("user-1".to_string()), input).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn empty_item_lists_are_rejected() {
        let mut input = sample_input();
        input.items.clear();
        let err = build_order(OrderOwner::Customer("user-1".to_string()), input).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn zero_quantity_items_are_rejected() {
        let mut input = sample_input();
        input.items[0].quantity = 0;
        assert!(build_order(OrderOwner::Customer("u".to_string()), input).is_err());
    }

    #[test]
    fn incomplete_addresses_are_rejected() {
        let mut input = sample_input();
        input.delivery_address.street = " ".to_string();
        assert!(build_order(OrderOwner::Customer("u".to_string()), input).is_err());

        let mut input = sample_input();
        input.delivery_address.city = String::new();
        assert!(build_order(OrderOwner::Customer("u".to_string()), input).is_err());
    }

    #[test]
    fn guests_without_contact_details_are_rejected() {
        let err = build_order(
            OrderOwner::Guest(GuestInfo {
                name: String::new(),
                phone: "999".to_string(),
                email: None,
            }),
            sample_input(),
        )
        .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cutoff_selects_orders_older_than_the_window() {
        let now = chrono::DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let cutoff = cancellation_cutoff(now);

        let twenty_five_hours_ago =
            DateTime::from_millis(now.timestamp_millis() - 25 * 60 * 60 * 1000);
        let twenty_three_hours_ago =
            DateTime::from_millis(now.timestamp_millis() - 23 * 60 * 60 * 1000);

        assert!(twenty_five_hours_ago < cutoff);
        assert!(twenty_three_hours_ago > cutoff);
    }

    #[test]
    fn tracking_messages_are_stable() {
        assert_eq!(status_message(OrderStatus::Pending), ORDER_PLACED_MESSAGE);
        assert_eq!(
            AUTO_CANCELLED_MESSAGE,
            "Order auto-cancelled due to no confirmation within 24 hours"
        );
        assert_eq!(CANCELLED_BY_CUSTOMER_MESSAGE, "Order cancelled by customer");
    }
}
