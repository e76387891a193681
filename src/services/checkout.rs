//! Checkout sessions and order placement.
//!
//! A checkout session freezes the cart contents, the customer's shipping
//! details and the money breakdown. Placing the order converts the session
//! exactly once: the status flip to Completed is a conditional update, so two
//! racing placements cannot both create an order.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::checkout_session::{self, CheckoutStatus, PaymentMethod};
use crate::entities::order::{self, OrderStatus, PaymentStatus};
use crate::entities::snapshots::{CustomerSnapshot, SnapshotAddress, StatusTimeline, TimelineEntry};
use crate::entities::{cart, shipping_address};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::ids::{IdGenerator, MAX_ID_ATTEMPTS, ORDER_NUMBER_PREFIX};

/// GST applied to the cart subtotal.
const TAX_RATE: Decimal = dec!(0.18);

/// Days until estimated delivery, counted from placement.
const ESTIMATED_DELIVERY_DAYS: i64 = 7;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckout {
    pub cart_id: Option<Uuid>,
    pub payment_method: Option<PaymentMethod>,
    pub shipping_method: Option<String>,
    pub shipping_cost: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub checkout_id: Option<Uuid>,
}

pub struct CheckoutService {
    db: DbPool,
    events: EventSender,
    ids: Arc<dyn IdGenerator>,
}

impl CheckoutService {
    pub fn new(db: DbPool, events: EventSender, ids: Arc<dyn IdGenerator>) -> Self {
        Self { db, events, ids }
    }

    /// Creates a Draft session from the owner's cart and saved shipping
    /// address. The cart is left untouched until the order is placed.
    #[instrument(skip(self, request))]
    pub async fn create_session(
        &self,
        owner: Uuid,
        request: CreateCheckout,
    ) -> Result<checkout_session::Model, ServiceError> {
        let cart_id = request
            .cart_id
            .ok_or_else(|| ServiceError::ValidationError("Cart ID is required".to_string()))?;
        let payment_method = request.payment_method.ok_or_else(|| {
            ServiceError::ValidationError("Payment method is required".to_string())
        })?;

        let cart = cart::Entity::find_by_id(cart_id)
            .filter(cart::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "Cart not found. Please check your cart and try again.".to_string(),
                )
            })?;

        let address = shipping_address::Entity::find()
            .filter(shipping_address::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "Shipping address not found. Please add a shipping address first.".to_string(),
                )
            })?;

        let subtotal = cart.total;
        let shipping = request.shipping_cost.unwrap_or(Decimal::ZERO);
        let tax = compute_tax(subtotal);
        let total = subtotal + shipping + tax;

        let shipping_method = request
            .shipping_method
            .unwrap_or_else(|| "Standard".to_string());
        let shipping_time = shipping_time_label(&shipping_method);

        let now = Utc::now();
        let model = checkout_session::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            cart_id: Set(cart.id),
            customer: Set(customer_snapshot(&address)),
            items: Set(cart.items),
            subtotal: Set(subtotal),
            shipping: Set(shipping),
            tax: Set(tax),
            total: Set(total),
            payment_method: Set(payment_method),
            shipping_method: Set(shipping_method),
            shipping_time: Set(shipping_time.to_string()),
            status: Set(CheckoutStatus::Draft),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = model.insert(&self.db).await?;
        self.events
            .send_or_log(Event::CheckoutCreated(saved.id))
            .await;
        Ok(saved)
    }

    /// Converts a session into an order. Idempotency guard: a session whose
    /// status is already Completed is rejected, and the flip to Completed
    /// happens as a conditional update inside the same transaction as the
    /// order insert. Cart deletion afterwards is best-effort.
    #[instrument(skip(self, request))]
    pub async fn place_order(
        &self,
        owner: Uuid,
        request: PlaceOrder,
    ) -> Result<order::Model, ServiceError> {
        let checkout_id = request
            .checkout_id
            .ok_or_else(|| ServiceError::ValidationError("Checkout ID is required".to_string()))?;

        let session = checkout_session::Entity::find_by_id(checkout_id)
            .filter(checkout_session::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(
                    "Checkout session not found. Please start the checkout process again."
                        .to_string(),
                )
            })?;

        if session.status == CheckoutStatus::Completed {
            return Err(ServiceError::Conflict(
                "Order already placed for this checkout session.".to_string(),
            ));
        }

        // The source cart still exists at this point; carry its collection
        // provenance onto the order. Empty when the cart is gone.
        let source_cart = cart::Entity::find_by_id(session.cart_id)
            .filter(cart::Column::UserId.eq(owner))
            .one(&self.db)
            .await?;
        let (collection_id, collection_name) = source_cart
            .as_ref()
            .map(|c| (c.collection_id.clone(), c.collection_name.clone()))
            .unwrap_or_default();

        let order_number = self.unused_order_number().await?;

        let payment_status = if session.payment_method == PaymentMethod::CashOnDelivery {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Paid
        };

        let now = Utc::now();
        let timeline = StatusTimeline(vec![TimelineEntry {
            status: OrderStatus::OrderPlaced.as_str().to_string(),
            timestamp: now,
            message: "Your order has been placed successfully.".to_string(),
        }]);

        let order_model = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(order_number),
            user_id: Set(owner),
            cart_id: Set(session.cart_id),
            collection_id: Set(collection_id),
            collection_name: Set(collection_name),
            customer: Set(session.customer.clone()),
            items: Set(session.items.clone()),
            subtotal: Set(session.subtotal),
            shipping: Set(session.shipping),
            tax: Set(session.tax),
            total: Set(session.total),
            payment_method: Set(session.payment_method),
            payment_status: Set(payment_status),
            order_status: Set(OrderStatus::OrderPlaced),
            status_timeline: Set(timeline),
            tracking_number: Set(String::new()),
            estimated_delivery: Set(now + Duration::days(ESTIMATED_DELIVERY_DAYS)),
            notes: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = self.db.begin().await?;

        let flipped = checkout_session::Entity::update_many()
            .set(checkout_session::ActiveModel {
                status: Set(CheckoutStatus::Completed),
                updated_at: Set(Utc::now()),
                ..Default::default()
            })
            .filter(checkout_session::Column::Id.eq(session.id))
            .filter(checkout_session::Column::Status.ne(CheckoutStatus::Completed))
            .exec(&txn)
            .await?;

        if flipped.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::Conflict(
                "Order already placed for this checkout session.".to_string(),
            ));
        }

        let saved = order_model.insert(&txn).await?;
        txn.commit().await?;

        // Tolerated failure: the cart may already be gone.
        let delete_result = cart::Entity::delete_many()
            .filter(cart::Column::Id.eq(session.cart_id))
            .filter(cart::Column::UserId.eq(owner))
            .exec(&self.db)
            .await;
        match delete_result {
            Ok(res) if res.rows_affected == 0 => {
                warn!(cart_id = %session.cart_id, "source cart already deleted");
            }
            Ok(_) => {}
            Err(e) => warn!(cart_id = %session.cart_id, error = %e, "failed to delete source cart"),
        }

        self.events
            .send_or_log(Event::OrderPlaced {
                order_id: saved.id,
                checkout_id: session.id,
            })
            .await;

        Ok(saved)
    }

    async fn unused_order_number(&self) -> Result<String, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate(ORDER_NUMBER_PREFIX);
            let taken = order::Entity::find()
                .filter(order::Column::OrderNumber.eq(candidate.clone()))
                .one(&self.db)
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
        }
        Err(ServiceError::InternalError(
            "Failed to generate unique order number. Please try again.".to_string(),
        ))
    }
}

/// 18% of the subtotal, rounded to a whole amount. Midpoints round away
/// from zero, matching how storefront clients display the figure.
pub fn compute_tax(subtotal: Decimal) -> Decimal {
    (subtotal * TAX_RATE).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed lookup from the effective shipping method (after the "Standard"
/// default) to the customer-facing delivery estimate.
pub fn shipping_time_label(method: &str) -> &'static str {
    match method {
        "Standard" => "7-10 business days",
        "Express" => "3-5 business days",
        _ => "Next day",
    }
}

/// Copies the shipping address into the session, substituting placeholders
/// for blank optional fields.
fn customer_snapshot(address: &shipping_address::Model) -> CustomerSnapshot {
    CustomerSnapshot {
        name: address.name.clone(),
        email: address.email.clone(),
        phone: or_placeholder(&address.phone, "N/A"),
        address: SnapshotAddress {
            street: or_placeholder(&address.street, "N/A"),
            city: or_placeholder(&address.city, "N/A"),
            state: or_placeholder(&address.state, "N/A"),
            zip_code: or_placeholder(&address.pincode, "000000"),
            country: or_placeholder(&address.country, "India"),
        },
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_rounds_to_whole_amount_away_from_zero() {
        assert_eq!(compute_tax(dec!(2000)), dec!(360));
        assert_eq!(compute_tax(dec!(100)), dec!(18));
        // 999 * 0.18 = 179.82 -> 180
        assert_eq!(compute_tax(dec!(999)), dec!(180));
        // 125 * 0.18 = 22.5, a midpoint, rounds up not to even
        assert_eq!(compute_tax(dec!(125)), dec!(23));
        assert_eq!(compute_tax(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn shipping_labels_match_methods_exactly() {
        assert_eq!(shipping_time_label("Standard"), "7-10 business days");
        assert_eq!(shipping_time_label("Express"), "3-5 business days");
        assert_eq!(shipping_time_label("Overnight"), "Next day");
        assert_eq!(shipping_time_label("standard"), "Next day");
    }

    #[test]
    fn snapshot_substitutes_placeholders_for_blank_fields() {
        let address = shipping_address::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "  ".to_string(),
            street: "12 MG Road".to_string(),
            area: None,
            city: "Pune".to_string(),
            state: "MH".to_string(),
            pincode: String::new(),
            country: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = customer_snapshot(&address);
        assert_eq!(snapshot.phone, "N/A");
        assert_eq!(snapshot.address.street, "12 MG Road");
        assert_eq!(snapshot.address.zip_code, "000000");
        assert_eq!(snapshot.address.country, "India");
    }
}
