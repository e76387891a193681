use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::checkout_session::PaymentMethod;
use super::snapshots::{CustomerSnapshot, LineItems, StatusTimeline};

/// Order fulfillment status.
///
/// The nominal progression is Order placed → Order Processed → Production
/// start → Preshipment Inspection → Consignment shipped → Order arrived,
/// with Cancelled and Returned as absorbing states reachable from any
/// non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Order placed")]
    #[serde(rename = "Order placed")]
    OrderPlaced,
    #[sea_orm(string_value = "Order Processed")]
    #[serde(rename = "Order Processed")]
    OrderProcessed,
    #[sea_orm(string_value = "Production start")]
    #[serde(rename = "Production start")]
    ProductionStart,
    #[sea_orm(string_value = "Preshipment Inspection")]
    #[serde(rename = "Preshipment Inspection")]
    PreshipmentInspection,
    #[sea_orm(string_value = "Consignment shipped")]
    #[serde(rename = "Consignment shipped")]
    ConsignmentShipped,
    #[sea_orm(string_value = "Order arrived")]
    #[serde(rename = "Order arrived")]
    OrderArrived,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
    #[sea_orm(string_value = "Returned")]
    Returned,
}

impl OrderStatus {
    /// Customer-facing label, identical to the persisted string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderPlaced => "Order placed",
            Self::OrderProcessed => "Order Processed",
            Self::ProductionStart => "Production start",
            Self::PreshipmentInspection => "Preshipment Inspection",
            Self::ConsignmentShipped => "Consignment shipped",
            Self::OrderArrived => "Order arrived",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
        }
    }

    /// Statuses past the point of no return for customer cancellation.
    pub fn is_fulfillment_locked(&self) -> bool {
        matches!(
            self,
            Self::ProductionStart
                | Self::PreshipmentInspection
                | Self::ConsignmentShipped
                | Self::OrderArrived
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status. Flips are driven by order lifecycle events only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Failed")]
    Failed,
    #[sea_orm(string_value = "Refunded")]
    Refunded,
}

/// Order entity: the durable record produced by committing a checkout
/// session.
///
/// Item, price and customer snapshots are immutable after creation; orders
/// never re-read the cart or the shipping address. Mutations happen only
/// through status transitions and cancellation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub user_id: Uuid,
    pub cart_id: Uuid,
    pub collection_id: String,
    pub collection_name: String,
    #[sea_orm(column_type = "Json")]
    pub customer: CustomerSnapshot,
    #[sea_orm(column_type = "Json")]
    pub items: LineItems,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub shipping: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    #[sea_orm(column_type = "Json")]
    pub status_timeline: StatusTimeline,
    pub tracking_number: String,
    pub estimated_delivery: DateTime<Utc>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_persisted_strings() {
        assert_eq!(OrderStatus::OrderPlaced.to_string(), "Order placed");
        assert_eq!(
            OrderStatus::ConsignmentShipped.to_string(),
            "Consignment shipped"
        );
        assert_eq!(
            OrderStatus::PreshipmentInspection.to_string(),
            "Preshipment Inspection"
        );
    }

    #[test]
    fn fulfillment_lock_covers_exactly_the_four_stages() {
        use OrderStatus::*;
        for status in [
            ProductionStart,
            PreshipmentInspection,
            ConsignmentShipped,
            OrderArrived,
        ] {
            assert!(status.is_fulfillment_locked(), "{status} should be locked");
        }
        for status in [OrderPlaced, OrderProcessed, Cancelled, Returned] {
            assert!(
                !status.is_fulfillment_locked(),
                "{status} should not be locked"
            );
        }
    }

    #[test]
    fn status_deserializes_from_customer_facing_labels() {
        let status: OrderStatus = serde_json::from_str(r#""Order arrived""#).unwrap();
        assert_eq!(status, OrderStatus::OrderArrived);
    }
}
