use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshots::{CustomerSnapshot, LineItems};

/// Checkout session status.
///
/// `Processing` is reachable in the schema but no current flow sets it;
/// sessions go Draft → Completed (or Cancelled).
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum CheckoutStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

/// Payment methods accepted at checkout. Statuses are recorded, not
/// processed; no gateway is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "Cash on Delivery")]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[sea_orm(string_value = "Online Gateway")]
    #[serde(rename = "Online Gateway")]
    OnlineGateway,
    #[sea_orm(string_value = "Card")]
    Card,
    #[sea_orm(string_value = "UPI")]
    #[serde(rename = "UPI")]
    Upi,
}

/// Checkout session entity: a priced, single-use snapshot of a cart plus the
/// owner's shipping address.
///
/// `subtotal + shipping + tax == total`, computed once at creation and never
/// recomputed. Completed sessions are retained as an audit record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "checkout_sessions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub cart_id: Uuid,
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
    pub shipping_method: String,
    pub shipping_time: String,
    pub status: CheckoutStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
