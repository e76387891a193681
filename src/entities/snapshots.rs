//! Embedded document types shared by carts, checkout sessions and orders.
//!
//! These are stored as JSON columns. Once copied into a checkout session or
//! an order they are snapshots: never re-read from their source.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single cart/checkout/order line item.
///
/// Identity within a cart is the (product_id, selected_size, selected_color)
/// triple. Uniqueness is not enforced; lookups act on the first match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub quantity: i32,
    pub selected_size: String,
    pub selected_color: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Whether this item carries the given (product, size, color) triple.
    pub fn matches(&self, product_id: &str, size: &str, color: &str) -> bool {
        self.product_id == product_id
            && self.selected_size == size
            && self.selected_color == color
    }
}

/// Ordered line-item collection, persisted as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct LineItems(pub Vec<LineItem>);

impl LineItems {
    /// Sum of `price × quantity` over all items.
    pub fn total(&self) -> Decimal {
        self.0.iter().map(LineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First item matching the triple, if any.
    pub fn find_mut(
        &mut self,
        product_id: &str,
        size: &str,
        color: &str,
    ) -> Option<&mut LineItem> {
        self.0
            .iter_mut()
            .find(|item| item.matches(product_id, size, color))
    }

    /// Removes the first item matching the triple. Returns the removed item.
    pub fn remove_first(
        &mut self,
        product_id: &str,
        size: &str,
        color: &str,
    ) -> Option<LineItem> {
        let idx = self
            .0
            .iter()
            .position(|item| item.matches(product_id, size, color))?;
        Some(self.0.remove(idx))
    }
}

/// Postal address captured inside a customer snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Customer details copied from the shipping address at checkout creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: SnapshotAddress,
}

/// One entry in an order's append-only status timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimelineEntry {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Ordered status-change log, persisted as a JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct StatusTimeline(pub Vec<TimelineEntry>);

impl StatusTimeline {
    pub fn push(&mut self, status: impl Into<String>, message: impl Into<String>) {
        self.0.push(TimelineEntry {
            status: status.into(),
            timestamp: Utc::now(),
            message: message.into(),
        });
    }
}
