//! Order queries, administrative status updates and customer cancellation.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::checkout_session::PaymentMethod;
use crate::entities::order::{self, OrderStatus, PaymentStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

use super::order_policy::TransitionPolicy;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelOrder {
    pub reason: Option<String>,
}

pub struct OrderService {
    db: DbPool,
    events: EventSender,
    policy: Arc<dyn TransitionPolicy>,
}

impl OrderService {
    pub fn new(db: DbPool, events: EventSender, policy: Arc<dyn TransitionPolicy>) -> Self {
        Self { db, events, policy }
    }

    /// Owner's orders, most recent first, with a pagination summary.
    pub async fn list_for_owner(
        &self,
        owner: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<order::Model>, Pagination), ServiceError> {
        let page = page.max(1);
        let limit = limit.max(1);

        let paginator = order::Entity::find()
            .filter(order::Column::UserId.eq(owner))
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&self.db, limit);

        let totals = paginator.num_items_and_pages().await?;
        let orders = paginator.fetch_page(page - 1).await?;

        Ok((
            orders,
            Pagination {
                total: totals.number_of_items,
                page,
                limit,
                pages: totals.number_of_pages,
            },
        ))
    }

    /// Back-office listing: every order across owners, most recent first.
    pub async fn list_all(&self) -> Result<Vec<order::Model>, ServiceError> {
        Ok(order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn get_for_owner(
        &self,
        order_number: &str,
        owner: Uuid,
    ) -> Result<order::Model, ServiceError> {
        order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .filter(order::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
    }

    /// Administrative transition. The policy gates which moves are accepted;
    /// every accepted move appends a timeline entry. "Consignment shipped"
    /// stores the tracking number; "Order arrived" settles Cash on Delivery.
    #[instrument(skip(self, request))]
    pub async fn update_status(
        &self,
        order_number: &str,
        request: UpdateStatus,
    ) -> Result<order::Model, ServiceError> {
        let new_status = request
            .status
            .ok_or_else(|| ServiceError::ValidationError("Status is required".to_string()))?;

        let order = order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let old_status = order.order_status;
        if !self.policy.allows(old_status, new_status) {
            return Err(ServiceError::ValidationError(format!(
                "Order status cannot change from {} to {}",
                old_status, new_status
            )));
        }

        let now = Utc::now();
        let mut timeline = order.status_timeline.clone();
        timeline.push(
            new_status.as_str(),
            format!("Order status updated to {}", new_status),
        );

        let settles_cod = new_status == OrderStatus::OrderArrived
            && order.payment_method == PaymentMethod::CashOnDelivery;
        let tracking = match (&new_status, request.tracking_number) {
            (OrderStatus::ConsignmentShipped, Some(number)) if !number.is_empty() => Some(number),
            _ => None,
        };

        let order_id = order.id;
        let mut active: order::ActiveModel = order.into();
        active.order_status = Set(new_status);
        active.status_timeline = Set(timeline);
        active.updated_at = Set(now);
        if let Some(number) = tracking {
            active.tracking_number = Set(number);
        }
        if settles_cod {
            active.payment_status = Set(PaymentStatus::Paid);
        }

        let saved = active.update(&self.db).await?;
        self.events
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: old_status.to_string(),
                new_status: new_status.to_string(),
            })
            .await;
        Ok(saved)
    }

    /// Customer-initiated cancellation. Rejected once fulfillment has
    /// started; refunds a paid order by flipping the payment status. Unlike
    /// administrative updates this does not append a timeline entry.
    #[instrument(skip(self, reason))]
    pub async fn cancel(
        &self,
        owner: Uuid,
        order_number: &str,
        reason: Option<String>,
    ) -> Result<order::Model, ServiceError> {
        let order = self.get_for_owner(order_number, owner).await?;

        if order.order_status.is_fulfillment_locked() {
            return Err(ServiceError::ValidationError(format!(
                "Order cannot be cancelled as it is already {}",
                order.order_status
            )));
        }

        let refunded = order.payment_status == PaymentStatus::Paid;
        let order_id = order.id;

        let mut active: order::ActiveModel = order.into();
        active.order_status = Set(OrderStatus::Cancelled);
        active.notes = Set(cancellation_notes(reason));
        if refunded {
            active.payment_status = Set(PaymentStatus::Refunded);
        }
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await?;
        self.events.send_or_log(Event::OrderCancelled(order_id)).await;
        Ok(saved)
    }
}

fn cancellation_notes(reason: Option<String>) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => r,
        _ => "Order cancelled by customer".to_string(),
    }
}
