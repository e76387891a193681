//! Cart lifecycle: creation from a single product or a whole collection,
//! item-level edits and deletion.
//!
//! Every save recomputes the stored total from the line items, so the total
//! can never drift from the item list.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::cart;
use crate::entities::snapshots::{LineItem, LineItems};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 10;

/// Request payload for a single-product cart. Required fields are optional
/// here so their absence surfaces as a 400 with a message rather than a
/// deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProductCart {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectionCart {
    pub collection_id: Option<String>,
    pub collection_name: Option<String>,
    pub items: Option<Vec<IncomingItem>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomingItem {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Result of removing an item: either the cart survives with fewer items, or
/// removing the last item deleted it.
#[derive(Debug)]
pub enum RemovalOutcome {
    Updated(cart::Model),
    CartDeleted,
}

pub struct CartService {
    db: DbPool,
    events: EventSender,
}

impl CartService {
    pub fn new(db: DbPool, events: EventSender) -> Self {
        Self { db, events }
    }

    /// Creates a fresh cart holding a single product. A new cart is created
    /// per call; products are never merged into an existing cart.
    #[instrument(skip(self, request))]
    pub async fn create_with_product(
        &self,
        owner: Uuid,
        request: NewProductCart,
    ) -> Result<cart::Model, ServiceError> {
        let (product_id, name, price) = match (request.product_id, request.name, request.price) {
            (Some(p), Some(n), Some(pr)) if !p.is_empty() && !n.is_empty() => (p, n, pr),
            _ => {
                return Err(ServiceError::ValidationError(
                    "Missing required product details".to_string(),
                ))
            }
        };

        let quantity = request.quantity.unwrap_or(1);
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(ServiceError::ValidationError(
                "Quantity must be a number between 1 and 10".to_string(),
            ));
        }

        let item = LineItem {
            product_id,
            name,
            original_price: request.original_price.unwrap_or(price),
            price,
            quantity,
            selected_size: request
                .selected_size
                .unwrap_or_else(|| "Standard".to_string()),
            selected_color: request
                .selected_color
                .unwrap_or_else(|| "Default".to_string()),
            image: request.image.unwrap_or_default(),
            category: request.category.unwrap_or_default(),
        };

        self.insert_cart(owner, String::new(), String::new(), LineItems(vec![item]))
            .await
    }

    /// Creates a cart from a collection's item list. Validation is
    /// all-or-nothing: the first failing item aborts the request and no cart
    /// is created.
    #[instrument(skip(self, request))]
    pub async fn create_with_collection(
        &self,
        owner: Uuid,
        request: NewCollectionCart,
    ) -> Result<cart::Model, ServiceError> {
        let (collection_id, collection_name, items) = match (
            request.collection_id,
            request.collection_name,
            request.items,
        ) {
            (Some(id), Some(name), Some(items))
                if !id.is_empty() && !name.is_empty() && !items.is_empty() =>
            {
                (id, name, items)
            }
            _ => {
                return Err(ServiceError::ValidationError(
                    "Missing required collection details: collectionId, collectionName, and items array are required"
                        .to_string(),
                ))
            }
        };

        let validated = validate_items(items)?;
        self.insert_cart(owner, collection_id, collection_name, LineItems(validated))
            .await
    }

    /// All carts belonging to the owner, most recent first.
    pub async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<cart::Model>, ServiceError> {
        Ok(cart::Entity::find()
            .filter(cart::Column::UserId.eq(owner))
            .order_by_desc(cart::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn get_for_owner(
        &self,
        cart_id: Uuid,
        owner: Uuid,
    ) -> Result<cart::Model, ServiceError> {
        cart::Entity::find_by_id(cart_id)
            .filter(cart::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Cart not found".to_string()))
    }

    /// Sets the quantity of the first item matching the
    /// (product, size, color) triple. Duplicate triples are possible; only
    /// the first match is touched.
    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        owner: Uuid,
        cart_id: Uuid,
        product_id: &str,
        selected_size: &str,
        selected_color: &str,
        quantity: i32,
    ) -> Result<cart::Model, ServiceError> {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(ServiceError::ValidationError(
                "Quantity must be a number between 1 and 10".to_string(),
            ));
        }

        let cart = self.get_for_owner(cart_id, owner).await?;
        let mut items = cart.items.clone();

        let item = items
            .find_mut(product_id, selected_size, selected_color)
            .ok_or_else(|| ServiceError::NotFound("Item not found in cart".to_string()))?;
        item.quantity = quantity;

        let updated = self.save_items(cart, items).await?;
        self.events.send_or_log(Event::CartUpdated(updated.id)).await;
        Ok(updated)
    }

    /// Removes the first item matching the triple. Removing the last item
    /// deletes the cart entirely.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        owner: Uuid,
        cart_id: Uuid,
        product_id: &str,
        selected_size: &str,
        selected_color: &str,
    ) -> Result<RemovalOutcome, ServiceError> {
        let cart = self.get_for_owner(cart_id, owner).await?;
        let mut items = cart.items.clone();

        if items
            .remove_first(product_id, selected_size, selected_color)
            .is_none()
        {
            return Err(ServiceError::NotFound("Item not found in cart".to_string()));
        }

        if items.is_empty() {
            cart::Entity::delete_by_id(cart.id).exec(&self.db).await?;
            self.events.send_or_log(Event::CartDeleted(cart.id)).await;
            return Ok(RemovalOutcome::CartDeleted);
        }

        let updated = self.save_items(cart, items).await?;
        self.events.send_or_log(Event::CartUpdated(updated.id)).await;
        Ok(RemovalOutcome::Updated(updated))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner: Uuid, cart_id: Uuid) -> Result<(), ServiceError> {
        let result = cart::Entity::delete_many()
            .filter(cart::Column::Id.eq(cart_id))
            .filter(cart::Column::UserId.eq(owner))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("Cart not found".to_string()));
        }

        self.events.send_or_log(Event::CartDeleted(cart_id)).await;
        Ok(())
    }

    async fn insert_cart(
        &self,
        owner: Uuid,
        collection_id: String,
        collection_name: String,
        items: LineItems,
    ) -> Result<cart::Model, ServiceError> {
        let now = Utc::now();
        let total = items.total();

        let model = cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            collection_id: Set(collection_id),
            collection_name: Set(collection_name),
            items: Set(items),
            total: Set(total),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = model.insert(&self.db).await?;
        self.events.send_or_log(Event::CartCreated(saved.id)).await;
        Ok(saved)
    }

    /// Persists a new item list, recomputing the total.
    async fn save_items(
        &self,
        cart: cart::Model,
        items: LineItems,
    ) -> Result<cart::Model, ServiceError> {
        let total = items.total();
        let mut active: cart::ActiveModel = cart.into();
        active.items = Set(items);
        active.total = Set(total);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }
}

/// Checks every incoming item before any cart is written. Error messages are
/// indexed from 1 to match what storefront clients display.
fn validate_items(items: Vec<IncomingItem>) -> Result<Vec<LineItem>, ServiceError> {
    let mut validated = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let position = index + 1;

        let (product_id, name, price, selected_size, selected_color) = match (
            item.product_id,
            item.name,
            item.price,
            item.selected_size,
            item.selected_color,
        ) {
            (Some(p), Some(n), Some(pr), Some(s), Some(c))
                if !p.is_empty() && !n.is_empty() && !s.is_empty() && !c.is_empty() =>
            {
                (p, n, pr, s, c)
            }
            _ => {
                return Err(ServiceError::ValidationError(format!(
                    "Item {} is missing required fields: productId, name, price, selectedSize, and selectedColor",
                    position
                )))
            }
        };

        if price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "Invalid price for item {}",
                position
            )));
        }

        let quantity = item.quantity.unwrap_or(1);
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(ServiceError::ValidationError(format!(
                "Quantity must be between 1 and 10 for item {}",
                position
            )));
        }

        validated.push(LineItem {
            product_id,
            name,
            original_price: item.original_price.unwrap_or(price),
            price,
            quantity,
            selected_size,
            selected_color,
            image: item.image.unwrap_or_default(),
            category: item.category.unwrap_or_default(),
        });
    }

    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn incoming(price: Decimal, quantity: i32) -> IncomingItem {
        IncomingItem {
            product_id: Some("prod-1".to_string()),
            name: Some("Linen Shirt".to_string()),
            price: Some(price),
            original_price: None,
            quantity: Some(quantity),
            selected_size: Some("M".to_string()),
            selected_color: Some("Blue".to_string()),
            image: None,
            category: None,
        }
    }

    #[test]
    fn valid_items_pass_with_defaults_applied() {
        let items = validate_items(vec![incoming(dec!(499), 2)]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].original_price, dec!(499));
        assert_eq!(items[0].image, "");
    }

    #[test]
    fn missing_field_names_the_offending_item() {
        let mut bad = incoming(dec!(100), 1);
        bad.selected_color = None;

        let err = validate_items(vec![incoming(dec!(100), 1), bad]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Item 2 is missing required fields: productId, name, price, selectedSize, and selectedColor"
        );
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let err = validate_items(vec![incoming(dec!(0), 1)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid price for item 1");

        let err = validate_items(vec![incoming(dec!(-5), 1)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid price for item 1");
    }

    #[test]
    fn out_of_range_quantity_is_rejected() {
        let err = validate_items(vec![incoming(dec!(100), 11)]).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be between 1 and 10 for item 1");

        let err = validate_items(vec![incoming(dec!(100), 0)]).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be between 1 and 10 for item 1");
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let mut item = incoming(dec!(100), 1);
        item.quantity = None;

        let items = validate_items(vec![item]).unwrap();
        assert_eq!(items[0].quantity, 1);
    }
}
