//! Product and collection catalog CRUD.
//!
//! The checkout core never reads the catalog back after a cart is created;
//! carts carry their own item snapshots.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::product::StringList;
use crate::entities::{collection, product};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub availability: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub availability: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub availability: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub availability: Option<bool>,
}

pub struct CatalogService {
    db: DbPool,
}

impl CatalogService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request))]
    pub async fn create_product(
        &self,
        request: NewProduct,
    ) -> Result<product::Model, ServiceError> {
        let name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ServiceError::ValidationError("Name is required".to_string()))?;

        let price = request.price.unwrap_or(Decimal::ZERO);
        let now = Utc::now();
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(request.description.unwrap_or_default()),
            original_price: Set(request.original_price.unwrap_or(price)),
            price: Set(price),
            sizes: Set(StringList(request.sizes.unwrap_or_default())),
            colors: Set(StringList(request.colors.unwrap_or_default())),
            image: Set(request.image.unwrap_or_default()),
            category: Set(request.category.unwrap_or_default()),
            availability: Set(request.availability.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        Ok(product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
    }

    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: Uuid,
        request: UpdateProduct,
    ) -> Result<product::Model, ServiceError> {
        let existing = self.get_product(id).await?;
        let mut active: product::ActiveModel = existing.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(original_price) = request.original_price {
            active.original_price = Set(original_price);
        }
        if let Some(sizes) = request.sizes {
            active.sizes = Set(StringList(sizes));
        }
        if let Some(colors) = request.colors {
            active.colors = Set(StringList(colors));
        }
        if let Some(image) = request.image {
            active.image = Set(image);
        }
        if let Some(category) = request.category {
            active.category = Set(category);
        }
        if let Some(availability) = request.availability {
            active.availability = Set(availability);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_product(id).await?;
        product::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn create_collection(
        &self,
        request: NewCollection,
    ) -> Result<collection::Model, ServiceError> {
        let name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ServiceError::ValidationError("Name is required".to_string()))?;

        let now = Utc::now();
        let model = collection::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(request.description.unwrap_or_default()),
            image: Set(request.image.unwrap_or_default()),
            availability: Set(request.availability.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_collections(&self) -> Result<Vec<collection::Model>, ServiceError> {
        Ok(collection::Entity::find()
            .order_by_desc(collection::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn get_collection(&self, id: Uuid) -> Result<collection::Model, ServiceError> {
        collection::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Collection not found".to_string()))
    }

    #[instrument(skip(self, request))]
    pub async fn update_collection(
        &self,
        id: Uuid,
        request: UpdateCollection,
    ) -> Result<collection::Model, ServiceError> {
        let existing = self.get_collection(id).await?;
        let mut active: collection::ActiveModel = existing.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(image) = request.image {
            active.image = Set(image);
        }
        if let Some(availability) = request.availability {
            active.availability = Set(availability);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_collection(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_collection(id).await?;
        collection::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
