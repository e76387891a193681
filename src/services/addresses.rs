//! The single shipping address each account keeps on file.
//!
//! Name and email always come from the account record, not the request, so
//! the address can never drift from the registered identity.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::user;
use crate::db::DbPool;
use crate::entities::shipping_address;
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveAddress {
    pub street: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
}

pub struct AddressService {
    db: DbPool,
}

impl AddressService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn get_for_owner(
        &self,
        owner: Uuid,
    ) -> Result<Option<shipping_address::Model>, ServiceError> {
        Ok(shipping_address::Entity::find()
            .filter(shipping_address::Column::UserId.eq(owner))
            .one(&self.db)
            .await?)
    }

    /// Creates or replaces the owner's address. The error message lists every
    /// missing required field at once.
    #[instrument(skip(self, request))]
    pub async fn save(
        &self,
        owner: Uuid,
        request: SaveAddress,
    ) -> Result<shipping_address::Model, ServiceError> {
        let user = user::Entity::find_by_id(owner)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let mut missing = Vec::new();
        let street = required(&request.street, "street", &mut missing);
        let city = required(&request.city, "city", &mut missing);
        let state = required(&request.state, "state", &mut missing);
        let pincode = required(&request.pincode, "pincode", &mut missing);
        let phone = required(&request.phone, "phone", &mut missing);

        if !missing.is_empty() {
            return Err(ServiceError::ValidationError(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let country = match request.country {
            Some(c) if !c.trim().is_empty() => c,
            _ => "India".to_string(),
        };
        let now = Utc::now();

        let existing = self.get_for_owner(owner).await?;
        let saved = match existing {
            Some(address) => {
                let mut active: shipping_address::ActiveModel = address.into();
                active.name = Set(user.name);
                active.email = Set(user.email);
                active.phone = Set(phone);
                active.street = Set(street);
                active.area = Set(request.area);
                active.city = Set(city);
                active.state = Set(state);
                active.pincode = Set(pincode);
                active.country = Set(country);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                let active = shipping_address::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(owner),
                    name: Set(user.name),
                    email: Set(user.email),
                    phone: Set(phone),
                    street: Set(street),
                    area: Set(request.area),
                    city: Set(city),
                    state: Set(state),
                    pincode: Set(pincode),
                    country: Set(country),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&self.db).await?
            }
        };

        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner: Uuid) -> Result<shipping_address::Model, ServiceError> {
        let address = self
            .get_for_owner(owner)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Shipping address not found".to_string()))?;

        shipping_address::Entity::delete_by_id(address.id)
            .exec(&self.db)
            .await?;
        Ok(address)
    }
}

/// Pulls a required field out of the request, recording its name when blank.
fn required(value: &Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}
