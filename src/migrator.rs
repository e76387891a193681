//! Embedded schema migrations.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_catalog::Migration),
            Box::new(m20250101_000003_create_shipping_addresses::Migration),
            Box::new(m20250101_000004_create_carts::Migration),
            Box::new(m20250101_000005_create_checkout_sessions::Migration),
            Box::new(m20250101_000006_create_orders::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // Every migration lives in this one file, so the names must be spelled
    // out by hand; a duplicate would collide in seaql_migrations.
    #[test]
    fn migration_names_are_distinct() {
        let migrations = Migrator::migrations();
        let names: Vec<&str> = migrations.iter().map(|m| m.name()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len(), "duplicate names in {:?}", names);
    }
}

mod m20250101_000001_create_users {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_users"
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        PublicId,
        Name,
        Email,
        PasswordHash,
        CreatedAt,
        UpdatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Users::PublicId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000002_create_catalog {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_catalog"
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        Description,
        Price,
        OriginalPrice,
        Sizes,
        Colors,
        Image,
        Category,
        Availability,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Collections {
        Table,
        Id,
        Name,
        Description,
        Image,
        Availability,
        CreatedAt,
        UpdatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).text().not_null())
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::OriginalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::Sizes).json().not_null())
                        .col(ColumnDef::new(Products::Colors).json().not_null())
                        .col(ColumnDef::new(Products::Image).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(ColumnDef::new(Products::Availability).boolean().not_null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Collections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Collections::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Collections::Name).string().not_null())
                        .col(ColumnDef::new(Collections::Description).text().not_null())
                        .col(ColumnDef::new(Collections::Image).string().not_null())
                        .col(
                            ColumnDef::new(Collections::Availability)
                                .boolean()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Collections::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Collections::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Collections::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000003_create_shipping_addresses {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_shipping_addresses"
        }
    }

    #[derive(DeriveIden)]
    enum ShippingAddresses {
        Table,
        Id,
        UserId,
        Name,
        Email,
        Phone,
        Street,
        Area,
        City,
        State,
        Pincode,
        Country,
        CreatedAt,
        UpdatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ShippingAddresses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShippingAddresses::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        // one address per user, upserted in place
                        .col(
                            ColumnDef::new(ShippingAddresses::UserId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ShippingAddresses::Name).string().not_null())
                        .col(
                            ColumnDef::new(ShippingAddresses::Email)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShippingAddresses::Phone)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShippingAddresses::Street)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShippingAddresses::Area).string().null())
                        .col(ColumnDef::new(ShippingAddresses::City).string().not_null())
                        .col(
                            ColumnDef::new(ShippingAddresses::State)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShippingAddresses::Pincode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShippingAddresses::Country)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShippingAddresses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShippingAddresses::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ShippingAddresses::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000004_create_carts {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_carts"
        }
    }

    #[derive(DeriveIden)]
    enum Carts {
        Table,
        Id,
        UserId,
        CollectionId,
        CollectionName,
        Items,
        Total,
        CreatedAt,
        UpdatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Carts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Carts::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Carts::UserId).uuid().not_null())
                        .col(ColumnDef::new(Carts::CollectionId).string().not_null())
                        .col(ColumnDef::new(Carts::CollectionName).string().not_null())
                        .col(ColumnDef::new(Carts::Items).json().not_null())
                        .col(ColumnDef::new(Carts::Total).decimal().not_null())
                        .col(
                            ColumnDef::new(Carts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Carts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_carts_user_id")
                        .table(Carts::Table)
                        .col(Carts::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Carts::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000005_create_checkout_sessions {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_checkout_sessions"
        }
    }

    #[derive(DeriveIden)]
    enum CheckoutSessions {
        Table,
        Id,
        UserId,
        CartId,
        Customer,
        Items,
        Subtotal,
        Shipping,
        Tax,
        Total,
        PaymentMethod,
        ShippingMethod,
        ShippingTime,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CheckoutSessions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CheckoutSessions::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CheckoutSessions::UserId).uuid().not_null())
                        .col(ColumnDef::new(CheckoutSessions::CartId).uuid().not_null())
                        .col(
                            ColumnDef::new(CheckoutSessions::Customer)
                                .json()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CheckoutSessions::Items).json().not_null())
                        .col(
                            ColumnDef::new(CheckoutSessions::Subtotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::Shipping)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::Tax)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::Total)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::PaymentMethod)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::ShippingMethod)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::ShippingTime)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CheckoutSessions::Status).string().not_null())
                        .col(
                            ColumnDef::new(CheckoutSessions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CheckoutSessions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_checkout_sessions_user_id")
                        .table(CheckoutSessions::Table)
                        .col(CheckoutSessions::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CheckoutSessions::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000006_create_orders {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_orders"
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        OrderNumber,
        UserId,
        CartId,
        CollectionId,
        CollectionName,
        Customer,
        Items,
        Subtotal,
        Shipping,
        Tax,
        Total,
        PaymentMethod,
        PaymentStatus,
        OrderStatus,
        StatusTimeline,
        TrackingNumber,
        EstimatedDelivery,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                        .col(ColumnDef::new(Orders::CartId).uuid().not_null())
                        .col(ColumnDef::new(Orders::CollectionId).string().not_null())
                        .col(ColumnDef::new(Orders::CollectionName).string().not_null())
                        .col(ColumnDef::new(Orders::Customer).json().not_null())
                        .col(ColumnDef::new(Orders::Items).json().not_null())
                        .col(
                            ColumnDef::new(Orders::Subtotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::Shipping)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Tax).decimal().not_null())
                        .col(ColumnDef::new(Orders::Total).decimal().not_null())
                        .col(ColumnDef::new(Orders::PaymentMethod).string().not_null())
                        .col(ColumnDef::new(Orders::PaymentStatus).string().not_null())
                        .col(ColumnDef::new(Orders::OrderStatus).string().not_null())
                        .col(ColumnDef::new(Orders::StatusTimeline).json().not_null())
                        .col(ColumnDef::new(Orders::TrackingNumber).string().not_null())
                        .col(
                            ColumnDef::new(Orders::EstimatedDelivery)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Notes).string().not_null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_user_id")
                        .table(Orders::Table)
                        .col(Orders::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }
}
