pub mod cart;
pub mod checkout_session;
pub mod collection;
pub mod order;
pub mod product;
pub mod shipping_address;
pub mod snapshots;

pub use cart::Entity as Cart;
pub use checkout_session::Entity as CheckoutSession;
pub use collection::Entity as Collection;
pub use order::Entity as Order;
pub use product::Entity as Product;
pub use shipping_address::Entity as ShippingAddress;
