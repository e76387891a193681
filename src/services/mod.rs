pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod order_policy;
pub mod orders;

pub use addresses::AddressService;
pub use carts::CartService;
pub use catalog::CatalogService;
pub use checkout::CheckoutService;
pub use order_policy::{PermissiveTransitions, TransitionPolicy};
pub use orders::OrderService;
