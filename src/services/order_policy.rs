use crate::entities::order::OrderStatus;

/// Decides which administrative status transitions are accepted.
///
/// Fulfillment today trusts the back office and accepts any transition,
/// including backwards moves and re-opening cancelled orders. The trait is
/// the seam where a stricter workflow plugs in without touching the service.
pub trait TransitionPolicy: Send + Sync {
    fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool;
}

/// Accepts every transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveTransitions;

impl TransitionPolicy for PermissiveTransitions {
    fn allows(&self, _from: OrderStatus, _to: OrderStatus) -> bool {
        true
    }
}
