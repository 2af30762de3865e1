//! Sales domain module: customer orders and their status lifecycle.
//!
//! Pure domain logic. Nothing here persists orders; callers consult the status
//! machine before writing a status change.

pub mod order;
pub mod status;

pub use order::{Order, OrderLine};
pub use status::{can_transition, OrderStatus, ParseOrderStatusError};
