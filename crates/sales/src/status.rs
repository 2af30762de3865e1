use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order status lifecycle.
///
/// Normal flow is `NEW → VALIDATED → IN_PROGRESS → PICKED_UP → COMPLETED`.
/// Any non-terminal order may be `CANCELLED`. `COMPLETED` and `CANCELLED` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Validated,
    InProgress,
    PickedUp,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::New,
        OrderStatus::Validated,
        OrderStatus::InProgress,
        OrderStatus::PickedUp,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Validated => "VALIDATED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The single forward step in the normal flow, if any.
    pub fn next_in_flow(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Validated),
            OrderStatus::Validated => Some(OrderStatus::InProgress),
            OrderStatus::InProgress => Some(OrderStatus::PickedUp),
            OrderStatus::PickedUp => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    /// Whether an order in `self` may move to `proposed`.
    ///
    /// Terminal states reject everything (including `CANCELLED → CANCELLED`).
    /// Otherwise cancellation is always allowed, and the only other legal move is
    /// the next step of the normal flow: no skipping, no going back, no self loops.
    pub fn can_transition_to(self, proposed: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if proposed == OrderStatus::Cancelled {
            return true;
        }
        self.next_in_flow() == Some(proposed)
    }

    /// All statuses reachable from `self` in one legal step.
    pub fn allowed_transitions(self) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| self.can_transition_to(*s))
            .collect()
    }
}

/// Free-function form of [`OrderStatus::can_transition_to`].
pub fn can_transition(current: OrderStatus, proposed: OrderStatus) -> bool {
    current.can_transition_to(proposed)
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseOrderStatusError(s.to_string()))
    }
}
