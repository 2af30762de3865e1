use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taproom_core::{BeerId, DomainError, DomainResult, OrderId, Violations};
use taproom_inventory::Beer;

use crate::status::OrderStatus;

/// Order line: which beer, how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub beer_id: BeerId,
    pub quantity: i32,
}

/// Customer order. Status changes go through the status machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Open a new order in `NEW`.
    pub fn new(id: OrderId, lines: Vec<OrderLine>, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut violations = Violations::new();
        if lines.is_empty() {
            violations.push("lines", "Order must contain at least one line");
        }
        for (idx, line) in lines.iter().enumerate() {
            if line.quantity <= 0 {
                violations.push(
                    format!("lines[{idx}].quantity"),
                    "Line quantity must be greater than 0",
                );
            }
        }
        let lines = violations.into_result(lines)?;

        Ok(Self {
            id,
            status: OrderStatus::New,
            lines,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total units of `beer_id` across all lines.
    ///
    /// Fails on `lines` when the total does not fit a stock quantity.
    pub fn quantity_for(&self, beer_id: BeerId) -> DomainResult<i32> {
        self.lines
            .iter()
            .filter(|l| l.beer_id == beer_id)
            .try_fold(0_i32, |total, l| total.checked_add(l.quantity))
            .ok_or_else(|| {
                DomainError::validation(
                    "lines",
                    format!("Total quantity for beer {beer_id} exceeds {}", i32::MAX),
                )
            })
    }

    /// Move to `next` if the status machine allows it.
    pub fn transition_to(&mut self, next: OrderStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::validation(
                "status",
                format!("Invalid order status transition from {} to {}", self.status, next),
            ));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition_to(OrderStatus::Cancelled, now)
    }

    /// Withdraw this order's units of `beer` from stock.
    ///
    /// Only a `VALIDATED` order may allocate. Either the full quantity is taken or
    /// nothing is.
    pub fn allocate(&self, beer: &mut Beer) -> DomainResult<()> {
        if self.status != OrderStatus::Validated {
            return Err(DomainError::validation(
                "status",
                format!("Stock can only be allocated for VALIDATED orders (current: {})", self.status),
            ));
        }
        let requested = self.quantity_for(beer.id)?;
        if requested == 0 {
            return Ok(());
        }
        beer.withdraw(requested)
    }
}
