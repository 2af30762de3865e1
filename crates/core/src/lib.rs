//! `taproom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod audit;
pub mod error;
pub mod id;
pub mod validation;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use audit::AuditContext;
pub use error::{DomainError, DomainResult};
pub use id::{BeerId, OrderId};
pub use validation::{FieldError, Violations};
pub use value_object::ValueObject;
