//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A `Upc`
/// or a `Price` is a value object; a `Beer` (identified by `BeerId`) is not.
///
/// To "modify" a value object, construct a new one. Constructors are the place
/// to enforce the value's invariants, so an instance in hand is always valid.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
