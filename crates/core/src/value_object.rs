//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two instances
/// with the same attribute values are the same value. Entities, by contrast,
/// are identified by their id regardless of attribute values.
///
/// `LineItem` is a value object; `Order` is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
