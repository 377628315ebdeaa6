//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two `Money`
/// amounts of 500 are interchangeable, whereas two products with the same
/// name but different ids are not (those are entities, see [`crate::Entity`]).
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
