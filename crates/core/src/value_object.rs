//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A combination of attribute values is a value object: two combinations that
/// select the same values for the same attributes are the same combination,
/// no matter when or how often they were generated.
///
/// - **Value Object**: no identity, compared by its fields, immutable.
/// - **Entity**: has identity (two entities with the same id are the same entity).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
