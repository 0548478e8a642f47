//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `BloodGroup`
/// has no identity of its own — two `O+` values are the same value — unlike
/// a `BloodRequest`, which keeps its identity across status changes.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
