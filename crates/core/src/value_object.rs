//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two price ranges with the same threshold
/// and unit price are interchangeable, and so are two equal amounts of `Money`.
/// Contrast with [`Entity`](crate::Entity), where a registered part keeps its
/// identity across edits.
///
/// Value objects are immutable; to "change" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct PriceRange {
///     quantity_threshold: u32,
///     unit_price: Money,
/// }
///
/// impl ValueObject for PriceRange {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
