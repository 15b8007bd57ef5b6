//! Entity trait: identity that survives edits.

/// Something with a stable identity, compared by id rather than by value.
///
/// A registered part keeps its id when its definition is replaced, so two
/// snapshots of the same entry are "the same part" even if every field changed.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
