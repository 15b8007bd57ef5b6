//! Parts domain module.
//!
//! Part definitions (tiered price ranges plus optional variations) and the
//! in-memory registry they are registered into. Pure domain logic: no IO, no
//! forms, no persistence.

pub mod part;
pub mod registry;

pub use part::{PartDefinition, PriceRange, Variation};
pub use registry::{PartRegistry, RegisteredPart};
