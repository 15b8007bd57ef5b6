//! Quote engine.
//!
//! Prices a quantity of a registered part type: tier lookup over the part's
//! price ranges, plus the surcharges of the selected variations, scaled by
//! quantity. Pure and stateless; the registry is only ever borrowed immutably.

pub mod engine;
pub mod error;
pub mod quote;
pub mod tier;

pub use engine::compute_quote;
pub use error::QuoteError;
pub use quote::{AppliedVariation, Quote, QuoteRequest};
pub use tier::{TierMatch, resolve_tier};
