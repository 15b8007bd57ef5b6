use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use partquote_core::{DomainError, DomainResult, Money, ValueObject};

/// Price tier: quantities up to and including `quantity_threshold` are priced
/// at `unit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub quantity_threshold: u32,
    pub unit_price: Money,
}

impl PriceRange {
    pub fn new(quantity_threshold: u32, unit_price: Money) -> Self {
        Self {
            quantity_threshold,
            unit_price,
        }
    }

    /// Whether a request for `quantity` units falls inside this tier.
    pub fn covers(&self, quantity: u32) -> bool {
        quantity <= self.quantity_threshold
    }
}

impl ValueObject for PriceRange {}

/// Optional named add-on with a fixed surcharge on the unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub name: String,
    pub surcharge: Money,
}

impl Variation {
    pub fn new(name: impl Into<String>, surcharge: Money) -> Self {
        Self {
            name: name.into(),
            surcharge,
        }
    }
}

impl ValueObject for Variation {}

/// A priced part type: ordered price tiers plus the variations it offers.
///
/// Construction goes through [`PartDefinition::new`], so every instance has a
/// non-blank part type, at least one price range, thresholds of at least 1 and
/// uniquely named variations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartDefinition {
    part_type: String,
    ranges: Vec<PriceRange>,
    variations: Vec<Variation>,
}

impl PartDefinition {
    pub fn new(
        part_type: impl Into<String>,
        ranges: Vec<PriceRange>,
        variations: Vec<Variation>,
    ) -> DomainResult<Self> {
        let part_type = part_type.into();

        if part_type.trim().is_empty() {
            return Err(DomainError::validation("part type cannot be empty"));
        }

        if ranges.is_empty() {
            return Err(DomainError::validation(
                "part definition needs at least one price range",
            ));
        }

        if let Some(range) = ranges.iter().find(|r| r.quantity_threshold == 0) {
            return Err(DomainError::validation(format!(
                "price range threshold must be at least 1 (got {})",
                range.quantity_threshold
            )));
        }

        let mut seen = HashSet::new();
        for variation in &variations {
            if variation.name.trim().is_empty() {
                return Err(DomainError::validation("variation name cannot be empty"));
            }
            if !seen.insert(variation.name.as_str()) {
                return Err(DomainError::invariant(format!(
                    "duplicate variation name: {}",
                    variation.name
                )));
            }
        }

        Ok(Self {
            part_type,
            ranges,
            variations,
        })
    }

    pub fn part_type(&self) -> &str {
        &self.part_type
    }

    /// Price ranges in stored order.
    pub fn ranges(&self) -> &[PriceRange] {
        &self.ranges
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// The last stored range, used as the uncapped tier.
    pub fn last_range(&self) -> &PriceRange {
        // Non-empty by construction.
        &self.ranges[self.ranges.len() - 1]
    }

    /// Variation with exactly this name, if offered.
    pub fn variation(&self, name: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.name == name)
    }

    /// Whether thresholds are non-decreasing in stored order.
    ///
    /// Tier resolution scans in stored order, so an unsorted definition can
    /// price a quantity at a tier that is not the tightest one.
    pub fn ranges_ascending(&self) -> bool {
        self.ranges
            .windows(2)
            .all(|pair| pair[0].quantity_threshold <= pair[1].quantity_threshold)
    }
}
