use serde::Serialize;

use partquote_core::{DomainError, DomainResult, Money, PartId};

use crate::tier::TierMatch;

/// A request to price `quantity` units of a part type with some variations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRequest {
    part_type: String,
    quantity: u32,
    selected_variations: Vec<String>,
}

impl QuoteRequest {
    /// Build a request; repeated variation names are collapsed, keeping the
    /// order in which they were first selected.
    pub fn new<I, S>(part_type: impl Into<String>, quantity: u32, selected: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let part_type = part_type.into();
        if part_type.trim().is_empty() {
            return Err(DomainError::validation("part type cannot be empty"));
        }
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        let mut selected_variations: Vec<String> = Vec::new();
        for name in selected {
            let name = name.into();
            if !selected_variations.contains(&name) {
                selected_variations.push(name);
            }
        }

        Ok(Self {
            part_type,
            quantity,
            selected_variations,
        })
    }

    pub fn part_type(&self) -> &str {
        &self.part_type
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn selected_variations(&self) -> &[String] {
        &self.selected_variations
    }
}

/// A selected variation that the part offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedVariation {
    pub name: String,
    pub surcharge: Money,
}

/// Priced quote with its breakdown.
///
/// All amounts are exact; only [`Quote::display_total`] rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub part_id: PartId,
    pub part_type: String,
    pub quantity: u32,
    pub tier: TierMatch,
    pub base_price: Money,
    pub applied_variations: Vec<AppliedVariation>,
    /// Selected names the part does not offer (priced at zero).
    pub unmatched_variations: Vec<String>,
    pub variation_total: Money,
    /// `base_price + variation_total`.
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub total: Money,
}

impl Quote {
    /// Total rounded to cents.
    pub fn display_total(&self) -> Money {
        self.total.round_to_cents()
    }
}
