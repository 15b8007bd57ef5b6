use partquote_core::Money;
use partquote_parts::PartRegistry;

use crate::error::QuoteError;
use crate::quote::{AppliedVariation, Quote, QuoteRequest};
use crate::tier::resolve_tier;

/// Price a request against the registry.
///
/// `total = (tier unit price + sum of selected surcharges) * quantity`. Each
/// selected variation contributes its surcharge once to the unit price;
/// names the part does not offer contribute nothing. Fails only when no part
/// of the requested type is registered.
pub fn compute_quote(registry: &PartRegistry, request: &QuoteRequest) -> Result<Quote, QuoteError> {
    let registered = registry
        .find_by_type(request.part_type())
        .ok_or_else(|| QuoteError::part_not_found(request.part_type()))?;
    let part = registered.definition();

    let tier = resolve_tier(part, request.quantity());
    let base_price = tier.unit_price();
    tracing::debug!(
        part_type = part.part_type(),
        quantity = request.quantity(),
        tier_index = tier.index(),
        fallback = tier.is_fallback(),
        base_price = %base_price,
        "price tier resolved"
    );

    let mut applied_variations = Vec::new();
    let mut unmatched_variations = Vec::new();
    let mut variation_total = Money::ZERO;
    for name in request.selected_variations() {
        match part.variation(name) {
            Some(variation) => {
                variation_total = variation_total
                    .checked_add(variation.surcharge)
                    .ok_or(QuoteError::AmountOverflow)?;
                applied_variations.push(AppliedVariation {
                    name: variation.name.clone(),
                    surcharge: variation.surcharge,
                });
            }
            None => {
                tracing::debug!(
                    variation = %name,
                    "selected variation not offered; priced at zero"
                );
                unmatched_variations.push(name.clone());
            }
        }
    }

    let unit_price = base_price
        .checked_add(variation_total)
        .ok_or(QuoteError::AmountOverflow)?;
    let total = unit_price
        .checked_mul(u64::from(request.quantity()))
        .ok_or(QuoteError::AmountOverflow)?;

    Ok(Quote {
        part_id: registered.id_typed(),
        part_type: part.part_type().to_string(),
        quantity: request.quantity(),
        tier,
        base_price,
        applied_variations,
        unmatched_variations,
        variation_total,
        unit_price,
        total,
    })
}
