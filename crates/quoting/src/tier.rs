//! Tier resolution over a part's price ranges.

use serde::Serialize;

use partquote_core::Money;
use partquote_parts::PartDefinition;

/// Outcome of tier resolution.
///
/// Keeps "a range covered the quantity" apart from "no range did, so the last
/// one applies": a covering tier priced at zero stays a zero-priced match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TierMatch {
    /// First range, in stored order, whose threshold covers the quantity.
    Matched {
        index: usize,
        quantity_threshold: u32,
        unit_price: Money,
    },
    /// The quantity exceeds every threshold; the last range is the uncapped tier.
    Fallback {
        index: usize,
        quantity_threshold: u32,
        unit_price: Money,
    },
}

impl TierMatch {
    pub fn unit_price(&self) -> Money {
        match self {
            TierMatch::Matched { unit_price, .. } | TierMatch::Fallback { unit_price, .. } => {
                *unit_price
            }
        }
    }

    /// Position of the applied range in the part's stored ranges.
    pub fn index(&self) -> usize {
        match self {
            TierMatch::Matched { index, .. } | TierMatch::Fallback { index, .. } => *index,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TierMatch::Fallback { .. })
    }
}

/// Select the price tier for `quantity`.
///
/// Ranges are scanned in stored order (assumed ascending by threshold); the
/// first one with `quantity_threshold >= quantity` wins. When none does, the
/// last range applies.
pub fn resolve_tier(part: &PartDefinition, quantity: u32) -> TierMatch {
    let matched = part
        .ranges()
        .iter()
        .enumerate()
        .find(|(_, range)| range.covers(quantity));

    match matched {
        Some((index, range)) => TierMatch::Matched {
            index,
            quantity_threshold: range.quantity_threshold,
            unit_price: range.unit_price,
        },
        None => {
            let last = part.last_range();
            TierMatch::Fallback {
                index: part.ranges().len() - 1,
                quantity_threshold: last.quantity_threshold,
                unit_price: last.unit_price,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partquote_parts::PriceRange;

    fn price(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn part(ranges: &[(u32, &str)]) -> PartDefinition {
        let ranges = ranges
            .iter()
            .map(|(threshold, unit_price)| PriceRange::new(*threshold, price(unit_price)))
            .collect();
        PartDefinition::new("Gear", ranges, vec![]).unwrap()
    }

    #[test]
    fn quantity_within_first_tier_matches_first_range() {
        let gear = part(&[(10, "5.00"), (50, "4.00")]);
        let tier = resolve_tier(&gear, 5);
        assert_eq!(
            tier,
            TierMatch::Matched {
                index: 0,
                quantity_threshold: 10,
                unit_price: price("5.00"),
            }
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let gear = part(&[(10, "5.00"), (50, "4.00")]);
        assert_eq!(resolve_tier(&gear, 10).index(), 0);
        assert_eq!(resolve_tier(&gear, 11).index(), 1);
        assert_eq!(resolve_tier(&gear, 50).unit_price(), price("4.00"));
    }

    #[test]
    fn quantity_beyond_every_threshold_falls_back_to_last_range() {
        let gear = part(&[(10, "5.00"), (50, "4.00")]);
        let tier = resolve_tier(&gear, 100);
        assert!(tier.is_fallback());
        assert_eq!(tier.index(), 1);
        assert_eq!(tier.unit_price(), price("4.00"));
    }

    #[test]
    fn zero_priced_tier_is_a_match_not_a_fallback() {
        let sample = part(&[(1, "0.00"), (100, "2.00")]);
        let tier = resolve_tier(&sample, 1);
        assert!(!tier.is_fallback());
        assert_eq!(tier.unit_price(), Money::ZERO);
    }

    #[test]
    fn unsorted_ranges_are_scanned_in_stored_order() {
        let gear = part(&[(50, "4.00"), (10, "5.00")]);
        let tier = resolve_tier(&gear, 5);
        assert_eq!(tier.index(), 0);
        assert_eq!(tier.unit_price(), price("4.00"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn ascending_ranges() -> impl Strategy<Value = Vec<PriceRange>> {
            proptest::collection::btree_set(1u32..1_000, 1..8).prop_flat_map(|thresholds| {
                let len = thresholds.len();
                proptest::collection::vec(0u64..100_000, len).prop_map(move |cents| {
                    thresholds
                        .iter()
                        .zip(cents)
                        .map(|(t, c)| PriceRange::new(*t, Money::from_cents(c)))
                        .collect()
                })
            })
        }

        proptest! {
            /// Smallest threshold >= quantity wins; otherwise the last range.
            #[test]
            fn selects_smallest_covering_threshold(
                ranges in ascending_ranges(),
                quantity in 1u32..1_200,
            ) {
                let part = PartDefinition::new("Gear", ranges.clone(), vec![]).unwrap();
                let tier = resolve_tier(&part, quantity);

                match ranges.iter().position(|r| r.quantity_threshold >= quantity) {
                    Some(expected) => {
                        prop_assert!(!tier.is_fallback());
                        prop_assert_eq!(tier.index(), expected);
                        prop_assert_eq!(tier.unit_price(), ranges[expected].unit_price);
                    }
                    None => {
                        prop_assert!(tier.is_fallback());
                        prop_assert_eq!(tier.index(), ranges.len() - 1);
                        prop_assert_eq!(tier.unit_price(), ranges[ranges.len() - 1].unit_price);
                    }
                }
            }
        }
    }
}
