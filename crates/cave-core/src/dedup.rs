//! Removal of houses that share a grid point across different streets
//!
//! Where two streets cross, the same point is generated once per street.
//! Exactly one of the two houses survives:
//! - a tavern always beats a regular house;
//! - otherwise (both regular, or both taverns) the house of the second street
//!   of the pair is removed.
//!
//! Street pairs are visited in ascending id order, the lower id being the
//! first street. Houses on the same street are never compared.

use std::collections::BTreeSet;

use crate::model::{StreetId, Streets};

/// Remove cross-street duplicates.
///
/// Returns the remaining streets and the corrected total house count.
pub fn deduplicate(mut streets: Streets) -> (Streets, usize) {
    let total: usize = streets.values().map(|houses| houses.len()).sum();
    let ids: Vec<StreetId> = streets.keys().cloned().collect();

    let mut removed = 0;
    for (i, first) in ids.iter().enumerate() {
        for second in &ids[i + 1..] {
            removed += resolve_pair(&mut streets, first, second);
        }
    }

    tracing::debug!(
        "Deduplicated {} streets: removed {} of {} houses",
        ids.len(),
        removed,
        total
    );

    (streets, total - removed)
}

/// Resolve every collision between two streets, returning the number of
/// houses removed.
fn resolve_pair(streets: &mut Streets, first: &str, second: &str) -> usize {
    let (Some(first_houses), Some(second_houses)) = (streets.get(first), streets.get(second))
    else {
        return 0;
    };

    let mut drop_first = BTreeSet::new();
    let mut drop_second = BTreeSet::new();

    for (&key_a, house_a) in first_houses {
        for (&key_b, house_b) in second_houses {
            if drop_second.contains(&key_b) || !house_a.same_spot(house_b) {
                continue;
            }

            tracing::trace!(
                "Collision at ({}, {}) between {}[{}] and {}[{}]",
                house_a.x(),
                house_a.y(),
                first,
                key_a,
                second,
                key_b
            );

            if house_b.is_tavern() && !house_a.is_tavern() {
                // house_a is gone, nothing left to compare it with
                drop_first.insert(key_a);
                break;
            }
            drop_second.insert(key_b);
        }
    }

    if let Some(houses) = streets.get_mut(first) {
        houses.retain(|key, _| !drop_first.contains(key));
    }
    if let Some(houses) = streets.get_mut(second) {
        houses.retain(|key, _| !drop_second.contains(key));
    }

    drop_first.len() + drop_second.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::House;
    use std::collections::BTreeMap;

    fn street(houses: &[House]) -> BTreeMap<usize, House> {
        houses.iter().cloned().enumerate().collect()
    }

    #[test]
    fn test_tavern_survives_collision() {
        let mut streets = Streets::new();
        streets.insert(
            "AlphaRoad".into(),
            street(&[House::new(0, 0, 0), House::new(1, 0, 1)]),
        );
        streets.insert(
            "BetaAvenue".into(),
            street(&[House::new(2, -1, 1), House::tavern(3, 0, 1)]),
        );

        let (streets, count) = deduplicate(streets);

        assert_eq!(count, 3);
        assert_eq!(streets["AlphaRoad"].len(), 1);
        assert!(streets["AlphaRoad"].contains_key(&0));
        assert_eq!(streets["BetaAvenue"].len(), 2);
        assert!(streets["BetaAvenue"][&1].is_tavern());
    }

    #[test]
    fn test_tavern_in_first_street_survives() {
        let mut streets = Streets::new();
        streets.insert("AlphaRoad".into(), street(&[House::tavern(0, 4, 4)]));
        streets.insert("BetaAvenue".into(), street(&[House::new(1, 4, 4)]));

        let (streets, count) = deduplicate(streets);

        assert_eq!(count, 1);
        assert_eq!(streets["AlphaRoad"].len(), 1);
        assert!(streets["BetaAvenue"].is_empty());
    }

    #[test]
    fn test_same_kind_removes_second_street_house() {
        let mut streets = Streets::new();
        streets.insert("AlphaRoad".into(), street(&[House::new(0, 2, 2)]));
        streets.insert("BetaAvenue".into(), street(&[House::new(1, 2, 2)]));
        streets.insert("GammaRoad".into(), street(&[House::tavern(2, 5, 5)]));
        streets.insert("ZetaAvenue".into(), street(&[House::tavern(3, 5, 5)]));

        let (streets, count) = deduplicate(streets);

        assert_eq!(count, 2);
        assert_eq!(streets["AlphaRoad"][&0].id(), 0);
        assert!(streets["BetaAvenue"].is_empty());
        assert_eq!(streets["GammaRoad"][&0].id(), 2);
        assert!(streets["ZetaAvenue"].is_empty());
    }

    #[test]
    fn test_three_way_crossing_keeps_one() {
        let mut streets = Streets::new();
        streets.insert("A".into(), street(&[House::new(0, 1, 1)]));
        streets.insert("B".into(), street(&[House::new(1, 1, 1)]));
        streets.insert("C".into(), street(&[House::new(2, 1, 1)]));

        let (streets, count) = deduplicate(streets);

        assert_eq!(count, 1);
        let survivors: Vec<usize> = streets
            .values()
            .flat_map(|houses| houses.values().map(House::id))
            .collect();
        assert_eq!(survivors, vec![0]);
    }

    #[test]
    fn test_same_street_duplicates_untouched() {
        let mut streets = Streets::new();
        streets.insert(
            "FlatRoad".into(),
            street(&[House::new(0, 3, 3), House::new(1, 3, 3)]),
        );

        let (streets, count) = deduplicate(streets);

        assert_eq!(count, 2);
        assert_eq!(streets["FlatRoad"].len(), 2);
    }

    #[test]
    fn test_no_collisions() {
        let mut streets = Streets::new();
        streets.insert("A".into(), street(&[House::new(0, 0, 0)]));
        streets.insert("B".into(), street(&[House::new(1, 9, 9)]));

        let (_, count) = deduplicate(streets);
        assert_eq!(count, 2);
    }
}
