//! Agglomerative nearest-pair clustering
//!
//! Starting from one district per house, repeatedly merges the globally
//! closest pair of districts until the requested number remains. Distances
//! between districts are single-linkage over each district's representative
//! point (its first house). Representatives never move, so the merge order is
//! fully determined by the initial points and the tie-breaking rules of
//! [`DistanceMatrix`].

use crate::error::{CaveError, Result};
use crate::matrix::DistanceMatrix;
use crate::model::{District, House};

/// Merge `districts` down to exactly `target` districts.
///
/// District ids are reset to their position in the input; a merged district
/// keeps the id of the slot that absorbed the other. The survivors are
/// returned in ascending id order. With `target == districts.len()` the input
/// is returned untouched.
///
/// # Errors
///
/// [`CaveError::InvalidTargetCount`] if `target` is outside
/// `1..=districts.len()`.
pub fn cluster(districts: Vec<District>, target: usize) -> Result<Vec<District>> {
    let available = districts.len();
    if target < 1 || target > available {
        return Err(CaveError::InvalidTargetCount {
            requested: target,
            available,
        });
    }

    if target == available {
        return Ok(districts);
    }

    let mut slots: Vec<Option<District>> = districts
        .into_iter()
        .enumerate()
        .map(|(id, mut district)| {
            district.set_id(id);
            Some(district)
        })
        .collect();

    let mut matrix = {
        let points: Vec<&House> = slots
            .iter()
            .flatten()
            .map(District::representative)
            .collect();
        DistanceMatrix::new(&points)
    };

    while matrix.active_count() > target {
        let Some((a, neighbor)) = matrix.closest_pair() else {
            break;
        };
        let b = neighbor.index;

        matrix.merge(a, b);

        if fold_slots(&mut slots, a, b) {
            tracing::trace!(
                "Merged district {} into {} at distance {:.3}",
                b,
                a,
                neighbor.distance
            );
        } else {
            tracing::warn!(
                "Matrix merged {} into {} but one of the slots is already empty",
                b,
                a
            );
        }
    }

    let clustered: Vec<District> = slots.into_iter().flatten().collect();

    tracing::debug!(
        "Clustered {} districts into {}",
        available,
        clustered.len()
    );

    Ok(clustered)
}

/// Move the district in slot `b` into slot `a`.
///
/// Returns false and leaves both slots untouched if either is empty.
fn fold_slots(slots: &mut [Option<District>], a: usize, b: usize) -> bool {
    if slots[a].is_none() {
        return false;
    }
    let Some(absorbed) = slots[b].take() else {
        return false;
    };
    if let Some(survivor) = slots[a].as_mut() {
        survivor.absorb(absorbed);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singletons(points: &[(i64, i64, bool)]) -> Vec<District> {
        points
            .iter()
            .enumerate()
            .map(|(id, &(x, y, tavern))| {
                let house = if tavern {
                    House::tavern(id, x, y)
                } else {
                    House::new(id, x, y)
                };
                District::singleton(id, house)
            })
            .collect()
    }

    fn house_ids(district: &District) -> Vec<usize> {
        district.houses().iter().map(House::id).collect()
    }

    #[test]
    fn test_merges_nearest_pair_first() {
        let districts = singletons(&[(0, 0, true), (1, 0, false), (10, 10, false)]);

        let result = cluster(districts, 2).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(house_ids(&result[0]), vec![0, 1]);
        assert_eq!(result[0].tavern_count(), 1);
        assert_eq!(result[0].house_count(), 2);
        assert_eq!(house_ids(&result[1]), vec![2]);
        assert_eq!(result[1].tavern_count(), 0);
        assert_eq!(result[1].house_count(), 1);
    }

    #[test]
    fn test_target_one_merges_everything() {
        let districts = singletons(&[
            (0, 0, true),
            (4, 0, false),
            (0, 7, true),
            (9, 9, false),
            (2, 2, false),
        ]);

        let result = cluster(districts, 1).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].house_count(), 5);
        assert_eq!(result[0].tavern_count(), 2);
        assert_eq!(result[0].id(), 0);
        assert_eq!(result[0].representative().id(), 0);
    }

    #[test]
    fn test_target_equal_to_len_is_noop() {
        let districts = singletons(&[(0, 0, false), (1, 1, true), (2, 2, false)]);
        let expected = districts.clone();

        let result = cluster(districts, 3).unwrap();

        assert_eq!(result, expected);
    }

    #[test]
    fn test_invalid_targets() {
        let districts = singletons(&[(0, 0, false), (1, 1, false)]);

        let err = cluster(districts.clone(), 0).unwrap_err();
        assert!(matches!(
            err,
            CaveError::InvalidTargetCount {
                requested: 0,
                available: 2
            }
        ));

        let err = cluster(districts, 3).unwrap_err();
        assert!(matches!(
            err,
            CaveError::InvalidTargetCount {
                requested: 3,
                available: 2
            }
        ));

        assert!(cluster(Vec::new(), 1).is_err());
    }

    #[test]
    fn test_single_linkage_chain() {
        // 0-1-2 spaced 2 apart form a chain before the far pair 3-4 merges;
        // with single linkage the chain absorbs 2 via 1.
        let districts = singletons(&[
            (0, 0, false),
            (2, 0, false),
            (4, 0, false),
            (50, 0, false),
            (53, 0, false),
        ]);

        let result = cluster(districts, 2).unwrap();

        assert_eq!(house_ids(&result[0]), vec![0, 1, 2]);
        assert_eq!(house_ids(&result[1]), vec![3, 4]);
        assert_eq!(result[1].id(), 3);
    }

    #[test]
    fn test_single_linkage_reaches_through_members() {
        // {0, 1} reaches house 2 through house 1 (distance 2) before house 3
        // reaches anything (distance 3).
        let districts = singletons(&[(0, 0, false), (1, 0, false), (3, 0, false), (6, 0, false)]);

        let result = cluster(districts, 2).unwrap();

        assert_eq!(house_ids(&result[0]), vec![0, 1, 2]);
        assert_eq!(house_ids(&result[1]), vec![3]);
    }

    #[test]
    fn test_multi_house_district_measured_from_first_house() {
        // District 0 has a member at (100, 0) right next to district 1, but
        // only its first house (0, 0) counts.
        let districts = vec![
            District::from_houses(0, vec![House::new(0, 0, 0), House::new(1, 100, 0)]).unwrap(),
            District::singleton(1, House::new(2, 101, 0)),
            District::singleton(2, House::new(3, 50, 0)),
        ];

        let result = cluster(districts, 2).unwrap();

        assert_eq!(house_ids(&result[0]), vec![0, 1, 3]);
        assert_eq!(house_ids(&result[1]), vec![2]);
    }

    #[test]
    fn test_ids_follow_input_positions() {
        let mut districts = singletons(&[(0, 0, false), (100, 0, false), (101, 0, false)]);
        for district in &mut districts {
            district.set_id(42);
        }

        let result = cluster(districts, 2).unwrap();

        let ids: Vec<usize> = result.iter().map(District::id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(house_ids(&result[1]), vec![1, 2]);
    }

    #[test]
    fn test_fold_slots() {
        let mut slots: Vec<Option<District>> = singletons(&[(0, 0, false), (1, 0, true)])
            .into_iter()
            .map(Some)
            .collect();

        assert!(fold_slots(&mut slots, 0, 1));
        assert!(slots[1].is_none());
        let survivor = slots[0].as_ref().unwrap();
        assert_eq!(house_ids(survivor), vec![0, 1]);
        assert_eq!(survivor.tavern_count(), 1);
    }

    #[test]
    fn test_fold_slots_with_empty_slot() {
        let mut districts = singletons(&[(0, 0, false), (1, 0, false)]).into_iter();
        let first = districts.next();
        let second = districts.next();

        let mut slots = vec![first.clone(), None];
        assert!(!fold_slots(&mut slots, 0, 1));
        assert_eq!(slots, vec![first, None]);

        let mut slots = vec![None, second.clone()];
        assert!(!fold_slots(&mut slots, 0, 1));
        assert_eq!(slots, vec![None, second]);
    }

    #[test]
    fn test_extreme_coordinates() {
        let districts = singletons(&[(i64::MIN, 0, false), (i64::MAX, 0, true), (0, 0, false)]);
        let result = cluster(districts, 1).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].house_count(), 3);
        assert_eq!(result[0].tavern_count(), 1);

        let districts = singletons(&[
            (i64::MIN, 0, false),
            (i64::MIN + 5, 0, false),
            (i64::MAX, i64::MAX, false),
        ]);
        let result = cluster(districts, 2).unwrap();
        assert_eq!(house_ids(&result[0]), vec![0, 1]);
        assert_eq!(house_ids(&result[1]), vec![2]);
    }
}
