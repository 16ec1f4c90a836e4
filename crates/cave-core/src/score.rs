//! Evil scoring
//!
//! Districts are visited like jobs on a single machine: a district's house
//! count is its processing time and its tavern count its weight. Visiting in
//! descending `tavern_count / house_count` order (Smith's rule) minimizes
//! the weighted sum of completion times, which is the evil score.

use std::cmp::Ordering;

use crate::model::District;

/// Order districts by descending tavern density.
///
/// Equal densities fall back to ascending district id, then ascending id of
/// the representative house.
pub fn schedule(districts: &[District]) -> Vec<&District> {
    let mut ordered: Vec<&District> = districts.iter().collect();
    ordered.sort_by(|a, b| compare_priority(a, b));
    ordered
}

/// Minimum evil: `sum(tavern_count(d) * completion(d))` over the schedule,
/// where `completion(d)` is the total house count of `d` and every district
/// visited before it.
///
/// The result does not depend on the order of `districts`.
pub fn score(districts: &[District]) -> u64 {
    let mut duration: u64 = 0;
    let mut evil: u64 = 0;

    for district in schedule(districts) {
        duration += district.house_count() as u64;
        evil += district.tavern_count() as u64 * duration;
    }

    tracing::debug!("Scored {} districts: evil = {}", districts.len(), evil);

    evil
}

fn compare_priority(a: &District, b: &District) -> Ordering {
    b.cmp_weight(a)
        .then_with(|| a.id().cmp(&b.id()))
        .then_with(|| a.representative().id().cmp(&b.representative().id()))
}
