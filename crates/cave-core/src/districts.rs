//! Turning deduplicated houses into districts

use crate::cluster::cluster;
use crate::error::Result;
use crate::model::{District, Streets};

/// One district per house, ordered by house id.
///
/// `house_count` is the corrected count returned by
/// [`deduplicate`](crate::dedup::deduplicate); a mismatch with the houses
/// actually present is logged.
pub fn singletons(streets: &Streets, house_count: usize) -> Vec<District> {
    let mut districts: Vec<District> = Vec::with_capacity(house_count);

    for houses in streets.values() {
        for house in houses.values() {
            districts.push(District::singleton(0, house.clone()));
        }
    }

    districts.sort_by_key(|district| district.representative().id());

    if districts.len() != house_count {
        tracing::warn!(
            "House count mismatch: expected {}, found {}",
            house_count,
            districts.len()
        );
    }

    districts
}

/// Build singleton districts and cluster them down to `target` districts.
pub fn form_districts(
    streets: &Streets,
    house_count: usize,
    target: usize,
) -> Result<Vec<District>> {
    cluster(singletons(streets, house_count), target)
}
