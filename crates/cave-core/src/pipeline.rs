//! End-to-end minimum evil computation for a parsed city

use serde::Serialize;

use crate::dedup::deduplicate;
use crate::districts::form_districts;
use crate::error::Result;
use crate::model::District;
use crate::parse::City;
use crate::score::score;

/// Result of planning a city
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Final districts, in ascending id order
    pub districts: Vec<District>,
    /// Minimum evil over the final districts
    pub evil: u64,
    /// Houses left after deduplication
    pub house_count: usize,
    /// Houses removed as cross-street duplicates
    pub removed_duplicates: usize,
}

/// Deduplicate, cluster into `city.target_districts` districts and score.
pub fn solve(city: &City) -> Result<Outcome> {
    let (streets, house_count) = deduplicate(city.streets.clone());
    let districts = form_districts(&streets, house_count, city.target_districts)?;
    let evil = score(&districts);

    Ok(Outcome {
        districts,
        evil,
        house_count,
        removed_duplicates: city.house_count.saturating_sub(house_count),
    })
}
