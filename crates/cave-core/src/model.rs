//! House and district value types.
//!
//! A [`District`] always holds at least one house; its cached house and
//! tavern counts are kept in step with the member list by every method that
//! changes it.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{CaveError, Result};

/// Street identifier, e.g. `MainRoad`.
pub type StreetId = String;

/// All houses of a city, keyed by street and then by index on that street.
///
/// Ordered maps keep every traversal deterministic.
pub type Streets = BTreeMap<StreetId, BTreeMap<usize, House>>;

/// Kind of a house
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseKind {
    Regular,
    Tavern,
}

/// A house on the street grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct House {
    id: usize,
    kind: HouseKind,
    x: i64,
    y: i64,
}

impl House {
    /// Create a regular house
    pub fn new(id: usize, x: i64, y: i64) -> Self {
        Self {
            id,
            kind: HouseKind::Regular,
            x,
            y,
        }
    }

    /// Create a tavern
    pub fn tavern(id: usize, x: i64, y: i64) -> Self {
        Self {
            kind: HouseKind::Tavern,
            ..Self::new(id, x, y)
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> HouseKind {
        self.kind
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    pub fn is_tavern(&self) -> bool {
        self.kind == HouseKind::Tavern
    }

    /// Whether both houses occupy the same grid point
    pub fn same_spot(&self, other: &House) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Euclidean distance between two houses.
    ///
    /// Differences are taken in `i128` so that any pair of `i64` coordinates
    /// is valid.
    pub fn distance(&self, other: &House) -> f64 {
        let dx = (i128::from(self.x) - i128::from(other.x)) as f64;
        let dy = (i128::from(self.y) - i128::from(other.y)) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Upgrade to a tavern. Taverns are never downgraded.
    pub(crate) fn mark_tavern(&mut self) {
        self.kind = HouseKind::Tavern;
    }
}

/// A cluster of houses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct District {
    id: usize,
    house_count: usize,
    tavern_count: usize,
    houses: Vec<House>,
}

impl District {
    /// Create a one-house district
    pub fn singleton(id: usize, house: House) -> Self {
        let tavern_count = usize::from(house.is_tavern());
        Self {
            id,
            house_count: 1,
            tavern_count,
            houses: vec![house],
        }
    }

    /// Create a district from its member houses.
    ///
    /// The first house becomes the representative point. Fails with
    /// [`CaveError::DegenerateDistrict`] if `houses` is empty.
    pub fn from_houses(id: usize, houses: Vec<House>) -> Result<Self> {
        if houses.is_empty() {
            return Err(CaveError::DegenerateDistrict { id });
        }

        let tavern_count = houses.iter().filter(|h| h.is_tavern()).count();
        Ok(Self {
            id,
            house_count: houses.len(),
            tavern_count,
            houses,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn house_count(&self) -> usize {
        self.house_count
    }

    pub fn tavern_count(&self) -> usize {
        self.tavern_count
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    /// The first-inserted house, used as the district's location when
    /// measuring distances. It does not move when other districts are merged in.
    pub fn representative(&self) -> &House {
        &self.houses[0]
    }

    /// Tavern density `tavern_count / house_count`
    pub fn weight(&self) -> f64 {
        self.tavern_count as f64 / self.house_count as f64
    }

    /// Compare tavern density exactly, by cross-multiplying the counts.
    pub fn cmp_weight(&self, other: &District) -> Ordering {
        let lhs = self.tavern_count as u128 * other.house_count as u128;
        let rhs = other.tavern_count as u128 * self.house_count as u128;
        lhs.cmp(&rhs)
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    /// Append all of `other`'s houses after this district's own.
    pub(crate) fn absorb(&mut self, other: District) {
        self.house_count += other.house_count;
        self.tavern_count += other.tavern_count;
        self.houses.extend(other.houses);
    }
}
