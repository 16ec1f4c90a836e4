//! cave-core: Core library for the cave district planner
//!
//! This crate provides:
//! - City description parsing
//! - Cross-street duplicate removal
//! - Agglomerative nearest-pair clustering into a fixed number of districts
//! - Minimum evil scoring (weighted completion time over districts)
//! - PNG plotting of streets, taverns and district bounds

pub mod cluster;
pub mod dedup;
pub mod districts;
pub mod error;
pub mod matrix;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod score;

// Re-exports
pub use cluster::cluster;
pub use dedup::deduplicate;
pub use districts::{form_districts, singletons};
pub use error::{CaveError, Result};
pub use matrix::{DistanceMatrix, Neighbor, SENTINEL};
pub use model::{District, House, HouseKind, StreetId, Streets};
pub use parse::{parse_city, City, StreetKind};
pub use pipeline::{solve, Outcome};
pub use render::{Bounds, Canvas};
pub use score::{schedule, score};
