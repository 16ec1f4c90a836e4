//! Pairwise distance matrix with a per-row nearest-neighbor cache
//!
//! The matrix is built once over the representative points of the singleton
//! districts and then shrunk logically, never structurally: a merged-away
//! slot is flagged inactive and its row and column are overwritten with
//! [`SENTINEL`]. The cache always agrees with the matrix after [`merge`].
//!
//! Tie-breaking everywhere is "first index in ascending scan wins".
//!
//! [`merge`]: DistanceMatrix::merge

use rayon::prelude::*;

use crate::model::House;

/// Distance stored for self entries and removed rows/columns
pub const SENTINEL: f64 = 1e9;

/// Below this many points the matrix is filled on the calling thread
const PARALLEL_THRESHOLD: usize = 256;

/// Cached nearest neighbor of a row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// Symmetric distance matrix plus nearest-neighbor cache and active mask.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    size: usize,
    /// Row-major `size * size` entries
    distances: Vec<f64>,
    nearest: Vec<Option<Neighbor>>,
    active: Vec<bool>,
    active_count: usize,
}

impl DistanceMatrix {
    /// Build the matrix over the given points (one per district).
    pub fn new(points: &[&House]) -> Self {
        let size = points.len();
        let mut distances = vec![SENTINEL; size * size];

        if size > 0 {
            let fill_row = |(i, row): (usize, &mut [f64])| {
                for (j, cell) in row.iter_mut().enumerate() {
                    if i != j {
                        *cell = points[i].distance(points[j]);
                    }
                }
            };

            if size >= PARALLEL_THRESHOLD {
                distances.par_chunks_mut(size).enumerate().for_each(fill_row);
            } else {
                distances.chunks_mut(size).enumerate().for_each(fill_row);
            }
        }

        let mut matrix = Self {
            size,
            distances,
            nearest: vec![None; size],
            active: vec![true; size],
            active_count: size,
        };

        let nearest: Vec<Option<Neighbor>> = if size >= PARALLEL_THRESHOLD {
            (0..size)
                .into_par_iter()
                .map(|row| matrix.scan_row(row))
                .collect()
        } else {
            (0..size).map(|row| matrix.scan_row(row)).collect()
        };
        matrix.nearest = nearest;

        matrix
    }

    /// Number of slots, including inactive ones
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots not yet merged away
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active[index]
    }

    /// Current distance between two slots
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.size + j]
    }

    /// Cached nearest active neighbor of a slot
    pub fn nearest(&self, index: usize) -> Option<Neighbor> {
        self.nearest[index]
    }

    /// The slot with the globally smallest cached distance, and its cached
    /// neighbor. Returns `None` when fewer than two slots are active.
    pub fn closest_pair(&self) -> Option<(usize, Neighbor)> {
        let mut best: Option<(usize, Neighbor)> = None;

        for (row, cached) in self.nearest.iter().enumerate() {
            if !self.active[row] {
                continue;
            }
            if let Some(neighbor) = cached {
                if best.map_or(true, |(_, b)| neighbor.distance < b.distance) {
                    best = Some((row, *neighbor));
                }
            }
        }

        best
    }

    /// Fold slot `b` into slot `a` with single linkage.
    ///
    /// Row `a` becomes the element-wise minimum of rows `a` and `b`, slot `b`
    /// is deactivated, row `a`'s cache is rescanned and every cache entry
    /// that pointed at `b` now points at `a`. The distance of a repointed
    /// entry is unchanged: `b` was that row's minimum, so
    /// `min(d(i, a), d(i, b)) == d(i, b)`.
    pub fn merge(&mut self, a: usize, b: usize) {
        debug_assert!(a != b, "cannot merge slot {a} with itself");
        debug_assert!(self.active[a] && self.active[b]);

        for i in 0..self.size {
            if i == a || i == b || !self.active[i] {
                continue;
            }
            let linked = self.distance(a, i).min(self.distance(b, i));
            self.set(a, i, linked);
        }

        for i in 0..self.size {
            self.set(b, i, SENTINEL);
        }
        self.active[b] = false;
        self.active_count -= 1;

        self.nearest[b] = None;
        self.nearest[a] = self.scan_row(a);

        for neighbor in self.nearest.iter_mut().flatten() {
            if neighbor.index == b {
                neighbor.index = a;
            }
        }
    }

    /// Write a symmetric entry
    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.distances[i * self.size + j] = value;
        self.distances[j * self.size + i] = value;
    }

    fn scan_row(&self, row: usize) -> Option<Neighbor> {
        let mut best: Option<Neighbor> = None;

        for column in 0..self.size {
            if column == row || !self.active[column] {
                continue;
            }
            let distance = self.distance(row, column);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Neighbor {
                    index: column,
                    distance,
                });
            }
        }

        best
    }
}
