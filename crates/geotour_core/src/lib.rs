//! Tour optimization and clustering over geographic points.
//!
//! Distances are great-circle (haversine) kilometres. Tours are closed: the
//! last point connects back to the first. Randomized routines take an explicit
//! [`rand::Rng`] so callers control seeding.

pub mod algo;
pub mod error;
pub mod geo;
pub mod point;
pub mod solver;
pub mod tour;

pub use algo::{
    construction::{multi_start_nearest_neighbor, nearest_neighbor},
    exhaustive::{ExhaustiveEstimate, ExhaustiveOutcome, exhaustive, factorial, next_permutation},
    kmeans::{Cluster, KmeansOutcome, kmeans},
    strategy::Strategy,
    two_opt::{TwoOptConfig, TwoOptOutcome, two_opt},
};
pub use error::{Error, Result};
pub use geo::{
    centroid::{Centroid, aggregate_by_label, centroid},
    geometry::distance,
};
pub use point::Point;
pub use solver::{Solution, SolveOutcome, SolverOptions, cluster, solve};
pub use tour::{Tour, apply_permutation, nearest, ordered_length, tour_length};
