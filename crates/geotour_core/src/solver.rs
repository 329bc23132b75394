use std::time::{Duration, Instant};

use rand::Rng;

use crate::{
    Result,
    algo::{
        construction::{multi_start_nearest_neighbor, nearest_neighbor},
        exhaustive::{ExhaustiveEstimate, ExhaustiveOutcome, exhaustive},
        kmeans::{KmeansOutcome, kmeans},
        strategy::Strategy,
        two_opt::{DEFAULT_DECAY_RATE, two_opt},
    },
    error::{ensure_index, ensure_non_empty},
    point::Point,
    tour::{Tour, nearest},
};

#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    pub strategy: Strategy,
    /// Annealing temperature decay for the 2-opt family.
    pub decay_rate: f64,
    /// Input index of the point the returned tour starts at.
    pub start_index: usize,
    /// When set, overrides `start_index` with the point nearest to it.
    pub anchor: Option<Point>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            decay_rate: DEFAULT_DECAY_RATE,
            start_index: 0,
            anchor: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub tour: Tour,
    pub length: f64,
    /// Strategy that actually ran.
    pub strategy: Strategy,
    /// False when a 2-opt pass limit cut the search short.
    pub converged: bool,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub enum SolveOutcome {
    Solved(Solution),
    Aborted(ExhaustiveEstimate),
}

/// Orders `points` into a short closed tour.
///
/// The strategy is resolved against the point count, run, and the result is
/// rotated so that the start point comes first. `confirm` is only consulted
/// by an exhaustive search over a large input.
pub fn solve<R, F>(
    points: &[Point],
    options: &SolverOptions,
    rng: &mut R,
    confirm: F,
) -> Result<SolveOutcome>
where
    R: Rng + ?Sized,
    F: FnOnce(&ExhaustiveEstimate) -> bool,
{
    ensure_non_empty(points)?;
    let start = start_index(points, options)?;
    let strategy = options.strategy.resolve(points.len());

    log::info!(
        "solve: start n={} strategy={strategy} start_index={start} initial_km={:.4}",
        points.len(),
        crate::tour::tour_length(points)
    );

    let started = Instant::now();
    let mut converged = true;
    let mut tour = match strategy {
        Strategy::Exhaustive => match exhaustive(points, confirm)? {
            ExhaustiveOutcome::Solved(tour) => tour,
            ExhaustiveOutcome::Aborted(estimate) => return Ok(SolveOutcome::Aborted(estimate)),
        },
        Strategy::TwoOpt | Strategy::RestrictedTwoOpt | Strategy::SinglePassTwoOpt => {
            let config = strategy
                .two_opt_config(options.decay_rate)
                .unwrap_or_default();
            log::info!("solve: using {}", config.describe());
            let seed = if strategy.seeds_with_nearest_neighbor() {
                nearest_neighbor(points, start)?
            } else {
                Tour::from_slice(points)
            };
            let outcome = two_opt(seed, &config, rng)?;
            converged = outcome.converged;
            outcome.tour
        }
        Strategy::MultiStartNearestNeighbor => multi_start_nearest_neighbor(points)?,
        Strategy::NearestNeighbor => nearest_neighbor(points, start)?,
        Strategy::Identity | Strategy::Auto => Tour::from_slice(points),
    };
    let elapsed = started.elapsed();

    if let Some(offset) = tour.position(&points[start]) {
        tour.rotate_in_place(offset);
    }
    let length = tour.length();

    log::info!(
        "solve: complete strategy={strategy} length_km={length:.4} elapsed_ms={}",
        elapsed.as_millis()
    );

    Ok(SolveOutcome::Solved(Solution {
        tour,
        length,
        strategy,
        converged,
        elapsed,
    }))
}

fn start_index(points: &[Point], options: &SolverOptions) -> Result<usize> {
    if let Some(anchor) = &options.anchor
        && let Some((idx, near)) = nearest(points, anchor, true)
    {
        log::info!(
            "solve.anchor: anchor={anchor} node={} point={near}",
            idx + 1
        );
        return Ok(idx);
    }
    ensure_index(options.start_index, points.len())?;
    Ok(options.start_index)
}

/// Splits `points` into `k` spatial clusters.
pub fn cluster<R: Rng + ?Sized>(points: &[Point], k: usize, rng: &mut R) -> Result<KmeansOutcome> {
    kmeans(points, k, rng)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{SolveOutcome, SolverOptions, cluster, solve};
    use crate::{Error, algo::strategy::Strategy, point::Point, tour::tour_length};

    fn square_crossed() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0, "a"),
            Point::new(1.0, 1.0, "c"),
            Point::new(0.0, 1.0, "b"),
            Point::new(1.0, 0.0, "d"),
        ]
    }

    fn ring(n: usize) -> Vec<Point> {
        // scrambled visiting order around a circle
        (0..n)
            .map(|i| {
                let k = (i * 7) % n;
                let theta = k as f64 / n as f64 * std::f64::consts::TAU;
                Point::new(10.0 + theta.sin(), 20.0 + theta.cos(), format!("p{k}"))
            })
            .collect()
    }

    fn solved(outcome: SolveOutcome) -> super::Solution {
        match outcome {
            SolveOutcome::Solved(solution) => solution,
            SolveOutcome::Aborted(estimate) => panic!("unexpected abort: {estimate}"),
        }
    }

    #[test]
    fn auto_uses_exhaustive_for_small_inputs() {
        let points = square_crossed();
        let mut rng = StdRng::seed_from_u64(1);
        let solution = solved(
            solve(&points, &SolverOptions::default(), &mut rng, |_| true).expect("valid input"),
        );
        assert_eq!(solution.strategy, Strategy::Exhaustive);
        assert!(solution.converged);
        assert!(solution.tour.is_permutation_of(&points));
        assert!(solution.length < tour_length(&points));
        assert_eq!(solution.tour.points[0], points[0]);
    }

    #[test]
    fn every_strategy_returns_a_rotated_permutation() {
        let points = ring(16);
        for strategy in Strategy::ALL {
            let options = SolverOptions {
                strategy,
                start_index: 5,
                ..SolverOptions::default()
            };
            let mut rng = StdRng::seed_from_u64(3);
            let outcome = solve(&points, &options, &mut rng, |_| false).expect("valid input");
            if strategy == Strategy::Exhaustive {
                assert!(matches!(outcome, SolveOutcome::Aborted(_)));
                continue;
            }
            let solution = solved(outcome);
            assert!(solution.tour.is_permutation_of(&points), "{strategy}");
            assert_eq!(solution.tour.points[0], points[5], "{strategy}");
            assert!((solution.length - solution.tour.length()).abs() < 1e-9);
        }
    }

    #[test]
    fn optimizing_strategies_shorten_a_scrambled_ring() {
        let points = ring(16);
        let initial = tour_length(&points);
        for strategy in [
            Strategy::TwoOpt,
            Strategy::RestrictedTwoOpt,
            Strategy::SinglePassTwoOpt,
            Strategy::NearestNeighbor,
            Strategy::MultiStartNearestNeighbor,
        ] {
            let options = SolverOptions {
                strategy,
                ..SolverOptions::default()
            };
            let mut rng = StdRng::seed_from_u64(9);
            let solution =
                solved(solve(&points, &options, &mut rng, |_| true).expect("valid input"));
            assert!(solution.length < initial, "{strategy}");
        }
    }

    #[test]
    fn anchor_overrides_start_index() {
        let points = square_crossed();
        let options = SolverOptions {
            strategy: Strategy::NearestNeighbor,
            start_index: 0,
            anchor: Some(Point::at(0.9, 0.1)),
            ..SolverOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let solution = solved(solve(&points, &options, &mut rng, |_| true).expect("valid input"));
        assert_eq!(solution.tour.points[0].label, "d");
    }

    #[test]
    fn small_inputs_are_left_alone() {
        let points = vec![Point::at(1.0, 1.0), Point::at(2.0, 2.0), Point::at(3.0, 1.0)];
        let options = SolverOptions {
            strategy: Strategy::TwoOpt,
            ..SolverOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let solution = solved(solve(&points, &options, &mut rng, |_| true).expect("valid input"));
        assert_eq!(solution.strategy, Strategy::Identity);
        assert_eq!(solution.tour.points, points);
    }

    #[test]
    fn rejects_invalid_requests() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            solve(&[], &SolverOptions::default(), &mut rng, |_| true),
            Err(Error::EmptyPointSet)
        ));
        let options = SolverOptions {
            start_index: 4,
            ..SolverOptions::default()
        };
        assert!(matches!(
            solve(&square_crossed(), &options, &mut rng, |_| true),
            Err(Error::StartIndex { index: 4, len: 4 })
        ));
        let options = SolverOptions {
            strategy: Strategy::TwoOpt,
            decay_rate: 1.5,
            ..SolverOptions::default()
        };
        assert!(matches!(
            solve(&square_crossed(), &options, &mut rng, |_| true),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn cluster_forwards_to_kmeans() {
        let points = ring(8);
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = cluster(&points, 2, &mut rng).expect("valid k");
        let total: usize = outcome.clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, points.len());
    }
}
