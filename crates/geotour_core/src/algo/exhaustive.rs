//! Exhaustive search over every visiting order.
//!
//! Permutations of `[0, n)` are enumerated in lexicographic order and scored
//! with [`ordered_length`]. Only practical for a handful of points, so inputs
//! above [`CONFIRM_ABOVE`] points must be confirmed against an estimate of
//! the run time first.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use crate::{
    Result,
    error::ensure_non_empty,
    point::Point,
    tour::{Tour, apply_permutation, ordered_length, tour_length},
};

/// Inputs with more points than this need confirmation.
pub const CONFIRM_ABOVE: usize = 11;
pub const PERMUTATIONS_PER_SECOND: f64 = 500_000.0;
const SECONDS_PER_YEAR: f64 = 60.0 * 60.0 * 24.0 * 365.0;

/// Advances `order` to its lexicographic successor.
///
/// Returns `false`, leaving `order` untouched, when it is already the last
/// permutation.
pub fn next_permutation(order: &mut [usize]) -> bool {
    let n = order.len();
    if n < 2 {
        return false;
    }

    // largest k with order[k] < order[k + 1]
    let Some(k) = (0..n - 1).rev().find(|&k| order[k] < order[k + 1]) else {
        return false;
    };
    // largest l > k with order[k] < order[l]; exists because order[k + 1] qualifies
    let l = (k + 1..n)
        .rev()
        .find(|&l| order[k] < order[l])
        .unwrap_or(k + 1);

    order.swap(k, l);
    order[k + 1..].reverse();
    true
}

pub fn factorial(n: usize) -> BigUint {
    (2..=n).fold(BigUint::one(), |acc, i| acc * BigUint::from(i))
}

/// Cost of enumerating every order of `points` points.
#[derive(Clone, Debug, PartialEq)]
pub struct ExhaustiveEstimate {
    pub points: usize,
    pub permutations: BigUint,
    pub seconds: f64,
}

impl ExhaustiveEstimate {
    pub fn for_points(points: usize) -> Self {
        let permutations = factorial(points);
        let seconds = permutations.to_f64().unwrap_or(f64::INFINITY) / PERMUTATIONS_PER_SECOND;
        Self {
            points,
            permutations,
            seconds,
        }
    }

    pub fn years(&self) -> f64 {
        self.seconds / SECONDS_PER_YEAR
    }

    pub fn needs_confirmation(&self) -> bool {
        self.points > CONFIRM_ABOVE
    }
}

impl fmt::Display for ExhaustiveEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points, {} permutations, approx {:.4e} years",
            self.points,
            self.permutations,
            self.years()
        )
    }
}

#[derive(Clone, Debug)]
pub enum ExhaustiveOutcome {
    Solved(Tour),
    /// The caller declined after seeing the estimate; no search was run.
    Aborted(ExhaustiveEstimate),
}

/// Shortest closed tour over `points`.
///
/// `confirm` is consulted only when the input is larger than
/// [`CONFIRM_ABOVE`]; answering `false` aborts without searching.
pub fn exhaustive<F>(points: &[Point], confirm: F) -> Result<ExhaustiveOutcome>
where
    F: FnOnce(&ExhaustiveEstimate) -> bool,
{
    ensure_non_empty(points)?;

    let estimate = ExhaustiveEstimate::for_points(points.len());
    if estimate.needs_confirmation() {
        log::warn!("exhaustive: large input {estimate}");
        if !confirm(&estimate) {
            log::warn!("exhaustive: declined n={}", points.len());
            return Ok(ExhaustiveOutcome::Aborted(estimate));
        }
    }

    log::info!(
        "exhaustive: start n={} permutations={}",
        points.len(),
        estimate.permutations
    );

    let mut order: Vec<usize> = (0..points.len()).collect();
    let mut best_order = order.clone();
    let mut best_len = tour_length(points);
    let mut scored = 1u64;

    while next_permutation(&mut order) {
        scored += 1;
        let len = ordered_length(points, &order);
        if len < best_len {
            best_len = len;
            best_order.copy_from_slice(&order);
        }
    }

    log::info!("exhaustive: complete scored={scored} length_km={best_len:.4}");

    Ok(ExhaustiveOutcome::Solved(apply_permutation(
        points,
        &best_order,
    )))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use num_bigint::BigUint;

    use super::{
        ExhaustiveEstimate, ExhaustiveOutcome, exhaustive, factorial, next_permutation,
    };
    use crate::{point::Point, tour::ordered_length};

    #[test]
    fn next_permutation_walks_lexicographically() {
        let mut order = vec![0, 1, 2];
        let mut seen = vec![order.clone()];
        while next_permutation(&mut order) {
            seen.push(order.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
        // exhausted permutation stays put
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn next_permutation_yields_n_factorial_distinct_orders() {
        for n in 0..=6usize {
            let mut order: Vec<usize> = (0..n).collect();
            let mut seen = HashSet::new();
            seen.insert(order.clone());
            while next_permutation(&mut order) {
                assert!(seen.insert(order.clone()), "repeat {order:?}");
            }
            assert_eq!(BigUint::from(seen.len()), factorial(n), "n={n}");
        }
    }

    #[test]
    fn next_permutation_from_middle() {
        let mut order = vec![1, 3, 2, 0];
        assert!(next_permutation(&mut order));
        assert_eq!(order, vec![2, 0, 1, 3]);
    }

    #[test]
    fn factorial_is_exact_beyond_u64() {
        assert_eq!(factorial(0), BigUint::from(1u32));
        assert_eq!(factorial(1), BigUint::from(1u32));
        assert_eq!(factorial(5), BigUint::from(120u32));
        assert_eq!(factorial(20), BigUint::from(2_432_902_008_176_640_000u64));
        assert_eq!(
            factorial(25).to_string(),
            "15511210043330985984000000"
        );
    }

    #[test]
    fn estimate_scales_with_throughput() {
        let estimate = ExhaustiveEstimate::for_points(12);
        assert_eq!(estimate.permutations, BigUint::from(479_001_600u32));
        assert!((estimate.seconds - 958.0032).abs() < 1e-6);
        assert!(estimate.needs_confirmation());
        assert!(!ExhaustiveEstimate::for_points(11).needs_confirmation());
        assert!(estimate.to_string().contains("479001600 permutations"));
    }

    #[test]
    fn finds_shortest_order() {
        let points = vec![
            Point::at(0.0, 0.0),
            Point::at(1.0, 1.0),
            Point::at(-1.0, 1.0),
            Point::at(0.0, 2.0),
        ];
        let ExhaustiveOutcome::Solved(tour) =
            exhaustive(&points, |_| panic!("no confirmation below threshold"))
                .expect("non-empty")
        else {
            panic!("small search must run");
        };
        assert!((tour.length() - 629.6984954).abs() < 1e-6);

        let mut order: Vec<usize> = (0..points.len()).collect();
        loop {
            assert!(tour.length() <= ordered_length(&points, &order) + 1e-9);
            if !next_permutation(&mut order) {
                break;
            }
        }
    }

    #[test]
    fn declined_confirmation_aborts() {
        let points: Vec<Point> = (0..12).map(|i| Point::at(0.0, i as f64)).collect();
        let outcome = exhaustive(&points, |estimate| {
            assert_eq!(estimate.points, 12);
            false
        })
        .expect("non-empty");
        assert!(matches!(outcome, ExhaustiveOutcome::Aborted(e) if e.points == 12));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(exhaustive(&[], |_| true).is_err());
    }
}
