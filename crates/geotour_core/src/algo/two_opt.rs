//! 2-opt local search with optional simulated-annealing acceptance.
//!
//! A sweep visits every pair `(i, j)` with `j >= i + 2` and scores the tour
//! obtained by reversing `[i, j]`. Shorter candidates are always taken. With
//! annealing on and the temperature above 1, a candidate that is not shorter
//! is taken with probability `exp((best - cand) / temperature)`, and every such
//! acceptance multiplies the temperature by the decay rate.
//!
//! The loop stops after a sweep that accepted nothing, or at the pass limit.

use rand::Rng;

use crate::{Error, Result, geo::geometry::distance, point::Point, tour::Tour};

const MIN_TOUR_SIZE_FOR_2OPT: usize = 4;
const INITIAL_TEMPERATURE: f64 = 100.0;
const MIN_TEMPERATURE: f64 = 1.0;
/// Largest `j - i` considered in restricted mode.
pub const RESTRICTED_WINDOW: usize = 23;
pub const DEFAULT_DECAY_RATE: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoOptConfig {
    /// Temperature multiplier applied on each annealed acceptance, in (0, 1).
    pub decay_rate: f64,
    /// Skip pairs further apart than [`RESTRICTED_WINDOW`].
    pub restricted: bool,
    /// Maximum number of sweeps; `None` runs to convergence.
    pub pass_limit: Option<usize>,
    pub annealing: bool,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        Self {
            decay_rate: DEFAULT_DECAY_RATE,
            restricted: false,
            pass_limit: None,
            annealing: true,
        }
    }
}

impl TwoOptConfig {
    pub fn full(decay_rate: f64) -> Self {
        Self {
            decay_rate,
            ..Self::default()
        }
    }

    pub fn restricted(decay_rate: f64) -> Self {
        Self {
            decay_rate,
            restricted: true,
            ..Self::default()
        }
    }

    /// One restricted sweep without annealing, for very large inputs.
    pub fn single_pass() -> Self {
        Self {
            decay_rate: DEFAULT_DECAY_RATE,
            restricted: true,
            pass_limit: Some(1),
            annealing: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.annealing && !(self.decay_rate > 0.0 && self.decay_rate < 1.0) {
            return Err(Error::invalid_input(format!(
                "decay rate must be in (0, 1) when annealing, got {}",
                self.decay_rate
            )));
        }
        if self.pass_limit == Some(0) {
            return Err(Error::invalid_input("pass limit must be > 0"));
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        let mut out = String::new();
        if self.restricted {
            out.push_str("restricted ");
        }
        if let Some(limit) = self.pass_limit {
            out.push_str(&format!("{limit}-pass "));
        }
        out.push_str("2-opt");
        out.push_str(if self.annealing {
            " with SA"
        } else {
            " without SA"
        });
        out
    }
}

#[derive(Clone, Debug)]
pub struct TwoOptOutcome {
    pub tour: Tour,
    pub length: f64,
    pub passes: usize,
    pub improvements: usize,
    /// Non-improving moves taken by annealing.
    pub annealed: usize,
    /// False when the pass limit stopped the search.
    pub converged: bool,
}

pub fn acceptance_probability(current: f64, candidate: f64, temperature: f64) -> f64 {
    ((current - candidate) / temperature).exp()
}

pub fn two_opt<R: Rng + ?Sized>(
    tour: Tour,
    config: &TwoOptConfig,
    rng: &mut R,
) -> Result<TwoOptOutcome> {
    config.validate()?;

    let n = tour.len();
    if n < MIN_TOUR_SIZE_FOR_2OPT {
        log::debug!("two_opt: skip n={n} reason=insufficient_size");
        let length = tour.length();
        return Ok(TwoOptOutcome {
            tour,
            length,
            passes: 0,
            improvements: 0,
            annealed: 0,
            converged: true,
        });
    }

    log::info!("two_opt: start n={n} mode=\"{}\"", config.describe());

    let mut best = tour;
    let mut best_len = best.length();
    let start_len = best_len;
    let mut temperature = INITIAL_TEMPERATURE;

    let mut passes = 0usize;
    let mut improvements = 0usize;
    let mut annealed = 0usize;
    let mut converged = false;

    loop {
        if let Some(limit) = config.pass_limit
            && passes >= limit
        {
            break;
        }

        let mut pass_improvements = 0usize;
        let mut pass_annealed = 0usize;

        for i in 0..n - 2 {
            for j in (i + 2)..n {
                if config.restricted && j - i > RESTRICTED_WINDOW {
                    // the gap only grows with j
                    break;
                }

                let cand_len = best_len + reversal_delta(&best.points, i, j);

                if cand_len < best_len {
                    best.reverse_segment_in_place(i, j);
                    best_len = cand_len;
                    pass_improvements += 1;
                } else if config.annealing
                    && temperature > MIN_TEMPERATURE
                    && acceptance_probability(best_len, cand_len, temperature)
                        > rng.random::<f64>()
                {
                    best.reverse_segment_in_place(i, j);
                    best_len = cand_len;
                    temperature *= config.decay_rate;
                    pass_annealed += 1;
                }
            }
        }

        passes += 1;
        improvements += pass_improvements;
        annealed += pass_annealed;
        // drop accumulated rounding from the incremental deltas
        best_len = best.length();

        log::debug!(
            "two_opt: pass={passes} improvements={pass_improvements} annealed={pass_annealed} temperature={temperature:.3} length_km={best_len:.4}"
        );

        if pass_improvements == 0 && pass_annealed == 0 {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "two_opt: pass limit reached before convergence passes={passes} length_km={best_len:.4}"
        );
    }
    log::info!(
        "two_opt: complete n={n} passes={passes} improvements={improvements} annealed={annealed} start_km={start_len:.4} final_km={best_len:.4}"
    );

    Ok(TwoOptOutcome {
        tour: best,
        length: best_len,
        passes,
        improvements,
        annealed,
        converged,
    })
}

/// Change in closed-tour length from reversing `points[i..=j]`.
fn reversal_delta(points: &[Point], i: usize, j: usize) -> f64 {
    let n = points.len();
    if i == 0 && j == n - 1 {
        // whole-tour reversal: same cycle, other direction
        return 0.0;
    }
    let prev = &points[(i + n - 1) % n];
    let next = &points[(j + 1) % n];
    let (a, b) = (&points[i], &points[j]);
    distance(prev, b) + distance(a, next) - distance(prev, a) - distance(b, next)
}
