//! Geometric-median approximation over lat/lon points.
//!
//! The seed is the normalized mean of the points' cartesian vectors. From
//! there a compass search probes the 8 neighbours `{-step, 0, +step}` in
//! latitude and longitude, moving to the cheapest one that lowers the summed
//! haversine distance and halving `step` when none does.
//!
//! The 8 probes of a round are summed in parallel with rayon. The round's
//! decision is taken after the parallel collect has returned, i.e. after
//! every probe has finished.

use rayon::prelude::*;

use crate::{
    Error, Result,
    geo::geometry::{mean_position, total_distance},
    point::Point,
    tour::sort_by_label,
};

/// Initial probe offset in degrees, roughly 10 km.
const INITIAL_STEP_DEG: f64 = 0.1;
const MIN_STEP_DEG: f64 = 1e-6;
const PROBES_PER_ROUND: usize = 8;

/// Result of [`centroid`].
#[derive(Clone, Debug, PartialEq)]
pub struct Centroid {
    /// Best center found; carries an empty label.
    pub center: Point,
    /// Sum of distances from `center` to every input point, in km.
    pub total_distance: f64,
    pub count: usize,
}

impl Centroid {
    pub fn average_distance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_distance / self.count as f64
    }
}

#[derive(Clone, Debug)]
struct Probe {
    center: Point,
    cost: f64,
}

pub fn centroid(points: &[Point]) -> Result<Centroid> {
    let Some(mut center) = mean_position(points) else {
        return Err(Error::EmptyPointSet);
    };
    let mut best = total_distance(&center, points);

    let mut step = INITIAL_STEP_DEG;
    let mut rounds = 0usize;
    while step > MIN_STEP_DEG {
        rounds += 1;
        let probes = probe_round(&center, step, points);
        debug_assert_eq!(probes.len(), PROBES_PER_ROUND);

        match pick_improvement(&probes, best) {
            Some(probe) => {
                best = probe.cost;
                center = probe.center.clone();
            }
            None => step /= 2.0,
        }
    }

    log::trace!(
        "centroid: complete n={} rounds={rounds} lat={:.6} lon={:.6} total_km={best:.3}",
        points.len(),
        center.lat,
        center.lon
    );

    Ok(Centroid {
        center,
        total_distance: best,
        count: points.len(),
    })
}

fn probe_offsets(step: f64) -> impl Iterator<Item = (f64, f64)> {
    let adj = [-step, 0.0, step];
    adj.into_iter()
        .flat_map(move |dlat| adj.into_iter().map(move |dlon| (dlat, dlon)))
        .filter(|&(dlat, dlon)| !(dlat == 0.0 && dlon == 0.0))
}

fn probe_round(center: &Point, step: f64, points: &[Point]) -> Vec<Probe> {
    let candidates: Vec<Point> = probe_offsets(step)
        .map(|(dlat, dlon)| Point::at(center.lat + dlat, center.lon + dlon))
        .collect();

    candidates
        .into_par_iter()
        .map(|candidate| {
            let cost = total_distance(&candidate, points);
            Probe {
                center: candidate,
                cost,
            }
        })
        .collect()
}

/// Cheapest probe strictly below `best`; earlier probes win ties.
fn pick_improvement(probes: &[Probe], best: f64) -> Option<&Probe> {
    let mut chosen: Option<&Probe> = None;
    let mut bound = best;
    for probe in probes {
        if probe.cost < bound {
            bound = probe.cost;
            chosen = Some(probe);
        }
    }
    chosen
}

/// Collapses points sharing a label into one point per label.
///
/// Output is ordered by label. A label with a single point keeps that point;
/// larger groups are replaced by their centroid, relabelled.
pub fn aggregate_by_label(points: &[Point]) -> Result<Vec<Point>> {
    let sorted = sort_by_label(points);

    let mut out = Vec::new();
    for group in sorted.chunk_by(|a, b| a.label == b.label) {
        if let [single] = group {
            out.push(single.clone());
            continue;
        }
        let label = group[0].label.clone();
        let c = centroid(group)?;
        out.push(c.center.with_label(label));
    }

    log::debug!(
        "centroid.aggregate: n={} groups={}",
        points.len(),
        out.len()
    );
    Ok(out)
}
