//! K-means over lat/lon points with geometric-median centroids.

use rand::{Rng, seq::SliceRandom};

use crate::{
    Error, Result,
    error::ensure_non_empty,
    geo::centroid::centroid,
    point::Point,
    tour::nearest,
};

pub const MAX_ROUNDS: usize = 100;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cluster {
    pub centroid: Point,
    pub members: Vec<Point>,
}

#[derive(Clone, Debug)]
pub struct KmeansOutcome {
    pub clusters: Vec<Cluster>,
    pub rounds: usize,
    /// False when [`MAX_ROUNDS`] was reached before the centroids settled.
    pub converged: bool,
}

/// Partitions `points` into `k` clusters.
///
/// Seeds are the first `k` points of a random permutation drawn from `rng`.
/// Every round assigns each point to its nearest centroid (first wins on
/// ties) and recomputes the centroids; the loop ends when a round leaves the
/// centroid list unchanged. A cluster that receives no points keeps its
/// previous centroid.
pub fn kmeans<R: Rng + ?Sized>(points: &[Point], k: usize, rng: &mut R) -> Result<KmeansOutcome> {
    run_kmeans(points, k, MAX_ROUNDS, rng)
}

fn run_kmeans<R: Rng + ?Sized>(
    points: &[Point],
    k: usize,
    max_rounds: usize,
    rng: &mut R,
) -> Result<KmeansOutcome> {
    ensure_non_empty(points)?;
    if k == 0 || k >= points.len() {
        return Err(Error::ClusterCount {
            clusters: k,
            points: points.len(),
        });
    }

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.shuffle(rng);
    // seeds carry position only
    let mut centroids: Vec<Point> = order[..k]
        .iter()
        .map(|&idx| Point::at(points[idx].lat, points[idx].lon))
        .collect();

    log::info!("kmeans: start n={} k={k}", points.len());

    let mut clusters = Vec::new();
    for round in 1..=max_rounds {
        clusters = assign(points, &centroids);

        let mut next = Vec::with_capacity(k);
        for (idx, cluster) in clusters.iter_mut().enumerate() {
            if cluster.members.is_empty() {
                log::debug!("kmeans.round: empty cluster round={round} cluster={idx}");
                next.push(cluster.centroid.clone());
                continue;
            }
            let c = centroid(&cluster.members)?;
            cluster.centroid = c.center.clone();
            next.push(c.center);
        }

        let settled = next == centroids;
        log::debug!("kmeans.round: round={round} settled={settled}");
        if settled {
            log::info!("kmeans: complete rounds={round} k={k}");
            return Ok(KmeansOutcome {
                clusters,
                rounds: round,
                converged: true,
            });
        }
        centroids = next;
    }

    log::warn!("kmeans: did not converge rounds={max_rounds} k={k}");
    Ok(KmeansOutcome {
        clusters,
        rounds: max_rounds,
        converged: false,
    })
}

fn assign(points: &[Point], centroids: &[Point]) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = centroids
        .iter()
        .map(|c| Cluster {
            centroid: c.clone(),
            members: Vec::new(),
        })
        .collect();

    for p in points {
        if let Some((idx, _)) = nearest(centroids, p, true) {
            clusters[idx].members.push(p.clone());
        }
    }
    clusters
}
