//! Nearest-neighbor tour construction.
//!
//! Greedy: from the start point, repeatedly walk to the closest point not yet
//! on the tour. O(n²) per run; the multi-start variant runs it from every
//! index, O(n³).

use crate::{
    Result,
    error::{ensure_index, ensure_non_empty},
    point::Point,
    tour::{Tour, nearest, tour_length},
};

pub fn nearest_neighbor(points: &[Point], start: usize) -> Result<Tour> {
    ensure_non_empty(points)?;
    ensure_index(start, points.len())?;
    Ok(nearest_neighbor_from(points, start))
}

fn nearest_neighbor_from(points: &[Point], start: usize) -> Tour {
    let mut ordered = Vec::with_capacity(points.len());
    let mut remaining = points.to_vec();
    ordered.push(remaining.remove(start));

    while !remaining.is_empty() {
        let Some(current) = ordered.last() else {
            break;
        };
        // Only exact duplicates of `current` can be left unmatched; take them in order.
        let next = nearest(&remaining, current, false)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        ordered.push(remaining.remove(next));
    }

    Tour::new(ordered)
}

/// Best nearest-neighbor tour over every start index. The input order is the
/// incumbent, so the result is never longer than the input.
pub fn multi_start_nearest_neighbor(points: &[Point]) -> Result<Tour> {
    ensure_non_empty(points)?;

    let mut best = Tour::from_slice(points);
    let mut best_len = tour_length(points);
    let mut best_start = None;

    for start in 0..points.len() {
        let candidate = nearest_neighbor_from(points, start);
        let len = candidate.length();
        if len < best_len {
            best_len = len;
            best = candidate;
            best_start = Some(start);
        }
    }

    log::info!(
        "nn.multi_start: complete n={} best_start={} length_km={best_len:.4}",
        points.len(),
        best_start.map_or_else(|| "input".to_string(), |s| s.to_string()),
    );

    Ok(best)
}
