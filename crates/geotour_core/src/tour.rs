use std::cmp::Ordering;

use crate::{geo::geometry::distance, point::Point};

/// Closed visiting order over a set of points; the last point connects back
/// to the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub points: Vec<Point>,
}

impl Tour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_slice(points: &[Point]) -> Self {
        Self::new(points.to_vec())
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed tour length in km.
    pub fn length(&self) -> f64 {
        tour_length(&self.points)
    }

    /// `[0, i) + reverse([i, j]) + (j, n)`, as a new tour.
    ///
    /// # Panics
    ///
    /// Panics unless `i <= j < len`.
    pub fn reverse_segment(&self, i: usize, j: usize) -> Self {
        let mut out = self.clone();
        out.reverse_segment_in_place(i, j);
        out
    }

    pub fn reverse_segment_in_place(&mut self, i: usize, j: usize) {
        self.points[i..=j].reverse();
    }

    /// Cyclic rotation so that index `k` (mod len) becomes index 0.
    pub fn rotate(&self, k: usize) -> Self {
        let mut out = self.clone();
        out.rotate_in_place(k);
        out
    }

    pub fn rotate_in_place(&mut self, k: usize) {
        if self.points.is_empty() {
            return;
        }
        let k = k % self.points.len();
        self.points.rotate_left(k);
    }

    /// Copy with positions `a` and `b` exchanged.
    pub fn swap(&self, a: usize, b: usize) -> Self {
        let mut out = self.clone();
        out.points.swap(a, b);
        out
    }

    pub fn remove_in_place(&mut self, idx: usize) -> Point {
        self.points.remove(idx)
    }

    /// Index of the first point structurally equal to `p`.
    pub fn position(&self, p: &Point) -> Option<usize> {
        self.points.iter().position(|q| q == p)
    }

    /// Same multiset of points as `reference`.
    pub fn is_permutation_of(&self, reference: &[Point]) -> bool {
        if self.points.len() != reference.len() {
            return false;
        }
        let mut lhs: Vec<&Point> = self.points.iter().collect();
        let mut rhs: Vec<&Point> = reference.iter().collect();
        lhs.sort_by(|a, b| point_order(a, b));
        rhs.sort_by(|a, b| point_order(a, b));
        lhs == rhs
    }
}

impl From<Vec<Point>> for Tour {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Closed length of `points` taken in slice order. Fewer than two points
/// have length 0.
pub fn tour_length(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n - 1 {
        sum += distance(&points[i], &points[i + 1]);
    }
    sum + distance(&points[n - 1], &points[0])
}

/// Closed length of `points` visited in `order` without reordering them.
pub fn ordered_length(points: &[Point], order: &[usize]) -> f64 {
    let n = order.len();
    if n < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n - 1 {
        sum += distance(&points[order[i]], &points[order[i + 1]]);
    }
    sum + distance(&points[order[n - 1]], &points[order[0]])
}

pub fn apply_permutation(points: &[Point], order: &[usize]) -> Tour {
    Tour::new(order.iter().map(|&idx| points[idx].clone()).collect())
}

/// Closest point to `target` by haversine distance, first one on ties.
///
/// With `include_self == false`, points structurally equal to `target` are
/// skipped.
pub fn nearest<'a>(
    points: &'a [Point],
    target: &Point,
    include_self: bool,
) -> Option<(usize, &'a Point)> {
    let mut best: Option<(usize, &Point)> = None;
    let mut best_dist = f64::MAX;
    for (idx, p) in points.iter().enumerate() {
        if !include_self && p == target {
            continue;
        }
        let d = distance(p, target);
        if d < best_dist {
            best_dist = d;
            best = Some((idx, p));
        }
    }
    best
}

/// Copy sorted by label; stable for equal labels.
pub fn sort_by_label(points: &[Point]) -> Vec<Point> {
    let mut out = points.to_vec();
    out.sort_by(|a, b| a.label.cmp(&b.label));
    out
}

fn point_order(a: &Point, b: &Point) -> Ordering {
    a.label
        .cmp(&b.label)
        .then_with(|| a.lat.total_cmp(&b.lat))
        .then_with(|| a.lon.total_cmp(&b.lon))
}
