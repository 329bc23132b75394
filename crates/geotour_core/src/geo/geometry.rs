use crate::point::Point;

/// Unit-sphere vector used for averaging positions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian {
    /// Back to degrees. The vector does not need unit length.
    pub fn to_point(self) -> Point {
        let hyp = self.x.hypot(self.y);
        Point::at(
            self.z.atan2(hyp).to_degrees(),
            self.y.atan2(self.x).to_degrees(),
        )
    }
}

/// Great-circle distance in kilometres.
#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    a.dist(b)
}

pub fn to_cartesian(p: &Point) -> Cartesian {
    let (lat, lon) = (p.lat.to_radians(), p.lon.to_radians());
    Cartesian {
        x: lat.cos() * lon.cos(),
        y: lat.cos() * lon.sin(),
        z: lat.sin(),
    }
}

/// Mean of the cartesian vectors, projected back to lat/lon.
/// Returns `None` for an empty slice.
pub fn mean_position(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let mut sum = Cartesian::default();
    for p in points {
        let c = to_cartesian(p);
        sum.x += c.x;
        sum.y += c.y;
        sum.z += c.z;
    }
    let n = points.len() as f64;
    Some(
        Cartesian {
            x: sum.x / n,
            y: sum.y / n,
            z: sum.z / n,
        }
        .to_point(),
    )
}

/// Sum of distances from `center` to every point.
pub fn total_distance(center: &Point, points: &[Point]) -> f64 {
    points.iter().map(|p| distance(center, p)).sum()
}
