use std::fmt;

/// Equatorial earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.1;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// A labelled geographic point, `lat`/`lon` in degrees.
///
/// Equality is structural: two points are equal only when latitude,
/// longitude and label all match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

impl Point {
    pub fn new(lat: f64, lon: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            label: label.into(),
        }
    }

    /// Unlabelled point, used for centers and anchors.
    pub fn at(lat: f64, lon: f64) -> Self {
        Self::new(lat, lon, String::new())
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Haversine kilometres.
    pub fn dist(&self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), rhs.lat.to_radians());
        let dlat = (rhs.lat - self.lat).to_radians();
        let dlon = (rhs.lon - self.lon).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlon / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lon)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        if self.label.is_empty() {
            write!(f, "{},{}", b1.format(self.lat), b2.format(self.lon))
        } else {
            write!(
                f,
                "{},{},{}",
                self.label,
                b1.format(self.lat),
                b2.format(self.lon)
            )
        }
    }
}
