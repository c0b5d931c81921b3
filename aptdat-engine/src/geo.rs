//! Geometry helpers: positions, headings and bounding rectangles.
//!
//! apt.dat stores everything in decimal degrees and meters; the output
//! schema wants feet and true headings, so the conversions live here.

/// Mean earth radius in meters, used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Roughly 100 m expressed in degrees of latitude.
pub const EPSILON_100M_DEG: f64 = 0.0009;

/// One arc minute - minimum margin for degenerate bounding rectangles.
pub const MIN_RECT_MARGIN_DEG: f64 = 1.0 / 60.0;

/// Convert meters to feet.
pub fn meter_to_feet(meter: f64) -> f64 {
    meter * 3.28084
}

/// Normalize a course to the `[0, 360)` range.
pub fn normalize_course(course: f64) -> f64 {
    let deg = course % 360.0;
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// The reciprocal of a course, normalized.
pub fn opposed_course(course: f64) -> f64 {
    normalize_course(course + 180.0)
}

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub lon: f64,
    pub lat: f64,
}

impl Pos {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle (haversine) distance to `other` in meters.
    pub fn distance_meter_to(&self, other: &Pos) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * a.sqrt().asin() * EARTH_RADIUS_M
    }

    /// Initial great-circle bearing towards `other` in degrees `[0, 360)`.
    pub fn bearing_deg_to(&self, other: &Pos) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        normalize_course(y.atan2(x).to_degrees())
    }

    /// Linear midpoint between two positions. Runways are short enough
    /// that coordinate interpolation is adequate for the center point.
    pub fn midpoint(&self, other: &Pos) -> Pos {
        Pos::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }
}

/// An axis-aligned bounding rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Rect {
    /// A degenerate rectangle covering a single position.
    pub fn from_pos(pos: Pos) -> Self {
        Self {
            min_lon: pos.lon,
            min_lat: pos.lat,
            max_lon: pos.lon,
            max_lat: pos.lat,
        }
    }

    /// Grow the rectangle to cover `pos`.
    pub fn extend(&mut self, pos: Pos) {
        self.min_lon = self.min_lon.min(pos.lon);
        self.max_lon = self.max_lon.max(pos.lon);
        self.min_lat = self.min_lat.min(pos.lat);
        self.max_lat = self.max_lat.max(pos.lat);
    }

    /// Grow the rectangle by a margin on each side.
    pub fn inflate(&mut self, dlon: f64, dlat: f64) {
        self.min_lon -= dlon;
        self.max_lon += dlon;
        self.min_lat -= dlat;
        self.max_lat += dlat;
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.lon >= self.min_lon
            && pos.lon <= self.max_lon
            && pos.lat >= self.min_lat
            && pos.lat <= self.max_lat
    }

    /// True if the rectangle has collapsed to a single position.
    pub fn is_point(&self) -> bool {
        self.min_lon == self.max_lon && self.min_lat == self.max_lat
    }

    pub fn center(&self) -> Pos {
        Pos::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}
