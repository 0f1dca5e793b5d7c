// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Pure geometry kernel (spec §4.B): haversine distance, linear
//! interpolation, Douglas-Peucker simplification, bounding boxes,
//! point-in-polygon, segment intersection and convex hull. Everything here
//! is stateless and takes/returns plain coordinates in degrees (distances in
//! metres), so it composes with the geo crate's `Point`/`Coord` for callers
//! that want that interop.

/// Mean earth radius in metres, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic point, latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl LatLon {
    /// Builds a point.
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon { lat, lon }
    }
}

impl From<LatLon> for geo::Point<f64> {
    fn from(p: LatLon) -> Self {
        geo::Point::new(p.lon, p.lat)
    }
}

impl From<geo::Point<f64>> for LatLon {
    fn from(p: geo::Point<f64>) -> Self {
        LatLon {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

/// Great-circle distance between two points, in metres.
///
/// `2 * R * asin(sqrt(sin²(Δφ/2) + cosφ1 * cosφ2 * sin²(Δλ/2)))`
pub fn haversine_distance(a: LatLon, b: LatLon) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Linearly interpolates between two points at ratio `t` in `[0, 1]`.
/// `t = 0` returns `a`, `t = 1` returns `b`.
pub fn interpolate(a: LatLon, b: LatLon, t: f64) -> LatLon {
    LatLon {
        lat: a.lat + (b.lat - a.lat) * t,
        lon: a.lon + (b.lon - a.lon) * t,
    }
}

/// Metres per degree of latitude; constant enough for the equirectangular
/// projection used by [`perpendicular_distance`].
const LAT_TO_METERS: f64 = 111_319.9;

fn lon_to_meters(lat_degrees: f64) -> f64 {
    LAT_TO_METERS * lat_degrees.to_radians().cos()
}

fn to_local_meters(origin_lat: f64, p: LatLon) -> (f64, f64) {
    (
        p.lon * lon_to_meters(origin_lat),
        p.lat * LAT_TO_METERS,
    )
}

/// Perpendicular distance (metres) from `point` to the segment
/// `(start, end)`, via a local equirectangular projection centered on
/// `start`'s latitude. Degenerate (zero-length) segments fall back to the
/// point-to-point distance.
pub fn perpendicular_distance(point: LatLon, start: LatLon, end: LatLon) -> f64 {
    let origin_lat = start.lat;
    let (x, y) = to_local_meters(origin_lat, point);
    let (x1, y1) = to_local_meters(origin_lat, start);
    let (x2, y2) = to_local_meters(origin_lat, end);

    let dx = x2 - x1;
    let dy = y2 - y1;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return haversine_distance(point, start);
    }

    let t = ((x - x1) * dx + (y - y1) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);
    let proj_x = x1 + t * dx;
    let proj_y = y1 + t * dy;
    ((x - proj_x).powi(2) + (y - proj_y).powi(2)).sqrt()
}

/// Simplifies a polyline with the Douglas-Peucker algorithm. `tolerance` is
/// in the same local-projection metres used by [`perpendicular_distance`]
/// (the caller typically passes a small value in projected-degree-like
/// units consistent with how the tolerance was configured; see spec §4.G).
///
/// Returns a subsequence of `points` (by value, since points are small);
/// always includes the first and last point when `points.len() >= 2`.
/// Idempotent: simplifying an already-simplified sequence with the same
/// tolerance returns it unchanged (testable property 7).
pub fn douglas_peucker(points: &[LatLon], tolerance: f64) -> Vec<LatLon> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let first = points[0];
    let last = points[points.len() - 1];

    let (farthest_index, farthest_distance) = points[1..points.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, perpendicular_distance(*p, first, last)))
        .fold((0usize, 0.0_f64), |acc, (i, d)| {
            if d > acc.1 {
                (i, d)
            } else {
                acc
            }
        });

    if farthest_distance < tolerance {
        vec![first, last]
    } else {
        let mut left = douglas_peucker(&points[..=farthest_index], tolerance);
        let right = douglas_peucker(&points[farthest_index..], tolerance);
        left.pop(); // drop the shared pivot before concatenating
        left.extend(right);
        left
    }
}

/// Axis-aligned bounding box of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum latitude.
    pub min_lat: f64,
    /// Minimum longitude.
    pub min_lon: f64,
    /// Maximum latitude.
    pub max_lat: f64,
    /// Maximum longitude.
    pub max_lon: f64,
}

/// Computes the bounding box of a (non-empty) set of points.
pub fn bounding_box(points: &[LatLon]) -> Option<BoundingBox> {
    let first = *points.first()?;
    Some(points.iter().fold(
        BoundingBox {
            min_lat: first.lat,
            min_lon: first.lon,
            max_lat: first.lat,
            max_lon: first.lon,
        },
        |mut bbox, p| {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox
        },
    ))
}

/// Ray-casting point-in-polygon test. `polygon` is an ordered ring of
/// vertices (not necessarily closed).
pub fn point_in_polygon(point: LatLon, polygon: &[LatLon]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let vi = polygon[i];
        let vj = polygon[j];
        let intersects = (vi.lat > point.lat) != (vj.lat > point.lat)
            && point.lon
                < (vj.lon - vi.lon) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lon;
        if intersects {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether two segments `(p1, p2)` and `(p3, p4)` intersect (including
/// touching at an endpoint).
pub fn segments_intersect(p1: LatLon, p2: LatLon, p3: LatLon, p4: LatLon) -> bool {
    fn orientation(a: LatLon, b: LatLon, c: LatLon) -> i8 {
        let val = (b.lon - a.lon) * (c.lat - a.lat) - (b.lat - a.lat) * (c.lon - a.lon);
        if val.abs() < f64::EPSILON {
            0
        } else if val > 0.0 {
            1
        } else {
            -1
        }
    }
    fn on_segment(a: LatLon, b: LatLon, c: LatLon) -> bool {
        c.lat.min(a.lat) - f64::EPSILON <= b.lat
            && b.lat <= c.lat.max(a.lat) + f64::EPSILON
            && c.lon.min(a.lon) - f64::EPSILON <= b.lon
            && b.lon <= c.lon.max(a.lon) + f64::EPSILON
    }

    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p3, p2))
        || (o2 == 0 && on_segment(p1, p4, p2))
        || (o3 == 0 && on_segment(p3, p1, p4))
        || (o4 == 0 && on_segment(p3, p2, p4))
}

/// Convex hull via a Graham-scan-like monotone chain. Returns the hull
/// vertices in counter-clockwise order, deduplicated.
pub fn convex_hull(points: &[LatLon]) -> Vec<LatLon> {
    let mut pts: Vec<LatLon> = points.to_vec();
    pts.sort_by(|a, b| {
        a.lon
            .partial_cmp(&b.lon)
            .unwrap()
            .then(a.lat.partial_cmp(&b.lat).unwrap())
    });
    pts.dedup_by(|a, b| a.lon == b.lon && a.lat == b.lat);
    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: LatLon, a: LatLon, b: LatLon) -> f64 {
        (a.lon - o.lon) * (b.lat - o.lat) - (a.lat - o.lat) * (b.lon - o.lon)
    }

    let mut lower: Vec<LatLon> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2
            && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<LatLon> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2
            && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
