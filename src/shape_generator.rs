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

//! Shape generator (spec §4.G): walks a JourneyPattern's stop points,
//! resolves geographic centroids through the NeTEx repository, interpolates
//! long segments and simplifies oversized shapes with Douglas-Peucker.

use crate::configuration::ShapeConfiguration;
use crate::geometry::{douglas_peucker, haversine_distance, interpolate, LatLon};
use crate::gtfs_model::objects::ShapePoint;
use crate::netex::objects::JourneyPattern;
use crate::netex::repository::Repository;

/// A resolved point, carrying its cumulative distance along the walked
/// sequence before any interpolation or simplification.
struct RawPoint {
    coord: LatLon,
    cumulative_m: f64,
}

/// Resolves `scheduledStopPointRef → (quay.centroid | stopPlace.centroid)`
/// for one pattern stop point. Returns `None` when neither bound entity (or
/// neither's centroid) is resolvable (spec §4.G step 1, spec §9: never
/// emit a placeholder `(0, 0)` point).
fn resolve_centroid(repository: &Repository, scheduled_stop_point_ref: &str) -> Option<LatLon> {
    let point = repository.scheduled_stop_point(scheduled_stop_point_ref)?;
    if let Some(quay_ref) = &point.quay_ref {
        if let Some(centroid) = repository.quay(quay_ref).and_then(|q| q.centroid) {
            return Some(LatLon::new(centroid.lat, centroid.lon));
        }
    }
    if let Some(stop_place_ref) = &point.stop_place_ref {
        if let Some(centroid) = repository.stop_place(stop_place_ref).and_then(|s| s.centroid) {
            return Some(LatLon::new(centroid.lat, centroid.lon));
        }
    }
    None
}

/// Walks the pattern's stop points, resolving each to a coordinate and
/// accumulating great-circle distance (spec §4.G steps 1-2). Unresolved
/// points are skipped entirely rather than standing in as gaps.
fn walk_resolved_points(repository: &Repository, pattern: &JourneyPattern) -> Vec<RawPoint> {
    let mut resolved = Vec::new();
    let mut cumulative_m = 0.0;
    let mut previous: Option<LatLon> = None;
    for point in &pattern.points {
        let Some(stop_point) = point.as_stop() else {
            continue;
        };
        let Some(coord) = resolve_centroid(repository, &stop_point.scheduled_stop_point_ref) else {
            continue;
        };
        if let Some(previous_coord) = previous {
            cumulative_m += haversine_distance(previous_coord, coord);
        }
        resolved.push(RawPoint { coord, cumulative_m });
        previous = Some(coord);
    }
    resolved
}

/// Inserts evenly spaced interpolated points along every segment longer
/// than `interpolation_m` (spec §4.G step 3): `⌊L / D⌋` extra points,
/// linear between endpoints, with interpolated cumulative distance.
fn interpolate_segments(points: &[RawPoint], interpolation_m: f64) -> Vec<RawPoint> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(points.len());
    out.push(RawPoint {
        coord: points[0].coord,
        cumulative_m: points[0].cumulative_m,
    });
    for window in points.windows(2) {
        let (start, end) = (&window[0], &window[1]);
        let length = end.cumulative_m - start.cumulative_m;
        if interpolation_m > 0.0 && length > interpolation_m {
            let extra_points = (length / interpolation_m).floor() as u32;
            for i in 1..=extra_points {
                let t = i as f64 / (extra_points + 1) as f64;
                out.push(RawPoint {
                    coord: interpolate(start.coord, end.coord, t),
                    cumulative_m: start.cumulative_m + length * t,
                });
            }
        }
        out.push(RawPoint {
            coord: end.coord,
            cumulative_m: end.cumulative_m,
        });
    }
    out
}

/// Finds the cumulative distance of the point in `from` nearest (by
/// coordinate) to `target`, used to carry distances forward across a
/// Douglas-Peucker simplification pass (spec §4.G step 4).
fn nearest_cumulative_distance(from: &[RawPoint], target: LatLon) -> f64 {
    from.iter()
        .min_by(|a, b| {
            haversine_distance(a.coord, target)
                .partial_cmp(&haversine_distance(b.coord, target))
                .unwrap()
        })
        .map(|p| p.cumulative_m)
        .unwrap_or(0.0)
}

/// Generates the ordered shape points for a journey pattern (spec §4.G).
/// Returns an empty vector when fewer than two stop points resolve to a
/// coordinate - callers treat that as "no shape" (spec §4.J step 4), not an
/// error.
pub fn generate_shape(repository: &Repository, pattern: &JourneyPattern, shape_id: impl Into<String>, config: &ShapeConfiguration) -> Vec<ShapePoint> {
    let resolved = walk_resolved_points(repository, pattern);
    if resolved.len() < 2 {
        return Vec::new();
    }

    let interpolated = interpolate_segments(&resolved, config.interpolation_m);

    let final_points = if interpolated.len() > config.max_points {
        let coords: Vec<LatLon> = interpolated.iter().map(|p| p.coord).collect();
        let simplified = douglas_peucker(&coords, config.simplify_tolerance);
        simplified
            .into_iter()
            .map(|coord| RawPoint {
                coord,
                cumulative_m: nearest_cumulative_distance(&interpolated, coord),
            })
            .collect()
    } else {
        interpolated
    };

    let shape_id = shape_id.into();
    final_points
        .into_iter()
        .enumerate()
        .map(|(i, point)| ShapePoint {
            shape_id: shape_id.clone(),
            shape_pt_lat: point.coord.lat,
            shape_pt_lon: point.coord.lon,
            shape_pt_sequence: (i + 1) as u32,
            shape_dist_traveled: point.cumulative_m,
        })
        .collect()
}
