//! Ring geometry on WGS84 coordinates. Rings are implicitly closed.

use crate::domain::model::{Centroid, GeoPoint};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const METERS_PER_DEGREE: f64 = 111_319.9;

pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

pub fn distance_between(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}

/// Closed-ring perimeter in meters. Fewer than two points yield 0.
pub fn perimeter_m(points: &[GeoPoint]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| distance_between(&points[i], &points[(i + 1) % n]))
        .sum()
}

/// Enclosed area in hectares, 0 below three points. Degree-space shoelace
/// scaled by `cos(mean latitude)`; repeated fixes do not shift the mean.
pub fn area_hectares(points: &[GeoPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    // Offsets from the first vertex keep the cross products small.
    let (lat0, lon0) = (points[0].latitude(), points[0].longitude());
    let offset = |p: &GeoPoint| (p.longitude() - lon0, p.latitude() - lat0);

    let mut twice_area = 0.0;
    for i in 0..n {
        let (xi, yi) = offset(&points[i]);
        let (xj, yj) = offset(&points[(i + 1) % n]);
        twice_area += xi * yj;
        twice_area -= xj * yi;
    }
    let square_degrees = (twice_area / 2.0).abs();

    let mean_latitude = ring_mean_latitude(points);
    let square_meters =
        square_degrees * METERS_PER_DEGREE.powi(2) * mean_latitude.to_radians().cos();

    square_meters / SQUARE_METERS_PER_HECTARE
}

fn same_position(a: &GeoPoint, b: &GeoPoint) -> bool {
    a.latitude() == b.latitude() && a.longitude() == b.longitude()
}

fn ring_mean_latitude(points: &[GeoPoint]) -> f64 {
    let n = points.len();
    let (sum, count) = (0..n)
        .filter(|&i| !same_position(&points[i], &points[(i + n - 1) % n]))
        .fold((0.0, 0usize), |(sum, count), i| {
            (sum + points[i].latitude(), count + 1)
        });

    if count == 0 {
        // every vertex is the same fix
        points[0].latitude()
    } else {
        sum / count as f64
    }
}

pub fn centroid(points: &[GeoPoint]) -> Option<Centroid> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points.iter().fold((0.0, 0.0), |(lat, lon), p| {
        (lat + p.latitude(), lon + p.longitude())
    });
    Some(Centroid {
        latitude: lat_sum / n,
        longitude: lon_sum / n,
    })
}
