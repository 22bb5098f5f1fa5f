//! Waypoint sampling along a decoded route.
//!
//! A decoded route can hold thousands of points; searching around every
//! one would flood the station collaborator. Sampling keeps roughly one
//! point per `spacing_km` of travel.

use crate::domain::GeoPoint;

/// Default spacing between sampled waypoints.
pub const DEFAULT_SAMPLE_SPACING_KM: f64 = 100.0;

/// Downsample `points` to waypoints about `spacing_km` apart.
///
/// The first point is always kept. Planar distance accumulates pair by
/// pair; once it reaches `spacing_km` the current point is kept and the
/// accumulator resets. The final point is appended if it was not the
/// last one kept.
///
/// # Examples
///
/// ```
/// use hos_server::domain::GeoPoint;
/// use hos_server::route::sample_waypoints;
///
/// let points: Vec<_> = (0..=10)
///     .map(|i| GeoPoint::new(40.0 + f64::from(i) * 0.5, -100.0).unwrap())
///     .collect();
///
/// // Every 0.5° is 55.5 km, so every second point crosses 100 km.
/// let sampled = sample_waypoints(&points, 100.0);
/// assert_eq!(sampled.len(), 6);
/// ```
pub fn sample_waypoints(points: &[GeoPoint], spacing_km: f64) -> Vec<GeoPoint> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut sampled = vec![*first];
    let mut last_kept = 0;
    let mut accumulated_km = 0.0;

    for (offset, pair) in points.windows(2).enumerate() {
        accumulated_km += pair[1].planar_km_from(&pair[0]);
        if accumulated_km >= spacing_km {
            sampled.push(pair[1]);
            last_kept = offset + 1;
            accumulated_km = 0.0;
        }
    }

    if last_kept != rest.len() {
        sampled.push(points[points.len() - 1]);
    }

    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn empty_route() {
        assert!(sample_waypoints(&[], 100.0).is_empty());
    }

    #[test]
    fn single_point() {
        let p = point(10.0, 10.0);
        assert_eq!(sample_waypoints(&[p], 100.0), vec![p]);
    }

    #[test]
    fn short_route_keeps_only_endpoints() {
        // 0.1° steps along a meridian: 11.1 km each, 44.4 km in total.
        let points: Vec<_> = (0..5).map(|i| point(35.0 + f64::from(i) * 0.1, -97.0)).collect();
        let sampled = sample_waypoints(&points, 100.0);
        assert_eq!(sampled, vec![points[0], points[4]]);
    }

    #[test]
    fn keeps_points_at_spacing() {
        // 1° steps: 111 km each, so every point is kept.
        let points: Vec<_> = (0..4).map(|i| point(30.0 + f64::from(i), -90.0)).collect();
        assert_eq!(sample_waypoints(&points, 100.0), points);
    }

    #[test]
    fn final_point_not_duplicated() {
        let points = vec![point(30.0, -90.0), point(31.0, -90.0)];
        let sampled = sample_waypoints(&points, 100.0);
        assert_eq!(sampled, points);
    }

    #[test]
    fn accumulator_resets_after_each_kept_point() {
        // 60 km steps: kept at 120 km, then again 120 km later.
        let step = 60.0 / 111.0;
        let points: Vec<_> = (0..6)
            .map(|i| point(20.0 + f64::from(i) * step, 0.0))
            .collect();
        let sampled = sample_waypoints(&points, 100.0);
        assert_eq!(sampled, vec![points[0], points[2], points[4], points[5]]);
    }

    proptest! {
        #[test]
        fn endpoints_always_kept(
            lats in prop::collection::vec(-60.0f64..60.0, 1..40),
            spacing in 1.0f64..500.0,
        ) {
            let points: Vec<_> = lats.iter().map(|&lat| point(lat, 0.0)).collect();
            let sampled = sample_waypoints(&points, spacing);

            prop_assert_eq!(sampled.first(), points.first());
            prop_assert_eq!(sampled.last(), points.last());
            prop_assert!(sampled.len() <= points.len());
        }
    }
}
