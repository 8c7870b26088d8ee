use gtfs_structures::TimepointType;
use serde::Serialize;

use crate::tables::context::FeedCompilationContext;

/// one stop visited by a trip, flattened for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct StopPoint {
    pub stop_id: String,
    pub stop_code: Option<String>,
    pub stop_name: Option<String>,
    pub stop_sequence: u32,
    pub timing_point: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_traveled: Option<f32>,
}

/// the stop points of one trip in call order, optionally filtered to timing
/// points. an unknown trip id yields an empty list.
pub fn find_stop_points(
    context: &FeedCompilationContext,
    trip_id: &str,
    timing_points_only: bool,
) -> Vec<StopPoint> {
    let Some(trip) = context.trip(trip_id) else {
        return Vec::new();
    };
    trip.stop_times
        .iter()
        .map(|stop_time| StopPoint {
            stop_id: stop_time.stop.id.clone(),
            stop_code: stop_time.stop.code.clone(),
            stop_name: stop_time.stop.name.clone(),
            stop_sequence: stop_time.stop_sequence,
            timing_point: stop_time.timepoint == TimepointType::Exact,
            latitude: stop_time.stop.latitude,
            longitude: stop_time.stop.longitude,
            distance_traveled: stop_time.shape_dist_traveled,
        })
        .filter(|point| !timing_points_only || point.timing_point)
        .collect()
}

#[cfg(test)]
mod test {
    use super::find_stop_points;
    use crate::tables::context::test::fixture_context;

    #[test]
    fn test_stop_points_follow_call_order() {
        let context = fixture_context();
        let points = find_stop_points(&context, "T01", false);
        let ids: Vec<&str> = points.iter().map(|p| p.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        assert_eq!(points[0].stop_code.as_deref(), Some("1001"));
    }

    #[test]
    fn test_timing_point_filter() {
        let context = fixture_context();
        let points = find_stop_points(&context, "T01", true);
        let ids: Vec<&str> = points.iter().map(|p| p.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["S1"]);
    }

    #[test]
    fn test_unknown_trip_yields_empty_list() {
        let context = fixture_context();
        assert!(find_stop_points(&context, "no-such-trip", false).is_empty());
    }
}
