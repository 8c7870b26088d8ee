//! small projections over feed trips and stop times shared by the builders.
use gtfs_structures::{PickupDropOffType, StopTime, Trip};

/// clock of the trip's first stop time, preferring its departure. GTFS allows
/// either clock value to be absent on intermediate stops; the remaining one
/// stands in for both.
pub fn first_departure(trip: &Trip) -> Option<u32> {
    trip.stop_times
        .first()
        .and_then(|st| st.departure_time.or(st.arrival_time))
}

/// clock of the trip's final stop time, preferring its arrival.
pub fn last_arrival(trip: &Trip) -> Option<u32> {
    trip.stop_times
        .last()
        .and_then(|st| st.arrival_time.or(st.departure_time))
}

/// (arrival, departure) clock pair for one stop time, falling back to the
/// other value when one is absent. `None` when the stop time carries neither.
pub fn stop_time_clock(stop_time: &StopTime) -> Option<(u32, u32)> {
    match (stop_time.arrival_time, stop_time.departure_time) {
        (Some(arrival), Some(departure)) => Some((arrival, departure)),
        (Some(arrival), None) => Some((arrival, arrival)),
        (None, Some(departure)) => Some((departure, departure)),
        (None, None) => None,
    }
}

/// true when neither pickup nor dropoff is available at this stop time.
pub fn unserviced(stop_time: &StopTime) -> bool {
    stop_time.pickup_type == PickupDropOffType::NotAvailable
        && stop_time.drop_off_type == PickupDropOffType::NotAvailable
}
