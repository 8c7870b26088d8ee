use std::collections::HashMap;
use std::sync::Arc;

use gtfs_structures::Trip;
use itertools::Itertools;

/// trips sharing one calendar service id.
#[derive(Debug, Clone)]
pub struct Servicetable {
    pub service_id: String,
    pub trips: Vec<Arc<Trip>>,
}

impl Servicetable {
    pub fn new(service_id: &str) -> Servicetable {
        Servicetable {
            service_id: service_id.to_string(),
            trips: Vec::new(),
        }
    }
}

/// all trips sharing one block id, subgrouped by service id. trips without a
/// block id are grouped under the `None` key; that is a normal bucket, not an
/// error.
#[derive(Debug, Clone)]
pub struct Blocktable {
    pub block_id: Option<String>,
    /// service id -> Servicetable. service ids are unique across the
    /// subtables by construction.
    pub servicetables: HashMap<String, Servicetable>,
}

impl Blocktable {
    pub fn new(block_id: Option<&str>) -> Blocktable {
        Blocktable {
            block_id: block_id.map(String::from),
            servicetables: HashMap::new(),
        }
    }

    /// the block id as rendered in reports; no-block trips show an empty id.
    pub fn block_label(&self) -> &str {
        self.block_id.as_deref().unwrap_or_default()
    }

    /// servicetables in ascending service id order, for deterministic walks.
    pub fn servicetables_sorted(&self) -> impl Iterator<Item = &Servicetable> {
        self.servicetables
            .values()
            .sorted_by(|a, b| a.service_id.cmp(&b.service_id))
    }

    pub fn trip_count(&self) -> usize {
        self.servicetables.values().map(|st| st.trips.len()).sum()
    }
}

/// appends a trip to the blocktable for its block id, creating the blocktable
/// and the nested servicetable as needed. lookup is map-keyed on both levels.
pub fn add_trip_to_blocktable(
    blocktables: &mut HashMap<Option<String>, Blocktable>,
    trip: Arc<Trip>,
) {
    let blocktable = blocktables
        .entry(trip.block_id.clone())
        .or_insert_with(|| Blocktable::new(trip.block_id.as_deref()));
    let servicetable = blocktable
        .servicetables
        .entry(trip.service_id.clone())
        .or_insert_with(|| Servicetable::new(&trip.service_id));
    servicetable.trips.push(trip);
}

/// the single-level equivalent keyed only by service id, used by the stop
/// timetable builder.
pub fn add_trip_to_servicetable(
    servicetables: &mut HashMap<String, Servicetable>,
    trip: Arc<Trip>,
) {
    let servicetable = servicetables
        .entry(trip.service_id.clone())
        .or_insert_with(|| Servicetable::new(&trip.service_id));
    servicetable.trips.push(trip);
}
