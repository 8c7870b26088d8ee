use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use gtfs_structures::{Gtfs, Stop, Trip};
use itertools::Itertools;

use crate::tables::grouping::{self, Blocktable, Servicetable};

/// the frozen per-feed compilation state: the feed handle plus the two trip
/// grouping indices every builder queries. built once per feed load and never
/// mutated afterwards, so builder invocations for different keys are
/// independent reads.
pub struct FeedCompilationContext {
    gtfs: Arc<Gtfs>,
    /// block id -> Blocktable; `None` holds trips without a block assignment
    blocktables: HashMap<Option<String>, Blocktable>,
    /// service id -> flat Servicetable
    servicetables: HashMap<String, Servicetable>,
}

impl FeedCompilationContext {
    pub fn new(gtfs: Gtfs) -> FeedCompilationContext {
        Self::from_arc(Arc::new(gtfs))
    }

    pub fn from_arc(gtfs: Arc<Gtfs>) -> FeedCompilationContext {
        let mut blocktables: HashMap<Option<String>, Blocktable> = HashMap::new();
        let mut servicetables: HashMap<String, Servicetable> = HashMap::new();

        // the feed stores trips in a hash map with unspecified iteration
        // order; ingest in ascending trip id order so downstream insertion
        // order (the stable-sort tie order) reproduces across runs.
        for trip_id in gtfs.trips.keys().sorted() {
            let trip = Arc::new(ordered_trip(&gtfs.trips[trip_id]));
            grouping::add_trip_to_servicetable(&mut servicetables, trip.clone());
            grouping::add_trip_to_blocktable(&mut blocktables, trip);
        }
        log::info!(
            "grouped {} trips into {} blocktables and {} servicetables",
            gtfs.trips.len(),
            blocktables.len(),
            servicetables.len()
        );

        FeedCompilationContext {
            gtfs,
            blocktables,
            servicetables,
        }
    }

    pub fn gtfs(&self) -> &Gtfs {
        &self.gtfs
    }

    pub fn blocktable(&self, block_id: Option<&str>) -> Option<&Blocktable> {
        self.blocktables.get(&block_id.map(String::from))
    }

    /// blocktables in ascending block id order (`None` first), for
    /// deterministic walks over the whole index.
    pub fn blocktables_sorted(&self) -> impl Iterator<Item = &Blocktable> {
        self.blocktables
            .values()
            .sorted_by(|a, b| a.block_id.cmp(&b.block_id))
    }

    /// flat servicetables in ascending service id order.
    pub fn servicetables_sorted(&self) -> impl Iterator<Item = &Servicetable> {
        self.servicetables
            .values()
            .sorted_by(|a, b| a.service_id.cmp(&b.service_id))
    }

    /// resolves a rider-facing stop code to its stop. a miss is a valid
    /// "nothing scheduled" outcome, not an error.
    pub fn stop_by_code(&self, stop_code: &str) -> Option<Arc<Stop>> {
        self.gtfs
            .stops
            .values()
            .find(|stop| stop.code.as_deref() == Some(stop_code))
            .cloned()
    }

    pub fn trip(&self, trip_id: &str) -> Option<&Trip> {
        self.gtfs.trips.get(trip_id)
    }

    /// true when `date` falls inside the service's validity interval,
    /// inclusive on both endpoints. services defined only by dated exceptions
    /// carry no interval and never fail this test.
    pub fn service_valid_on(&self, service_id: &str, date: NaiveDate) -> bool {
        match self.gtfs.calendar.get(service_id) {
            Some(calendar) => calendar.start_date <= date && date <= calendar.end_date,
            None => true,
        }
    }

    /// overall feed validity range for report headers: feed_info when
    /// published, otherwise the envelope of all service validity intervals.
    pub fn feed_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        for feed_info in self.gtfs.feed_info.iter() {
            if let (Some(start), Some(end)) = (feed_info.start_date, feed_info.end_date) {
                return Some((start, end));
            }
        }
        let start = self.gtfs.calendar.values().map(|c| c.start_date).min()?;
        let end = self.gtfs.calendar.values().map(|c| c.end_date).max()?;
        Some((start, end))
    }
}

/// clones a trip with its stop times in stop_sequence order. feeds are
/// expected to arrive ordered, but the builders depend on it for first/last
/// clock bounds, so it is enforced at ingest.
fn ordered_trip(trip: &Trip) -> Trip {
    let mut ordered = trip.clone();
    ordered.stop_times.sort_by_key(|st| st.stop_sequence);
    ordered
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use gtfs_structures::Gtfs;

    use super::FeedCompilationContext;

    /// loads the riverside fixture feed from the repository root.
    pub(crate) fn fixture_context() -> FeedCompilationContext {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("riverside");
        let gtfs = Gtfs::new(
            fixture
                .to_str()
                .unwrap_or_else(|| panic!("failed to interpret {fixture:?} as string")),
        )
        .expect("riverside fixture should parse");
        FeedCompilationContext::new(gtfs)
    }

    #[test]
    fn test_each_trip_grouped_exactly_once() {
        let context = fixture_context();

        let mut block_seen: Vec<String> = Vec::new();
        for blocktable in context.blocktables_sorted() {
            let mut service_ids = HashSet::new();
            for servicetable in blocktable.servicetables_sorted() {
                // service ids are unique across a blocktable's subtables
                assert!(service_ids.insert(servicetable.service_id.clone()));
                for trip in &servicetable.trips {
                    block_seen.push(trip.id.clone());
                }
            }
        }
        let mut flat_seen: Vec<String> = Vec::new();
        for servicetable in context.servicetables_sorted() {
            for trip in &servicetable.trips {
                flat_seen.push(trip.id.clone());
            }
        }

        let n_trips = context.gtfs().trips.len();
        assert_eq!(block_seen.len(), n_trips);
        assert_eq!(flat_seen.len(), n_trips);
        assert_eq!(block_seen.iter().collect::<HashSet<_>>().len(), n_trips);
        assert_eq!(flat_seen.iter().collect::<HashSet<_>>().len(), n_trips);
    }

    #[test]
    fn test_no_block_trips_fall_into_degenerate_bucket() {
        let context = fixture_context();
        let no_block = context
            .blocktable(None)
            .expect("fixture has a trip without a block id");
        assert_eq!(no_block.block_label(), "");
        assert_eq!(no_block.trip_count(), 1);
    }

    #[test]
    fn test_stop_code_resolution() {
        let context = fixture_context();
        let stop = context.stop_by_code("1001").expect("known stop code");
        assert_eq!(stop.id, "S1");
        assert!(context.stop_by_code("9999").is_none());
    }
}
