use serde::Serialize;

use crate::gtfs_rt::TripUpdate;
use crate::gtfs_rt::trip_descriptor::ScheduleRelationship as TripScheduleRelationship;
use crate::gtfs_rt::trip_update::stop_time_update::ScheduleRelationship as StopScheduleRelationship;
use crate::gtfs_rt::trip_update::{StopTimeEvent, StopTimeUpdate};

/// Predicted arrival or departure at a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTimeEventRecord {
    pub time: Option<i64>,
    pub scheduled_time: Option<i64>,
    pub delay: Option<i32>,
    pub uncertainty: Option<i32>,
}

impl From<&StopTimeEvent> for StopTimeEventRecord {
    fn from(e: &StopTimeEvent) -> Self {
        StopTimeEventRecord {
            time: e.time,
            scheduled_time: e.scheduled_time,
            delay: e.delay,
            uncertainty: e.uncertainty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTimeUpdateRecord {
    pub stop_sequence: Option<u32>,
    pub stop_id: Option<String>,
    pub arrival: Option<StopTimeEventRecord>,
    pub departure: Option<StopTimeEventRecord>,
    pub schedule_relationship: String,
}

impl From<&StopTimeUpdate> for StopTimeUpdateRecord {
    fn from(stu: &StopTimeUpdate) -> Self {
        StopTimeUpdateRecord {
            stop_sequence: stu.stop_sequence,
            stop_id: stu.stop_id.clone(),
            arrival: stu.arrival.as_ref().map(StopTimeEventRecord::from),
            departure: stu.departure.as_ref().map(StopTimeEventRecord::from),
            schedule_relationship: stu
                .schedule_relationship
                .and_then(|raw| StopScheduleRelationship::try_from(raw).ok())
                .unwrap_or(StopScheduleRelationship::Scheduled)
                .as_str_name()
                .to_string(),
        }
    }
}

impl StopTimeUpdateRecord {
    /// Flattened `stop:arrival-departure` form used in CSV output.
    ///
    /// The stop is named by id, or by `#<sequence>` when the id is missing.
    pub fn flatten(&self) -> String {
        let stop = match (&self.stop_id, self.stop_sequence) {
            (Some(id), _) => id.clone(),
            (None, Some(seq)) => format!("#{seq}"),
            (None, None) => String::new(),
        };
        let time = |e: &Option<StopTimeEventRecord>| {
            e.as_ref()
                .and_then(|e| e.time)
                .map(|t| t.to_string())
                .unwrap_or_default()
        };
        format!("{}:{}-{}", stop, time(&self.arrival), time(&self.departure))
    }
}

/// A trip update with its stop time predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripUpdateRecord {
    pub entity_id: String,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<u32>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub schedule_relationship: String,
    pub vehicle_id: Option<String>,
    pub timestamp: Option<u64>,
    pub delay: Option<i32>,
    pub stop_time_updates: Vec<StopTimeUpdateRecord>,
}

impl TripUpdateRecord {
    pub fn new(entity_id: &str, tu: &TripUpdate) -> Self {
        let trip = &tu.trip;
        TripUpdateRecord {
            entity_id: entity_id.to_string(),
            trip_id: trip.trip_id.clone(),
            route_id: trip.route_id.clone(),
            direction_id: trip.direction_id,
            start_date: trip.start_date.clone(),
            start_time: trip.start_time.clone(),
            schedule_relationship: trip
                .schedule_relationship
                .and_then(|raw| TripScheduleRelationship::try_from(raw).ok())
                .unwrap_or(TripScheduleRelationship::Scheduled)
                .as_str_name()
                .to_string(),
            vehicle_id: tu.vehicle.as_ref().and_then(|v| v.id.clone()),
            timestamp: tu.timestamp,
            delay: tu.delay,
            stop_time_updates: tu
                .stop_time_update
                .iter()
                .map(StopTimeUpdateRecord::from)
                .collect(),
        }
    }

    /// All stop updates flattened and joined with `; `.
    pub fn stop_updates(&self) -> String {
        self.stop_time_updates
            .iter()
            .map(StopTimeUpdateRecord::flatten)
            .collect::<Vec<_>>()
            .join("; ")
    }
}
