//! Flat CSV rows built from extracted records.
//!
//! Repeated fields (stop updates, active periods, informed entities) are
//! collapsed into delimited strings so every entity occupies one row.

use serde::Serialize;

use super::{AlertRecord, Record, TripUpdateRecord, VehiclePositionRecord};

/// A serializable CSV row with a fixed column set.
///
/// `HEADERS` must list the serialized field names in declaration order; the
/// header row is written from it so empty outputs still carry the columns.
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// One row of the combined layout, holding any entity kind.
#[derive(Debug, Default, Serialize)]
pub struct FeedRow {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub schedule_relationship: Option<String>,
    pub stop_updates: Option<String>,
    pub vehicle_id: Option<String>,
    pub vehicle_label: Option<String>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    pub bearing: Option<f32>,
    pub speed: Option<f32>,
    pub current_stop: Option<String>,
    pub current_status: Option<String>,
    pub timestamp: Option<u64>,
    pub active_periods: Option<String>,
    pub informed_entities: Option<String>,
    pub cause: Option<String>,
    pub effect: Option<String>,
    pub header_text: Option<String>,
    pub description_text: Option<String>,
}

impl CsvRow for FeedRow {
    const HEADERS: &'static [&'static str] = &[
        "entity_id",
        "type",
        "trip_id",
        "route_id",
        "schedule_relationship",
        "stop_updates",
        "vehicle_id",
        "vehicle_label",
        "latitude",
        "longitude",
        "bearing",
        "speed",
        "current_stop",
        "current_status",
        "timestamp",
        "active_periods",
        "informed_entities",
        "cause",
        "effect",
        "header_text",
        "description_text",
    ];
}

impl From<&Record> for FeedRow {
    fn from(record: &Record) -> Self {
        let kind = record.kind().as_str();
        match record {
            Record::TripUpdate(tu) => FeedRow {
                entity_id: tu.entity_id.clone(),
                kind,
                trip_id: tu.trip_id.clone(),
                route_id: tu.route_id.clone(),
                schedule_relationship: Some(tu.schedule_relationship.clone()),
                stop_updates: non_empty(tu.stop_updates()),
                vehicle_id: tu.vehicle_id.clone(),
                timestamp: tu.timestamp,
                ..Default::default()
            },
            Record::VehiclePosition(vp) => FeedRow {
                entity_id: vp.entity_id.clone(),
                kind,
                trip_id: vp.trip_id.clone(),
                route_id: vp.route_id.clone(),
                vehicle_id: vp.vehicle_id.clone(),
                vehicle_label: vp.vehicle_label.clone(),
                latitude: vp.latitude,
                longitude: vp.longitude,
                bearing: vp.bearing,
                speed: vp.speed,
                current_stop: vp.current_stop.clone(),
                current_status: vp.current_status.clone(),
                timestamp: vp.timestamp,
                ..Default::default()
            },
            Record::Alert(alert) => FeedRow {
                entity_id: alert.entity_id.clone(),
                kind,
                active_periods: non_empty(alert.active_periods_flat()),
                informed_entities: non_empty(alert.informed_entities_flat()),
                cause: Some(alert.cause.clone()),
                effect: Some(alert.effect.clone()),
                header_text: alert.header_text.clone(),
                description_text: alert.description_text.clone(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct TripUpdateRow {
    pub entity_id: String,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<u32>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub schedule_relationship: String,
    pub vehicle_id: Option<String>,
    pub delay: Option<i32>,
    pub stop_updates: String,
    pub timestamp: Option<u64>,
}

impl CsvRow for TripUpdateRow {
    const HEADERS: &'static [&'static str] = &[
        "entity_id",
        "trip_id",
        "route_id",
        "direction_id",
        "start_date",
        "start_time",
        "schedule_relationship",
        "vehicle_id",
        "delay",
        "stop_updates",
        "timestamp",
    ];
}

impl From<&TripUpdateRecord> for TripUpdateRow {
    fn from(tu: &TripUpdateRecord) -> Self {
        TripUpdateRow {
            entity_id: tu.entity_id.clone(),
            trip_id: tu.trip_id.clone(),
            route_id: tu.route_id.clone(),
            direction_id: tu.direction_id,
            start_date: tu.start_date.clone(),
            start_time: tu.start_time.clone(),
            schedule_relationship: tu.schedule_relationship.clone(),
            vehicle_id: tu.vehicle_id.clone(),
            delay: tu.delay,
            stop_updates: tu.stop_updates(),
            timestamp: tu.timestamp,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct VehiclePositionRow {
    pub entity_id: String,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub vehicle_label: Option<String>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    pub bearing: Option<f32>,
    pub speed: Option<f32>,
    pub current_stop_sequence: Option<u32>,
    pub current_stop: Option<String>,
    pub current_status: Option<String>,
    pub occupancy_status: Option<String>,
    pub timestamp: Option<u64>,
}

impl CsvRow for VehiclePositionRow {
    const HEADERS: &'static [&'static str] = &[
        "entity_id",
        "trip_id",
        "route_id",
        "vehicle_id",
        "vehicle_label",
        "latitude",
        "longitude",
        "bearing",
        "speed",
        "current_stop_sequence",
        "current_stop",
        "current_status",
        "occupancy_status",
        "timestamp",
    ];
}

impl From<&VehiclePositionRecord> for VehiclePositionRow {
    fn from(vp: &VehiclePositionRecord) -> Self {
        VehiclePositionRow {
            entity_id: vp.entity_id.clone(),
            trip_id: vp.trip_id.clone(),
            route_id: vp.route_id.clone(),
            vehicle_id: vp.vehicle_id.clone(),
            vehicle_label: vp.vehicle_label.clone(),
            latitude: vp.latitude,
            longitude: vp.longitude,
            bearing: vp.bearing,
            speed: vp.speed,
            current_stop_sequence: vp.current_stop_sequence,
            current_stop: vp.current_stop.clone(),
            current_status: vp.current_status.clone(),
            occupancy_status: vp.occupancy_status.clone(),
            timestamp: vp.timestamp,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct AlertRow {
    pub entity_id: String,
    pub active_periods: String,
    pub informed_entities: String,
    pub cause: String,
    pub effect: String,
    pub severity_level: Option<String>,
    pub header_text: Option<String>,
    pub description_text: Option<String>,
    pub url: Option<String>,
}

impl CsvRow for AlertRow {
    const HEADERS: &'static [&'static str] = &[
        "entity_id",
        "active_periods",
        "informed_entities",
        "cause",
        "effect",
        "severity_level",
        "header_text",
        "description_text",
        "url",
    ];
}

impl From<&AlertRecord> for AlertRow {
    fn from(alert: &AlertRecord) -> Self {
        AlertRow {
            entity_id: alert.entity_id.clone(),
            active_periods: alert.active_periods_flat(),
            informed_entities: alert.informed_entities_flat(),
            cause: alert.cause.clone(),
            effect: alert.effect.clone(),
            severity_level: alert.severity_level.clone(),
            header_text: alert.header_text.clone(),
            description_text: alert.description_text.clone(),
            url: alert.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Header row csv would derive from the struct's field names.
    fn derived_header<R: CsvRow + Default>() -> String {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(R::default()).unwrap();
        let bytes = writer.into_inner().unwrap();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_headers_match_serialized_fields() {
        assert_eq!(derived_header::<FeedRow>(), FeedRow::HEADERS.join(","));
        assert_eq!(
            derived_header::<TripUpdateRow>(),
            TripUpdateRow::HEADERS.join(",")
        );
        assert_eq!(
            derived_header::<VehiclePositionRow>(),
            VehiclePositionRow::HEADERS.join(",")
        );
        assert_eq!(derived_header::<AlertRow>(), AlertRow::HEADERS.join(","));
    }

    #[test]
    fn test_feed_row_leaves_foreign_columns_empty() {
        let record = Record::VehiclePosition(VehiclePositionRecord::new(
            "v1",
            &crate::gtfs_rt::VehiclePosition::default(),
        ));
        let row = FeedRow::from(&record);

        assert_eq!(row.kind, "vehicle_position");
        assert_eq!(row.entity_id, "v1");
        assert_eq!(row.schedule_relationship, None);
        assert_eq!(row.cause, None);
        assert_eq!(row.stop_updates, None);
    }
}
