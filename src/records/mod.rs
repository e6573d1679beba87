//! Normalized records extracted from GTFS-RT feed entities.
//!
//! Each supported entity kind maps to a nested record (serialized as JSON)
//! and to a flat row (serialized as CSV, see [`rows`]).

pub mod alert;
pub mod rows;
pub mod translation;
pub mod trip_update;
pub mod vehicle;

use serde::Serialize;

use crate::gtfs_rt::FeedEntity;

pub use alert::AlertRecord;
pub use trip_update::TripUpdateRecord;
pub use vehicle::VehiclePositionRecord;

/// The entity payloads this tool extracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    TripUpdate,
    VehiclePosition,
    Alert,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::TripUpdate,
        EntityKind::VehiclePosition,
        EntityKind::Alert,
    ];

    /// Classifies an entity by its first populated payload.
    ///
    /// Trip updates win over vehicle positions, which win over alerts.
    pub fn of(entity: &FeedEntity) -> Option<EntityKind> {
        if entity.trip_update.is_some() {
            Some(EntityKind::TripUpdate)
        } else if entity.vehicle.is_some() {
            Some(EntityKind::VehiclePosition)
        } else if entity.alert.is_some() {
            Some(EntityKind::Alert)
        } else {
            None
        }
    }

    /// Value of the `type` column and JSON tag.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::TripUpdate => "trip_update",
            EntityKind::VehiclePosition => "vehicle_position",
            EntityKind::Alert => "alert",
        }
    }

    /// Suffix appended to output file names in the per-kind layout.
    pub fn file_suffix(self) -> &'static str {
        match self {
            EntityKind::TripUpdate => "trip_updates",
            EntityKind::VehiclePosition => "vehicle_positions",
            EntityKind::Alert => "alerts",
        }
    }
}

/// One extracted entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    TripUpdate(TripUpdateRecord),
    VehiclePosition(VehiclePositionRecord),
    Alert(AlertRecord),
}

impl Record {
    /// Builds a record from `entity`, or `None` for unsupported entities.
    pub fn from_entity(entity: &FeedEntity, language: &str) -> Option<Record> {
        match EntityKind::of(entity)? {
            EntityKind::TripUpdate => entity
                .trip_update
                .as_ref()
                .map(|tu| Record::TripUpdate(TripUpdateRecord::new(&entity.id, tu))),
            EntityKind::VehiclePosition => entity
                .vehicle
                .as_ref()
                .map(|vp| Record::VehiclePosition(VehiclePositionRecord::new(&entity.id, vp))),
            EntityKind::Alert => entity
                .alert
                .as_ref()
                .map(|alert| Record::Alert(AlertRecord::new(&entity.id, alert, language))),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Record::TripUpdate(_) => EntityKind::TripUpdate,
            Record::VehiclePosition(_) => EntityKind::VehiclePosition,
            Record::Alert(_) => EntityKind::Alert,
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            Record::TripUpdate(r) => &r.entity_id,
            Record::VehiclePosition(r) => &r.entity_id,
            Record::Alert(r) => &r.entity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs_rt::{Alert, TripDescriptor, TripUpdate, VehiclePosition};

    #[test]
    fn test_kind_of_empty_entity() {
        let entity = FeedEntity {
            id: "e1".to_string(),
            ..Default::default()
        };
        assert_eq!(EntityKind::of(&entity), None);
        assert!(Record::from_entity(&entity, "he").is_none());
    }

    #[test]
    fn test_trip_update_takes_precedence() {
        let entity = FeedEntity {
            id: "e1".to_string(),
            trip_update: Some(TripUpdate {
                trip: TripDescriptor::default(),
                ..Default::default()
            }),
            vehicle: Some(VehiclePosition::default()),
            alert: Some(Alert::default()),
            ..Default::default()
        };
        assert_eq!(EntityKind::of(&entity), Some(EntityKind::TripUpdate));
    }

    #[test]
    fn test_vehicle_before_alert() {
        let entity = FeedEntity {
            id: "e2".to_string(),
            vehicle: Some(VehiclePosition::default()),
            alert: Some(Alert::default()),
            ..Default::default()
        };
        let record = Record::from_entity(&entity, "he").unwrap();
        assert_eq!(record.kind(), EntityKind::VehiclePosition);
        assert_eq!(record.entity_id(), "e2");
    }

    #[test]
    fn test_record_json_is_tagged() {
        let entity = FeedEntity {
            id: "a1".to_string(),
            alert: Some(Alert::default()),
            ..Default::default()
        };
        let record = Record::from_entity(&entity, "he").unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "alert");
        assert_eq!(value["entity_id"], "a1");
    }
}
