use serde::Serialize;

use crate::gtfs_rt::VehiclePosition;
use crate::gtfs_rt::vehicle_position::{OccupancyStatus, VehicleStopStatus};

/// A vehicle's reported location and stop status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePositionRecord {
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

impl VehiclePositionRecord {
    pub fn new(entity_id: &str, vp: &VehiclePosition) -> Self {
        let trip = vp.trip.as_ref();
        let vehicle = vp.vehicle.as_ref();
        let position = vp.position.as_ref();

        VehiclePositionRecord {
            entity_id: entity_id.to_string(),
            trip_id: trip.and_then(|t| t.trip_id.clone()),
            route_id: trip.and_then(|t| t.route_id.clone()),
            vehicle_id: vehicle.and_then(|v| v.id.clone()),
            vehicle_label: vehicle.and_then(|v| v.label.clone()),
            latitude: position.map(|p| p.latitude),
            longitude: position.map(|p| p.longitude),
            bearing: position.and_then(|p| p.bearing),
            speed: position.and_then(|p| p.speed),
            current_stop_sequence: vp.current_stop_sequence,
            current_stop: vp.stop_id.clone(),
            // Unset or unknown enum values are left empty rather than defaulted.
            current_status: vp
                .current_status
                .and_then(|raw| VehicleStopStatus::try_from(raw).ok())
                .map(|s| s.as_str_name().to_string()),
            occupancy_status: vp
                .occupancy_status
                .and_then(|raw| OccupancyStatus::try_from(raw).ok())
                .map(|s| s.as_str_name().to_string()),
            timestamp: vp.timestamp,
        }
    }
}
