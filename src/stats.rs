use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::gtfs_rt::FeedMessage;
use crate::gtfs_rt::feed_header::Incrementality;
use crate::records::EntityKind;

/// Header information and entity counts for one feed snapshot.
#[derive(Debug, Default, Serialize)]
pub struct FeedStats {
    pub gtfs_realtime_version: String,
    pub feed_version: Option<String>,
    pub incrementality: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub total_entities: usize,

    // entity kinds
    pub trip_updates: usize,
    pub vehicle_positions: usize,
    pub alerts: usize,

    pub deleted: usize,
    pub unsupported: usize,
}

impl FeedStats {
    pub fn from_feed(feed: &FeedMessage) -> Self {
        let header = &feed.header;
        let mut s = FeedStats {
            gtfs_realtime_version: header.gtfs_realtime_version.clone(),
            feed_version: header.feed_version.clone(),
            incrementality: header
                .incrementality
                .and_then(|raw| Incrementality::try_from(raw).ok())
                .unwrap_or(Incrementality::FullDataset)
                .as_str_name()
                .to_string(),
            timestamp: header
                .timestamp
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            total_entities: feed.entity.len(),
            ..Default::default()
        };

        for e in &feed.entity {
            if e.is_deleted.unwrap_or(false) {
                s.deleted += 1;
            }

            match EntityKind::of(e) {
                Some(EntityKind::TripUpdate) => s.trip_updates += 1,
                Some(EntityKind::VehiclePosition) => s.vehicle_positions += 1,
                Some(EntityKind::Alert) => s.alerts += 1,
                None => s.unsupported += 1,
            }
        }

        s
    }

    /// Number of entities that produce an output record.
    pub fn extracted(&self) -> usize {
        self.trip_updates + self.vehicle_positions + self.alerts
    }

    /// Logs the header fields and counts at info level.
    pub fn log(&self) {
        info!(
            version = %self.gtfs_realtime_version,
            feed_version = self.feed_version.as_deref().unwrap_or(""),
            incrementality = %self.incrementality,
            timestamp = ?self.timestamp,
            total_entities = self.total_entities,
            trip_updates = self.trip_updates,
            vehicle_positions = self.vehicle_positions,
            alerts = self.alerts,
            deleted = self.deleted,
            unsupported = self.unsupported,
            "Feed decoded"
        );
    }
}
