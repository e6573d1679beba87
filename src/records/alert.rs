use serde::Serialize;

use super::translation::{TranslationRecord, all_translations, select_text};
use crate::gtfs_rt::alert::SeverityLevel;
use crate::gtfs_rt::{Alert, EntitySelector, TimeRange};

/// A window during which an alert is shown. Missing bounds are open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePeriodRecord {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl From<&TimeRange> for ActivePeriodRecord {
    fn from(range: &TimeRange) -> Self {
        ActivePeriodRecord {
            start: range.start,
            end: range.end,
        }
    }
}

impl ActivePeriodRecord {
    fn flatten(&self) -> String {
        let bound = |b: Option<u64>| b.map(|v| v.to_string()).unwrap_or_default();
        format!("{}-{}", bound(self.start), bound(self.end))
    }
}

/// A route, stop, trip or agency affected by an alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformedEntityRecord {
    pub agency_id: Option<String>,
    pub route_id: Option<String>,
    pub route_type: Option<i32>,
    pub trip_id: Option<String>,
    pub stop_id: Option<String>,
    pub direction_id: Option<u32>,
}

impl From<&EntitySelector> for InformedEntityRecord {
    fn from(sel: &EntitySelector) -> Self {
        InformedEntityRecord {
            agency_id: sel.agency_id.clone(),
            route_id: sel.route_id.clone(),
            route_type: sel.route_type,
            trip_id: sel.trip.as_ref().and_then(|t| t.trip_id.clone()),
            stop_id: sel.stop_id.clone(),
            direction_id: sel.direction_id,
        }
    }
}

impl InformedEntityRecord {
    fn flatten(&self) -> String {
        let mut parts = Vec::new();
        if let Some(route_id) = &self.route_id {
            parts.push(format!("route_id={route_id}"));
        }
        if let Some(stop_id) = &self.stop_id {
            parts.push(format!("stop_id={stop_id}"));
        }
        if let Some(agency_id) = &self.agency_id {
            parts.push(format!("agency_id={agency_id}"));
        }
        if let Some(trip_id) = &self.trip_id {
            parts.push(format!("trip_id={trip_id}"));
        }
        if let Some(route_type) = self.route_type {
            parts.push(format!("route_type={route_type}"));
        }
        if let Some(direction_id) = self.direction_id {
            parts.push(format!("direction_id={direction_id}"));
        }
        parts.join(" | ")
    }
}

/// A service alert with its text resolved to the preferred language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub entity_id: String,
    pub active_periods: Vec<ActivePeriodRecord>,
    pub informed_entities: Vec<InformedEntityRecord>,
    pub cause: String,
    pub effect: String,
    pub severity_level: Option<String>,
    pub header_text: Option<String>,
    pub description_text: Option<String>,
    pub url: Option<String>,
    pub header_translations: Vec<TranslationRecord>,
    pub description_translations: Vec<TranslationRecord>,
}

impl AlertRecord {
    pub fn new(entity_id: &str, alert: &Alert, language: &str) -> Self {
        AlertRecord {
            entity_id: entity_id.to_string(),
            active_periods: alert
                .active_period
                .iter()
                .map(ActivePeriodRecord::from)
                .collect(),
            informed_entities: alert
                .informed_entity
                .iter()
                .map(InformedEntityRecord::from)
                .collect(),
            cause: alert.cause().as_str_name().to_string(),
            effect: alert.effect().as_str_name().to_string(),
            severity_level: alert
                .severity_level
                .and_then(|raw| SeverityLevel::try_from(raw).ok())
                .map(|s| s.as_str_name().to_string()),
            header_text: select_text(alert.header_text.as_ref(), language),
            description_text: select_text(alert.description_text.as_ref(), language),
            url: select_text(alert.url.as_ref(), language),
            header_translations: all_translations(alert.header_text.as_ref()),
            description_translations: all_translations(alert.description_text.as_ref()),
        }
    }

    /// Active periods flattened to `start-end` and joined with `; `.
    pub fn active_periods_flat(&self) -> String {
        self.active_periods
            .iter()
            .map(ActivePeriodRecord::flatten)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Informed entities flattened to `key=value | ...` and joined with `; `.
    pub fn informed_entities_flat(&self) -> String {
        self.informed_entities
            .iter()
            .map(InformedEntityRecord::flatten)
            .collect::<Vec<_>>()
            .join("; ")
    }
}
