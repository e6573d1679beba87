//! Rendering extracted records to CSV/JSON and writing them to disk.
//!
//! Every output is rendered in memory first, then all files are committed
//! together, so a failed run leaves no output behind.

mod csv_writer;
mod files;
mod json_writer;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::records::rows::{AlertRow, FeedRow, TripUpdateRow, VehiclePositionRow};
use crate::records::{EntityKind, Record};

pub use csv_writer::render_csv;
pub use files::commit;
pub use json_writer::render_json;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which formats to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatSelection {
    Csv,
    Json,
    Both,
}

impl FormatSelection {
    pub fn formats(self) -> &'static [OutputFormat] {
        match self {
            FormatSelection::Csv => &[OutputFormat::Csv],
            FormatSelection::Json => &[OutputFormat::Json],
            FormatSelection::Both => &[OutputFormat::Csv, OutputFormat::Json],
        }
    }
}

/// How records are split across files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// One file per format with every entity kind.
    Combined,
    /// One file per format per entity kind.
    PerKind,
}

/// An output file rendered in memory, ready to be committed.
#[derive(Debug)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Renders `records` to every file `config` asks for.
pub fn render(
    records: &[Record],
    config: &ExtractConfig,
) -> Result<Vec<RenderedFile>, ExtractError> {
    let mut rendered = Vec::new();

    for &format in config.formats.formats() {
        match config.layout {
            Layout::Combined => {
                let contents = match format {
                    OutputFormat::Csv => {
                        let rows: Vec<FeedRow> = records.iter().map(FeedRow::from).collect();
                        render_csv(&rows, config.excel_bom)?
                    }
                    OutputFormat::Json => render_json(records)?,
                };
                rendered.push(RenderedFile {
                    path: config.output_path(format, None),
                    contents,
                });
            }
            Layout::PerKind => {
                for kind in EntityKind::ALL {
                    let contents = render_kind(records, kind, format, config.excel_bom)?;
                    rendered.push(RenderedFile {
                        path: config.output_path(format, Some(kind)),
                        contents,
                    });
                }
            }
        }
    }

    for file in &rendered {
        debug!(path = %file.path.display(), bytes = file.contents.len(), "Output rendered");
    }

    Ok(rendered)
}

fn render_kind(
    records: &[Record],
    kind: EntityKind,
    format: OutputFormat,
    excel_bom: bool,
) -> Result<Vec<u8>, ExtractError> {
    match (kind, format) {
        (EntityKind::TripUpdate, OutputFormat::Csv) => {
            let rows: Vec<TripUpdateRow> = records
                .iter()
                .filter_map(|r| match r {
                    Record::TripUpdate(tu) => Some(TripUpdateRow::from(tu)),
                    _ => None,
                })
                .collect();
            render_csv(&rows, excel_bom)
        }
        (EntityKind::VehiclePosition, OutputFormat::Csv) => {
            let rows: Vec<VehiclePositionRow> = records
                .iter()
                .filter_map(|r| match r {
                    Record::VehiclePosition(vp) => Some(VehiclePositionRow::from(vp)),
                    _ => None,
                })
                .collect();
            render_csv(&rows, excel_bom)
        }
        (EntityKind::Alert, OutputFormat::Csv) => {
            let rows: Vec<AlertRow> = records
                .iter()
                .filter_map(|r| match r {
                    Record::Alert(alert) => Some(AlertRow::from(alert)),
                    _ => None,
                })
                .collect();
            render_csv(&rows, excel_bom)
        }
        (EntityKind::TripUpdate, OutputFormat::Json) => render_json(
            &records
                .iter()
                .filter_map(|r| match r {
                    Record::TripUpdate(tu) => Some(tu),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        ),
        (EntityKind::VehiclePosition, OutputFormat::Json) => render_json(
            &records
                .iter()
                .filter_map(|r| match r {
                    Record::VehiclePosition(vp) => Some(vp),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        ),
        (EntityKind::Alert, OutputFormat::Json) => render_json(
            &records
                .iter()
                .filter_map(|r| match r {
                    Record::Alert(alert) => Some(alert),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs_rt::{Alert, VehiclePosition};
    use crate::records::{AlertRecord, VehiclePositionRecord};

    fn sample_records() -> Vec<Record> {
        vec![
            Record::VehiclePosition(VehiclePositionRecord::new("v1", &VehiclePosition::default())),
            Record::Alert(AlertRecord::new("a1", &Alert::default(), "he")),
        ]
    }

    #[test]
    fn test_combined_both_formats() {
        let mut config = ExtractConfig::new("feed.pb");
        config.formats = FormatSelection::Both;

        let files = render(&sample_records(), &config).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("feed.csv"), PathBuf::from("feed.json")]);

        let csv = String::from_utf8(files[0].contents.clone()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_per_kind_writes_every_kind() {
        let mut config = ExtractConfig::new("feed.pb");
        config.layout = Layout::PerKind;
        config.formats = FormatSelection::Json;

        let files = render(&sample_records(), &config).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].path, PathBuf::from("feed_trip_updates.json"));

        let trip_updates: serde_json::Value = serde_json::from_slice(&files[0].contents).unwrap();
        assert_eq!(trip_updates, serde_json::json!([]));

        let alerts: serde_json::Value = serde_json::from_slice(&files[2].contents).unwrap();
        assert_eq!(alerts.as_array().unwrap().len(), 1);
        assert_eq!(alerts[0]["entity_id"], "a1");
        assert!(alerts[0].get("type").is_none());
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(FormatSelection::Both.formats().len(), 2);
        assert_eq!(FormatSelection::Json.formats(), &[OutputFormat::Json]);
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
