//! The decode, extract, render, write pipeline.

use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::gtfs_rt::FeedMessage;
use crate::output;
use crate::parser::read_feed;
use crate::records::Record;
use crate::stats::FeedStats;

/// Result of a successful extraction run.
#[derive(Debug)]
pub struct Extraction {
    pub stats: FeedStats,
    pub files: Vec<PathBuf>,
}

/// Builds one record per supported entity.
///
/// Records are sorted by entity id unless `preserve_order` is set; the sort
/// is stable so duplicate ids keep their feed order.
pub fn extract_records(feed: &FeedMessage, language: &str, preserve_order: bool) -> Vec<Record> {
    let mut records: Vec<Record> = feed
        .entity
        .iter()
        .filter_map(|entity| {
            let record = Record::from_entity(entity, language);
            if record.is_none() {
                debug!(entity_id = %entity.id, "Skipping entity without supported payload");
            }
            record
        })
        .collect();

    if !preserve_order {
        records.sort_by(|a, b| a.entity_id().cmp(b.entity_id()));
    }

    records
}

/// Runs the full pipeline for `config`.
///
/// Nothing is written unless the feed decodes and every output renders.
#[tracing::instrument(skip(config), fields(input = %config.input.display()))]
pub fn run(config: &ExtractConfig) -> Result<Extraction, ExtractError> {
    let feed = read_feed(&config.input)?;

    let stats = FeedStats::from_feed(&feed);
    stats.log();

    let records = extract_records(&feed, &config.language, config.preserve_order);
    debug!(records = records.len(), language = %config.language, "Entities extracted");

    let rendered = output::render(&records, config)?;
    if let Some(file) = rendered.iter().find(|f| config.overwrites_input(&f.path)) {
        return Err(ExtractError::WriteError {
            path: file.path.clone(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "output path is the input feed",
            ),
        });
    }
    let files = output::commit(rendered)?;

    info!(
        records = records.len(),
        files = files.len(),
        "Extraction complete"
    );

    Ok(Extraction { stats, files })
}
