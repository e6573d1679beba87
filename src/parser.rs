//! Protobuf parser for GTFS Realtime feeds.

use std::io::{ErrorKind, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use prost::Message;
use tracing::debug;

use crate::error::ExtractError;
use crate::gtfs_rt::FeedMessage;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`] from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid protobuf for a `FeedMessage`.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedMessage, prost::DecodeError> {
    FeedMessage::decode(bytes)
}

/// Checks the fields the schema marks `required`, which prost does not enforce.
///
/// Without this an empty file decodes to an empty, header-less feed.
pub fn check_required(feed: &FeedMessage) -> Result<(), String> {
    if feed.header.gtfs_realtime_version.is_empty() {
        return Err("missing required header.gtfs_realtime_version".to_string());
    }
    if let Some(pos) = feed.entity.iter().position(|e| e.id.is_empty()) {
        return Err(format!("missing required entity.id at entity {pos}"));
    }
    Ok(())
}

/// Returns true when `bytes` start with the gzip magic number.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Reads and decodes the feed stored at `path`.
///
/// Gzip-compressed files are decompressed before decoding.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn read_feed(path: &Path) -> Result<FeedMessage, ExtractError> {
    let raw = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ExtractError::FileNotFound(path.to_path_buf()),
        _ => ExtractError::ReadError {
            path: path.to_path_buf(),
            source,
        },
    })?;
    debug!(bytes = raw.len(), "Feed bytes read");

    let bytes = if is_gzip(&raw) {
        let mut decompressed = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(|e| ExtractError::DecodeError {
                path: path.to_path_buf(),
                message: format!("corrupt gzip stream: {e}"),
            })?;
        debug!(bytes = decompressed.len(), "Gzip input decompressed");
        decompressed
    } else {
        raw
    };

    let feed = parse_feed(&bytes).map_err(|e| ExtractError::DecodeError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    check_required(&feed).map_err(|message| ExtractError::DecodeError {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs_rt::{FeedEntity, FeedHeader, TripDescriptor, TripUpdate};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_feed() -> FeedMessage {
        FeedMessage {
            header: FeedHeader {
                gtfs_realtime_version: "2.0".to_string(),
                timestamp: Some(1234567890),
                incrementality: None,
                feed_version: None,
            },
            entity: vec![FeedEntity {
                id: "tu-1".to_string(),
                trip_update: Some(TripUpdate {
                    trip: TripDescriptor {
                        trip_id: Some("t1".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_read_feed_rejects_empty_file() {
        let path = temp_path("gtfs_rt_extract_parser_zero.pb");
        fs::write(&path, b"").unwrap();

        let err = read_feed(&path).unwrap_err();
        assert_eq!(err.stage(), "decode");
        assert!(err.to_string().contains("gtfs_realtime_version"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_feed_rejects_entity_without_header() {
        // a single FeedEntity { id: "x" } and no header
        let path = temp_path("gtfs_rt_extract_parser_no_header.pb");
        fs::write(&path, [0x12, 0x03, 0x0a, 0x01, b'x']).unwrap();

        let err = read_feed(&path).unwrap_err();
        assert!(matches!(err, ExtractError::DecodeError { .. }));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_check_required_entity_id() {
        let mut feed = sample_feed();
        assert!(check_required(&feed).is_ok());

        feed.entity[0].id.clear();
        assert_eq!(
            check_required(&feed).unwrap_err(),
            "missing required entity.id at entity 0"
        );
    }

    #[test]
    fn test_parse_overrunning_length_prefix() {
        // header claims five bytes, only one follows
        assert!(parse_feed(&[0x0a, 0x05, 0x0a]).is_err());
    }

    #[test]
    fn test_unknown_entity_payload_is_skipped() {
        // header "2.0", entity "s1" carrying field 6 (experimental shape)
        let bytes = [
            0x0a, 0x05, 0x0a, 0x03, b'2', b'.', b'0', 0x12, 0x06, 0x0a, 0x02, b's', b'1', 0x32,
            0x00,
        ];
        let feed = parse_feed(&bytes).unwrap();

        assert!(check_required(&feed).is_ok());
        assert_eq!(feed.entity[0].id, "s1");
        assert_eq!(crate::records::EntityKind::of(&feed.entity[0]), None);
    }

    #[test]
    fn test_parse_valid_minimal_feed() {
        let encoded = sample_feed().encode_to_vec();
        let parsed = parse_feed(&encoded).unwrap();

        assert_eq!(parsed.header.gtfs_realtime_version, "2.0");
        assert_eq!(parsed.header.timestamp, Some(1234567890));
        assert_eq!(parsed.entity.len(), 1);
    }

    #[test]
    fn test_reencoding_reproduces_message() {
        let feed = sample_feed();
        let decoded = parse_feed(&feed.encode_to_vec()).unwrap();
        let reencoded = parse_feed(&decoded.encode_to_vec()).unwrap();
        assert_eq!(decoded, feed);
        assert_eq!(reencoded, feed);
    }

    #[test]
    fn test_read_feed_missing_file() {
        let path = temp_path("gtfs_rt_extract_parser_missing.pb");
        let _ = fs::remove_file(&path);

        let err = read_feed(&path).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound(_)));
    }

    #[test]
    fn test_read_feed_gzip_matches_plain() {
        let plain_path = temp_path("gtfs_rt_extract_parser_plain.pb");
        let gz_path = temp_path("gtfs_rt_extract_parser_gz.pb.gz");
        let encoded = sample_feed().encode_to_vec();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&encoded).unwrap();
        fs::write(&plain_path, &encoded).unwrap();
        fs::write(&gz_path, encoder.finish().unwrap()).unwrap();

        let plain = read_feed(&plain_path).unwrap();
        let gz = read_feed(&gz_path).unwrap();
        assert_eq!(plain, gz);

        fs::remove_file(&plain_path).unwrap();
        fs::remove_file(&gz_path).unwrap();
    }

    #[test]
    fn test_read_feed_truncated_gzip_is_decode_error() {
        let path = temp_path("gtfs_rt_extract_parser_truncated.pb.gz");
        fs::write(&path, [0x1f, 0x8b, 0x08, 0x00]).unwrap();

        let err = read_feed(&path).unwrap_err();
        assert_eq!(err.stage(), "decode");

        fs::remove_file(&path).unwrap();
    }
}
