use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::records::rows::CsvRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Renders `rows` as UTF-8 CSV with a header row, even when `rows` is empty.
pub fn render_csv<R: CsvRow>(rows: &[R], excel_bom: bool) -> Result<Vec<u8>, ExtractError> {
    let buf = if excel_bom { UTF8_BOM.to_vec() } else { Vec::new() };

    let mut writer = WriterBuilder::new()
        .has_headers(false) // written explicitly below
        .from_writer(buf);

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExtractError::CsvError(csv::Error::from(e.into_error())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::rows::AlertRow;

    #[test]
    fn test_empty_rows_yield_header_only() {
        let bytes = render_csv::<AlertRow>(&[], false).unwrap();
        let content = String::from_utf8(bytes).unwrap();

        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("entity_id,active_periods"));
    }

    #[test]
    fn test_hebrew_text_is_preserved() {
        let row = AlertRow {
            entity_id: "a1".to_string(),
            cause: "STRIKE".to_string(),
            effect: "NO_SERVICE".to_string(),
            header_text: Some("שביתה, ללא שירות".to_string()),
            ..Default::default()
        };
        let bytes = render_csv(&[row], false).unwrap();
        let content = String::from_utf8(bytes).unwrap();

        // embedded comma forces quoting
        assert!(content.contains("\"שביתה, ללא שירות\""));
    }

    #[test]
    fn test_bom_prefix() {
        let bytes = render_csv::<AlertRow>(&[], true).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert!(!render_csv::<AlertRow>(&[], false).unwrap().starts_with(UTF8_BOM));
    }
}
