//! Extraction settings and output path derivation.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::{FormatSelection, Layout, OutputFormat};
use crate::records::EntityKind;
use crate::records::translation::DEFAULT_LANGUAGE;

/// Everything one extraction run needs to know.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input: PathBuf,
    /// Output base path; derived from `input` when absent.
    pub output: Option<PathBuf>,
    pub formats: FormatSelection,
    pub layout: Layout,
    /// Preferred language for alert text.
    pub language: String,
    /// Prefix CSV files with a UTF-8 byte-order mark.
    pub excel_bom: bool,
    /// Keep feed order instead of sorting by entity id.
    pub preserve_order: bool,
}

impl ExtractConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        ExtractConfig {
            input: input.into(),
            output: None,
            formats: FormatSelection::Csv,
            layout: Layout::Combined,
            language: DEFAULT_LANGUAGE.to_string(),
            excel_bom: false,
            preserve_order: false,
        }
    }

    /// Path that output files are named after, without extension.
    ///
    /// An explicit output keeps its name minus a `.csv`/`.json` extension.
    /// Otherwise the input loses its extension, plus a `.pb` under `.gz`.
    pub fn output_base(&self) -> PathBuf {
        match &self.output {
            Some(output) => {
                if has_extension(output, OutputFormat::Csv.extension())
                    || has_extension(output, OutputFormat::Json.extension())
                {
                    output.with_extension("")
                } else {
                    output.clone()
                }
            }
            None => {
                let mut base = self.input.with_extension("");
                if has_extension(&self.input, "gz") && has_extension(&base, "pb") {
                    base = base.with_extension("");
                }
                base
            }
        }
    }

    /// File written for `format`, and for `kind` in the per-kind layout.
    pub fn output_path(&self, format: OutputFormat, kind: Option<EntityKind>) -> PathBuf {
        let mut name = OsString::from(self.output_base());
        if let Some(kind) = kind {
            name.push("_");
            name.push(kind.file_suffix());
        }
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }

    /// True when writing to `path` would replace the input feed.
    pub fn overwrites_input(&self, path: &Path) -> bool {
        if path == self.input {
            return true;
        }
        match (fs::canonicalize(path), fs::canonicalize(&self.input)) {
            (Ok(out), Ok(input)) => out == input,
            _ => false,
        }
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
