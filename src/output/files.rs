use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::RenderedFile;
use crate::error::ExtractError;

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove output during rollback");
        }
    }
}

/// Writes every rendered file, or none of them.
///
/// Contents go to `<path>.partial` first and are renamed into place only
/// after all of them were written. On failure everything written by this
/// call is removed again.
pub fn commit(files: Vec<RenderedFile>) -> Result<Vec<PathBuf>, ExtractError> {
    let mut staged = Vec::with_capacity(files.len());

    for file in &files {
        let partial = partial_path(&file.path);
        if let Err(source) = fs::write(&partial, &file.contents) {
            remove_all(&staged);
            return Err(ExtractError::WriteError {
                path: file.path.clone(),
                source,
            });
        }
        staged.push(partial);
    }

    let mut committed = Vec::with_capacity(files.len());
    for (file, partial) in files.iter().zip(&staged) {
        if let Err(source) = fs::rename(partial, &file.path) {
            remove_all(&committed);
            remove_all(&staged[committed.len()..]);
            return Err(ExtractError::WriteError {
                path: file.path.clone(),
                source,
            });
        }
        committed.push(file.path.clone());
    }

    for path in &committed {
        info!(path = %path.display(), "Output file written");
    }

    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_commit_writes_all_files() {
        let a = temp_path("gtfs_rt_extract_commit_a.csv");
        let b = temp_path("gtfs_rt_extract_commit_a.json");

        let written = commit(vec![
            RenderedFile {
                path: a.clone(),
                contents: b"entity_id\n".to_vec(),
            },
            RenderedFile {
                path: b.clone(),
                contents: b"[]\n".to_vec(),
            },
        ])
        .unwrap();

        assert_eq!(written, vec![a.clone(), b.clone()]);
        assert_eq!(fs::read_to_string(&a).unwrap(), "entity_id\n");
        assert!(!partial_path(&a).exists());

        fs::remove_file(&a).unwrap();
        fs::remove_file(&b).unwrap();
    }

    #[test]
    fn test_commit_rolls_back_on_unwritable_path() {
        let good = temp_path("gtfs_rt_extract_commit_good.csv");
        let bad = temp_path("gtfs_rt_extract_no_such_dir").join("out.json");
        let _ = fs::remove_file(&good);

        let err = commit(vec![
            RenderedFile {
                path: good.clone(),
                contents: b"entity_id\n".to_vec(),
            },
            RenderedFile {
                path: bad,
                contents: b"[]\n".to_vec(),
            },
        ])
        .unwrap_err();

        assert_eq!(err.stage(), "write");
        assert!(!good.exists());
        assert!(!partial_path(&good).exists());
    }
}
