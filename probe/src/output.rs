//! Output dispatcher: writes selected text fields to files
//!
//! Each field is handled on its own. A field whose file cannot be opened or
//! written is reported and skipped; the remaining fields and the exit code
//! are unaffected.

use crate::config::OutputTargets;
use crate::error::OutputError;
use crate::extract::{QueryResult, TextField};
use log::{debug, error};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `value` to `path`, replacing any previous content.
///
/// Returns `Ok(false)` without touching the filesystem when no path is set.
pub fn write_field(
    label: &'static str,
    path: Option<&Path>,
    value: &[u8],
) -> Result<bool, OutputError> {
    let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(false);
    };

    let mut file = File::create(path).map_err(|source| OutputError::Open {
        label,
        path: path.to_path_buf(),
        source,
    })?;

    // The file is closed when it goes out of scope, written or not
    file.write_all(value)
        .and_then(|_| file.flush())
        .map_err(|source| OutputError::IncompleteWrite { label, source })?;

    debug!("Wrote {} ({} bytes) to {}", label, value.len(), path.display());
    Ok(true)
}

/// Writes every configured field and returns the failures, which have
/// already been logged.
pub fn dispatch(targets: &OutputTargets, result: &QueryResult) -> Vec<OutputError> {
    TextField::ALL
        .iter()
        .filter_map(|&field| {
            write_field(field.label(), targets.get(field), result.text(field))
                .err()
                .map(|e| {
                    error!("{}", e);
                    e
                })
        })
        .collect()
}
