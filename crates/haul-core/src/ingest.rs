//! Receipt payload parsing and batch loading
//!
//! A payload is one exported file: a JSON array of receipt objects.
//! Several payloads are concatenated in order into a single receipt list;
//! nothing is de-duplicated here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Receipt;

/// What to do when one file in a batch cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Report the file and keep going with the rest
    #[default]
    SkipInvalid,
    /// Abort the whole batch on the first bad file
    FailFast,
}

/// A file that contributed receipts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub receipts: usize,
}

/// A file that was rejected
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// All receipts from a batch of files, plus per-file outcomes
#[derive(Debug, Default)]
pub struct ReceiptBatch {
    pub receipts: Vec<Receipt>,
    pub loaded: Vec<LoadedFile>,
    pub failures: Vec<FileFailure>,
}

impl ReceiptBatch {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Parse one payload into typed receipts.
///
/// Fails when the payload is not valid JSON or its top-level value is not
/// an array. Array elements that are not objects are dropped.
///
/// A number literal outside the `f64` range (such as `1e400`) is a JSON
/// syntax error here, so the whole payload is rejected rather than one
/// field. Batch loading then applies its [`BatchPolicy`] to the file.
pub fn parse_receipts<R: Read>(reader: R) -> Result<Vec<Receipt>> {
    let value: Value = serde_json::from_reader(reader)?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(Error::InvalidPayload(format!(
                "expected a JSON array of receipts, found {}",
                json_type_name(&other)
            )))
        }
    };

    let mut receipts = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    for entry in entries {
        if !entry.is_object() {
            dropped += 1;
            continue;
        }
        receipts.push(serde_json::from_value::<Receipt>(entry)?);
    }

    if dropped > 0 {
        warn!("Dropped {} array entries that are not receipt objects", dropped);
    }
    debug!("Parsed {} receipts", receipts.len());
    Ok(receipts)
}

/// Parse one receipt file
pub fn load_file(path: &Path) -> Result<Vec<Receipt>> {
    let file = File::open(path)?;
    parse_receipts(BufReader::new(file))
}

/// Load and concatenate several receipt files in order
pub fn load_files<P: AsRef<Path>>(paths: &[P], policy: BatchPolicy) -> Result<ReceiptBatch> {
    let mut batch = ReceiptBatch::default();

    for path in paths {
        let path = path.as_ref();
        match load_file(path) {
            Ok(receipts) => {
                debug!("Loaded {} receipts from {}", receipts.len(), path.display());
                batch.loaded.push(LoadedFile {
                    path: path.to_path_buf(),
                    receipts: receipts.len(),
                });
                batch.receipts.extend(receipts);
            }
            Err(e) => {
                if policy == BatchPolicy::FailFast {
                    return Err(Error::Import(format!("{}: {}", path.display(), e)));
                }
                warn!("Skipping {}: {}", path.display(), e);
                batch.failures.push(FileFailure {
                    path: path.to_path_buf(),
                    error: e,
                });
            }
        }
    }

    Ok(batch)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
