//! Packaging fetch outcomes into a single ZIP archive.

use super::fetch::FetchOutcome;
use crate::error::ArchiveError;
use crate::types::Status;
use std::collections::HashSet;
use std::io::Write;
use tracing::error;

/// Sink for archive entries
///
/// [`ZipArchiveWriter`] is the production implementation; the trait exists so
/// format-level write failures can be exercised in tests.
pub trait ArchiveWriter {
    /// Append one named entry
    fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError>;

    /// Finish the archive and return its bytes
    fn finish(self: Box<Self>) -> Result<Vec<u8>, ArchiveError>;
}

/// In-memory ZIP writer using Deflate compression
pub struct ZipArchiveWriter {
    zip: zip::ZipWriter<std::io::Cursor<Vec<u8>>>,
}

impl ZipArchiveWriter {
    /// Start an empty archive
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(std::io::Cursor::new(Vec::new())),
        }
    }
}

impl Default for ZipArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        if name.is_empty() {
            return Err(ArchiveError::InvalidEntryName(name.to_string()));
        }

        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        self.zip
            .start_file(name, options)
            .map_err(|e| ArchiveError::Entry {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.zip.write_all(data).map_err(|e| ArchiveError::Entry {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn finish(mut self: Box<Self>) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| ArchiveError::Finish(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// Final status, log and archive of one processing round
#[derive(Debug)]
pub struct Finalized {
    /// Terminal status: Completed, Partial or Error
    pub status: Status,
    /// One message per failed fetch, in link order
    pub log: Vec<String>,
    /// Archive bytes; `None` exactly when status is Error
    pub archive: Option<Vec<u8>>,
    /// Number of entries written
    pub entries: usize,
}

/// Write successful outcomes into `writer` and resolve the terminal status
///
/// Outcomes are handled in link order regardless of the order they arrive
/// in. Priority: any entry write failure gives Error (and no archive), else
/// any fetch failure gives Partial, else Completed. A write failure does not
/// stop the remaining outcomes from being processed.
pub fn finalize(mut outcomes: Vec<FetchOutcome>, mut writer: Box<dyn ArchiveWriter>) -> Finalized {
    outcomes.sort_by_key(|o| o.position);

    let mut names = EntryNames::default();
    let mut log = Vec::new();
    let mut write_failed = false;
    let mut entries = 0;

    for outcome in outcomes {
        match outcome.result {
            Ok(file) => {
                let name = names.claim(&file.filename);
                match writer.add_entry(&name, &file.data) {
                    Ok(()) => entries += 1,
                    Err(e) => {
                        error!(entry = %name, error = %e, "archive entry write failed");
                        write_failed = true;
                    }
                }
            }
            Err(e) => log.push(e.to_string()),
        }
    }

    let archive = if write_failed {
        None
    } else {
        match writer.finish() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "archive finalization failed");
                None
            }
        }
    };

    let status = match &archive {
        None => Status::Error,
        Some(_) if !log.is_empty() => Status::Partial,
        Some(_) => Status::Completed,
    };

    Finalized {
        status,
        log,
        archive,
        entries,
    }
}

/// Tracks entry names already used in one archive
///
/// The first claimant keeps a name; later ones get ` (n)` inserted before the
/// extension, with the smallest unused `n`.
#[derive(Default)]
struct EntryNames {
    used: HashSet<String>,
}

impl EntryNames {
    fn claim(&mut self, name: &str) -> String {
        if self.used.insert(name.to_string()) {
            return name.to_string();
        }

        let (stem, ext) = split_extension(name);
        let mut n = 1;
        loop {
            let candidate = format!("{} ({}){}", stem, n, ext);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Split `a.tar.png` into (`a.tar`, `.png`); names without a dot keep an empty extension
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
