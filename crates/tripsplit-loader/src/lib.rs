//! Trip snapshot loader.
//!
//! A trip is stored as a single JSON document holding the roster, the
//! expense history, the optional budget and per-trip settings. This crate
//! reads and writes that document and resolves display options.
//!
//! # Features
//!
//! - JSON snapshot parsing into core types
//! - Id interning so repeated member ids share one allocation
//! - Write-then-rename saving
//! - Display currency resolution (command line, snapshot, environment)
//!
//! # Example
//!
//! ```ignore
//! use tripsplit_loader::load;
//! use std::path::Path;
//!
//! let snapshot = load(Path::new("lisbon.json"))?;
//! for debt in snapshot.debts() {
//!     println!("{debt}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod options;
mod snapshot;

pub use options::{CurrencySource, Options, CURRENCY_ENV};
pub use snapshot::{Settings, Snapshot, Trip};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tripsplit_core::{Expense, Member, Split, StringInterner};

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading a file.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid snapshot.
    #[error("invalid snapshot in {path}: {source}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying JSON error, with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot for {path}: {source}")]
    Encode {
        /// The destination path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// IO error writing a file.
    #[error("failed to write file {path}: {source}")]
    Write {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot loader.
///
/// Keeps an interner across loads so that every id read through the same
/// loader shares storage.
#[derive(Debug, Default)]
pub struct Loader {
    interner: StringInterner,
}

impl Loader {
    /// Create a new loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a file.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Io`] - Failed to read the file
    /// - [`LoadError::Parse`] - The file is not a valid snapshot
    pub fn load(&mut self, path: &Path) -> Result<Snapshot, LoadError> {
        let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let snapshot = self.parse(&text, path)?;
        tracing::info!(
            path = %path.display(),
            members = snapshot.members.len(),
            expenses = snapshot.expenses.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Parse snapshot text. `path` is only used for error messages.
    pub fn parse(&mut self, text: &str, path: &Path) -> Result<Snapshot, LoadError> {
        let snapshot: Snapshot = serde_json::from_str(text).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(self.intern(snapshot))
    }

    fn intern(&mut self, mut snapshot: Snapshot) -> Snapshot {
        snapshot.members = snapshot
            .members
            .into_iter()
            .map(|member| Member {
                id: self.interner.reintern(&member.id),
                ..member
            })
            .collect();
        snapshot.expenses = snapshot
            .expenses
            .into_iter()
            .map(|expense| self.intern_expense(expense))
            .collect();
        snapshot
    }

    fn intern_expense(&mut self, mut expense: Expense) -> Expense {
        expense.id = self.interner.reintern(&expense.id);
        expense.paid_by = self.interner.reintern(&expense.paid_by);
        for participant in &mut expense.participants {
            *participant = self.interner.reintern(participant);
        }
        if let Split::Uneven(shares) = &mut expense.split {
            *shares = std::mem::take(shares)
                .into_iter()
                .map(|(member, share)| (self.interner.reintern(&member), share))
                .collect();
        }
        expense
    }
}

/// Load a snapshot file.
///
/// This is a convenience function that creates a loader and loads a single file.
pub fn load(path: &Path) -> Result<Snapshot, LoadError> {
    Loader::new().load(path)
}

/// Save a snapshot as pretty-printed JSON.
///
/// The document is written to a sibling temporary file first and then
/// renamed over `path`, so a failed write never leaves a truncated snapshot.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<(), LoadError> {
    let mut text = serde_json::to_string_pretty(snapshot).map_err(|e| LoadError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;
    text.push('\n');

    let tmp = temp_path(path);
    let write_err = |source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, text).map_err(write_err)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(e));
    }

    tracing::info!(
        path = %path.display(),
        expenses = snapshot.expenses.len(),
        "saved snapshot"
    );
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "snapshot".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}
