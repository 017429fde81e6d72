//! Where expense records live between two runs.
//!
//! Stores only know how to hand out a snapshot of every record and to replace
//! them all at once. Each snapshot carries a revision, and a write made on top of
//! an outdated revision is refused: two people editing the expenses at the same
//! time can't silently overwrite each other.

use crate::settlement::{Amount, ExpenseRecord};

use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

/// Optimistic concurrency token. Bumped on every successful write.
pub type Revision = u64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("expenses changed since they were read (expected revision {expected}, found {found})")]
    Conflict { expected: Revision, found: Revision },

    #[error("there is no expense #{index} ({len} recorded)")]
    NoSuchRecord { index: usize, len: usize },

    #[error("{0} is not part of the group")]
    UnknownParticipant(String),

    #[error("expense rejected: {0}")]
    Rejected(&'static str),

    #[error("unable to access the expenses file: {0}")]
    Io(#[from] io::Error),

    #[error("unable to read or write the expenses document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every record, as of `revision`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub records: Vec<ExpenseRecord>,
    pub revision: Revision,
}

pub trait RecordStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError>;

    /// Replace every record, unless somebody else wrote since `expected`.
    /// Returns the new revision.
    fn commit(
        &mut self,
        records: Vec<ExpenseRecord>,
        expected: Revision,
    ) -> Result<Revision, StoreError>;
}

/// Keeps the records in memory. Mostly useful for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new(records: Vec<ExpenseRecord>) -> Self {
        Self {
            snapshot: Snapshot {
                records,
                revision: 0,
            },
        }
    }
}

impl RecordStore for MemoryStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(self.snapshot.clone())
    }

    fn commit(
        &mut self,
        records: Vec<ExpenseRecord>,
        expected: Revision,
    ) -> Result<Revision, StoreError> {
        check_revision(expected, self.snapshot.revision)?;

        self.snapshot = Snapshot {
            records,
            revision: self.snapshot.revision + 1,
        };
        Ok(self.snapshot.revision)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    revision: Revision,
    expenses: Vec<ExpenseRecord>,
}

// Earlier versions wrote a bare list of expenses, without any revision.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Versioned(Document),
    Legacy(Vec<ExpenseRecord>),
}

/// Keeps the records in a JSON document on disk.
///
/// A missing file is an empty store at revision 0: it gets created on the first write.
///
/// The file isn't locked. The revision check catches a writer that read an old
/// document, but two processes committing at the very same moment can both pass
/// it: only one process may write to a given file at a time.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Document, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} doesn't exist yet, starting empty", self.path.display());
                return Ok(Document {
                    revision: 0,
                    expenses: Vec::new(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        Ok(match serde_json::from_str(&content)? {
            OnDisk::Versioned(document) => document,
            OnDisk::Legacy(expenses) => Document {
                revision: 0,
                expenses,
            },
        })
    }

    // Write to a sibling file first, then move it over the document, so that a
    // crash mid-write never leaves half a document behind.
    fn write(&self, document: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        let written = Self::write_to(&tmp, document)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(StoreError::from));
        if written.is_err() {
            // Best effort: the original error is the one worth reporting.
            let _ = fs::remove_file(&tmp);
        }

        written
    }

    fn write_to(path: &Path, document: &Document) -> Result<(), StoreError> {
        let mut file = fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, document)?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl RecordStore for JsonFileStore {
    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let document = self.read()?;
        Ok(Snapshot {
            records: document.expenses,
            revision: document.revision,
        })
    }

    fn commit(
        &mut self,
        records: Vec<ExpenseRecord>,
        expected: Revision,
    ) -> Result<Revision, StoreError> {
        let current = self.read()?;
        check_revision(expected, current.revision)?;

        let document = Document {
            revision: current.revision + 1,
            expenses: records,
        };
        self.write(&document)?;
        debug!(
            "wrote {} expenses to {} at revision {}",
            document.expenses.len(),
            self.path.display(),
            document.revision
        );

        Ok(document.revision)
    }
}

fn check_revision(expected: Revision, found: Revision) -> Result<(), StoreError> {
    if expected != found {
        return Err(StoreError::Conflict { expected, found });
    }
    Ok(())
}

/// The group's expenses: a store plus the rules for what may go into it.
pub struct ExpenseBook<S> {
    store: S,

    // Empty means anybody may record an expense.
    roster: Vec<String>,
}

impl<S: RecordStore> ExpenseBook<S> {
    pub fn new(store: S, roster: Vec<String>) -> Self {
        Self { store, roster }
    }

    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        self.store.snapshot()
    }

    /// Record a new expense on top of revision `expected`.
    ///
    /// Only expenses with a payer from the roster and a strictly positive amount
    /// are accepted.
    pub fn append(
        &mut self,
        record: ExpenseRecord,
        expected: Revision,
    ) -> Result<Revision, StoreError> {
        self.check(&record)?;

        let mut snapshot = self.fresh_snapshot(expected)?;
        info!("{} spent {} for {}", record.payer(), record.amount(), record.memo());
        snapshot.records.push(record);

        self.store.commit(snapshot.records, expected)
    }

    /// Record several expenses at once; nothing is written if any of them is refused.
    pub fn extend(
        &mut self,
        records: Vec<ExpenseRecord>,
        expected: Revision,
    ) -> Result<Revision, StoreError> {
        for record in &records {
            self.check(record)?;
        }

        let mut snapshot = self.fresh_snapshot(expected)?;
        info!("importing {} expenses", records.len());
        snapshot.records.extend(records);

        self.store.commit(snapshot.records, expected)
    }

    /// Delete the expense at `index`, as numbered in revision `expected`.
    pub fn delete(&mut self, index: usize, expected: Revision) -> Result<Revision, StoreError> {
        let mut snapshot = self.fresh_snapshot(expected)?;
        if index >= snapshot.records.len() {
            return Err(StoreError::NoSuchRecord {
                index,
                len: snapshot.records.len(),
            });
        }

        let removed = snapshot.records.remove(index);
        info!("deleted expense #{}: {} for {}", index, removed.payer(), removed.memo());

        self.store.commit(snapshot.records, expected)
    }

    /// Forget every expense.
    pub fn reset(&mut self, expected: Revision) -> Result<Revision, StoreError> {
        let snapshot = self.fresh_snapshot(expected)?;
        info!("clearing {} expenses", snapshot.records.len());

        self.store.commit(Vec::new(), expected)
    }

    // Indices only mean something within the revision the caller looked at.
    fn fresh_snapshot(&self, expected: Revision) -> Result<Snapshot, StoreError> {
        let snapshot = self.store.snapshot()?;
        check_revision(expected, snapshot.revision)?;
        Ok(snapshot)
    }

    fn check(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
        if record.payer().trim().is_empty() {
            return Err(StoreError::Rejected("missing payer"));
        }
        if record.amount() <= Amount::ZERO {
            return Err(StoreError::Rejected("amount must be greater than zero"));
        }
        if record.memo().trim().is_empty() {
            return Err(StoreError::Rejected("missing reason"));
        }
        if !self.roster.is_empty() && !self.roster.iter().any(|name| name == record.payer()) {
            return Err(StoreError::UnknownParticipant(record.payer().to_owned()));
        }

        Ok(())
    }
}
