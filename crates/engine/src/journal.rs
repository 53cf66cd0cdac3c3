//! Trade journal - append-only, hash-chained JSONL
//!
//! Each line is a [`JournalRecord`] wrapping one [`EngineEvent`]. Records are
//! linked by SHA-256 so any edit or reordering is detected on restore.
//!
//! ```text
//! seq 1  prev=GENESIS  hash=H1  engine_initialized
//! seq 2  prev=H1       hash=H2  trade_recorded
//! seq 3  prev=H2       hash=H3  address_flagged
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ChainError, JournalError};
use crate::event::EngineEvent;

/// `prev_hash` of the first record
pub const GENESIS_HASH: &str = "GENESIS";

/// One committed event with its chain links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub sequence: u64,
    pub id: String,
    pub prev_hash: String,
    pub hash: String,
    pub recorded_at: DateTime<Utc>,
    pub event: EngineEvent,
}

/// SHA256 of record content (excluding the hash field itself)
pub fn calculate_record_hash(record: &JournalRecord) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    hasher.update(record.id.as_bytes());
    hasher.update(record.prev_hash.as_bytes());
    hasher.update(record.recorded_at.to_rfc3339().as_bytes());
    hasher.update(serde_json::to_string(&record.event)?.as_bytes());

    Ok(hex::encode(hasher.finalize()))
}

/// Verify hash chain integrity
pub fn verify_chain(records: &[JournalRecord]) -> Result<(), JournalError> {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, record) in records.iter().enumerate() {
        let expected_sequence = i as u64 + 1;
        if record.sequence != expected_sequence {
            return Err(ChainError::InvalidSequence {
                expected: expected_sequence,
                actual: record.sequence,
            }
            .into());
        }

        if record.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            }
            .into());
        }

        let calculated = calculate_record_hash(record)?;
        if record.hash != calculated {
            return Err(ChainError::InvalidHash {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            }
            .into());
        }

        prev_hash = record.hash.clone();
    }

    Ok(())
}

/// Parse every record in a journal file without verifying the chain
pub fn read_records(path: &Path) -> Result<Vec<JournalRecord>, JournalError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }

    Ok(records)
}

/// Append-only journal of engine events
///
/// The in-memory variant keeps the chain head but stores nothing; it is
/// used when the host owns durability.
pub struct TradeJournal {
    path: PathBuf,
    file: Option<File>,
    last_sequence: u64,
    last_hash: String,
    /// Set after a failed write; the file tail is unknown
    poisoned: bool,
}

impl TradeJournal {
    /// Open (or create) a journal at the given path
    ///
    /// Existing records are verified and the chain head restored.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut journal = Self {
            path,
            file: Some(file),
            last_sequence: 0,
            last_hash: GENESIS_HASH.to_string(),
            poisoned: false,
        };

        let records = journal.read_all()?;
        verify_chain(&records)?;
        if let Some(last) = records.last() {
            journal.last_sequence = last.sequence;
            journal.last_hash = last.hash.clone();
        }

        Ok(journal)
    }

    /// Create an in-memory journal (for testing and embedding)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            file: None,
            last_sequence: 0,
            last_hash: GENESIS_HASH.to_string(),
            poisoned: false,
        }
    }

    /// Chain, persist and return the record for `event`
    ///
    /// The chain head only advances once the line is written. Any I/O
    /// failure poisons the journal: later appends fail until it is reopened
    /// and the file re-verified.
    pub fn append(&mut self, event: &EngineEvent) -> Result<JournalRecord, JournalError> {
        if self.poisoned {
            return Err(JournalError::Poisoned);
        }

        let mut record = JournalRecord {
            sequence: self.last_sequence + 1,
            id: uuid::Uuid::new_v4().to_string(),
            prev_hash: self.last_hash.clone(),
            hash: String::new(),
            recorded_at: Utc::now(),
            event: event.clone(),
        };
        record.hash = calculate_record_hash(&record)?;

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        if let Some(ref mut file) = self.file {
            if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
                self.poisoned = true;
                tracing::error!(sequence = record.sequence, error = %e, "Journal write failed");
                return Err(e.into());
            }
        }

        self.last_sequence = record.sequence;
        self.last_hash = record.hash.clone();
        Ok(record)
    }

    /// Read all records from the journal
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, JournalError> {
        if self.file.is_none() {
            return Ok(Vec::new());
        }

        read_records(&self.path)
    }

    /// Sequence of the last committed record (0 when empty)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_in_memory(&self) -> bool {
        self.file.is_none()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}
