// jsonl.rs — Append-only JSONL record logs with a SHA-256 hash chain.
//
// Each entity kind gets its own file under the store directory:
//
//   animals.jsonl    one Animal per line
//   sightings.jsonl  one Sighting per line
//   reports.jsonl    one Report per line
//
// Every line wraps the record in an envelope:
//
//   {"previous_hash": "<sha256 of the previous raw line>", "record": {...}}
//
// The first line has `previous_hash: null`. Editing, inserting or deleting
// any earlier line breaks the chain, which `verify_chain` reports.
//
// The files are the source of truth; on open they are replayed into an
// in-memory `Tables` cache that answers all reads.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::hasher;
use crate::memory::Tables;
use crate::model::{Animal, AnimalId, AnimalRef, NewAnimal, Report, Sighting};
use crate::store::RecordStore;

pub const ANIMALS_FILE: &str = "animals.jsonl";
pub const SIGHTINGS_FILE: &str = "sightings.jsonl";
pub const REPORTS_FILE: &str = "reports.jsonl";

#[derive(Serialize)]
struct LineOut<'a, T> {
    previous_hash: Option<&'a str>,
    record: &'a T,
}

#[derive(Deserialize)]
struct LineIn<T> {
    previous_hash: Option<String>,
    record: T,
}

/// One append-only, hash-chained JSONL file.
///
/// Each record is written unbuffered as a single line. A failed write is
/// truncated away before `append` returns, so the file only ever holds
/// acknowledged records.
pub struct ChainedLog {
    file: File,
    path: PathBuf,
    /// Hash of the last line written, linked from the next one.
    last_hash: Option<String>,
}

impl ChainedLog {
    /// Open (or create) a log, recovering the chain head from existing lines.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        // Recover the chain head so new lines link to what is on disk.
        let last_hash = if path.exists() {
            Self::read_last_hash(&path)?
        } else {
            None
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            file,
            path,
            last_hash,
        })
    }

    /// Append one record, chained to the previous line.
    ///
    /// On error nothing of the record remains in the file and the chain head
    /// is unchanged, so the next append links to the last good line.
    pub fn append<T: Serialize>(&mut self, record: &T) -> Result<(), StoreError> {
        let line = serde_json::to_string(&LineOut {
            previous_hash: self.last_hash.as_deref(),
            record,
        })?;

        // Remember where the good data ends in case the write is cut short.
        let committed_len = self.file.metadata()?.len();

        let mut bytes = line.clone().into_bytes();
        bytes.push(b'\n');
        if let Err(e) = self.file.write_all(&bytes).and_then(|()| self.file.flush()) {
            // Drop any partial line so it cannot resurface behind the next one.
            if let Err(rollback) = self.file.set_len(committed_len) {
                tracing::error!(
                    path = %self.path.display(),
                    error = %rollback,
                    "failed to roll back partial append"
                );
            }
            return Err(e.into());
        }

        // Advance the chain head only once the whole line is written.
        self.last_hash = Some(hasher::hash_line(&line));
        Ok(())
    }

    /// Read every record in file order. A missing file reads as empty.
    pub fn read_all<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for line in Self::lines(path)? {
            let line = line?;
            let parsed: LineIn<T> = serde_json::from_str(&line)?;
            records.push(parsed.record);
        }
        Ok(records)
    }

    /// Check every `previous_hash` link. Returns the number of records.
    pub fn verify_chain(path: impl AsRef<Path>) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let mut previous_hash: Option<String> = None;
        let mut count = 0;

        for (line_num, line) in Self::numbered_lines(path)? {
            let line = line?;
            // Records are opaque here; only the envelope matters.
            let parsed: LineIn<serde_json::Value> = serde_json::from_str(&line)?;

            // Each line must link to the hash of the one before it.
            if parsed.previous_hash != previous_hash {
                return Err(StoreError::IntegrityViolation {
                    path: path.to_path_buf(),
                    line: line_num,
                    expected: previous_hash.unwrap_or_else(|| "None".to_string()),
                    actual: parsed.previous_hash.unwrap_or_else(|| "None".to_string()),
                });
            }

            // Hash the raw line, not a re-serialization (field order may differ).
            previous_hash = Some(hasher::hash_line(&line));
            count += 1;
        }

        Ok(count)
    }

    fn read_last_hash(path: &Path) -> Result<Option<String>, StoreError> {
        let mut last_line = None;
        for line in Self::lines(path)? {
            last_line = Some(line?);
        }
        Ok(last_line.map(|line| hasher::hash_line(&line)))
    }

    /// Non-blank lines, with read errors tagged by path.
    fn lines(
        path: &Path,
    ) -> Result<impl Iterator<Item = Result<String, StoreError>>, StoreError> {
        Ok(Self::numbered_lines(path)?.map(|(_, line)| line))
    }

    /// Non-blank lines paired with their 1-based line number.
    fn numbered_lines(
        path: &Path,
    ) -> Result<impl Iterator<Item = (usize, Result<String, StoreError>)>, StoreError> {
        let file = File::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let owned = path.to_path_buf();

        Ok(BufReader::new(file)
            .lines()
            .enumerate()
            .map(move |(idx, line)| {
                let line = line.map_err(|source| StoreError::ReadFailed {
                    path: owned.clone(),
                    source,
                });
                (idx + 1, line)
            })
            .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty())))
    }
}

struct JsonlState {
    animals: ChainedLog,
    sightings: ChainedLog,
    reports: ChainedLog,
    tables: Tables,
}

/// A RecordStore backed by three hash-chained JSONL files in one directory.
///
/// Writes go to the file first and only then into the cache, so a failed
/// append never shows up in reads.
pub struct JsonlRecordStore {
    state: Mutex<JsonlState>,
}

impl JsonlRecordStore {
    /// Open the store in `dir`, creating the directory if needed and
    /// replaying any existing logs.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::OpenFailed {
            path: dir.clone(),
            source,
        })?;

        // Replay every log into the read cache before taking the writers.
        let tables = Tables {
            animals: ChainedLog::read_all(dir.join(ANIMALS_FILE))?,
            sightings: ChainedLog::read_all(dir.join(SIGHTINGS_FILE))?,
            reports: ChainedLog::read_all(dir.join(REPORTS_FILE))?,
        };

        tracing::debug!(
            dir = %dir.display(),
            animals = tables.animals.len(),
            sightings = tables.sightings.len(),
            reports = tables.reports.len(),
            "opened record store"
        );

        // Writers pick up each chain head where replay left off.
        let state = JsonlState {
            animals: ChainedLog::open(dir.join(ANIMALS_FILE))?,
            sightings: ChainedLog::open(dir.join(SIGHTINGS_FILE))?,
            reports: ChainedLog::open(dir.join(REPORTS_FILE))?,
            tables,
        };

        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Verify the hash chain of every log present in `dir`.
    ///
    /// Returns `(path, record_count)` for each log that exists.
    pub fn verify(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, usize)>, StoreError> {
        let dir = dir.as_ref();
        let mut verified = Vec::new();
        for name in [ANIMALS_FILE, SIGHTINGS_FILE, REPORTS_FILE] {
            let path = dir.join(name);
            if path.exists() {
                let count = ChainedLog::verify_chain(&path)?;
                verified.push((path, count));
            }
        }
        Ok(verified)
    }

    fn state(&self) -> Result<MutexGuard<'_, JsonlState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl RecordStore for JsonlRecordStore {
    fn create_animal(&self, animal: NewAnimal) -> Result<Animal, StoreError> {
        let mut state = self.state()?;
        // Id allocation and append share the lock, so ids stay unique.
        let animal = animal.into_animal(state.tables.next_animal_id(), Utc::now());
        state.animals.append(&animal)?;
        state.tables.animals.push(animal.clone());
        Ok(animal)
    }

    fn create_sighting(&self, sighting: &Sighting) -> Result<(), StoreError> {
        let mut state = self.state()?;
        state.sightings.append(sighting)?;
        state.tables.sightings.push(sighting.clone());
        Ok(())
    }

    fn create_report(&self, report: &Report) -> Result<(), StoreError> {
        let mut state = self.state()?;
        state.reports.append(report)?;
        state.tables.reports.push(report.clone());
        Ok(())
    }

    fn get_animal(&self, id: AnimalId) -> Result<Option<Animal>, StoreError> {
        Ok(self.state()?.tables.animal(id))
    }

    fn list_animals(&self) -> Result<Vec<Animal>, StoreError> {
        Ok(self.state()?.tables.animals.clone())
    }

    fn list_sightings(&self, animal: &AnimalRef) -> Result<Vec<Sighting>, StoreError> {
        Ok(self.state()?.tables.sightings_for(animal))
    }

    fn list_pending_sightings(&self) -> Result<Vec<Sighting>, StoreError> {
        Ok(self.state()?.tables.pending_sightings())
    }

    fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.state()?.tables.reports.clone())
    }
}
