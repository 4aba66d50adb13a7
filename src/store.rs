//! Flat-file shift store
//!
//! Persists the whole shift collection as a comma-separated text file with a
//! fixed header line. There is no quoting or escaping: a comma inside the
//! `entry`/`exit` markers would corrupt the row. Every operation reads or
//! rewrites the entire file; mutating callers must serialize through
//! `AppState::store_lock`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Header line written as the first line of the data file
pub const CSV_HEADER: &str = "id,entry,exit,RDO,RNO,RDDF,RNDF,HEDO,HENO,HEDDF,HENDF,rate";

const FIELDS_PER_ROW: usize = 12;

/// Store-level failures surfaced to the HTTP layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("shift file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed row at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// One shift record - the sole entity of the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: u64,
    pub entry: String,
    pub exit: String,
    pub breakdown: Breakdown,
    pub rate: f64,
}

/// Hour counters per labor category. The categories are opaque to this
/// service beyond being numeric; the JSON keys are the upstream spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(rename = "RDO")]
    pub rdo: f64,
    #[serde(rename = "RNO")]
    pub rno: f64,
    #[serde(rename = "RDDF")]
    pub rddf: f64,
    #[serde(rename = "RNDF")]
    pub rndf: f64,
    #[serde(rename = "HEDO")]
    pub hedo: f64,
    #[serde(rename = "HENO")]
    pub heno: f64,
    #[serde(rename = "HEDDF")]
    pub heddf: f64,
    #[serde(rename = "HENDF")]
    pub hendf: f64,
}

/// Flat-file backed persistence for the shift collection
pub struct ShiftStore {
    data_file: PathBuf,
}

impl ShiftStore {
    /// Create a store over the given data file path
    pub const fn new(data_file: PathBuf) -> Self {
        Self { data_file }
    }

    /// Path to the backing data file
    pub fn path(&self) -> &Path {
        &self.data_file
    }

    /// Create the data directory and a header-only data file when either is
    /// absent. Idempotent; creation failures propagate.
    pub async fn ensure_file(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.data_file.parent() {
            fs::create_dir_all(dir).await?;
        }
        if !fs::try_exists(&self.data_file).await? {
            fs::write(&self.data_file, format!("{CSV_HEADER}\n")).await?;
        }
        Ok(())
    }

    /// Read and decode the full collection, in file line order
    pub async fn read_all(&self) -> Result<Vec<Shift>, StoreError> {
        self.ensure_file().await?;
        let text = fs::read_to_string(&self.data_file).await?;
        parse_rows(&text)
    }

    /// Serialize the full collection and overwrite the file in one write
    pub async fn write_all(&self, shifts: &[Shift]) -> Result<(), StoreError> {
        self.ensure_file().await?;
        fs::write(&self.data_file, encode_rows(shifts)).await?;
        Ok(())
    }
}

/// Next id to assign: max existing id + 1, or 1 for an empty collection.
/// Ids are never backfilled, but deleting the current max frees that exact
/// value for the next insert since the max is recomputed from what remains.
pub fn next_id(shifts: &[Shift]) -> u64 {
    shifts.iter().map(|s| s.id).max().map_or(1, |max| max + 1)
}

/// Decode every line after the header. Blank lines are skipped; anything
/// else that is not a well-formed 12-field row is a hard error.
fn parse_rows(text: &str) -> Result<Vec<Shift>, StoreError> {
    let mut shifts = Vec::new();
    for (idx, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        shifts.push(parse_row(line).map_err(|reason| StoreError::Malformed {
            line: idx + 1,
            reason,
        })?);
    }
    Ok(shifts)
}

fn parse_row(line: &str) -> Result<Shift, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELDS_PER_ROW {
        return Err(format!(
            "expected {FIELDS_PER_ROW} fields, found {}",
            fields.len()
        ));
    }

    let id = fields[0]
        .parse::<u64>()
        .map_err(|e| format!("invalid id {:?}: {e}", fields[0]))?;
    let num = |i: usize| {
        fields[i]
            .parse::<f64>()
            .map_err(|e| format!("invalid number {:?} in field {}: {e}", fields[i], i + 1))
    };

    Ok(Shift {
        id,
        entry: fields[1].to_string(),
        exit: fields[2].to_string(),
        breakdown: Breakdown {
            rdo: num(3)?,
            rno: num(4)?,
            rddf: num(5)?,
            rndf: num(6)?,
            hedo: num(7)?,
            heno: num(8)?,
            heddf: num(9)?,
            hendf: num(10)?,
        },
        rate: num(11)?,
    })
}

fn encode_rows(shifts: &[Shift]) -> String {
    let mut out = String::with_capacity(64 * (shifts.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for s in shifts {
        let b = &s.breakdown;
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            s.id, s.entry, s.exit, b.rdo, b.rno, b.rddf, b.rndf, b.hedo, b.heno, b.heddf, b.hendf,
            s.rate
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_shift(id: u64) -> Shift {
        Shift {
            id,
            entry: "08:00".to_string(),
            exit: "16:00".to_string(),
            breakdown: Breakdown {
                rdo: 8.0,
                ..Breakdown::default()
            },
            rate: 15.5,
        }
    }

    fn temp_store() -> (ShiftStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ShiftStore::new(dir.path().join("data").join("shifts.csv"));
        (store, dir)
    }

    #[tokio::test]
    async fn test_ensure_file_creates_dir_and_header() {
        let (store, _dir) = temp_store();
        store.ensure_file().await.unwrap();

        let contents = fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(contents, format!("{CSV_HEADER}\n"));
    }

    #[tokio::test]
    async fn test_ensure_file_keeps_existing_contents() {
        let (store, _dir) = temp_store();
        store.write_all(&[sample_shift(1)]).await.unwrap();

        store.ensure_file().await.unwrap();

        let shifts = store.read_all().await.unwrap();
        assert_eq!(shifts, vec![sample_shift(1)]);
    }

    #[tokio::test]
    async fn test_read_all_empty_store() {
        let (store, _dir) = temp_store();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let (store, _dir) = temp_store();
        let shifts = vec![sample_shift(1), sample_shift(2)];

        store.write_all(&shifts).await.unwrap();

        assert_eq!(store.read_all().await.unwrap(), shifts);
    }

    #[tokio::test]
    async fn test_round_trip_is_stable_on_file_bytes() {
        let (store, _dir) = temp_store();
        store
            .write_all(&[sample_shift(1), sample_shift(2)])
            .await
            .unwrap();
        let before = fs::read_to_string(store.path()).await.unwrap();

        let shifts = store.read_all().await.unwrap();
        store.write_all(&shifts).await.unwrap();

        let after = fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_integer_hours_encode_without_fraction() {
        let (store, _dir) = temp_store();
        store.write_all(&[sample_shift(1)]).await.unwrap();

        let contents = fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(
            contents,
            format!("{CSV_HEADER}\n1,08:00,16:00,8,0,0,0,0,0,0,0,15.5\n")
        );
    }

    #[tokio::test]
    async fn test_blank_lines_between_rows_are_ignored() {
        let (store, _dir) = temp_store();
        store.ensure_file().await.unwrap();
        fs::write(
            store.path(),
            format!("{CSV_HEADER}\n1,08:00,16:00,8,0,0,0,0,0,0,0,15.5\n\n"),
        )
        .await
        .unwrap();

        let shifts = store.read_all().await.unwrap();
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].id, 1);
    }

    #[tokio::test]
    async fn test_malformed_numeric_field_is_rejected() {
        let (store, _dir) = temp_store();
        store.ensure_file().await.unwrap();
        fs::write(
            store.path(),
            format!("{CSV_HEADER}\n1,08:00,16:00,8,0,0,bogus,0,0,0,0,15.5\n"),
        )
        .await
        .unwrap();

        let err = store.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_short_row_is_rejected() {
        let (store, _dir) = temp_store();
        store.ensure_file().await.unwrap();
        fs::write(store.path(), format!("{CSV_HEADER}\n1,08:00,16:00\n"))
            .await
            .unwrap();

        let err = store.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_next_id_empty_collection() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn test_next_id_is_max_plus_one() {
        let shifts = vec![sample_shift(1), sample_shift(3)];
        assert_eq!(next_id(&shifts), 4);
    }

    #[test]
    fn test_next_id_reuses_deleted_max() {
        // Deleting the current max frees that value; interior gaps are not
        // backfilled.
        let shifts = vec![sample_shift(1)];
        assert_eq!(next_id(&shifts), 2);
    }
}
