use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::PatientRecord;

/// Indexed table of patient identifier → medical record.
///
/// Identifiers are normalized (trimmed) exactly once at build time, never
/// at lookup time, so equality semantics stay stable: `"007"` and `"7"`
/// remain distinct keys.
pub struct PatientStore {
    records: HashMap<String, PatientRecord>,
}

impl PatientStore {
    /// Build the store from already-parsed records. Duplicate identifiers
    /// keep the last record seen.
    pub fn from_records(records: impl IntoIterator<Item = PatientRecord>) -> Self {
        let mut map = HashMap::new();
        for mut record in records {
            record.identifier = record.identifier.trim().to_string();
            if let Some(previous) = map.insert(record.identifier.clone(), record) {
                tracing::warn!(
                    identifier = %previous.identifier,
                    "duplicate patient identifier, keeping the later record"
                );
            }
        }
        Self { records: map }
    }

    /// Load every `*.csv` file in the data directory. Fails when the
    /// directory yields no records or a file lacks the required columns —
    /// the process must not start on a broken corpus.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut records = Vec::new();

        let entries = std::fs::read_dir(dir)
            .map_err(|e| Error::Ingest(format!("cannot read {}: {}", dir.display(), e)))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }

            let mut reader = csv::Reader::from_path(&path)?;
            let mut file_count = 0usize;
            for row in reader.deserialize::<PatientRecord>() {
                let record = row.map_err(|e| {
                    Error::Ingest(format!("{}: {}", path.display(), e))
                })?;
                records.push(record);
                file_count += 1;
            }
            tracing::debug!(file = %path.display(), rows = file_count, "loaded patient file");
        }

        if records.is_empty() {
            return Err(Error::Ingest(format!(
                "no patient records found under {}",
                dir.display()
            )));
        }

        let store = Self::from_records(records);
        tracing::info!(patients = store.len(), "patient store ready");
        Ok(store)
    }

    /// Exact string-equality lookup, O(1).
    pub fn lookup(&self, identifier: &str) -> Option<&PatientRecord> {
        self.records.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate all records (used by the index bootstrap).
    pub fn records(&self) -> impl Iterator<Item = &PatientRecord> {
        self.records.values()
    }
}
