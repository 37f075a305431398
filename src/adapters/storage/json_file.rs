//! Single-document JSON file backend.
//!
//! The whole collection is one JSON document. Every mutation writes a new
//! document to a sibling temp file and renames it over the original, and
//! the in-memory image is only updated once that rename succeeded.

use crate::core::{Commission, CommissionBackend, CommissionDraft, CommissionId, Result};
use crate::domain::calendar::{DayKey, TimeReference};
use crate::utils::error::DailiesError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    version: u32,
    time_reference: TimeReference,
    next_id: i64,
    commissions: Vec<Commission>,
}

impl Document {
    fn empty(time_reference: TimeReference) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            time_reference,
            next_id: 1,
            commissions: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    document: Document,
}

impl JsonFileBackend {
    /// Opens the document at `path`, creating an empty one when missing.
    pub fn open<P: AsRef<Path>>(path: P, time_reference: TimeReference) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let document = if path.exists() {
            let document = read_document(&path)?;
            if document.time_reference != time_reference {
                return Err(DailiesError::ConfigError {
                    message: format!(
                        "{} stores days in {} time but {} was configured",
                        path.display(),
                        document.time_reference,
                        time_reference
                    ),
                });
            }
            tracing::debug!(
                "Read {} commissions from {}",
                document.commissions.len(),
                path.display()
            );
            document
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let document = Document::empty(time_reference);
            write_document(&path, &document)?;
            tracing::info!("Created new commission file at {}", path.display());
            document
        };

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, candidate: Document) -> Result<()> {
        write_document(&self.path, &candidate)?;
        self.document = candidate;
        Ok(())
    }
}

impl CommissionBackend for JsonFileBackend {
    fn time_reference(&self) -> TimeReference {
        self.document.time_reference
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn load_day(&self, day: DayKey) -> Result<Vec<Commission>> {
        Ok(self
            .document
            .commissions
            .iter()
            .filter(|c| c.date == day)
            .cloned()
            .collect())
    }

    fn insert(&mut self, draft: CommissionDraft) -> Result<Commission> {
        let mut candidate = self.document.clone();
        let commission = draft.into_commission(CommissionId(candidate.next_id));
        candidate.next_id += 1;
        candidate.commissions.push(commission.clone());
        self.commit(candidate)?;
        Ok(commission)
    }

    fn mark_completed(&mut self, id: CommissionId) -> Result<Option<bool>> {
        let Some(index) = self.document.commissions.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        if self.document.commissions[index].completed {
            return Ok(Some(true));
        }

        let mut candidate = self.document.clone();
        candidate.commissions[index].completed = true;
        self.commit(candidate)?;
        Ok(Some(false))
    }

    fn remove(&mut self, id: CommissionId) -> Result<bool> {
        if !self.document.commissions.iter().any(|c| c.id == id) {
            return Ok(false);
        }

        let mut candidate = self.document.clone();
        candidate.commissions.retain(|c| c.id != id);
        self.commit(candidate)?;
        Ok(true)
    }

    fn close(self) -> Result<()> {
        // 每次寫入都已同步落盤，這裡只需清掉殘留的暫存檔
        let tmp = temp_path(&self.path);
        if tmp.exists() {
            fs::remove_file(tmp)?;
        }
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    let mut document: Document =
        serde_json::from_str(&content).map_err(|e| DailiesError::CorruptStorageError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if document.version != DOCUMENT_VERSION {
        return Err(DailiesError::CorruptStorageError {
            path: path.to_path_buf(),
            reason: format!("unsupported document version {}", document.version),
        });
    }

    let mut seen = HashSet::new();
    for commission in &document.commissions {
        if !seen.insert(commission.id) {
            return Err(DailiesError::CorruptStorageError {
                path: path.to_path_buf(),
                reason: format!("duplicate id {}", commission.id),
            });
        }
    }

    // next_id 必須大於所有現存 id，否則會發出重複的 id
    if let Some(max_id) = document.commissions.iter().map(|c| c.id.0).max() {
        if document.next_id <= max_id {
            tracing::warn!(
                "next_id {} in {} is not above highest id {}, advancing",
                document.next_id,
                path.display(),
                max_id
            );
            document.next_id = max_id + 1;
        }
    }

    Ok(document)
}

fn write_document(path: &Path, document: &Document) -> Result<()> {
    let data = serde_json::to_vec_pretty(document)
        .map_err(|e| DailiesError::storage(format!("failed to encode commissions: {}", e)))?;

    let tmp = temp_path(path);
    let mut file = fs::File::create(&tmp)?;
    file.write_all(&data)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
