use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Category;
use crate::workflows::intake::AuditTemplate;

/// Audit header fields carried alongside the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditHeader {
    pub audit_id: String,
    pub status_code: Option<i64>,
    pub template_id: Option<String>,
}

/// Everything needed to resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSnapshot {
    pub audit_id: String,
    pub categories: Vec<Category>,
    pub global_result: AuditHeader,
    pub global_template: AuditTemplate,
    pub template_type: AuditTemplate,
    pub timestamp: DateTime<Utc>,
}

/// Storage abstraction for session snapshots. Durability is up to the implementation.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, snapshot: &AuditSnapshot) -> Result<(), StoreError>;
    fn load(&self, audit_id: &str) -> Result<Option<AuditSnapshot>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// One pretty-printed JSON file per audit, named `audit_{id}.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn snapshot_path(&self, audit_id: &str) -> PathBuf {
        let safe: String = audit_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.directory.join(format!("audit_{safe}.json"))
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &AuditSnapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory)?;
        let payload = serde_json::to_vec_pretty(snapshot)?;
        fs::write(self.snapshot_path(&snapshot.audit_id), payload)?;
        Ok(())
    }

    fn load(&self, audit_id: &str) -> Result<Option<AuditSnapshot>, StoreError> {
        match fs::read(self.snapshot_path(audit_id)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
