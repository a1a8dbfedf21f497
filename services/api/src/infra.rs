use audit_scoring::config::StorageConfig;
use audit_scoring::workflows::assessment::{AuditSnapshot, JsonFileStore, SnapshotStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySnapshotStore {
    snapshots: Arc<Mutex<HashMap<String, AuditSnapshot>>>,
}

impl InMemorySnapshotStore {
    fn snapshots(&self) -> Result<MutexGuard<'_, HashMap<String, AuditSnapshot>>, StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Unavailable("snapshot mutex poisoned".to_string()))
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, snapshot: &AuditSnapshot) -> Result<(), StoreError> {
        let mut guard = self.snapshots()?;
        guard.insert(snapshot.audit_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&self, audit_id: &str) -> Result<Option<AuditSnapshot>, StoreError> {
        let guard = self.snapshots()?;
        Ok(guard.get(audit_id).cloned())
    }
}

/// Snapshot backend chosen from configuration at startup.
pub(crate) enum SnapshotBackend {
    Memory(InMemorySnapshotStore),
    Files(JsonFileStore),
}

impl SnapshotBackend {
    pub(crate) fn from_config(config: &StorageConfig) -> Self {
        match &config.snapshot_dir {
            Some(dir) => Self::Files(JsonFileStore::new(dir.clone())),
            None => Self::Memory(InMemorySnapshotStore::default()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::Files(store) => store.directory().display().to_string(),
        }
    }
}

impl SnapshotStore for SnapshotBackend {
    fn save(&self, snapshot: &AuditSnapshot) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.save(snapshot),
            Self::Files(store) => store.save(snapshot),
        }
    }

    fn load(&self, audit_id: &str) -> Result<Option<AuditSnapshot>, StoreError> {
        match self {
            Self::Memory(store) => store.load(audit_id),
            Self::Files(store) => store.load(audit_id),
        }
    }
}
