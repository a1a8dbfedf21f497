use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::session::{AnswerMutation, AuditSession, ViewToggle};
use super::store::{SnapshotStore, StoreError};
use super::views::{CategorySummary, ChangeSet, SessionOutputs};
use crate::workflows::intake::{AuditRecord, AuditTemplate};

/// Payload for opening a session: a fresh audit record, or just an id to resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub audit: Option<AuditRecord>,
    #[serde(default)]
    pub audit_id: Option<String>,
    #[serde(default)]
    pub template: Option<AuditTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedAnswers {
    pub applied: usize,
    pub ignored: usize,
    pub outputs: SessionOutputs,
}

/// Service holding live audit sessions and persisting them after every cascade.
pub struct AssessmentService<S> {
    store: Arc<S>,
    sessions: Mutex<HashMap<String, AuditSession>>,
}

impl<S> AssessmentService<S>
where
    S: SnapshotStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open a session, replacing any live session for the same audit.
    pub fn ingest(&self, request: IngestRequest) -> Result<SessionOutputs, AssessmentServiceError> {
        let session = match (request.audit, request.audit_id) {
            (Some(record), _) => {
                let session = AuditSession::from_record(&record, request.template.unwrap_or_default());
                self.persist(&session);
                session
            }
            (None, Some(audit_id)) => {
                let snapshot = self
                    .store
                    .load(&audit_id)?
                    .ok_or_else(|| AssessmentServiceError::UnknownAudit(audit_id.clone()))?;
                info!(%audit_id, saved_at = %snapshot.timestamp, "resuming audit from snapshot");
                AuditSession::from_snapshot(snapshot)
            }
            (None, None) => return Err(AssessmentServiceError::MissingAudit),
        };

        let outputs = session.outputs();
        self.sessions()?
            .insert(session.audit_id().to_string(), session);
        Ok(outputs)
    }

    pub fn apply(
        &self,
        audit_id: &str,
        mutations: &[AnswerMutation],
    ) -> Result<AppliedAnswers, AssessmentServiceError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(audit_id)
            .ok_or_else(|| AssessmentServiceError::UnknownAudit(audit_id.to_string()))?;

        let mut applied = 0;
        for mutation in mutations {
            if session.apply(mutation) {
                applied += 1;
                self.persist(session);
            }
        }

        Ok(AppliedAnswers {
            applied,
            ignored: mutations.len() - applied,
            outputs: session.outputs(),
        })
    }

    /// Apply a view toggle and persist it; returns the refreshed category summaries.
    pub fn toggle(
        &self,
        audit_id: &str,
        toggle: &ViewToggle,
    ) -> Result<Vec<CategorySummary>, AssessmentServiceError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(audit_id)
            .ok_or_else(|| AssessmentServiceError::UnknownAudit(audit_id.to_string()))?;

        if session.toggle(toggle) {
            self.persist(session);
        }
        Ok(session.category_summaries())
    }

    pub fn outputs(&self, audit_id: &str) -> Result<SessionOutputs, AssessmentServiceError> {
        self.with_session(audit_id, |session| session.outputs())
    }

    pub fn categories(&self, audit_id: &str) -> Result<Vec<CategorySummary>, AssessmentServiceError> {
        self.with_session(audit_id, |session| session.category_summaries())
    }

    pub fn flush_changes(&self, audit_id: &str) -> Result<ChangeSet, AssessmentServiceError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(audit_id)
            .ok_or_else(|| AssessmentServiceError::UnknownAudit(audit_id.to_string()))?;
        Ok(session.flush_changes())
    }

    fn with_session<T>(
        &self,
        audit_id: &str,
        read: impl FnOnce(&AuditSession) -> T,
    ) -> Result<T, AssessmentServiceError> {
        let sessions = self.sessions()?;
        sessions
            .get(audit_id)
            .map(read)
            .ok_or_else(|| AssessmentServiceError::UnknownAudit(audit_id.to_string()))
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<String, AuditSession>>, AssessmentServiceError> {
        self.sessions
            .lock()
            .map_err(|_| AssessmentServiceError::SessionLock)
    }

    /// Snapshot failures never undo or fail the edit that triggered them.
    fn persist(&self, session: &AuditSession) {
        if let Err(err) = self.store.save(&session.snapshot()) {
            warn!(audit_id = %session.audit_id(), error = %err, "failed to persist audit snapshot");
        }
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("audit {0} has no open session or saved snapshot")]
    UnknownAudit(String),
    #[error("request carried neither an audit record nor an audit id")]
    MissingAudit,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session registry lock poisoned")]
    SessionLock,
}
