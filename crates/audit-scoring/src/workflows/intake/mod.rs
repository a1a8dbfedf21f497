mod codes;
mod normalizer;
mod records;

pub use codes::STATUS_READ_ONLY;
pub use normalizer::normalize;
pub use records::{
    AuditRecord, AuditTemplate, RawCategory, RawListOption, RawQuestion, RawScoringRule,
    RawSubQuestion,
};

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read audit payload: {}", err),
            IngestError::Json(err) => write!(f, "invalid audit JSON: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Parse an audit payload handed over by the host.
pub fn parse_audit_record(raw: &str) -> Result<AuditRecord, IngestError> {
    Ok(serde_json::from_str(raw)?)
}

/// Loads audit payloads and templates from files or readers.
pub struct AuditImporter;

impl AuditImporter {
    pub fn record_from_path<P: AsRef<Path>>(path: P) -> Result<AuditRecord, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn template_from_path<P: AsRef<Path>>(path: P) -> Result<AuditTemplate, IngestError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, IngestError> {
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }
}
