//! Audit assessment: answer tracking, scoring, aggregation, and compliance over the
//! category tree, plus the session, persistence, and HTTP layers around them.

pub mod aggregate;
pub mod compliance;
pub mod domain;
pub mod report;
pub mod responses;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use aggregate::{GlobalMetrics, PROGRESS_SCALE};
pub use compliance::ComplianceResult;
pub use domain::{
    AnswerKind, AnswerState, AnswerValue, Category, ComplianceFlags, FoodType, ListOption,
    Question, QuestionKind, RangeTier, ScoringRule, SkuDetails, SkuLine, Species, SubItems,
    SubQuestion, YES,
};
pub use report::write_category_csv;
pub use router::{assessment_router, AnswersRequest};
pub use service::{AppliedAnswers, AssessmentService, AssessmentServiceError, IngestRequest};
pub use session::{AnswerInputKind, AnswerMutation, AuditSession, ViewToggle};
pub use store::{AuditHeader, AuditSnapshot, JsonFileStore, SnapshotStore, StoreError};
pub use views::{
    AuditScores, CategorySummary, ChangeSet, ChangedQuestion, ChangedSubQuestion, ScalarValue,
    SessionOutputs,
};
