use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    AnswerKind, AnswerState, Category, ComplianceFlags, Question, QuestionKind, RangeTier,
    ScoringRule, SkuDetails, SkuLine, Species, SubItems, SubQuestion,
};
use crate::workflows::assessment::responses;
use crate::workflows::assessment::session::AuditSession;
use crate::workflows::assessment::store::{AuditSnapshot, SnapshotStore, StoreError};
use crate::workflows::assessment::{assessment_router, AssessmentService};
use crate::workflows::intake::{parse_audit_record, AuditImporter, AuditRecord, AuditTemplate};

pub(super) const AUDIT_JSON: &str = include_str!("../../../../tests/fixtures/audit.json");
pub(super) const TEMPLATE_JSON: &str = include_str!("../../../../tests/fixtures/template.json");

pub(super) fn record() -> AuditRecord {
    parse_audit_record(AUDIT_JSON).expect("fixture parses")
}

pub(super) fn template() -> AuditTemplate {
    AuditImporter::from_reader(TEMPLATE_JSON.as_bytes()).expect("template parses")
}

pub(super) fn session() -> AuditSession {
    AuditSession::from_record(&record(), template())
}

pub(super) fn read_only_session() -> AuditSession {
    let mut record = record();
    record.status_code = Some(crate::workflows::intake::STATUS_READ_ONLY);
    AuditSession::from_record(&record, template())
}

pub(super) fn rule(threshold: f64, target: f64) -> ScoringRule {
    ScoringRule {
        threshold,
        target,
        weighted: false,
    }
}

pub(super) fn weighted_rule(threshold: f64, target: f64) -> ScoringRule {
    ScoringRule {
        threshold,
        target,
        weighted: true,
    }
}

pub(super) fn plain_question(
    id: &str,
    answer_kind: AnswerKind,
    raw: Option<&str>,
    rules: Vec<ScoringRule>,
) -> Question {
    let mut question = Question {
        id: id.to_string(),
        record_id: id.to_string(),
        label: format!("Question {id}"),
        description: None,
        kind: QuestionKind::Plain,
        answer_kind,
        state: AnswerState::from_raw(raw.map(str::to_string)),
        score: 0.0,
        derived_ratio: None,
        scoring_rules: rules,
        list_options: Vec::new(),
        sub_items: SubItems::None,
        compliance: ComplianceFlags::default(),
        expanded: false,
        show_description: false,
    };
    responses::track_question(&mut question);
    question
}

pub(super) fn sku_line(
    id: &str,
    species: Option<Species>,
    tier: Option<RangeTier>,
    raw: Option<&str>,
) -> SkuLine {
    let mut state = AnswerState::from_raw(raw.map(str::to_string));
    responses::track_answer(AnswerKind::Text, &mut state);
    SkuLine {
        id: id.to_string(),
        label: format!("SKU {id}"),
        answer_kind: AnswerKind::Text,
        flow: 0.0,
        state,
        target_label: None,
        species,
        tier,
        food_type: None,
        reporting_range: None,
        territory: None,
        details: SkuDetails::default(),
        compliance: ComplianceFlags::default(),
    }
}

pub(super) fn sku_group(id: &str, lines: Vec<SkuLine>, rules: Vec<ScoringRule>) -> Question {
    let mut question = plain_question(id, AnswerKind::Text, None, rules);
    question.kind = QuestionKind::SkuGroup;
    question.sub_items = SubItems::Skus(lines);
    responses::track_question(&mut question);
    question
}

pub(super) fn sub_question(id: &str, flow: f64, kind: AnswerKind, raw: Option<&str>) -> SubQuestion {
    let mut sub = SubQuestion {
        id: id.to_string(),
        name: format!("Sub {id}"),
        answer_kind: kind,
        flow,
        answer_text: raw.map(str::to_string),
        numerical_answer: match kind {
            AnswerKind::Numeric => raw.and_then(responses::parse_number),
            _ => None,
        },
        answer: None,
        value: None,
        answered: false,
        compliance: ComplianceFlags::default(),
    };
    responses::track_sub_question(&mut sub);
    sub
}

pub(super) fn parent_question(
    id: &str,
    kind: QuestionKind,
    answer_kind: AnswerKind,
    subs: Vec<SubQuestion>,
    rules: Vec<ScoringRule>,
) -> Question {
    let mut question = plain_question(id, answer_kind, None, rules);
    question.kind = kind;
    question.sub_items = SubItems::Questions(subs);
    responses::track_question(&mut question);
    question
}

pub(super) fn category(id: &str, questions: Vec<Question>) -> Category {
    let mut category = Category::new(id.to_string(), format!("Category {id}"), None);
    category.questions = questions;
    category
}

pub(super) fn primary_only() -> ComplianceFlags {
    ComplianceFlags {
        primary: true,
        online: false,
    }
}

pub(super) fn both_scopes() -> ComplianceFlags {
    ComplianceFlags {
        primary: true,
        online: true,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) snapshots: Arc<Mutex<HashMap<String, AuditSnapshot>>>,
}

impl MemoryStore {
    pub(super) fn saved(&self, audit_id: &str) -> Option<AuditSnapshot> {
        self.snapshots
            .lock()
            .expect("store mutex poisoned")
            .get(audit_id)
            .cloned()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, snapshot: &AuditSnapshot) -> Result<(), StoreError> {
        self.snapshots
            .lock()
            .expect("store mutex poisoned")
            .insert(snapshot.audit_id.clone(), snapshot.clone());
        Ok(())
    }

    fn load(&self, audit_id: &str) -> Result<Option<AuditSnapshot>, StoreError> {
        Ok(self.saved(audit_id))
    }
}

pub(super) struct UnavailableStore;

impl SnapshotStore for UnavailableStore {
    fn save(&self, _snapshot: &AuditSnapshot) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk detached".to_string()))
    }

    fn load(&self, _audit_id: &str) -> Result<Option<AuditSnapshot>, StoreError> {
        Err(StoreError::Unavailable("disk detached".to_string()))
    }
}

pub(super) fn build_service() -> (AssessmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (AssessmentService::new(store.clone()), store)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryStore>) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
