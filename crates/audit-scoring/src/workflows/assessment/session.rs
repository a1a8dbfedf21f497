use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::aggregate::{self, GlobalMetrics};
use super::compliance::{self, ComplianceResult};
use super::domain::{AnswerKind, Category, Question, QuestionKind, SubItems};
use super::responses;
use super::scoring;
use super::store::{AuditHeader, AuditSnapshot};
use super::views::{
    AuditScores, CategorySummary, ChangeSet, ChangedQuestion, ChangedSubQuestion, SessionOutputs,
};
use crate::workflows::intake::{self, AuditRecord, AuditTemplate, STATUS_READ_ONLY};

/// Sentinel a list-option control sends when the selection is cleared.
const LIST_OPTION_NONE: &str = "none";

/// The kind of control an answer was captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerInputKind {
    Number,
    ListOption,
    Choice,
}

impl AnswerInputKind {
    pub fn accepts(self, kind: AnswerKind) -> bool {
        matches!(
            (self, kind),
            (AnswerInputKind::Number, AnswerKind::Numeric)
                | (AnswerInputKind::ListOption, AnswerKind::ListOption)
                | (AnswerInputKind::Choice, AnswerKind::Text)
        )
    }
}

/// One answer edit, addressed to a question, a sub-question, or a SKU line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum AnswerMutation {
    Question {
        question_id: String,
        category_id: String,
        value: String,
        kind: AnswerInputKind,
    },
    SubQuestion {
        sub_id: String,
        parent_question_id: String,
        value: String,
    },
    Sku {
        sku_id: String,
        parent_question_id: String,
        value: String,
    },
}

/// Presentation-only edit: collapse state and question display flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "toggle", rename_all = "snake_case")]
pub enum ViewToggle {
    Category { category_id: String },
    CollapseAll { collapsed: bool },
    Description { question_id: String },
    Expanded { question_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuestionSlot {
    category: usize,
    question: usize,
}

/// Owns the category tree of one audit and keeps every derived figure consistent with it.
///
/// Each mutation updates one leaf and then runs the full cascade (parent answered state,
/// ratio, question score, category and audit aggregates, compliance) before returning.
#[derive(Debug, Clone)]
pub struct AuditSession {
    header: AuditHeader,
    template: AuditTemplate,
    categories: Vec<Category>,
    index: HashMap<String, QuestionSlot>,
    metrics: GlobalMetrics,
    compliance: ComplianceResult,
    changed_questions: BTreeMap<String, ChangedQuestion>,
    changed_sub_questions: BTreeMap<String, ChangedSubQuestion>,
}

impl AuditSession {
    /// Build a session from a fresh payload. Ingested scores are kept as they are.
    pub fn from_record(record: &AuditRecord, template: AuditTemplate) -> Self {
        let mut categories = intake::normalize(record);
        responses::track(&mut categories);

        let header = AuditHeader {
            audit_id: record.audit_id.clone(),
            status_code: record.status_code,
            template_id: record.template_id.clone(),
        };
        let session = Self::assemble(header, template, categories);
        info!(
            audit_id = %session.header.audit_id,
            questions = session.index.len(),
            read_only = session.is_read_only(),
            "audit session ready"
        );
        session
    }

    /// Malformed payloads degrade to an empty session rather than failing.
    pub fn from_json(raw: &str, template: AuditTemplate) -> Self {
        match intake::parse_audit_record(raw) {
            Ok(record) => Self::from_record(&record, template),
            Err(err) => {
                warn!(error = %err, "audit payload rejected, starting an empty session");
                Self::from_record(&AuditRecord::default(), template)
            }
        }
    }

    pub fn from_snapshot(snapshot: AuditSnapshot) -> Self {
        let mut categories = snapshot.categories;
        responses::track(&mut categories);
        Self::assemble(snapshot.global_result, snapshot.global_template, categories)
    }

    fn assemble(header: AuditHeader, template: AuditTemplate, categories: Vec<Category>) -> Self {
        let mut session = Self {
            header,
            template,
            categories,
            index: HashMap::new(),
            metrics: GlobalMetrics::default(),
            compliance: ComplianceResult::default(),
            changed_questions: BTreeMap::new(),
            changed_sub_questions: BTreeMap::new(),
        };
        session.rebuild_index();
        session.recompute();
        session
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (category, entry) in self.categories.iter().enumerate() {
            for (question, item) in entry.questions.iter().enumerate() {
                self.index
                    .entry(item.id.clone())
                    .or_insert(QuestionSlot { category, question });
            }
        }
    }

    pub fn audit_id(&self) -> &str {
        &self.header.audit_id
    }

    pub fn header(&self) -> &AuditHeader {
        &self.header
    }

    pub fn template(&self) -> &AuditTemplate {
        &self.template
    }

    pub fn is_read_only(&self) -> bool {
        self.header.status_code == Some(STATUS_READ_ONLY)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        let slot = self.index.get(question_id)?;
        Some(&self.categories[slot.category].questions[slot.question])
    }

    pub fn metrics(&self) -> &GlobalMetrics {
        &self.metrics
    }

    pub fn compliance(&self) -> ComplianceResult {
        self.compliance
    }

    pub fn completion_percentage(&self) -> u32 {
        aggregate::completion_percentage(&self.categories)
    }

    pub fn total_score(&self) -> f64 {
        self.categories.iter().map(|category| category.score_sum).sum()
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.categories.iter().map(CategorySummary::from).collect()
    }

    pub fn outputs(&self) -> SessionOutputs {
        SessionOutputs {
            audit_id: self.header.audit_id.clone(),
            read_only: self.is_read_only(),
            completion_percentage: self.completion_percentage(),
            total_score: self.total_score(),
            changed_questions: self.changed_questions.values().cloned().collect(),
            changed_sub_questions: self.changed_sub_questions.values().cloned().collect(),
            audit_scores: AuditScores {
                metrics: self.metrics.clone(),
                compliance: self.compliance,
            },
        }
    }

    /// Hand over and clear everything touched since the previous flush.
    pub fn flush_changes(&mut self) -> ChangeSet {
        ChangeSet {
            questions: std::mem::take(&mut self.changed_questions)
                .into_values()
                .collect(),
            sub_questions: std::mem::take(&mut self.changed_sub_questions)
                .into_values()
                .collect(),
        }
    }

    pub fn snapshot(&self) -> AuditSnapshot {
        AuditSnapshot {
            audit_id: self.header.audit_id.clone(),
            categories: self.categories.clone(),
            global_result: self.header.clone(),
            global_template: self.template.clone(),
            template_type: self.template.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn apply(&mut self, mutation: &AnswerMutation) -> bool {
        match mutation {
            AnswerMutation::Question {
                question_id,
                category_id,
                value,
                kind,
            } => self.apply_answer(question_id, category_id, value, *kind),
            AnswerMutation::SubQuestion {
                sub_id,
                parent_question_id,
                value,
            } => self.apply_sub_answer(sub_id, parent_question_id, value),
            AnswerMutation::Sku {
                sku_id,
                parent_question_id,
                value,
            } => self.apply_sku_answer(sku_id, parent_question_id, value),
        }
    }

    /// Answer a plain question. Returns false when nothing was changed.
    pub fn apply_answer(
        &mut self,
        question_id: &str,
        category_id: &str,
        raw_value: &str,
        kind: AnswerInputKind,
    ) -> bool {
        if self.rejects_edits(question_id) {
            return false;
        }
        let Some(slot) = self.index.get(question_id).copied() else {
            debug!(question_id, "ignoring answer for unknown question");
            return false;
        };
        if self.categories[slot.category].id != category_id {
            debug!(question_id, category_id, "ignoring answer addressed to the wrong category");
            return false;
        }

        let question = &mut self.categories[slot.category].questions[slot.question];
        if question.kind != QuestionKind::Plain || !kind.accepts(question.answer_kind) {
            debug!(
                question_id,
                kind = ?kind,
                question_kind = question.kind.label(),
                "ignoring answer the question cannot take"
            );
            return false;
        }

        question.state.raw = stored_answer(kind, raw_value);
        responses::track_answer(question.answer_kind, &mut question.state);

        self.cascade(slot);
        let question = &self.categories[slot.category].questions[slot.question];
        self.changed_questions.insert(
            question.record_id.clone(),
            ChangedQuestion::from_question(question),
        );
        true
    }

    /// Answer a sub-question of a sub-question parent or ratio question.
    pub fn apply_sub_answer(&mut self, sub_id: &str, parent_question_id: &str, raw_value: &str) -> bool {
        if self.rejects_edits(sub_id) {
            return false;
        }
        let Some(slot) = self.index.get(parent_question_id).copied() else {
            debug!(sub_id, parent_question_id, "ignoring sub-answer for unknown parent");
            return false;
        };

        let question = &mut self.categories[slot.category].questions[slot.question];
        let is_ratio = question.kind == QuestionKind::Ratio;
        let SubItems::Questions(subs) = &mut question.sub_items else {
            debug!(sub_id, parent_question_id, "parent question has no sub-questions");
            return false;
        };
        let sibling_count = subs.len();
        let Some(sub) = subs.iter_mut().find(|sub| sub.id == sub_id) else {
            debug!(sub_id, parent_question_id, "ignoring answer for unknown sub-question");
            return false;
        };

        let text = non_empty(raw_value);
        if sub.answer_kind == AnswerKind::Numeric {
            sub.numerical_answer = text.as_deref().and_then(responses::parse_number);
        }
        sub.answer_text = text;
        responses::track_sub_question(sub);
        let changed = ChangedSubQuestion::from_sub_question(parent_question_id, sub);

        self.cascade(slot);
        self.changed_sub_questions.insert(changed.id.clone(), changed);
        if is_ratio && sibling_count >= 2 {
            let question = &self.categories[slot.category].questions[slot.question];
            self.changed_questions.insert(
                question.record_id.clone(),
                ChangedQuestion::from_question(question),
            );
        }
        true
    }

    /// Answer one SKU line of a SKU group.
    pub fn apply_sku_answer(&mut self, sku_id: &str, parent_question_id: &str, raw_value: &str) -> bool {
        if self.rejects_edits(sku_id) {
            return false;
        }
        let Some(slot) = self.index.get(parent_question_id).copied() else {
            debug!(sku_id, parent_question_id, "ignoring SKU answer for unknown group");
            return false;
        };

        let question = &mut self.categories[slot.category].questions[slot.question];
        let SubItems::Skus(lines) = &mut question.sub_items else {
            debug!(sku_id, parent_question_id, "parent question is not a SKU group");
            return false;
        };
        let Some(line) = lines.iter_mut().find(|line| line.id == sku_id) else {
            debug!(sku_id, parent_question_id, "ignoring answer for unknown SKU line");
            return false;
        };

        line.state.raw = non_empty(raw_value);
        responses::track_answer(line.answer_kind, &mut line.state);
        let changed = ChangedQuestion::from_sku_line(line);

        self.cascade(slot);
        self.changed_questions.insert(changed.id.clone(), changed);
        true
    }

    /// Apply a view toggle. Allowed on read-only audits; never touches scores.
    pub fn toggle(&mut self, toggle: &ViewToggle) -> bool {
        match toggle {
            ViewToggle::Category { category_id } => self.toggle_category(category_id),
            ViewToggle::CollapseAll { collapsed } => {
                self.collapse_all(*collapsed);
                true
            }
            ViewToggle::Description { question_id } => self.toggle_description(question_id),
            ViewToggle::Expanded { question_id } => self.toggle_expanded(question_id),
        }
    }

    pub fn toggle_category(&mut self, category_id: &str) -> bool {
        match self
            .categories
            .iter_mut()
            .find(|category| category.id == category_id)
        {
            Some(category) => {
                category.collapsed = !category.collapsed;
                true
            }
            None => false,
        }
    }

    pub fn collapse_all(&mut self, collapsed: bool) {
        for category in &mut self.categories {
            category.collapsed = collapsed;
        }
    }

    pub fn toggle_description(&mut self, question_id: &str) -> bool {
        self.with_question(question_id, |question| {
            question.show_description = !question.show_description
        })
    }

    pub fn toggle_expanded(&mut self, question_id: &str) -> bool {
        self.with_question(question_id, |question| question.expanded = !question.expanded)
    }

    fn with_question(&mut self, question_id: &str, edit: impl FnOnce(&mut Question)) -> bool {
        match self.index.get(question_id).copied() {
            Some(slot) => {
                edit(&mut self.categories[slot.category].questions[slot.question]);
                true
            }
            None => false,
        }
    }

    fn rejects_edits(&self, item_id: &str) -> bool {
        if self.is_read_only() {
            debug!(audit_id = %self.header.audit_id, item_id, "audit is read-only, ignoring edit");
            return true;
        }
        false
    }

    fn cascade(&mut self, slot: QuestionSlot) {
        let question = &mut self.categories[slot.category].questions[slot.question];
        responses::sync_parent(question);
        scoring::refresh_ratio(question);
        scoring::score_question(question);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.metrics = aggregate::recompute(&mut self.categories, &self.template);
        self.compliance = compliance::evaluate(&self.categories);
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn stored_answer(kind: AnswerInputKind, raw: &str) -> Option<String> {
    match kind {
        AnswerInputKind::ListOption if raw.trim() == LIST_OPTION_NONE => None,
        _ => non_empty(raw),
    }
}
