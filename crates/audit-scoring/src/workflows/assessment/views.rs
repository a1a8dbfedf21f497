use serde::{Deserialize, Serialize};

use super::aggregate::GlobalMetrics;
use super::compliance::ComplianceResult;
use super::domain::{AnswerValue, Category, Question, SkuLine, SubQuestion};

/// Metrics and compliance flags flattened into one record of audit columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditScores {
    #[serde(flatten)]
    pub metrics: GlobalMetrics,
    #[serde(flatten)]
    pub compliance: ComplianceResult,
}

/// Plain JSON scalar for a tracked value: a number, the chosen option name, or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl ScalarValue {
    pub fn from_answer(value: &AnswerValue) -> Option<Self> {
        match value {
            AnswerValue::Number(number) => Some(ScalarValue::Number(*number)),
            AnswerValue::Choice(name) => Some(ScalarValue::Text(name.clone())),
            AnswerValue::Empty | AnswerValue::Unselected => None,
        }
    }
}

/// Last written state of a question or SKU line, as one flat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedQuestion {
    pub id: String,
    pub answer: Option<String>,
    pub value: Option<ScalarValue>,
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_ratio: Option<f64>,
}

impl ChangedQuestion {
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.record_id.clone(),
            answer: question.state.answer.clone(),
            value: ScalarValue::from_answer(&question.state.value),
            answered: question.state.answered,
            score: Some(question.score),
            derived_ratio: question.derived_ratio,
        }
    }

    pub fn from_sku_line(line: &SkuLine) -> Self {
        Self {
            id: line.id.clone(),
            answer: line.state.answer.clone(),
            value: ScalarValue::from_answer(&line.state.value),
            answered: line.state.answered,
            score: None,
            derived_ratio: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedSubQuestion {
    pub id: String,
    pub parent_question_id: String,
    pub answer_text: Option<String>,
    pub numerical_answer: Option<f64>,
    pub answered: bool,
}

impl ChangedSubQuestion {
    pub fn from_sub_question(parent_question_id: &str, sub: &SubQuestion) -> Self {
        Self {
            id: sub.id.clone(),
            parent_question_id: parent_question_id.to_string(),
            answer_text: sub.answer_text.clone(),
            numerical_answer: sub.numerical_answer,
            answered: sub.answered,
        }
    }
}

/// Items touched since the last flush, ordered by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub questions: Vec<ChangedQuestion>,
    pub sub_questions: Vec<ChangedSubQuestion>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.sub_questions.is_empty()
    }
}

/// Read-side view handed to the host after each cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutputs {
    pub audit_id: String,
    pub read_only: bool,
    pub completion_percentage: u32,
    pub total_score: f64,
    pub changed_questions: Vec<ChangedQuestion>,
    pub changed_sub_questions: Vec<ChangedSubQuestion>,
    pub audit_scores: AuditScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub answered: usize,
    pub total: usize,
    pub progress_value: u32,
    pub score_sum: f64,
    pub collapsed: bool,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            answered: category.answered_count,
            total: category.total_questions(),
            progress_value: category.progress_value,
            score_sum: category.score_sum,
            collapsed: category.collapsed,
        }
    }
}
