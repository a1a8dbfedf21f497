use serde::{Deserialize, Serialize};

/// Affirmative answer literal shared by yes/no questions, SKU lines, and numeric tracking.
pub const YES: &str = "Yes";

/// Structural role of a question, assigned once during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Plain,
    SkuGroup,
    SubQuestionParent,
    Ratio,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plain => "Question",
            Self::SkuGroup => "SKU Group",
            Self::SubQuestionParent => "Sub-question Group",
            Self::Ratio => "Ratio (Q1/Q2)",
        }
    }
}

/// How an answer is captured and interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Text,
    Numeric,
    ListOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Cat,
    Dog,
}

impl Species {
    /// Matches the formatted target label exactly; "cat" or "Dogs" are not species.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Cat" => Some(Self::Cat),
            "Dog" => Some(Self::Dog),
            _ => None,
        }
    }
}

/// Assortment tier of a SKU line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeTier {
    MustHave,
    NextBest,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    Dry,
    Wet,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub threshold: f64,
    pub target: f64,
    pub weighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOption {
    pub name: String,
    pub value: f64,
    pub order: i64,
}

/// Tracked value of a question or SKU line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AnswerValue {
    #[default]
    Empty,
    Number(f64),
    Choice(String),
    /// List-option question with no option picked (the "none" sentinel).
    Unselected,
}

impl AnswerValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// Membership in the two compliance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceFlags {
    pub primary: bool,
    pub online: bool,
}

/// Raw stored answer plus the state derived from it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnswerState {
    pub raw: Option<String>,
    pub answer: Option<String>,
    pub value: AnswerValue,
    pub answered: bool,
}

impl AnswerState {
    pub fn from_raw(raw: Option<String>) -> Self {
        Self {
            raw,
            ..Self::default()
        }
    }

    pub fn is_yes(&self) -> bool {
        self.answer.as_deref() == Some(YES)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub id: String,
    pub name: String,
    pub answer_kind: AnswerKind,
    pub flow: f64,
    pub answer_text: Option<String>,
    pub numerical_answer: Option<f64>,
    pub answer: Option<String>,
    pub value: Option<f64>,
    pub answered: bool,
    pub compliance: ComplianceFlags,
}

/// Product attributes shown next to a SKU line; never scored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkuDetails {
    pub product_range: Option<String>,
    pub life_stage: Option<String>,
    pub stock_weight: Option<String>,
    pub stock_item: Option<bool>,
}

/// One inventory line inside a SKU group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuLine {
    pub id: String,
    pub label: String,
    pub answer_kind: AnswerKind,
    pub flow: f64,
    pub state: AnswerState,
    pub target_label: Option<String>,
    pub species: Option<Species>,
    pub tier: Option<RangeTier>,
    pub food_type: Option<FoodType>,
    pub reporting_range: Option<i64>,
    pub territory: Option<i64>,
    pub details: SkuDetails,
    pub compliance: ComplianceFlags,
}

/// Children of a question. Which variant is populated follows from the question kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "items")]
pub enum SubItems {
    #[default]
    None,
    Skus(Vec<SkuLine>),
    Questions(Vec<SubQuestion>),
}

impl SubItems {
    pub fn len(&self) -> usize {
        match self {
            SubItems::None => 0,
            SubItems::Skus(lines) => lines.len(),
            SubItems::Questions(subs) => subs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn answered_count(&self) -> usize {
        match self {
            SubItems::None => 0,
            SubItems::Skus(lines) => lines.iter().filter(|line| line.state.answered).count(),
            SubItems::Questions(subs) => subs.iter().filter(|sub| sub.answered).count(),
        }
    }

    pub fn all_answered(&self) -> bool {
        self.answered_count() == self.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Tree identity: the record id, or the shared parent key for SKU groups.
    pub id: String,
    pub record_id: String,
    pub label: String,
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub answer_kind: AnswerKind,
    pub state: AnswerState,
    pub score: f64,
    pub derived_ratio: Option<f64>,
    pub scoring_rules: Vec<ScoringRule>,
    pub list_options: Vec<ListOption>,
    pub sub_items: SubItems,
    pub compliance: ComplianceFlags,
    pub expanded: bool,
    pub show_description: bool,
}

impl Question {
    /// Answered itself and, when it has children, every child answered too.
    pub fn is_complete(&self) -> bool {
        self.state.answered && self.sub_items.all_answered()
    }

    pub fn sku_lines(&self) -> &[SkuLine] {
        match &self.sub_items {
            SubItems::Skus(lines) => lines,
            _ => &[],
        }
    }

    pub fn sub_questions(&self) -> &[SubQuestion] {
        match &self.sub_items {
            SubItems::Questions(subs) => subs,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub questions: Vec<Question>,
    pub progress_value: u32,
    pub answered_count: usize,
    pub score_sum: f64,
    pub collapsed: bool,
}

impl Category {
    pub fn new(id: String, name: String, parent_id: Option<String>) -> Self {
        Self {
            id,
            name,
            parent_id,
            questions: Vec::new(),
            progress_value: 0,
            answered_count: 0,
            score_sum: 0.0,
            collapsed: false,
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_fully_answered(&self) -> bool {
        self.answered_count == self.questions.len()
    }
}
