use crate::workflows::assessment::domain::{AnswerKind, FoodType, QuestionKind, RangeTier};
use tracing::warn;

const QUESTION_TYPE_SKU: i64 = 181_910_000;
const QUESTION_TYPE_PLAIN: i64 = 181_910_001;
const QUESTION_TYPE_SUB_PARENT: i64 = 285_050_000;
const QUESTION_TYPE_RATIO: i64 = 285_050_001;

const ANSWER_TYPE_TEXT: i64 = 181_910_000;
const ANSWER_TYPE_NUMERIC: i64 = 181_910_001;
const ANSWER_TYPE_LIST_OPTION: i64 = 285_050_000;

const RANGE_MUST_HAVE: i64 = 285_050_000;
const RANGE_NEXT_BEST: i64 = 285_050_001;
const RANGE_OTHER: i64 = 285_050_002;

const FOOD_DRY: i64 = 181_910_000;
const FOOD_WET: i64 = 181_910_001;

/// Audit status code for a closed audit; its answers are frozen.
pub const STATUS_READ_ONLY: i64 = 181_910_001;

/// Classification of a flat record before SKU members are merged into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordClass {
    SkuMember,
    Question(QuestionKind),
}

pub(crate) fn classify(record_id: &str, code: Option<i64>) -> RecordClass {
    match code {
        Some(QUESTION_TYPE_SKU) => RecordClass::SkuMember,
        Some(QUESTION_TYPE_PLAIN) => RecordClass::Question(QuestionKind::Plain),
        Some(QUESTION_TYPE_SUB_PARENT) => RecordClass::Question(QuestionKind::SubQuestionParent),
        Some(QUESTION_TYPE_RATIO) => RecordClass::Question(QuestionKind::Ratio),
        other => {
            warn!(record_id, code = ?other, "unknown question type, treating as plain question");
            RecordClass::Question(QuestionKind::Plain)
        }
    }
}

pub(crate) fn answer_kind(record_id: &str, code: Option<i64>) -> AnswerKind {
    match code {
        Some(ANSWER_TYPE_TEXT) => AnswerKind::Text,
        Some(ANSWER_TYPE_NUMERIC) => AnswerKind::Numeric,
        Some(ANSWER_TYPE_LIST_OPTION) => AnswerKind::ListOption,
        other => {
            warn!(record_id, code = ?other, "unknown answer type, treating as text");
            AnswerKind::Text
        }
    }
}

/// Sub-questions only capture text or numbers.
pub(crate) fn sub_answer_kind(sub_id: &str, code: Option<i64>) -> AnswerKind {
    match code {
        Some(ANSWER_TYPE_TEXT) => AnswerKind::Text,
        Some(ANSWER_TYPE_NUMERIC) => AnswerKind::Numeric,
        other => {
            warn!(sub_id, code = ?other, "unsupported sub-question answer type, treating as text");
            AnswerKind::Text
        }
    }
}

pub(crate) fn range_tier(code: Option<i64>) -> Option<RangeTier> {
    match code? {
        RANGE_MUST_HAVE => Some(RangeTier::MustHave),
        RANGE_NEXT_BEST => Some(RangeTier::NextBest),
        RANGE_OTHER => Some(RangeTier::Other),
        _ => None,
    }
}

pub(crate) fn food_type(code: Option<i64>) -> Option<FoodType> {
    match code? {
        FOOD_DRY => Some(FoodType::Dry),
        FOOD_WET => Some(FoodType::Wet),
        _ => None,
    }
}
