//! Per-question scoring algorithms.
//!
//! Every branch is a pure function of the question's current fields and its rules. A
//! question with no rules scores 0 whatever its kind.

mod ratio;
mod rules;

pub use ratio::compute_ratio;
pub use rules::round2;

use super::domain::{AnswerKind, Question, QuestionKind};

/// Score a question from its current state and store the result on it.
pub fn score_question(question: &mut Question) -> f64 {
    let score = evaluate(question);
    question.score = score;
    score
}

fn evaluate(question: &Question) -> f64 {
    let rules = &question.scoring_rules;
    if rules.is_empty() {
        return 0.0;
    }

    match question.kind {
        QuestionKind::Plain => match question.answer_kind {
            AnswerKind::Text => rules::binary_score(rules, question.state.is_yes()),
            AnswerKind::Numeric => question
                .state
                .value
                .as_number()
                .map(|value| rules::threshold_score(rules, value))
                .unwrap_or(0.0),
            AnswerKind::ListOption => rules::list_option_score(
                rules,
                &question.list_options,
                question.state.raw.as_deref(),
            ),
        },
        QuestionKind::Ratio => question
            .derived_ratio
            .map(|ratio| rules::threshold_score(rules, ratio))
            .unwrap_or(0.0),
        QuestionKind::SkuGroup => {
            let lines = question.sku_lines();
            let yes = lines.iter().filter(|line| line.state.is_yes()).count();
            rules::perfect_score(rules, yes, lines.len())
        }
        // no algorithm of its own; keeps whatever score it was ingested with
        QuestionKind::SubQuestionParent => question.score,
    }
}

/// Recompute the derived ratio of a ratio question from its sub-questions.
///
/// Leaves the stored ratio alone while fewer than two sub-questions exist.
pub fn refresh_ratio(question: &mut Question) {
    if question.kind != QuestionKind::Ratio {
        return;
    }
    if let Some(ratio) = compute_ratio(question.sub_questions()) {
        question.derived_ratio = Some(ratio);
    }
}
