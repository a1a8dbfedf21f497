//! Derives answer state from the raw stored answer fields.
//!
//! Every function here rebuilds the derived fields from the raw ones, so running a
//! pass twice over the same raw input leaves the tree unchanged.

use super::domain::{
    AnswerKind, AnswerState, AnswerValue, Category, Question, QuestionKind, SubItems,
    SubQuestion, YES,
};

/// Initial tracking pass over a freshly normalized tree.
pub fn track(categories: &mut [Category]) {
    for question in categories
        .iter_mut()
        .flat_map(|category| category.questions.iter_mut())
    {
        track_question(question);
    }
}

pub fn track_question(question: &mut Question) {
    match &mut question.sub_items {
        SubItems::None => {}
        SubItems::Skus(lines) => {
            for line in lines.iter_mut() {
                track_answer(line.answer_kind, &mut line.state);
            }
        }
        SubItems::Questions(subs) => {
            for sub in subs.iter_mut() {
                track_sub_question(sub);
            }
        }
    }

    if question.kind == QuestionKind::Plain {
        track_answer(question.answer_kind, &mut question.state);
    } else {
        sync_parent(question);
    }
}

/// Group questions are answered once they have children and every child is answered.
pub fn sync_parent(question: &mut Question) {
    if question.kind != QuestionKind::Plain {
        question.state.answered =
            !question.sub_items.is_empty() && question.sub_items.all_answered();
    }
}

pub fn track_answer(kind: AnswerKind, state: &mut AnswerState) {
    let raw = state.raw.as_deref().filter(|text| !text.is_empty());

    match kind {
        AnswerKind::Text => {
            state.answer = raw.map(str::to_string);
            state.value = AnswerValue::Empty;
            state.answered = raw.is_some();
        }
        AnswerKind::Numeric => {
            let number = raw.and_then(parse_number);
            state.answer = raw.map(|_| YES.to_string());
            state.value = number
                .map(|value| AnswerValue::Number(value.trunc()))
                .unwrap_or_default();
            state.answered = number.is_some();
        }
        AnswerKind::ListOption => match raw {
            Some(selected) => {
                state.answer = Some(YES.to_string());
                state.value = AnswerValue::Choice(selected.to_string());
                state.answered = true;
            }
            None => {
                state.answer = None;
                state.value = AnswerValue::Unselected;
                state.answered = false;
            }
        },
    }
}

pub fn track_sub_question(sub: &mut SubQuestion) {
    match sub.answer_kind {
        AnswerKind::Numeric => {
            // presence, not positivity: a stored zero is an answer
            sub.value = sub.numerical_answer;
            sub.answered = sub.numerical_answer.is_some();
        }
        AnswerKind::Text | AnswerKind::ListOption => {
            let text = sub.answer_text.as_deref().filter(|text| !text.is_empty());
            sub.answer = text.map(str::to_string);
            sub.answered = text.is_some();
        }
    }
}

/// Finite numbers only; anything else counts as unanswered.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
