use serde::{Deserialize, Serialize};

use super::domain::{AnswerKind, Category, ComplianceFlags, Question, QuestionKind, SubItems};

/// Outcome of both compliance checks. Online compliance implies primary compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceResult {
    #[serde(rename = "cgi_ultraselectivecompliant")]
    pub compliant: bool,
    #[serde(rename = "cgi_caonlinecompliant")]
    pub online_compliant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Primary,
    Online,
}

impl Scope {
    fn includes(self, flags: ComplianceFlags) -> bool {
        match self {
            Scope::Primary => flags.primary,
            Scope::Online => flags.online,
        }
    }
}

/// Borrowed view over a SKU line or sub-question, enough to judge its answer.
struct ChildAnswer<'a> {
    answer: Option<&'a str>,
    raw_text: Option<&'a str>,
    flags: ComplianceFlags,
}

#[derive(Debug, Default)]
struct Tally {
    eligible: bool,
    invalid: bool,
}

impl Tally {
    fn satisfied(&self) -> bool {
        self.eligible && !self.invalid
    }
}

/// Walk the tree once, judging each question against both inclusion scopes.
pub fn evaluate(categories: &[Category]) -> ComplianceResult {
    let mut primary = Tally::default();
    let mut online = Tally::default();

    for question in categories.iter().flat_map(|category| category.questions.iter()) {
        let children = child_answers(question);
        for (scope, tally) in [(Scope::Primary, &mut primary), (Scope::Online, &mut online)] {
            if !is_eligible(question, &children, scope) {
                continue;
            }
            tally.eligible = true;
            if is_invalid(question, &children, scope) {
                tally.invalid = true;
            }
        }
    }

    let compliant = primary.satisfied();
    ComplianceResult {
        compliant,
        online_compliant: compliant && online.satisfied(),
    }
}

fn child_answers(question: &Question) -> Vec<ChildAnswer<'_>> {
    match &question.sub_items {
        SubItems::None => Vec::new(),
        SubItems::Skus(lines) => lines
            .iter()
            .map(|line| ChildAnswer {
                answer: line.state.answer.as_deref(),
                raw_text: line.state.raw.as_deref(),
                flags: line.compliance,
            })
            .collect(),
        SubItems::Questions(subs) => subs
            .iter()
            .map(|sub| ChildAnswer {
                answer: sub.answer.as_deref(),
                raw_text: sub.answer_text.as_deref(),
                flags: sub.compliance,
            })
            .collect(),
    }
}

fn is_eligible(question: &Question, children: &[ChildAnswer<'_>], scope: Scope) -> bool {
    scope.includes(question.compliance) || children.iter().any(|child| scope.includes(child.flags))
}

fn is_invalid(question: &Question, children: &[ChildAnswer<'_>], scope: Scope) -> bool {
    if question.kind == QuestionKind::Ratio && !children.is_empty() {
        return if question.answer_kind == AnswerKind::Numeric {
            children.iter().any(|child| is_blank_number(child.raw_text))
        } else {
            children.iter().any(|child| !is_affirmative(child.answer))
        };
    }

    if children.is_empty() {
        return !is_affirmative(question.state.answer.as_deref());
    }

    // ineligible siblings do not count against the parent
    children
        .iter()
        .filter(|child| scope.includes(child.flags))
        .any(|child| !is_affirmative(child.answer))
}

fn is_affirmative(answer: Option<&str>) -> bool {
    answer
        .map(|answer| answer.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

fn is_blank_number(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(text) => text == "0" || text.trim().is_empty(),
    }
}
