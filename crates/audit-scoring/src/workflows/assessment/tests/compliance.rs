use super::common::*;

use crate::workflows::assessment::compliance::{evaluate, ComplianceResult};
use crate::workflows::assessment::domain::{AnswerKind, Question, QuestionKind, SubQuestion};

fn flagged(mut question: Question, flags: crate::workflows::assessment::ComplianceFlags) -> Question {
    question.compliance = flags;
    question
}

fn flagged_sub(mut sub: SubQuestion, flags: crate::workflows::assessment::ComplianceFlags) -> SubQuestion {
    sub.compliance = flags;
    sub
}

fn yes_no(id: &str, answer: &str) -> Question {
    plain_question(id, AnswerKind::Text, Some(answer), Vec::new())
}

#[test]
fn no_eligible_questions_is_not_compliant() {
    let categories = vec![category("c1", vec![yes_no("a", "Yes")])];
    assert_eq!(evaluate(&categories), ComplianceResult::default());
}

#[test]
fn all_eligible_yes_answers_are_compliant() {
    let categories = vec![category(
        "c1",
        vec![
            flagged(yes_no("a", "Yes"), primary_only()),
            flagged(yes_no("b", "Yes"), primary_only()),
            yes_no("c", "No"),
        ],
    )];

    let result = evaluate(&categories);
    assert!(result.compliant);
    assert!(!result.online_compliant);
}

#[test]
fn one_eligible_no_breaks_primary_compliance() {
    let categories = vec![category(
        "c1",
        vec![
            flagged(yes_no("a", "Yes"), primary_only()),
            flagged(yes_no("b", "No"), primary_only()),
        ],
    )];
    assert!(!evaluate(&categories).compliant);
}

#[test]
fn online_compliance_requires_primary_compliance() {
    let mut online_only = yes_no("online", "Yes");
    online_only.compliance.online = true;
    let categories = vec![category(
        "c1",
        vec![flagged(yes_no("a", "No"), primary_only()), online_only],
    )];

    let result = evaluate(&categories);
    assert!(!result.compliant);
    assert!(!result.online_compliant);
}

#[test]
fn online_compliance_holds_when_both_scopes_pass() {
    let categories = vec![category(
        "c1",
        vec![flagged(yes_no("a", "Yes"), both_scopes())],
    )];
    assert_eq!(
        evaluate(&categories),
        ComplianceResult {
            compliant: true,
            online_compliant: true,
        }
    );
}

#[test]
fn sub_question_parents_only_check_eligible_children() {
    let parent = parent_question(
        "p",
        QuestionKind::SubQuestionParent,
        AnswerKind::Text,
        vec![
            flagged_sub(sub_question("x", 1.0, AnswerKind::Text, Some("yes ")), primary_only()),
            sub_question("y", 2.0, AnswerKind::Text, Some("No")),
        ],
        Vec::new(),
    );
    assert!(evaluate(&[category("c1", vec![parent])]).compliant);
}

#[test]
fn numeric_ratio_rejects_blank_or_zero_sub_answers() {
    let ratio = |second: Option<&str>| {
        flagged(
            parent_question(
                "r",
                QuestionKind::Ratio,
                AnswerKind::Numeric,
                vec![
                    sub_question("q1", 1.0, AnswerKind::Numeric, Some("40")),
                    sub_question("q2", 2.0, AnswerKind::Numeric, second),
                ],
                Vec::new(),
            ),
            primary_only(),
        )
    };

    assert!(evaluate(&[category("c1", vec![ratio(Some("12"))])]).compliant);
    assert!(!evaluate(&[category("c1", vec![ratio(Some("0"))])]).compliant);
    assert!(!evaluate(&[category("c1", vec![ratio(None)])]).compliant);
}

#[test]
fn text_ratio_checks_every_child_for_yes() {
    // eligibility comes from one child, but every child must answer yes
    let ratio = parent_question(
        "r",
        QuestionKind::Ratio,
        AnswerKind::Text,
        vec![
            flagged_sub(sub_question("q1", 1.0, AnswerKind::Text, Some("Yes")), primary_only()),
            sub_question("q2", 2.0, AnswerKind::Text, Some("No")),
        ],
        Vec::new(),
    );
    assert!(!evaluate(&[category("c1", vec![ratio])]).compliant);
}

#[test]
fn sku_groups_check_eligible_lines() {
    let mut eligible = sku_line("s1", None, None, Some("YES"));
    eligible.compliance = primary_only();
    let ignored = sku_line("s2", None, None, Some("No"));
    let group = sku_group("g", vec![eligible, ignored], Vec::new());

    assert!(evaluate(&[category("c1", vec![group])]).compliant);
}
