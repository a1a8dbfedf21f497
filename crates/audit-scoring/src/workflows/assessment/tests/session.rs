use super::common::*;

use crate::workflows::assessment::aggregate;
use crate::workflows::assessment::domain::{AnswerValue, QuestionKind};
use crate::workflows::assessment::responses;
use crate::workflows::assessment::session::{AnswerInputKind, AnswerMutation, AuditSession, ViewToggle};

#[test]
fn ingest_builds_tree_and_initial_aggregates() {
    let session = session();

    let categories: Vec<&str> = session.categories().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(categories, ["c1", "c2", "c3"]);
    let range: Vec<&str> = session.categories()[1]
        .questions
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(range, ["r1", "grp-range"]);
    assert!(session.question("orphan").is_none());

    assert_eq!(session.completion_percentage(), 17);
    assert_eq!(session.total_score(), 8.0);
    assert_eq!(session.categories()[0].answered_count, 1);
    assert_eq!(session.categories()[0].progress_value, 200);

    let metrics = session.metrics();
    assert_eq!(metrics.must_have_dog, 50.0);
    assert_eq!(metrics.total_next_best, 100.0);
    assert_eq!(metrics.cat_reporting_range, 1.0);
    assert_eq!(metrics.reporting_range, 4.0);
    assert_eq!(metrics.territory, 2.0);
    assert_eq!(metrics.total_score, 8.0);
    assert!(!metrics.all_questions_answered);

    assert!(session.compliance().compliant);
    assert!(session.compliance().online_compliant);
    assert!(session.outputs().changed_questions.is_empty());
}

#[test]
fn initial_pass_keeps_ingested_scores() {
    let session = session();
    // rescoring would give the SKU group 20; ingest keeps the stored value
    assert_eq!(session.question("grp-range").map(|q| q.score), Some(0.0));
    assert_eq!(session.question("p1").map(|q| q.score), Some(3.0));
}

#[test]
fn numeric_answer_rescores_and_records_change() {
    let mut session = session();

    assert!(session.apply_answer("q-count", "c1", "15", AnswerInputKind::Number));

    let question = session.question("q-count").expect("question exists");
    assert_eq!(question.state.value, AnswerValue::Number(15.0));
    assert!(question.state.answered);
    assert_eq!(question.score, 15.0);
    assert_eq!(session.total_score(), 23.0);
    assert_eq!(session.categories()[0].answered_count, 2);

    let outputs = session.outputs();
    assert_eq!(outputs.changed_questions.len(), 1);
    assert_eq!(outputs.changed_questions[0].id, "q-count");
    assert_eq!(outputs.changed_questions[0].score, Some(15.0));
    assert_eq!(outputs.audit_scores.metrics.total_score, 23.0);
}

#[test]
fn mismatched_or_unknown_targets_are_ignored() {
    let mut session = session();
    let before = session.outputs();

    assert!(!session.apply_answer("q-count", "c1", "15", AnswerInputKind::Choice));
    assert!(!session.apply_answer("q-count", "c2", "15", AnswerInputKind::Number));
    assert!(!session.apply_answer("missing", "c1", "15", AnswerInputKind::Number));
    assert!(!session.apply_answer("grp-range", "c2", "Yes", AnswerInputKind::Choice));
    assert!(!session.apply_sub_answer("sub-z", "r1", "4"));
    assert!(!session.apply_sub_answer("sub-a", "q-yes", "4"));
    assert!(!session.apply_sku_answer("s9", "grp-range", "Yes"));
    assert!(!session.apply_sku_answer("s1", "r1", "Yes"));

    assert_eq!(session.outputs(), before);
}

#[test]
fn list_option_selection_and_clearing() {
    let mut session = session();

    assert!(session.apply_answer("q-tier", "c1", "Gold", AnswerInputKind::ListOption));
    let question = session.question("q-tier").expect("question exists");
    assert_eq!(question.score, 10.0);
    assert_eq!(question.state.value, AnswerValue::Choice("Gold".to_string()));

    assert!(session.apply_answer("q-tier", "c1", "none", AnswerInputKind::ListOption));
    let question = session.question("q-tier").expect("question exists");
    assert_eq!(question.state.value, AnswerValue::Unselected);
    assert!(!question.state.answered);
    assert_eq!(question.score, 0.0);
}

#[test]
fn sku_answers_rescore_the_group_and_metrics() {
    let mut session = session();

    assert!(session.apply_sku_answer("s2", "grp-range", "Yes"));
    assert_eq!(session.question("grp-range").map(|q| q.score), Some(30.0));
    assert_eq!(session.metrics().must_have_dog, 100.0);
    assert_eq!(session.metrics().dog_wet, 1.0);

    assert!(session.apply_sku_answer("s4", "grp-range", "Yes"));
    let group = session.question("grp-range").expect("group exists");
    assert_eq!(group.score, 40.0);
    assert!(group.state.answered);
    assert_eq!(session.metrics().cat_territory, 1.0);
    assert_eq!(session.metrics().other_cat, 100.0);

    let changed: Vec<String> = session
        .outputs()
        .changed_questions
        .into_iter()
        .map(|change| change.id)
        .collect();
    assert_eq!(changed, ["s2", "s4"]);
}

#[test]
fn ratio_sub_answers_derive_ratio_and_score() {
    let mut session = session();

    assert!(session.apply_sub_answer("sub-b", "r1", "25"));
    let ratio = session.question("r1").expect("ratio exists");
    assert_eq!(ratio.kind, QuestionKind::Ratio);
    assert_eq!(ratio.derived_ratio, Some(50.0));
    assert_eq!(ratio.score, 10.0);
    assert!(ratio.state.answered);

    assert!(session.apply_sub_answer("sub-a", "r1", "0"));
    let ratio = session.question("r1").expect("ratio exists");
    assert_eq!(ratio.derived_ratio, Some(0.0));
    assert_eq!(ratio.score, 5.0);

    let outputs = session.outputs();
    let subs: Vec<&str> = outputs
        .changed_sub_questions
        .iter()
        .map(|change| change.id.as_str())
        .collect();
    assert_eq!(subs, ["sub-a", "sub-b"]);
    assert_eq!(outputs.changed_sub_questions[0].numerical_answer, Some(0.0));
    assert!(outputs.changed_questions.iter().any(|change| change.id == "r1"));
}

#[test]
fn non_numeric_sub_answer_leaves_numeric_sub_unanswered() {
    let mut session = session();

    assert!(session.apply_sub_answer("sub-b", "r1", "many"));
    let ratio = session.question("r1").expect("ratio exists");
    assert!(!ratio.state.answered);
    assert!(!ratio.sub_questions().iter().any(|sub| sub.id == "sub-b" && sub.answered));
}

#[test]
fn clearing_a_compliance_answer_drops_both_flags() {
    let mut session = session();

    assert!(session.apply_answer("q-yes", "c1", "No", AnswerInputKind::Choice));

    assert!(!session.compliance().compliant);
    assert!(!session.compliance().online_compliant);
    assert_eq!(session.question("q-yes").map(|q| q.score), Some(0.0));
}

#[test]
fn answering_everything_sets_all_answered() {
    let mut session = session();
    let mutations = [
        AnswerMutation::Question {
            question_id: "q-count".to_string(),
            category_id: "c1".to_string(),
            value: "15".to_string(),
            kind: AnswerInputKind::Number,
        },
        AnswerMutation::Question {
            question_id: "q-tier".to_string(),
            category_id: "c1".to_string(),
            value: "Silver".to_string(),
            kind: AnswerInputKind::ListOption,
        },
        AnswerMutation::Sku {
            sku_id: "s2".to_string(),
            parent_question_id: "grp-range".to_string(),
            value: "Yes".to_string(),
        },
        AnswerMutation::Sku {
            sku_id: "s4".to_string(),
            parent_question_id: "grp-range".to_string(),
            value: "No".to_string(),
        },
        AnswerMutation::SubQuestion {
            sub_id: "sub-b".to_string(),
            parent_question_id: "r1".to_string(),
            value: "25".to_string(),
        },
        AnswerMutation::SubQuestion {
            sub_id: "sub-y".to_string(),
            parent_question_id: "p1".to_string(),
            value: "No".to_string(),
        },
    ];

    for mutation in &mutations {
        assert!(session.apply(mutation), "{mutation:?} applied");
    }

    assert!(session.metrics().all_questions_answered);
    assert_eq!(session.completion_percentage(), 100);
    assert!(session
        .categories()
        .iter()
        .all(|category| category.progress_value == 600));
    // the ineligible sub-question answering "No" does not affect compliance
    assert!(session.compliance().compliant);
}

#[test]
fn total_score_never_drifts_from_question_scores() {
    let mut session = session();
    session.apply_answer("q-count", "c1", "35", AnswerInputKind::Number);
    session.apply_answer("q-tier", "c1", "Gold", AnswerInputKind::ListOption);
    session.apply_sku_answer("s2", "grp-range", "Yes");
    session.apply_sub_answer("sub-b", "r1", "10");
    session.apply_answer("q-count", "c1", "12", AnswerInputKind::Number);

    let from_questions: f64 = session
        .categories()
        .iter()
        .flat_map(|category| category.questions.iter())
        .map(|question| question.score)
        .sum();
    assert_eq!(session.total_score(), from_questions);
    assert_eq!(session.metrics().total_score, from_questions);

    let mut rebuilt = session.categories().to_vec();
    let metrics = aggregate::recompute(&mut rebuilt, session.template());
    assert_eq!(&metrics, session.metrics());
    assert_eq!(rebuilt.as_slice(), session.categories());
}

#[test]
fn tracking_twice_changes_nothing() {
    let session = session();
    let mut once = session.categories().to_vec();
    responses::track(&mut once);
    let mut twice = once.clone();
    responses::track(&mut twice);

    assert_eq!(once, twice);
    assert_eq!(once.as_slice(), session.categories());
}

#[test]
fn read_only_audits_ignore_every_edit() {
    let mut session = read_only_session();
    let before = session.outputs();

    assert!(session.is_read_only());
    assert!(!session.apply_answer("q-count", "c1", "15", AnswerInputKind::Number));
    assert!(!session.apply_sub_answer("sub-b", "r1", "25"));
    assert!(!session.apply_sku_answer("s2", "grp-range", "Yes"));
    assert_eq!(session.outputs(), before);
}

#[test]
fn flush_drains_changes_once() {
    let mut session = session();
    session.apply_answer("q-count", "c1", "15", AnswerInputKind::Number);
    session.apply_answer("q-count", "c1", "25", AnswerInputKind::Number);
    session.apply_sub_answer("sub-y", "p1", "Yes");

    let changes = session.flush_changes();
    assert_eq!(changes.questions.len(), 1);
    assert_eq!(changes.questions[0].score, Some(25.0));
    assert_eq!(changes.sub_questions.len(), 1);
    assert_eq!(changes.sub_questions[0].parent_question_id, "p1");

    assert!(session.flush_changes().is_empty());
}

#[test]
fn snapshot_restores_the_same_session() {
    let mut session = session();
    session.apply_answer("q-count", "c1", "15", AnswerInputKind::Number);
    session.apply_sku_answer("s2", "grp-range", "Yes");
    session.toggle_category("c2");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.audit_id, "audit-1");
    assert_eq!(snapshot.global_template, snapshot.template_type);

    let restored = AuditSession::from_snapshot(snapshot);
    assert_eq!(restored.categories(), session.categories());
    assert_eq!(restored.metrics(), session.metrics());
    assert_eq!(restored.compliance(), session.compliance());
    assert!(restored.categories()[1].collapsed);
    assert!(restored.outputs().changed_questions.is_empty());
}

#[test]
fn malformed_payload_degrades_to_empty_session() {
    let session = AuditSession::from_json("{ broken", template());

    assert!(session.categories().is_empty());
    assert_eq!(session.completion_percentage(), 0);
    assert_eq!(session.total_score(), 0.0);
    assert!(!session.metrics().all_questions_answered);
    assert!(!session.compliance().compliant);
}

#[test]
fn ui_toggles_do_not_touch_scores() {
    let mut session = session();
    let before = session.outputs();

    assert!(session.toggle_description("q-yes"));
    assert!(session.toggle_expanded("grp-range"));
    assert!(!session.toggle_expanded("missing"));
    assert!(!session.toggle_category("missing"));
    session.collapse_all(true);

    assert!(session.categories().iter().all(|category| category.collapsed));
    assert!(session.question("q-yes").map(|q| q.show_description).unwrap_or(false));
    assert!(session.question("grp-range").map(|q| q.expanded).unwrap_or(false));
    assert_eq!(session.outputs(), before);
}

#[test]
fn category_summaries_mirror_categories() {
    let summaries = session().category_summaries();
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[0].answered, 1);
    assert_eq!(summaries[0].total, 3);
    assert_eq!(summaries[0].score_sum, 5.0);
    assert_eq!(summaries[2].name, "Extras");
}

#[test]
fn view_toggles_apply_to_read_only_audits() {
    let mut session = read_only_session();

    assert!(session.toggle(&ViewToggle::Category {
        category_id: "c1".to_string(),
    }));
    assert!(session.toggle(&ViewToggle::Description {
        question_id: "q-yes".to_string(),
    }));
    assert!(!session.toggle(&ViewToggle::Expanded {
        question_id: "missing".to_string(),
    }));
    assert!(session.toggle(&ViewToggle::CollapseAll { collapsed: false }));

    assert!(session.categories().iter().all(|category| !category.collapsed));
    assert!(session.question("q-yes").map(|q| q.show_description).unwrap_or(false));
}
