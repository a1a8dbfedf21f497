use super::codes::{self, RecordClass};
use super::records::{AuditRecord, RawQuestion, RawSubQuestion};
use crate::workflows::assessment::domain::{
    AnswerState, Category, ComplianceFlags, ListOption, Question, QuestionKind, ScoringRule,
    SkuDetails, SkuLine, Species, SubItems, SubQuestion,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Build the category tree from the flat record list.
///
/// Categories and their questions keep first-seen order. SKU members sharing a parent
/// key collapse into one group question, appended to its category after the regular
/// questions. Records without a resolvable category are dropped.
pub fn normalize(record: &AuditRecord) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    let mut category_slots: HashMap<String, usize> = HashMap::new();
    let mut sku_groups: Vec<(usize, Question)> = Vec::new();
    let mut sku_slots: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for raw in &record.questions {
        let Some(category_ref) = raw.category.as_ref() else {
            warn!(question_id = %raw.id, "dropping question without a category reference");
            dropped += 1;
            continue;
        };
        let Some(category_id) = category_ref.id.as_deref().filter(|id| !id.is_empty()) else {
            warn!(question_id = %raw.id, "dropping question with an empty category id");
            dropped += 1;
            continue;
        };

        let category_slot = *category_slots
            .entry(category_id.to_string())
            .or_insert_with(|| {
                categories.push(Category::new(
                    category_id.to_string(),
                    category_ref.name.clone().unwrap_or_default(),
                    category_ref.parent_id.clone().filter(|id| !id.is_empty()),
                ));
                categories.len() - 1
            });

        match codes::classify(&raw.id, raw.question_type) {
            RecordClass::SkuMember => {
                let line = sku_line(raw);
                match raw.parent_question_key.as_deref().filter(|key| !key.is_empty()) {
                    Some(key) => {
                        let group_slot = *sku_slots.entry(key.to_string()).or_insert_with(|| {
                            sku_groups.push((category_slot, sku_group(key, raw)));
                            sku_groups.len() - 1
                        });
                        if let SubItems::Skus(lines) = &mut sku_groups[group_slot].1.sub_items {
                            lines.push(line);
                        }
                    }
                    None => {
                        debug!(question_id = %raw.id, "SKU record without parent key kept as empty group");
                        categories[category_slot]
                            .questions
                            .push(sku_group(&raw.id, raw));
                    }
                }
            }
            RecordClass::Question(kind) => {
                categories[category_slot].questions.push(question(raw, kind));
            }
        }
    }

    for (category_slot, group) in sku_groups {
        categories[category_slot].questions.push(group);
    }

    info!(
        audit_id = %record.audit_id,
        categories = categories.len(),
        records = record.questions.len(),
        dropped,
        "normalized audit questions"
    );

    categories
}

fn question(raw: &RawQuestion, kind: QuestionKind) -> Question {
    let sub_items = match kind {
        QuestionKind::SubQuestionParent | QuestionKind::Ratio => {
            SubItems::Questions(raw.subquestions.iter().map(sub_question).collect())
        }
        QuestionKind::Plain | QuestionKind::SkuGroup => {
            if !raw.subquestions.is_empty() {
                debug!(question_id = %raw.id, "ignoring sub-questions on a plain question");
            }
            SubItems::None
        }
    };

    Question {
        id: raw.id.clone(),
        record_id: raw.id.clone(),
        label: raw.text.clone().unwrap_or_default(),
        description: raw.description.clone(),
        kind,
        answer_kind: codes::answer_kind(&raw.id, raw.answer_type),
        state: AnswerState::from_raw(raw.stored_answer.clone()),
        score: raw.px_score.unwrap_or(0.0),
        derived_ratio: match kind {
            QuestionKind::Ratio => raw.scored,
            _ => None,
        },
        scoring_rules: scoring_rules(raw),
        list_options: list_options(raw),
        sub_items,
        compliance: compliance_flags(raw.include_in_compliance, raw.include_in_online_compliance),
        expanded: false,
        show_description: false,
    }
}

/// The first member seen under a parent key supplies the group's display fields.
fn sku_group(key: &str, first: &RawQuestion) -> Question {
    Question {
        id: key.to_string(),
        record_id: first.id.clone(),
        label: first.text.clone().unwrap_or_default(),
        description: first.description.clone(),
        kind: QuestionKind::SkuGroup,
        answer_kind: codes::answer_kind(&first.id, first.answer_type),
        state: AnswerState {
            answer: first.answer.clone(),
            ..AnswerState::default()
        },
        score: first.px_score.unwrap_or(0.0),
        derived_ratio: None,
        scoring_rules: scoring_rules(first),
        list_options: list_options(first),
        sub_items: SubItems::Skus(Vec::new()),
        compliance: compliance_flags(
            first.include_in_compliance,
            first.include_in_online_compliance,
        ),
        expanded: false,
        show_description: false,
    }
}

fn sku_line(raw: &RawQuestion) -> SkuLine {
    SkuLine {
        id: raw.id.clone(),
        label: raw.text.clone().unwrap_or_default(),
        answer_kind: codes::answer_kind(&raw.id, raw.answer_type),
        flow: raw.flow.unwrap_or(0.0),
        state: AnswerState::from_raw(raw.stored_answer.clone()),
        target_label: raw.target_label.clone(),
        species: raw.target_label.as_deref().and_then(Species::from_label),
        tier: codes::range_tier(raw.range_code),
        food_type: codes::food_type(raw.food_type),
        reporting_range: raw.reporting_range,
        territory: raw.territory,
        details: SkuDetails {
            product_range: raw.product_range.clone(),
            life_stage: raw.life_stage.clone(),
            stock_weight: raw.stock_weight.clone(),
            stock_item: raw.stock_item,
        },
        compliance: compliance_flags(raw.include_in_compliance, raw.include_in_online_compliance),
    }
}

fn sub_question(raw: &RawSubQuestion) -> SubQuestion {
    SubQuestion {
        id: raw.id.clone(),
        name: raw.name.clone().unwrap_or_default(),
        answer_kind: codes::sub_answer_kind(&raw.id, raw.answer_type),
        flow: raw.flow.unwrap_or(0.0),
        answer_text: raw.answer_text.clone(),
        numerical_answer: raw.numerical_answer,
        answer: None,
        value: None,
        answered: false,
        compliance: compliance_flags(raw.include_in_compliance, raw.include_in_online_compliance),
    }
}

fn scoring_rules(raw: &RawQuestion) -> Vec<ScoringRule> {
    raw.scoring_rules
        .iter()
        .map(|rule| ScoringRule {
            threshold: rule.threshold.unwrap_or(0.0),
            target: rule.target.unwrap_or(0.0),
            weighted: rule.weighted.unwrap_or(false),
        })
        .collect()
}

fn list_options(raw: &RawQuestion) -> Vec<ListOption> {
    raw.list_options
        .iter()
        .map(|option| ListOption {
            name: option.name.clone(),
            value: option.value.unwrap_or(0.0),
            order: option.order.unwrap_or(0),
        })
        .collect()
}

fn compliance_flags(primary: Option<bool>, online: Option<bool>) -> ComplianceFlags {
    ComplianceFlags {
        primary: primary == Some(true),
        online: online == Some(true),
    }
}
