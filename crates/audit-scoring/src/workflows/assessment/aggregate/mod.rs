//! Category and audit-level aggregation.
//!
//! Every figure is recomputed from the current tree on each pass; nothing is carried
//! between passes.

mod metrics;

pub use metrics::GlobalMetrics;

use super::domain::Category;
use crate::workflows::intake::AuditTemplate;

/// Full-scale value of a category progress bar.
pub const PROGRESS_SCALE: f64 = 600.0;

/// Recompute every category, then the audit-level metrics and totals.
pub fn recompute(categories: &mut [Category], template: &AuditTemplate) -> GlobalMetrics {
    for category in categories.iter_mut() {
        recompute_category(category);
    }

    let mut metrics = metrics::sku_metrics(categories, template);
    metrics.total_score = total_score(categories);
    metrics.all_questions_answered = all_questions_answered(categories);
    metrics
}

pub fn recompute_category(category: &mut Category) {
    let total = category.questions.len();
    let answered = category
        .questions
        .iter()
        .filter(|question| question.is_complete())
        .count();

    category.answered_count = answered;
    category.score_sum = category.questions.iter().map(|question| question.score).sum();
    category.progress_value = if total == 0 {
        0
    } else {
        (answered as f64 / total as f64 * PROGRESS_SCALE).round() as u32
    };
}

pub fn total_score(categories: &[Category]) -> f64 {
    categories
        .iter()
        .flat_map(|category| category.questions.iter())
        .map(|question| question.score)
        .sum()
}

/// True only when at least one category exists and each is fully answered.
pub fn all_questions_answered(categories: &[Category]) -> bool {
    !categories.is_empty() && categories.iter().all(Category::is_fully_answered)
}

/// Share of complete questions across the audit, as a whole percentage.
pub fn completion_percentage(categories: &[Category]) -> u32 {
    let (answered, total) = categories
        .iter()
        .fold((0usize, 0usize), |(answered, total), category| {
            (answered + category.answered_count, total + category.total_questions())
        });

    if total == 0 {
        return 0;
    }
    (answered as f64 / total as f64 * 100.0).round() as u32
}
