use super::super::domain::SubQuestion;
use super::rules::round2;

/// Q2 over Q1 as a percentage, with sub-questions ordered by flow.
///
/// Returns `None` when fewer than two sub-questions exist. A zero denominator yields 0.
pub fn compute_ratio(subs: &[SubQuestion]) -> Option<f64> {
    if subs.len() < 2 {
        return None;
    }
    let mut ordered: Vec<&SubQuestion> = subs.iter().collect();
    ordered.sort_by(|left, right| left.flow.total_cmp(&right.flow));

    let denominator = operand(ordered[0]);
    let numerator = operand(ordered[1]);
    if denominator == 0.0 {
        return Some(0.0);
    }
    Some(round2(numerator / denominator * 100.0))
}

fn operand(sub: &SubQuestion) -> f64 {
    sub.numerical_answer.or(sub.value).unwrap_or(0.0)
}
