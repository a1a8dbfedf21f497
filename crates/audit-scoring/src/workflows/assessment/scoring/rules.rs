use super::super::domain::{ListOption, ScoringRule};

/// Rules arrive unordered; every algorithm consumes them ascending by threshold.
pub(crate) fn sorted_by_threshold(rules: &[ScoringRule]) -> Vec<ScoringRule> {
    let mut sorted = rules.to_vec();
    sorted.sort_by(|left, right| left.threshold.total_cmp(&right.threshold));
    sorted
}

/// Two-decimal rounding of the stored binary value, the way fixed-point formatting
/// rounds: nearest representation wins, exact ties go away from zero. `0.075` is stored
/// just below the tie and becomes `0.07`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Only odd multiples of 1/8 sit exactly halfway between two hundredths.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return (value * 100.0).round() / 100.0;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Yes/no questions earn the lowest rule's target on "Yes".
pub(crate) fn binary_score(rules: &[ScoringRule], is_yes: bool) -> f64 {
    if !is_yes {
        return 0.0;
    }
    sorted_by_threshold(rules)
        .first()
        .map(|rule| rule.target)
        .unwrap_or(0.0)
}

/// Bucketed lookup: the first bucket is closed at its single boundary, later buckets are
/// `(threshold[i], threshold[i + 1]]`, and anything above the highest threshold earns 0.
///
/// Duplicate thresholds are undefined input; the earlier rule after a stable sort wins.
pub(crate) fn threshold_score(rules: &[ScoringRule], value: f64) -> f64 {
    let sorted = sorted_by_threshold(rules);
    let Some(lowest) = sorted.first() else {
        return 0.0;
    };
    if value <= lowest.threshold {
        return lowest.target;
    }

    sorted
        .windows(2)
        .find(|pair| value > pair[0].threshold && value <= pair[1].threshold)
        .map(|pair| pair[1].target)
        .unwrap_or(0.0)
}

/// Option name must match the stored answer, and a rule threshold must equal the option value.
pub(crate) fn list_option_score(
    rules: &[ScoringRule],
    options: &[ListOption],
    selected: Option<&str>,
) -> f64 {
    let Some(selected) = selected else {
        return 0.0;
    };
    let Some(option) = options.iter().find(|option| option.name == selected) else {
        return 0.0;
    };

    rules
        .iter()
        .find(|rule| rule.threshold == option.value)
        .map(|rule| rule.target)
        .unwrap_or(0.0)
}

/// SKU-group "perfect score" over `yes` affirmative lines out of `total`.
pub(crate) fn perfect_score(rules: &[ScoringRule], yes: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sorted = sorted_by_threshold(rules);
    let coverage = yes as f64 / total as f64 * 100.0;

    let Some(rule) = sorted
        .iter()
        .rev()
        .find(|rule| rule.threshold <= coverage)
        .or_else(|| sorted.first())
    else {
        return 0.0;
    };

    let goal = (rule.threshold / 100.0 * total as f64).ceil();
    if (yes as f64) < goal {
        return 0.0;
    }

    let score = if rule.weighted {
        yes as f64 / total as f64 * rule.target
    } else {
        rule.target
    };
    round2(score)
}
