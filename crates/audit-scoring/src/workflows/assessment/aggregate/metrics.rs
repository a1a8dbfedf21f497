use serde::{Deserialize, Serialize};

use super::super::domain::{Category, FoodType, QuestionKind, RangeTier, SkuLine, Species};
use crate::workflows::intake::AuditTemplate;

/// Audit-level figures written back to the audit record under their column names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalMetrics {
    #[serde(rename = "cgi_musthavedog")]
    pub must_have_dog: f64,
    #[serde(rename = "cgi_musthavecat")]
    pub must_have_cat: f64,
    #[serde(rename = "cgi_totalmusthave")]
    pub total_must_have: f64,
    #[serde(rename = "cgi_totaldog")]
    pub total_dog: f64,
    #[serde(rename = "cgi_totalcat")]
    pub total_cat: f64,
    #[serde(rename = "cgi_nextbestdog")]
    pub next_best_dog: f64,
    #[serde(rename = "cgi_nextbestcat")]
    pub next_best_cat: f64,
    #[serde(rename = "cgi_totalnextbest")]
    pub total_next_best: f64,
    #[serde(rename = "cgi_othercat")]
    pub other_cat: f64,
    #[serde(rename = "cgi_otherdog")]
    pub other_dog: f64,
    #[serde(rename = "cgi_dogdry")]
    pub dog_dry: f64,
    #[serde(rename = "cgi_dogwet")]
    pub dog_wet: f64,
    #[serde(rename = "cgi_catdry")]
    pub cat_dry: f64,
    #[serde(rename = "cgi_catwet")]
    pub cat_wet: f64,
    #[serde(rename = "cgi_catreportingrange")]
    pub cat_reporting_range: f64,
    #[serde(rename = "cgi_dogreportingrange")]
    pub dog_reporting_range: f64,
    #[serde(rename = "cgi_reportingrange")]
    pub reporting_range: f64,
    #[serde(rename = "cgi_catterritory")]
    pub cat_territory: f64,
    #[serde(rename = "cgi_dogterritory")]
    pub dog_territory: f64,
    #[serde(rename = "cgi_territory")]
    pub territory: f64,
    #[serde(rename = "nov_perfectxscore")]
    pub total_score: f64,
    #[serde(rename = "rc_all_questions_answered")]
    pub all_questions_answered: bool,
}

/// SKU-derived metrics over every SKU line in the tree. Totals are filled by the caller.
pub(crate) fn sku_metrics(categories: &[Category], template: &AuditTemplate) -> GlobalMetrics {
    let lines: Vec<&SkuLine> = categories
        .iter()
        .flat_map(|category| category.questions.iter())
        .filter(|question| question.kind == QuestionKind::SkuGroup)
        .flat_map(|question| question.sku_lines().iter())
        .collect();

    GlobalMetrics {
        must_have_dog: coverage(&lines, tiered(RangeTier::MustHave, Some(Species::Dog))),
        must_have_cat: coverage(&lines, tiered(RangeTier::MustHave, Some(Species::Cat))),
        total_must_have: coverage(&lines, tiered(RangeTier::MustHave, None)),
        total_dog: coverage(&lines, species(Species::Dog)),
        total_cat: coverage(&lines, species(Species::Cat)),
        next_best_dog: coverage(&lines, tiered(RangeTier::NextBest, Some(Species::Dog))),
        next_best_cat: coverage(&lines, tiered(RangeTier::NextBest, Some(Species::Cat))),
        total_next_best: coverage(&lines, tiered(RangeTier::NextBest, None)),
        other_cat: coverage(&lines, tiered(RangeTier::Other, Some(Species::Cat))),
        other_dog: coverage(&lines, tiered(RangeTier::Other, Some(Species::Dog))),
        dog_dry: yes_count(&lines, food(FoodType::Dry, Species::Dog)),
        dog_wet: yes_count(&lines, food(FoodType::Wet, Species::Dog)),
        cat_dry: yes_count(&lines, food(FoodType::Dry, Species::Cat)),
        cat_wet: yes_count(&lines, food(FoodType::Wet, Species::Cat)),
        cat_reporting_range: yes_count(&lines, |line: &SkuLine| {
            line.reporting_range.is_some() && line.species == Some(Species::Cat)
        }),
        dog_reporting_range: yes_count(&lines, |line: &SkuLine| {
            line.reporting_range.is_some() && line.species == Some(Species::Dog)
        }),
        reporting_range: template.reporting_range.unwrap_or(0) as f64,
        cat_territory: yes_count(&lines, |line: &SkuLine| {
            line.territory.is_some() && line.species == Some(Species::Cat)
        }),
        dog_territory: yes_count(&lines, |line: &SkuLine| {
            line.territory.is_some() && line.species == Some(Species::Dog)
        }),
        territory: template.territory.unwrap_or(0) as f64,
        total_score: 0.0,
        all_questions_answered: false,
    }
}

fn species(wanted: Species) -> impl Fn(&SkuLine) -> bool {
    move |line| line.species == Some(wanted)
}

/// Tier filter; without a species, any line tagged Cat or Dog matches.
fn tiered(tier: RangeTier, wanted: Option<Species>) -> impl Fn(&SkuLine) -> bool {
    move |line| {
        line.tier == Some(tier)
            && match wanted {
                Some(wanted) => line.species == Some(wanted),
                None => line.species.is_some(),
            }
    }
}

fn food(food_type: FoodType, wanted: Species) -> impl Fn(&SkuLine) -> bool {
    move |line| line.food_type == Some(food_type) && line.species == Some(wanted)
}

/// Percentage of matching lines answered "Yes"; 0 when nothing matches.
fn coverage<F>(lines: &[&SkuLine], matches: F) -> f64
where
    F: Fn(&SkuLine) -> bool,
{
    let (total, yes) = lines
        .iter()
        .filter(|line| matches(**line))
        .fold((0usize, 0usize), |(total, yes), line| {
            (total + 1, yes + usize::from(line.state.is_yes()))
        });

    if total == 0 || yes == 0 {
        return 0.0;
    }
    yes as f64 / total as f64 * 100.0
}

fn yes_count<F>(lines: &[&SkuLine], matches: F) -> f64
where
    F: Fn(&SkuLine) -> bool,
{
    lines
        .iter()
        .filter(|line| line.state.is_yes() && matches(**line))
        .count() as f64
}
