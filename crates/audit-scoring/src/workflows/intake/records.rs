use serde::{Deserialize, Deserializer, Serialize};

/// Dataverse exports send `null` for empty lists and ids; treat it like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Audit payload as exported by the host: header fields plus the flat question list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "nov_auditid", default, deserialize_with = "null_as_default")]
    pub audit_id: String,
    #[serde(rename = "statuscode", default)]
    pub status_code: Option<i64>,
    #[serde(rename = "_nov_related_auditemplate_value", default)]
    pub template_id: Option<String>,
    #[serde(rename = "nov_audit_nov_auditquestion_audit", default, deserialize_with = "null_as_default")]
    pub questions: Vec<RawQuestion>,
    #[serde(rename = "rc_all_questions_answered", default)]
    pub all_questions_answered: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "nov_questioncategoryid", default)]
    pub id: Option<String>,
    #[serde(rename = "nov_questioncategory", default)]
    pub name: Option<String>,
    #[serde(rename = "_nov_parentquestioncategory_value", default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "nov_auditquestionid", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "nov_auditquestion", default)]
    pub text: Option<String>,
    #[serde(rename = "nov_answertype", default)]
    pub answer_type: Option<i64>,
    #[serde(rename = "nov_questiontype", default)]
    pub question_type: Option<i64>,
    #[serde(rename = "nov_questionflow", default)]
    pub flow: Option<f64>,
    #[serde(rename = "nov_tdq_description", default)]
    pub description: Option<String>,
    #[serde(rename = "nov_px_score", default)]
    pub px_score: Option<f64>,
    #[serde(rename = "nov_scored", default)]
    pub scored: Option<f64>,
    #[serde(rename = "cgi_answer", default)]
    pub stored_answer: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(alias = "subQuestions", default, deserialize_with = "null_as_default")]
    pub subquestions: Vec<RawSubQuestion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub list_options: Vec<RawListOption>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scoring_rules: Vec<RawScoringRule>,
    #[serde(rename = "_nov_question_value", default)]
    pub parent_question_key: Option<String>,
    #[serde(rename = "nov_questioncategory", default)]
    pub category: Option<RawCategory>,
    #[serde(rename = "nov_target_formatted", default)]
    pub target_label: Option<String>,
    #[serde(rename = "_nov_productrange_value_formatted", default)]
    pub product_range: Option<String>,
    #[serde(rename = "nov_lifestage_formatted", default)]
    pub life_stage: Option<String>,
    #[serde(rename = "stockweight_formatted", default)]
    pub stock_weight: Option<String>,
    #[serde(rename = "isstockitem", default)]
    pub stock_item: Option<bool>,
    #[serde(rename = "nov_type", default)]
    pub food_type: Option<i64>,
    #[serde(rename = "rc_ranges", default)]
    pub range_code: Option<i64>,
    #[serde(rename = "nov_reportingrange", default)]
    pub reporting_range: Option<i64>,
    #[serde(rename = "nov_territory", default)]
    pub territory: Option<i64>,
    #[serde(rename = "cgi_includeinuscompliance", default)]
    pub include_in_compliance: Option<bool>,
    #[serde(rename = "cgi_includeincaonlinecompliance", default)]
    pub include_in_online_compliance: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubQuestion {
    #[serde(rename = "cgi_auditsubquestionid", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "cgi_name", default)]
    pub name: Option<String>,
    #[serde(rename = "cgi_answertype", default)]
    pub answer_type: Option<i64>,
    #[serde(rename = "cgi_questionflow", default)]
    pub flow: Option<f64>,
    #[serde(rename = "cgi_answertext", default)]
    pub answer_text: Option<String>,
    #[serde(rename = "cgi_numericalanswer", default)]
    pub numerical_answer: Option<f64>,
    #[serde(rename = "cgi_includeinuscompliance", default)]
    pub include_in_compliance: Option<bool>,
    #[serde(rename = "cgi_includeincaonlinecompliance", default)]
    pub include_in_online_compliance: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListOption {
    #[serde(rename = "cgi_auditlistoptionid", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "cgi_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "cgi_order", default)]
    pub order: Option<i64>,
    #[serde(rename = "cgi_value", default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScoringRule {
    #[serde(rename = "nov_scoringrulesid", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "nov_threshold", default)]
    pub threshold: Option<f64>,
    #[serde(rename = "nov_target", default)]
    pub target: Option<f64>,
    #[serde(rename = "nov_weighted", default)]
    pub weighted: Option<bool>,
}

/// Template-level settings; the reporting range and territory feed global metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTemplate {
    #[serde(rename = "nov_audittemplateid", default)]
    pub id: String,
    #[serde(rename = "cgi_reportingrange", default)]
    pub reporting_range: Option<i64>,
    #[serde(rename = "cgi_reportingrange_formatted", default)]
    pub reporting_range_label: Option<String>,
    #[serde(rename = "cgi_territory", default)]
    pub territory: Option<i64>,
    #[serde(rename = "cgi_territory_formatted", default)]
    pub territory_label: Option<String>,
    #[serde(rename = "nov_perfectx", default)]
    pub perfect_x: Option<bool>,
    #[serde(rename = "nov_tradeterm", default)]
    pub trade_term: Option<String>,
    #[serde(rename = "cgi_ultraselective", default)]
    pub ultra_selective: Option<bool>,
    #[serde(rename = "cgi_other", default)]
    pub other: Option<String>,
}
