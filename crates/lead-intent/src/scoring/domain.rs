use serde::{Deserialize, Serialize};

/// Points awarded by the classifier when it returns a label outside High/Medium/Low.
pub const UNRECOGNIZED_INTENT_POINTS: u8 = 10;

/// Reasoning reported when the classifier could not produce a verdict.
pub const FALLBACK_REASONING: &str = "AI analysis unavailable - using default classification";

/// Prospect record as uploaded. Identity is the position in the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin_bio: String,
}

impl Lead {
    pub(crate) fn required_fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.role,
            &self.company,
            &self.industry,
            &self.location,
            &self.linkedin_bio,
        ]
    }
}

/// Product description acting as the ideal customer profile for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    pub value_props: Vec<String>,
    pub ideal_use_cases: Vec<String>,
}

impl Offer {
    pub fn validate(&self) -> Result<(), OfferError> {
        if self.name.trim().is_empty() {
            return Err(OfferError::MissingName);
        }
        if self.value_props.is_empty() {
            return Err(OfferError::EmptyValueProps);
        }
        if self.ideal_use_cases.is_empty() {
            return Err(OfferError::EmptyIdealUseCases);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferError {
    #[error("offer name must not be empty")]
    MissingName,
    #[error("value_props must contain at least one entry")]
    EmptyValueProps,
    #[error("ideal_use_cases must contain at least one entry")]
    EmptyIdealUseCases,
}

/// Buying-intent bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLabel {
    High,
    Medium,
    Low,
}

impl IntentLabel {
    /// Final label for a combined score: >= 70 High, >= 40 Medium, otherwise Low.
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::High
        } else if score >= 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Classifier contribution for this label.
    pub fn points(self) -> u8 {
        match self {
            Self::High => 50,
            Self::Medium => 30,
            Self::Low => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Intent as reported by the classifier. Labels outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifiedIntent {
    Known(IntentLabel),
    Unrecognized(String),
}

impl ClassifiedIntent {
    /// Normalizes casing (first character upper, remainder lower) before matching.
    pub fn from_raw(raw: &str) -> Self {
        let normalized = normalize_intent(raw);
        match IntentLabel::parse(&normalized) {
            Some(label) => Self::Known(label),
            None => Self::Unrecognized(normalized),
        }
    }

    pub fn points(&self) -> u8 {
        match self {
            Self::Known(label) => label.points(),
            Self::Unrecognized(_) => UNRECOGNIZED_INTENT_POINTS,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(label) => label.label(),
            Self::Unrecognized(value) => value,
        }
    }
}

fn normalize_intent(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Semantic classifier contribution for a single lead.
///
/// Points are derived from the intent and only set through the constructors,
/// so they never exceed the High weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub intent: ClassifiedIntent,
    pub reasoning: String,
    points: u8,
}

impl ClassificationResult {
    pub fn from_verdict(raw_intent: &str, reasoning: impl Into<String>) -> Self {
        let intent = ClassifiedIntent::from_raw(raw_intent);
        let points = intent.points();
        Self {
            intent,
            reasoning: reasoning.into(),
            points,
        }
    }

    /// Default verdict used whenever the external classifier is unusable.
    pub fn fallback() -> Self {
        Self {
            intent: ClassifiedIntent::Known(IntentLabel::Medium),
            reasoning: FALLBACK_REASONING.to_string(),
            points: IntentLabel::Medium.points(),
        }
    }

    pub fn points(&self) -> u8 {
        self.points
    }
}

/// Deterministic rule sub-scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBreakdown {
    pub role: u8,
    pub industry: u8,
    pub data_quality: u8,
}

impl RuleBreakdown {
    pub fn total(&self) -> u8 {
        self.role
            .saturating_add(self.industry)
            .saturating_add(self.data_quality)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub rule_score: u8,
    pub ai_score: u8,
    pub details: ScoreDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetails {
    pub role_points: u8,
    pub industry_points: u8,
    pub data_quality_points: u8,
    pub ai_intent: ClassifiedIntent,
}

/// Per-lead outcome of a scoring batch.
///
/// `intent` is always derived from `score`; the classifier's own label only
/// survives as `score_breakdown.details.ai_intent`. Degraded records carry
/// `error = true`, a zero score and no breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredLead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub location: String,
    pub intent: IntentLabel,
    pub score: u8,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ScoredLead {
    pub fn scored(lead: &Lead, rules: RuleBreakdown, ai: ClassificationResult) -> Self {
        let rule_score = rules.total();
        let score = rule_score.saturating_add(ai.points);

        Self {
            name: lead.name.clone(),
            role: lead.role.clone(),
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            location: lead.location.clone(),
            intent: IntentLabel::from_score(score),
            score,
            reasoning: ai.reasoning,
            score_breakdown: Some(ScoreBreakdown {
                rule_score,
                ai_score: ai.points,
                details: ScoreDetails {
                    role_points: rules.role,
                    industry_points: rules.industry,
                    data_quality_points: rules.data_quality,
                    ai_intent: ai.intent,
                },
            }),
            error: false,
        }
    }

    pub fn degraded(lead: &Lead, failure: &dyn std::fmt::Display) -> Self {
        Self {
            name: lead.name.clone(),
            role: lead.role.clone(),
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            location: lead.location.clone(),
            intent: IntentLabel::Low,
            score: 0,
            reasoning: format!("Error during scoring: {failure}"),
            score_breakdown: None,
            error: true,
        }
    }
}
