use super::domain::{Lead, Offer, RuleBreakdown};

const DECISION_MAKER_KEYWORDS: &[&str] = &[
    "ceo",
    "cto",
    "cfo",
    "coo",
    "cmo",
    "founder",
    "co-founder",
    "owner",
    "president",
    "vp",
    "vice president",
    "director",
    "head of",
    "chief",
];

const INFLUENCER_KEYWORDS: &[&str] = &[
    "manager",
    "lead",
    "senior",
    "sr",
    "principal",
    "architect",
    "specialist",
];

// Checked in order; the first key contained in the lead industry with an
// adjacent term present in the ICP wins.
const ADJACENT_INDUSTRIES: &[(&str, &[&str])] = &[
    ("saas", &["software", "tech", "technology", "b2b", "cloud"]),
    ("software", &["saas", "tech", "technology", "it"]),
    ("tech", &["software", "saas", "technology", "it", "digital"]),
    ("technology", &["tech", "software", "saas", "it"]),
    ("finance", &["fintech", "banking", "financial", "investment"]),
    ("fintech", &["finance", "banking", "financial"]),
    ("healthcare", &["health", "medical", "pharma", "hospital"]),
    ("ecommerce", &["retail", "commerce", "shopping", "marketplace"]),
    ("b2b", &["saas", "enterprise", "business"]),
    ("enterprise", &["b2b", "corporate", "business"]),
];

const DATA_QUALITY_POINTS: u8 = 10;

/// Buying authority implied by a job title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTier {
    DecisionMaker,
    Influencer,
    Other,
}

impl RoleTier {
    pub fn points(self) -> u8 {
        match self {
            Self::DecisionMaker => 20,
            Self::Influencer => 10,
            Self::Other => 0,
        }
    }
}

/// How closely a lead's industry overlaps the offer's ideal use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndustryMatch {
    Direct,
    Adjacent,
    Unrelated,
}

impl IndustryMatch {
    pub fn points(self) -> u8 {
        match self {
            Self::Direct => 20,
            Self::Adjacent => 10,
            Self::Unrelated => 0,
        }
    }
}

pub fn classify_role(role: &str) -> RoleTier {
    let role = role.trim().to_lowercase();
    if role.is_empty() {
        return RoleTier::Other;
    }

    if DECISION_MAKER_KEYWORDS
        .iter()
        .any(|keyword| role.contains(keyword))
    {
        return RoleTier::DecisionMaker;
    }

    if INFLUENCER_KEYWORDS
        .iter()
        .any(|keyword| role.contains(keyword))
    {
        return RoleTier::Influencer;
    }

    RoleTier::Other
}

pub fn match_industry(industry: &str, ideal_use_cases: &[String]) -> IndustryMatch {
    let industry = industry.trim().to_lowercase();
    if industry.is_empty() || ideal_use_cases.is_empty() {
        return IndustryMatch::Unrelated;
    }

    let icp = ideal_use_cases.join(" ").to_lowercase();
    if icp.trim().is_empty() {
        return IndustryMatch::Unrelated;
    }

    if icp.contains(&industry) || industry.contains(&icp) {
        return IndustryMatch::Direct;
    }

    let adjacent = ADJACENT_INDUSTRIES
        .iter()
        .filter(|(key, _)| industry.contains(key))
        .any(|(_, neighbours)| neighbours.iter().any(|term| icp.contains(term)));

    if adjacent {
        IndustryMatch::Adjacent
    } else {
        IndustryMatch::Unrelated
    }
}

pub fn score_role(role: &str) -> u8 {
    classify_role(role).points()
}

pub fn score_industry(industry: &str, ideal_use_cases: &[String]) -> u8 {
    match_industry(industry, ideal_use_cases).points()
}

/// Full points only when every uploaded field carries a value.
pub fn score_data_quality(lead: &Lead) -> u8 {
    let complete = lead
        .required_fields()
        .iter()
        .all(|value| !value.trim().is_empty());

    if complete {
        DATA_QUALITY_POINTS
    } else {
        0
    }
}

pub fn calculate_rule_score(lead: &Lead, offer: &Offer) -> RuleBreakdown {
    RuleBreakdown {
        role: score_role(&lead.role),
        industry: score_industry(&lead.industry, &offer.ideal_use_cases),
        data_quality: score_data_quality(lead),
    }
}
