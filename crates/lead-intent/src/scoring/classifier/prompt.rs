use crate::scoring::domain::{Lead, Offer};

pub(crate) const SYSTEM_PROMPT: &str = "You are a B2B sales qualification expert. Analyze prospects and classify their buying intent accurately and concisely. Always respond with valid JSON.";

/// Chat-style request sent to the semantic classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPrompt {
    pub system: &'static str,
    pub user: String,
}

impl ClassificationPrompt {
    pub fn build(lead: &Lead, offer: &Offer) -> Self {
        let bio = if lead.linkedin_bio.trim().is_empty() {
            "Not provided"
        } else {
            lead.linkedin_bio.as_str()
        };

        let user = format!(
            "You are a B2B sales qualification expert. Analyze this prospect's fit for our product.

PRODUCT INFORMATION:
- Name: {offer_name}
- Value Propositions: {value_props}
- Ideal Use Cases: {use_cases}

PROSPECT INFORMATION:
- Name: {name}
- Role: {role}
- Company: {company}
- Industry: {industry}
- Location: {location}
- LinkedIn Bio: {bio}

TASK:
Classify this prospect's buying intent as High, Medium, or Low based on their fit with the product's value propositions and ideal customer profile.

Consider:
1. Does their role suggest they have buying authority or influence?
2. Does their industry align with our ideal use cases?
3. Does their background/bio show relevant pain points or interests?

Respond in JSON format:
{{
  \"intent\": \"High|Medium|Low\",
  \"reasoning\": \"Brief 1-2 sentence explanation\"
}}",
            offer_name = offer.name,
            value_props = offer.value_props.join(", "),
            use_cases = offer.ideal_use_cases.join(", "),
            name = lead.name,
            role = lead.role,
            company = lead.company,
            industry = lead.industry,
            location = lead.location,
        );

        Self {
            system: SYSTEM_PROMPT,
            user,
        }
    }
}
