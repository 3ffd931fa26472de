use serde::{Deserialize, Serialize};

/// Phone placeholder used when a table row leaves the phone cell empty.
pub const DEFAULT_PHONE: &str = "N/A";
/// Review count placeholder used when a table row leaves the review cell empty.
pub const DEFAULT_REVIEWS: &str = "0";
/// Category assigned to a lead saved outside of any search.
pub const DEFAULT_CATEGORY: &str = "General";

/// One candidate business extracted from one markdown table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    #[serde(default = "default_phone")]
    pub phone: String,
    #[serde(rename = "reviews", alias = "reviewCount", default = "default_reviews")]
    pub review_count: String,
    #[serde(default)]
    pub address: String,
}

fn default_phone() -> String {
    DEFAULT_PHONE.to_string()
}

fn default_reviews() -> String {
    DEFAULT_REVIEWS.to_string()
}

/// CRM engagement status of a saved lead. Any status may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    #[serde(rename = "Called - No Answer")]
    CalledNoAnswer,
    Contacted,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
    #[serde(rename = "Not Interested")]
    NotInterested,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::CalledNoAnswer,
        LeadStatus::Contacted,
        LeadStatus::MeetingBooked,
        LeadStatus::NotInterested,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::CalledNoAnswer => "Called - No Answer",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::MeetingBooked => "Meeting Booked",
            LeadStatus::NotInterested => "Not Interested",
        }
    }

    /// Parses a display label back into a status.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A saved business record enriched with CRM status and an optional script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(flatten)]
    pub business: BusinessRecord,
    pub id: String,
    #[serde(default)]
    pub status: LeadStatus,
    pub saved_at: i64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_niche: Option<String>,
}

impl Lead {
    pub fn name(&self) -> &str {
        &self.business.name
    }
}

/// A citation link attached to a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Upper bound on how many businesses one search may request.
pub const MAX_COUNT: u32 = 200;
/// Count used when the caller does not send one.
pub const DEFAULT_COUNT: u32 = 40;

/// A search request descriptor. `count` is always within `1..=MAX_COUNT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub service: String,
    pub city: String,
    pub count: u32,
}

impl SearchParams {
    pub fn new(service: impl Into<String>, city: impl Into<String>, raw_count: Option<&serde_json::Value>) -> Self {
        Self {
            service: service.into(),
            city: city.into(),
            count: clamp_count(raw_count),
        }
    }
}

/// Normalizes untrusted count input into `1..=MAX_COUNT`.
///
/// Numbers truncate toward zero, strings parse their leading integer, and
/// anything unparseable counts as zero before clamping. A missing value
/// falls back to `DEFAULT_COUNT`.
pub fn clamp_count(raw: Option<&serde_json::Value>) -> u32 {
    let parsed: i64 = match raw {
        None | Some(serde_json::Value::Null) => return DEFAULT_COUNT,
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => leading_integer(s).unwrap_or(0),
        Some(_) => 0,
    };
    parsed.clamp(1, MAX_COUNT as i64) as u32
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long digit runs; the clamp caps them anyway.
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * value)
}

/// Marketing angle offered when generating a cold-call script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketingNiche {
    #[default]
    #[serde(rename = "Web Design")]
    WebDesign,
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "Google Ads")]
    GoogleAds,
    #[serde(rename = "SEO")]
    Seo,
    #[serde(rename = "General Marketing")]
    GeneralMarketing,
}

impl MarketingNiche {
    pub const ALL: [MarketingNiche; 5] = [
        MarketingNiche::WebDesign,
        MarketingNiche::SocialMedia,
        MarketingNiche::GoogleAds,
        MarketingNiche::Seo,
        MarketingNiche::GeneralMarketing,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketingNiche::WebDesign => "Web Design",
            MarketingNiche::SocialMedia => "Social Media",
            MarketingNiche::GoogleAds => "Google Ads",
            MarketingNiche::Seo => "SEO",
            MarketingNiche::GeneralMarketing => "General Marketing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_count_bounds() {
        assert_eq!(clamp_count(Some(&json!(0))), 1);
        assert_eq!(clamp_count(Some(&json!(-15))), 1);
        assert_eq!(clamp_count(Some(&json!(201))), 200);
        assert_eq!(clamp_count(Some(&json!(100000))), 200);
        assert_eq!(clamp_count(Some(&json!(57))), 57);
    }

    #[test]
    fn test_clamp_count_non_numeric_input() {
        assert_eq!(clamp_count(Some(&json!("abc"))), 1);
        assert_eq!(clamp_count(Some(&json!("42abc"))), 42);
        assert_eq!(clamp_count(Some(&json!(" 7 "))), 7);
        assert_eq!(clamp_count(Some(&json!("-3"))), 1);
        assert_eq!(clamp_count(Some(&json!("99999999999999999999999"))), 200);
        assert_eq!(clamp_count(Some(&json!(true))), 1);
        assert_eq!(clamp_count(Some(&json!([12]))), 1);
    }

    #[test]
    fn test_clamp_count_fractional_truncates() {
        assert_eq!(clamp_count(Some(&json!(12.9))), 12);
        assert_eq!(clamp_count(Some(&json!(0.5))), 1);
    }

    #[test]
    fn test_clamp_count_missing_defaults() {
        assert_eq!(clamp_count(None), DEFAULT_COUNT);
        assert_eq!(clamp_count(Some(&serde_json::Value::Null)), DEFAULT_COUNT);
    }

    #[test]
    fn test_lead_status_serde_uses_labels() {
        let json = serde_json::to_string(&LeadStatus::CalledNoAnswer).unwrap();
        assert_eq!(json, r#""Called - No Answer""#);
        let status: LeadStatus = serde_json::from_str(r#""Meeting Booked""#).unwrap();
        assert_eq!(status, LeadStatus::MeetingBooked);
        assert_eq!(LeadStatus::from_label("Not Interested"), Some(LeadStatus::NotInterested));
        assert_eq!(LeadStatus::from_label("Closed"), None);
    }

    #[test]
    fn test_lead_uses_local_storage_layout() {
        let json = r#"{
            "name": "Café Atlas",
            "phone": "0522-111222",
            "reviews": "48",
            "address": "Rue Mohammed V, Casablanca",
            "id": "k2j3h4g5f",
            "status": "Contacted",
            "savedAt": 1760400000000,
            "category": "Café",
            "lastNiche": "SEO",
            "script": "Bonjour..."
        }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.name(), "Café Atlas");
        assert_eq!(lead.business.review_count, "48");
        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.saved_at, 1_760_400_000_000);
        assert_eq!(lead.last_niche.as_deref(), Some("SEO"));

        let back = serde_json::to_value(&lead).unwrap();
        assert_eq!(back["savedAt"], json!(1_760_400_000_000_i64));
        assert_eq!(back["reviews"], json!("48"));
    }

    #[test]
    fn test_business_record_defaults_and_alias() {
        let record: BusinessRecord =
            serde_json::from_str(r#"{"name": "Zineb", "reviewCount": "3"}"#).unwrap();
        assert_eq!(record.phone, "N/A");
        assert_eq!(record.review_count, "3");
        assert_eq!(record.address, "");
    }

    #[test]
    fn test_marketing_niche_default_is_web_design() {
        assert_eq!(MarketingNiche::default().label(), "Web Design");
        let niche: MarketingNiche = serde_json::from_str(r#""SEO""#).unwrap();
        assert_eq!(niche, MarketingNiche::Seo);
        assert_eq!(
            MarketingNiche::from_label("Google Ads"),
            Some(MarketingNiche::GoogleAds)
        );
        assert_eq!(MarketingNiche::from_label("Cold Email"), None);
    }
}
