use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Transport,
    Energy,
    Waste,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Transport, Category::Energy, Category::Waste];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Energy => "energy",
            Category::Waste => "waste",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| {
                format!("category must be one of transport, energy, waste (got '{raw}')")
            })
    }
}

/// One logged eco-action. `co2_saved` is fixed at insert time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub category: Category,
    pub description: String,
    pub value: f64,
    pub co2_saved: f64,
    #[serde(deserialize_with = "date_only")]
    pub action_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Challenge {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub target_co2: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChallengeParticipant {
    pub challenge_id: Uuid,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
    #[serde(default)]
    pub participants: Vec<ChallengeParticipant>,
}

#[derive(Debug, Deserialize)]
pub struct NewAction {
    pub category: String,
    pub description: String,
    pub value: f64,
    #[serde(default, deserialize_with = "optional_date_only")]
    pub action_date: Option<NaiveDate>,
}

/// A `NewAction` that passed validation, ready for estimation and insert.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub category: Category,
    pub description: String,
    pub value: f64,
    pub action_date: NaiveDate,
}

impl NewAction {
    pub fn validate(self, today: NaiveDate) -> Result<PendingAction, String> {
        let category = self.category.parse::<Category>()?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err("description must not be empty".to_string());
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err("value must be a non-negative number".to_string());
        }
        let action_date = self.action_date.unwrap_or(today);
        if action_date > today {
            return Err(format!("action_date {action_date} is in the future"));
        }

        Ok(PendingAction {
            category,
            description: description.to_string(),
            value: self.value,
            action_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub category: String,
    pub description: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub category: Category,
    pub co2_saved: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewChallenge {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_co2: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: u64,
    pub co2_saved: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub label: String,
    pub co2_saved: f64,
    pub actions: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ImpactEquivalents {
    pub trees: u64,
    pub miles: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSnapshot {
    pub total_actions: u64,
    pub total_co2_saved: f64,
    pub current_streak: u32,
    pub action_type_breakdown: Vec<CategoryBreakdown>,
    pub daily_series: Vec<DailyPoint>,
    pub equivalents: ImpactEquivalents,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    pub co2_saved: f64,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub snapshot: StatsSnapshot,
    pub recent_activities: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub total_co2_saved: f64,
    pub action_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityImpact {
    pub total_users: usize,
    pub total_co2_saved: f64,
    pub total_actions: u64,
    pub user_rank: usize,
    pub user_percentile: u32,
    pub user_share_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub is_active: bool,
    pub participant_count: usize,
    pub total_co2_saved: f64,
    pub progress_percent: f64,
    pub user_joined: bool,
}

/// Accepts `YYYY-MM-DD` or a timestamp and keeps only the calendar date.
pub fn parse_action_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|dt| dt.date())
}

fn date_only<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_action_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'")))
}

fn optional_date_only<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_action_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(" Energy ".parse::<Category>(), Ok(Category::Energy));
        assert!("food".parse::<Category>().is_err());
    }

    fn new_action(category: &str, description: &str, value: f64) -> NewAction {
        NewAction {
            category: category.to_string(),
            description: description.to_string(),
            value,
            action_date: None,
        }
    }

    #[test]
    fn validate_defaults_date_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let pending = new_action("transport", "  bike ride ", 12.0).validate(today).unwrap();
        assert_eq!(pending.category, Category::Transport);
        assert_eq!(pending.description, "bike ride");
        assert_eq!(pending.action_date, today);
    }

    #[test]
    fn validate_rejects_bad_input() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert!(new_action("food", "salad", 1.0).validate(today).is_err());
        assert!(new_action("waste", "   ", 1.0).validate(today).is_err());
        assert!(new_action("waste", "recycle", -1.0).validate(today).is_err());
        assert!(new_action("waste", "recycle", f64::NAN).validate(today).is_err());

        let mut future = new_action("energy", "led", 1.0);
        future.action_date = today.succ_opt();
        assert!(future.validate(today).is_err());
    }

    #[test]
    fn validate_accepts_zero_and_backdated() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut backdated = new_action("energy", "unplugged devices", 0.0);
        backdated.action_date = NaiveDate::from_ymd_opt(2025, 12, 31);
        let pending = backdated.validate(today).unwrap();
        assert_eq!(pending.value, 0.0);
        assert_eq!(pending.action_date, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn action_date_strips_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(parse_action_date("2026-03-14"), Some(expected));
        assert_eq!(parse_action_date("2026-03-14T23:15:00Z"), Some(expected));
        assert_eq!(parse_action_date("2026-03-14T08:00:00"), Some(expected));
        assert_eq!(parse_action_date("14/03/2026"), None);
    }

    #[test]
    fn stored_record_with_timestamp_date_decodes_to_date() {
        let json = serde_json::json!({
            "id": "6f1c1f9e-3c55-4b8a-9d0e-2b1e6a0b8c11",
            "user_id": "u1",
            "category": "waste",
            "description": "composted scraps",
            "value": 2.0,
            "co2_saved": 0.6,
            "action_date": "2026-03-14T10:30:00+00:00",
            "created_at": "2026-03-14T10:31:00Z"
        });
        let record: ActionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.action_date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(record.category, Category::Waste);
    }
}
