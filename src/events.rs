//! Event context supplied by an external earnings/calendar collaborator.
//!
//! The engine only reads these values and forwards them; nothing here is
//! recomputed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventImpact {
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EventImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub description: String,
    pub impact: EventImpact,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(default)]
    pub next_earnings_date: Option<NaiveDate>,
    /// Free-form label from the producer, e.g. "confirmed" or "estimated".
    #[serde(default)]
    pub earnings_confidence: Option<String>,
    #[serde(default)]
    pub earnings_source: Option<String>,
    #[serde(default)]
    pub upcoming_events: Vec<UpcomingEvent>,
    #[serde(default)]
    pub market_sentiment: Option<String>,
}

impl EventContext {
    /// Calendar days from `as_of` to the next earnings date. Negative when the
    /// date is already behind `as_of`.
    pub fn days_until_earnings(&self, as_of: NaiveDate) -> Option<i64> {
        self.next_earnings_date
            .map(|date| date.signed_duration_since(as_of).num_days())
    }

    pub fn high_impact_events(&self) -> impl Iterator<Item = &UpcomingEvent> {
        self.upcoming_events
            .iter()
            .filter(|e| e.impact == EventImpact::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_producer_payload() {
        let json = r#"{
            "next_earnings_date": "2024-07-25",
            "earnings_confidence": "confirmed",
            "earnings_source": "investor relations",
            "upcoming_events": [
                {"type": "fomc", "description": "Rate decision", "impact": "High"},
                {"type": "dividend", "description": "Ex-dividend", "impact": "low", "note": "0.24/share"},
                {"type": "conference", "description": "Analyst day", "impact": "moderate"}
            ],
            "market_sentiment": "Cautiously bullish"
        }"#;
        let ctx: EventContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.next_earnings_date, NaiveDate::from_ymd_opt(2024, 7, 25));
        assert_eq!(ctx.upcoming_events.len(), 3);
        assert_eq!(ctx.upcoming_events[0].impact, EventImpact::High);
        assert_eq!(ctx.upcoming_events[1].note.as_deref(), Some("0.24/share"));
        assert_eq!(ctx.upcoming_events[2].impact, EventImpact::Unknown);
        assert_eq!(ctx.high_impact_events().count(), 1);
    }

    #[test]
    fn test_empty_object_is_default() {
        let ctx: EventContext = serde_json::from_str("{}").unwrap();
        assert_eq!(ctx, EventContext::default());
    }

    #[test]
    fn test_days_until_earnings() {
        let ctx = EventContext {
            next_earnings_date: NaiveDate::from_ymd_opt(2024, 5, 10),
            ..Default::default()
        };
        let as_of = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(ctx.days_until_earnings(as_of), Some(9));
        assert_eq!(EventContext::default().days_until_earnings(as_of), None);
    }
}
