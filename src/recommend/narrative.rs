//! Text rendering for recommendations.
//!
//! Every function here is a deterministic template over already-computed
//! numbers. Nothing in this module changes a score or an action.

use crate::events::EventContext;
use crate::models::GreeksResult;
use crate::portfolio::PortfolioSettings;
use crate::recommend::scoring::{self, Action};
use crate::recommend::{WarningKind, Warning};
use crate::risk::{RiskAssessment, RiskLevel};
use crate::trade::{TradeDetails, TradeType, DAYS_PER_YEAR};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    TradeStructure,
    PremiumQuality,
    RiskProfile,
    CompanyQuality,
    EarningsCatalyst,
    TimeDecay,
    PositionSizing,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::TradeStructure => "Trade Structure",
            Self::PremiumQuality => "Premium Quality",
            Self::RiskProfile => "Risk Profile",
            Self::CompanyQuality => "Company Quality",
            Self::EarningsCatalyst => "Earnings Catalyst",
            Self::TimeDecay => "Time Decay",
            Self::PositionSizing => "Position Sizing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationaleSection {
    pub kind: SectionKind,
    pub title: String,
    pub body: String,
}

impl RationaleSection {
    fn new(kind: SectionKind, body: String) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            body,
        }
    }
}

/// Everything the templates read.
pub struct NarrativeInputs<'a> {
    pub trade_type: TradeType,
    pub action: Action,
    pub score: i32,
    pub greeks: &'a GreeksResult,
    pub risk: &'a RiskAssessment,
    pub company_rating: f64,
    pub portfolio: Option<&'a PortfolioSettings>,
    pub details: &'a TradeDetails,
    pub event_context: Option<&'a EventContext>,
}

/// Summary first, then the fixed section order.
pub fn render_rationale(inputs: &NarrativeInputs<'_>) -> Vec<RationaleSection> {
    vec![
        RationaleSection::new(SectionKind::Summary, summary(inputs.action, inputs.trade_type, inputs.score)),
        RationaleSection::new(SectionKind::TradeStructure, trade_structure(inputs.trade_type, inputs.details)),
        RationaleSection::new(SectionKind::PremiumQuality, premium_quality(inputs.details)),
        RationaleSection::new(SectionKind::RiskProfile, risk_profile(inputs.risk)),
        RationaleSection::new(SectionKind::CompanyQuality, company_quality(inputs.company_rating)),
        RationaleSection::new(
            SectionKind::EarningsCatalyst,
            earnings_catalyst(inputs.event_context, inputs.details),
        ),
        RationaleSection::new(SectionKind::TimeDecay, time_decay(inputs.greeks, inputs.details.days_to_expiration)),
        RationaleSection::new(
            SectionKind::PositionSizing,
            position_sizing(inputs.portfolio, inputs.risk, inputs.details),
        ),
    ]
}

pub fn summary(action: Action, trade_type: TradeType, score: i32) -> String {
    let tail = match action {
        Action::StrongBuy => "most signals line up in favor of selling this premium.",
        Action::Buy => "the setup is favorable with a few caveats.",
        Action::Hold => "signals are mixed; waiting for better terms is reasonable.",
        Action::Avoid => "the risks outweigh the premium on offer.",
        Action::StrongAvoid => "several signals argue against this trade.",
    };
    format!("{action}: this {trade_type} scores {score:+}, and {tail}")
}

pub fn trade_structure(trade_type: TradeType, d: &TradeDetails) -> String {
    let leg = match trade_type {
        TradeType::CashSecuredPut => format!(
            "Sell one put at the {} strike with the stock at {}",
            money(d.strike_price),
            money(d.stock_price)
        ),
        TradeType::CoveredCall => format!(
            "Sell one call at the {} strike against 100 shares held at {}",
            money(d.strike_price),
            money(d.stock_price)
        ),
    };
    let distance = if d.stock_price > 0.0 {
        let pct = (d.strike_price - d.stock_price) / d.stock_price * 100.0;
        if pct.abs() < 0.005 {
            " (at the money)".to_string()
        } else if pct > 0.0 {
            format!(" ({pct:.1}% above the current price)")
        } else {
            format!(" ({:.1}% below the current price)", -pct)
        }
    } else {
        String::new()
    };
    format!("{leg}{distance}, expiring in {} days.", fmt_days(d.days_to_expiration))
}

pub fn premium_quality(d: &TradeDetails) -> String {
    let y = d.premium_yield_pct();
    let mut text = format!(
        "Premium of {} per share ({} per contract) is a {y:.2}% yield",
        money(d.premium),
        money(d.expected_return())
    );
    if d.days_to_expiration > 0.0 {
        let annualized = y * DAYS_PER_YEAR / d.days_to_expiration;
        text.push_str(&format!(", about {annualized:.1}% annualized"));
    }
    text.push_str(". ");
    text.push_str(if y > scoring::YIELD_TIER_2_PCT {
        "That is a rich premium."
    } else if y > scoring::YIELD_TIER_1_PCT {
        "That is a solid premium."
    } else {
        "That is a thin premium for the capital committed."
    });
    text
}

pub fn risk_profile(risk: &RiskAssessment) -> String {
    let adverse = risk.factors.iter().filter(|f| f.is_adverse()).count();
    let flagged = match adverse {
        0 => "No risk factors were flagged.".to_string(),
        1 => "1 risk factor was flagged.".to_string(),
        n => format!("{n} risk factors were flagged."),
    };
    format!(
        "Overall risk is {}. Maximum loss is {} on {} of capital. {flagged}",
        risk.overall_risk,
        money(risk.max_loss),
        money(risk.capital_required)
    )
}

pub fn company_quality(rating: f64) -> String {
    if !rating.is_finite() {
        return "No company rating was provided.".to_string();
    }
    let verdict = if rating >= scoring::STRONG_COMPANY_RATING {
        "a high-quality business worth owning if assigned"
    } else if rating >= scoring::GOOD_COMPANY_RATING {
        "a solid business"
    } else if rating <= scoring::WEAK_COMPANY_RATING {
        "a weak business; assignment would leave you holding a poor-quality position"
    } else {
        "an average business"
    };
    format!("Company rating of {rating:.1}/10 points to {verdict}.")
}

pub fn earnings_catalyst(ctx: Option<&EventContext>, d: &TradeDetails) -> String {
    let Some(ctx) = ctx else {
        return "No event data was provided; check the earnings calendar before entering.".to_string();
    };

    let mut text = match (ctx.next_earnings_date, d.as_of) {
        (Some(date), Some(as_of)) => {
            let days = date.signed_duration_since(as_of).num_days();
            if days < 0 {
                format!("The listed earnings date {date} has already passed.")
            } else if earnings_before_expiration(date, as_of, d.days_to_expiration) {
                format!(
                    "Earnings on {date} ({days} days away) fall before expiration; expect a volatility move that can push the stock through the strike."
                )
            } else {
                format!("Earnings on {date} ({days} days away) fall after expiration.")
            }
        }
        (Some(date), None) => format!("Next earnings expected {date}."),
        (None, _) => "No earnings date was found; treat the window as uncertain.".to_string(),
    };

    let high = ctx.high_impact_events().count();
    if high > 0 {
        text.push_str(&format!(" {high} high-impact event(s) are on the calendar."));
    }
    if let Some(sentiment) = ctx.market_sentiment.as_deref() {
        text.push_str(&format!(" Market sentiment: {sentiment}"));
    }
    text
}

pub fn time_decay(greeks: &GreeksResult, days: f64) -> String {
    let Some(theta) = greeks.theta else {
        return "Theta is unknown, so time decay could not be assessed.".to_string();
    };
    let pace = if days > 0.0 && days <= scoring::SHORT_EXPIRY_DAYS {
        "short-dated options decay fastest, which works for the seller."
    } else {
        "longer-dated options decay slowly at first."
    };
    format!("Theta of {theta:.3} with {} days left: {pace}", fmt_days(days))
}

pub fn position_sizing(portfolio: Option<&PortfolioSettings>, risk: &RiskAssessment, d: &TradeDetails) -> String {
    let Some(p) = portfolio else {
        return "No portfolio settings were supplied, so allocation was not checked.".to_string();
    };
    let share = p
        .allocation_pct(risk.capital_required)
        .map(|pct| format!("{pct:.1}%"))
        .unwrap_or_else(|| "an unknown share".to_string());
    let mut text = format!(
        "Uses {} of {} total capital ({share}, limit {}%).",
        money(risk.capital_required),
        money(p.total_capital),
        p.max_allocation_pct
    );
    if let Some(weekly) = weekly_premium(d) {
        let band = if weekly < p.weekly_target.min {
            "below"
        } else if weekly > p.weekly_target.max {
            "above"
        } else {
            "within"
        };
        text.push_str(&format!(
            " Premium pace of {}/week is {band} the {} to {} weekly target.",
            money(weekly),
            money(p.weekly_target.min),
            money(p.weekly_target.max)
        ));
    }
    text
}

pub fn warning_message(kind: WarningKind, inputs: &NarrativeInputs<'_>) -> String {
    match kind {
        WarningKind::EarningsBeforeExpiration => {
            match inputs.event_context.and_then(|c| c.next_earnings_date) {
                Some(date) => format!("Earnings on {date} fall inside the option's life"),
                None => "Earnings fall inside the option's life".to_string(),
            }
        }
        WarningKind::HighRisk => format!("Overall risk is {}", RiskLevel::High),
        WarningKind::LowCompanyRating => {
            format!("Company rating of {:.1}/10 is low", inputs.company_rating)
        }
        WarningKind::AllocationBreach => match inputs.portfolio {
            Some(p) => format!(
                "Capital required {} exceeds the per-trade allocation of {}",
                money(inputs.risk.capital_required),
                money(p.allocation_limit())
            ),
            None => "Capital required exceeds the per-trade allocation".to_string(),
        },
    }
}

pub fn render_warnings(kinds: &[WarningKind], inputs: &NarrativeInputs<'_>) -> Vec<Warning> {
    kinds
        .iter()
        .map(|&kind| Warning {
            kind,
            message: warning_message(kind, inputs),
        })
        .collect()
}

/// True when the earnings date lands on or before the expiration date.
pub fn earnings_before_expiration(earnings: NaiveDate, as_of: NaiveDate, days_to_expiration: f64) -> bool {
    let days = earnings.signed_duration_since(as_of).num_days();
    days >= 0 && (days as f64) <= days_to_expiration
}

/// Premium collected per week of holding, if the horizon is known.
pub fn weekly_premium(d: &TradeDetails) -> Option<f64> {
    (d.days_to_expiration > 0.0).then(|| d.expected_return() / (d.days_to_expiration / 7.0))
}

fn fmt_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{days:.0}")
    } else {
        format!("{days:.1}")
    }
}

/// `$1,234.56` style, negatives as `-$1,234.56`.
pub fn money(x: f64) -> String {
    if !x.is_finite() {
        return "n/a".to_string();
    }
    let cents = (x.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if x < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PremiumTarget;
    use crate::risk::{FactorKind, RiskFactor};
    use smallvec::smallvec;

    fn details() -> TradeDetails {
        TradeDetails {
            premium: 3.0,
            stock_price: 100.0,
            strike_price: 95.0,
            days_to_expiration: 30.0,
            event_context: None,
            as_of: NaiveDate::from_ymd_opt(2024, 7, 1),
        }
    }

    fn risk() -> RiskAssessment {
        RiskAssessment {
            overall_risk: RiskLevel::Medium,
            max_loss: 9_450.0,
            capital_required: 9_500.0,
            premium_estimate: Some(50.0),
            factors: smallvec![RiskFactor {
                kind: FactorKind::Warning,
                message: "Delta of -0.35 indicates significant directional risk".into(),
                detail: None,
            }],
            event_context: None,
        }
    }

    #[test]
    fn test_money_format() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(3.0), "$3.00");
        assert_eq!(money(9_500.0), "$9,500.00");
        assert_eq!(money(1_234_567.891), "$1,234,567.89");
        assert_eq!(money(-42.5), "-$42.50");
        assert_eq!(money(f64::NAN), "n/a");
    }

    #[test]
    fn test_summary_golden() {
        assert_eq!(
            summary(Action::StrongBuy, TradeType::CashSecuredPut, 9),
            "STRONG BUY: this cash-secured put scores +9, and most signals line up in favor of selling this premium."
        );
        assert_eq!(
            summary(Action::Avoid, TradeType::CoveredCall, -2),
            "AVOID: this covered call scores -2, and the risks outweigh the premium on offer."
        );
    }

    #[test]
    fn test_trade_structure_golden() {
        assert_eq!(
            trade_structure(TradeType::CashSecuredPut, &details()),
            "Sell one put at the $95.00 strike with the stock at $100.00 (5.0% below the current price), expiring in 30 days."
        );
        let call = TradeDetails { strike_price: 105.0, days_to_expiration: 12.5, ..details() };
        assert_eq!(
            trade_structure(TradeType::CoveredCall, &call),
            "Sell one call at the $105.00 strike against 100 shares held at $100.00 (5.0% above the current price), expiring in 12.5 days."
        );
    }

    #[test]
    fn test_premium_quality_golden() {
        assert_eq!(
            premium_quality(&details()),
            "Premium of $3.00 per share ($300.00 per contract) is a 3.00% yield, about 36.5% annualized. That is a solid premium."
        );
    }

    #[test]
    fn test_risk_profile_golden() {
        assert_eq!(
            risk_profile(&risk()),
            "Overall risk is medium. Maximum loss is $9,450.00 on $9,500.00 of capital. 1 risk factor was flagged."
        );
    }

    #[test]
    fn test_company_quality_bands() {
        assert_eq!(
            company_quality(9.0),
            "Company rating of 9.0/10 points to a high-quality business worth owning if assigned."
        );
        assert!(company_quality(2.0).contains("weak business"));
        assert!(company_quality(5.0).contains("average business"));
    }

    #[test]
    fn test_earnings_inside_window() {
        let ctx = EventContext {
            next_earnings_date: NaiveDate::from_ymd_opt(2024, 7, 20),
            market_sentiment: Some("Mildly bullish".into()),
            ..Default::default()
        };
        assert_eq!(
            earnings_catalyst(Some(&ctx), &details()),
            "Earnings on 2024-07-20 (19 days away) fall before expiration; expect a volatility move that can push the stock through the strike. Market sentiment: Mildly bullish"
        );
    }

    #[test]
    fn test_earnings_outside_window_and_missing() {
        let after = EventContext {
            next_earnings_date: NaiveDate::from_ymd_opt(2024, 8, 15),
            ..Default::default()
        };
        assert_eq!(
            earnings_catalyst(Some(&after), &details()),
            "Earnings on 2024-08-15 (45 days away) fall after expiration."
        );
        assert!(earnings_catalyst(None, &details()).starts_with("No event data"));
        assert!(earnings_catalyst(Some(&EventContext::default()), &details()).starts_with("No earnings date"));
    }

    #[test]
    fn test_earnings_window_boundary() {
        let as_of = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let on_expiry = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        assert!(earnings_before_expiration(on_expiry, as_of, 30.0));
        assert!(!earnings_before_expiration(on_expiry, as_of, 29.0));
        let past = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert!(!earnings_before_expiration(past, as_of, 30.0));
    }

    #[test]
    fn test_time_decay_text() {
        let g = GreeksResult { theta: Some(-12.3456), ..GreeksResult::unknown("") };
        assert_eq!(
            time_decay(&g, 21.0),
            "Theta of -12.346 with 21 days left: short-dated options decay fastest, which works for the seller."
        );
        assert!(time_decay(&GreeksResult::unknown(""), 21.0).starts_with("Theta is unknown"));
    }

    #[test]
    fn test_position_sizing_golden() {
        let p = PortfolioSettings {
            total_capital: 50_000.0,
            max_allocation_pct: 20.0,
            weekly_target: PremiumTarget { min: 50.0, max: 100.0 },
        };
        assert_eq!(
            position_sizing(Some(&p), &risk(), &details()),
            "Uses $9,500.00 of $50,000.00 total capital (19.0%, limit 20%). Premium pace of $70.00/week is within the $50.00 to $100.00 weekly target."
        );
        assert!(position_sizing(None, &risk(), &details()).starts_with("No portfolio settings"));
    }

    #[test]
    fn test_section_order() {
        let greeks = GreeksResult::unknown("");
        let risk = risk();
        let d = details();
        let inputs = NarrativeInputs {
            trade_type: TradeType::CashSecuredPut,
            action: Action::Hold,
            score: 0,
            greeks: &greeks,
            risk: &risk,
            company_rating: 5.0,
            portfolio: None,
            details: &d,
            event_context: None,
        };
        let kinds: Vec<SectionKind> = render_rationale(&inputs).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::TradeStructure,
                SectionKind::PremiumQuality,
                SectionKind::RiskProfile,
                SectionKind::CompanyQuality,
                SectionKind::EarningsCatalyst,
                SectionKind::TimeDecay,
                SectionKind::PositionSizing,
            ]
        );
    }
}
