pub mod narrative;
pub mod scoring;

use crate::events::EventContext;
use crate::models::GreeksResult;
use crate::portfolio::PortfolioSettings;
use crate::risk::{sizing, RiskAssessment, RiskLevel};
use crate::trade::{TradeDetails, TradeType};
use narrative::{NarrativeInputs, RationaleSection};
use scoring::{Action, ScoreContribution, ScoreInputs, ScoringWeights};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    EarningsBeforeExpiration,
    HighRisk,
    LowCompanyRating,
    AllocationBreach,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    /// Percent, within [10, 95].
    pub confidence: f64,
    /// 0-10, one decimal.
    pub rating: f64,
    pub score: i32,
    pub score_breakdown: Vec<ScoreContribution>,
    pub rationale: Vec<RationaleSection>,
    pub warnings: Vec<Warning>,
    /// Premium collected per contract.
    pub expected_return: f64,
}

impl Recommendation {
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// Score and narrate a trade with the default weight table.
pub fn recommend(
    trade_type: TradeType,
    greeks: &GreeksResult,
    risk: &RiskAssessment,
    company_rating: f64,
    portfolio: Option<&PortfolioSettings>,
    details: &TradeDetails,
) -> Recommendation {
    recommend_with_weights(
        trade_type,
        greeks,
        risk,
        company_rating,
        portfolio,
        details,
        &ScoringWeights::DEFAULT,
    )
}

pub fn recommend_with_weights(
    trade_type: TradeType,
    greeks: &GreeksResult,
    risk: &RiskAssessment,
    company_rating: f64,
    portfolio: Option<&PortfolioSettings>,
    details: &TradeDetails,
    weights: &ScoringWeights,
) -> Recommendation {
    let card = scoring::score(
        &ScoreInputs {
            trade_type,
            delta: greeks.delta,
            theta: greeks.theta,
            overall_risk: risk.overall_risk,
            company_rating,
            premium_yield_pct: details.premium_yield_pct(),
            days_to_expiration: details.days_to_expiration,
        },
        weights,
    );
    let action = scoring::classify(card.score);
    let confidence = scoring::confidence(action, card.score);
    let rating = scoring::rating(action, card.score);

    // Trade details take precedence; fall back to what the assessor forwarded.
    let event_context = details
        .event_context
        .as_ref()
        .or(risk.event_context.as_ref());

    let warning_kinds = detect_warnings(risk, company_rating, portfolio, details, event_context);

    let inputs = NarrativeInputs {
        trade_type,
        action,
        score: card.score,
        greeks,
        risk,
        company_rating,
        portfolio,
        details,
        event_context,
    };
    let rationale = narrative::render_rationale(&inputs);
    let warnings = narrative::render_warnings(&warning_kinds, &inputs);

    tracing::debug!(
        %trade_type, %action, score = card.score, confidence, rating,
        warnings = warnings.len(),
        "recommendation scored"
    );

    Recommendation {
        action,
        confidence,
        rating,
        score: card.score,
        score_breakdown: card.contributions.into_vec(),
        rationale,
        warnings,
        expected_return: details.expected_return(),
    }
}

/// Warning conditions, independent of the score and of each other.
pub fn detect_warnings(
    risk: &RiskAssessment,
    company_rating: f64,
    portfolio: Option<&PortfolioSettings>,
    details: &TradeDetails,
    event_context: Option<&EventContext>,
) -> SmallVec<[WarningKind; 4]> {
    let mut kinds: SmallVec<[WarningKind; 4]> = SmallVec::new();

    let earnings_conflict = match (event_context.and_then(|c| c.next_earnings_date), details.as_of) {
        (Some(date), Some(as_of)) => {
            narrative::earnings_before_expiration(date, as_of, details.days_to_expiration)
        }
        _ => false,
    };
    if earnings_conflict {
        kinds.push(WarningKind::EarningsBeforeExpiration);
    }

    if risk.overall_risk == RiskLevel::High {
        kinds.push(WarningKind::HighRisk);
    }

    if company_rating.is_finite() && company_rating <= scoring::WEAK_COMPANY_RATING {
        kinds.push(WarningKind::LowCompanyRating);
    }

    if let Some(p) = portfolio {
        if !sizing::check_allocation(risk.capital_required, p).is_allowed() {
            kinds.push(WarningKind::AllocationBreach);
        }
    }

    kinds
}
