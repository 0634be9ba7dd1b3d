use crate::events::EventContext;
use crate::models::{self, GreeksResult};
use crate::portfolio::PortfolioSettings;
use crate::recommend::{self, Recommendation};
use crate::risk::{self, RiskAssessment};
use crate::trade::{TradeDetails, TradeParameters};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything needed to run greeks, risk and scoring for one trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub trade: TradeParameters,
    /// Quoted premium per share.
    pub premium: f64,
    /// Company quality on a 0-10 scale.
    pub company_rating: f64,
    #[serde(default)]
    pub portfolio: Option<PortfolioSettings>,
    #[serde(default)]
    pub event_context: Option<EventContext>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub greeks: GreeksResult,
    pub risk: RiskAssessment,
    pub recommendation: Recommendation,
}

/// Run the full pipeline: greeks, then risk, then recommendation.
/// Pure and synchronous.
pub fn evaluate(req: &EvaluationRequest) -> Evaluation {
    let trade = &req.trade;
    let greeks = models::compute_from_params(trade);

    let portfolio = req.portfolio.as_ref();
    let event_context = req.event_context.as_ref();

    let risk = risk::assess(
        trade.trade_type,
        trade.spot,
        trade.strike,
        &greeks,
        portfolio,
        event_context,
    );

    let details = TradeDetails {
        premium: req.premium,
        stock_price: trade.spot,
        strike_price: trade.strike,
        days_to_expiration: trade.time_to_expiry.days(),
        event_context: req.event_context.clone(),
        as_of: req.as_of,
    };

    let recommendation = recommend::recommend(
        trade.trade_type,
        &greeks,
        &risk,
        req.company_rating,
        portfolio,
        &details,
    );

    Evaluation {
        greeks,
        risk,
        recommendation,
    }
}
