use crate::errors::{EngineError, EngineResult};
use crate::evaluation::{self, Evaluation, EvaluationRequest};
use crate::events::EventContext;
use crate::models::{self, GreeksResult};
use crate::portfolio::PortfolioSettings;
use crate::risk::{self, RiskAssessment};
use crate::state::{AppState, CountersSnapshot, RequestCounters};
use crate::trade::{OptionType, TimeToExpiry, TradeParameters, TradeType};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use chrono::NaiveDate;
use std::sync::Arc;

/// Trade inputs as sent by the entry form. Option type follows the trade
/// type and the rate falls back to the configured default when omitted.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TradeInput {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: TimeToExpiry,
    pub trade_type: TradeType,
    #[serde(default)]
    pub option_type: Option<OptionType>,
    #[serde(default)]
    pub risk_free_rate: Option<f64>,
    pub volatility: f64,
}

impl TradeInput {
    fn into_params(self, default_rate: f64) -> TradeParameters {
        TradeParameters {
            spot: self.spot,
            strike: self.strike,
            time_to_expiry: self.time_to_expiry,
            option_type: self.option_type.unwrap_or_else(|| self.trade_type.option_type()),
            trade_type: self.trade_type,
            risk_free_rate: self.risk_free_rate.unwrap_or(default_rate),
            volatility: self.volatility,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AssessBody {
    pub trade_type: TradeType,
    pub spot: f64,
    pub strike: f64,
    pub greeks: GreeksResult,
    #[serde(default)]
    pub portfolio: Option<PortfolioSettings>,
    #[serde(default)]
    pub event_context: Option<EventContext>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct EvaluateBody {
    pub trade: TradeInput,
    pub premium: f64,
    pub company_rating: f64,
    #[serde(default)]
    pub portfolio: Option<PortfolioSettings>,
    #[serde(default)]
    pub event_context: Option<EventContext>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ConfigView {
    pub risk_free_rate: f64,
    pub portfolio: PortfolioSettings,
}

/// POST /api/greeks -- Black-Scholes Greeks for one option
pub async fn post_greeks(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TradeInput>, JsonRejection>,
) -> EngineResult<Json<GreeksResult>> {
    let Json(input) = accept(&state, body)?;
    let params = input.into_params(state.config.risk_free_rate);
    let greeks = models::compute_from_params(&params);

    RequestCounters::bump(&state.counters.greeks_computed);
    if !greeks.is_known() {
        RequestCounters::bump(&state.counters.invalid_inputs);
    }
    Ok(Json(greeks))
}

/// POST /api/assess -- risk rules over caller-supplied Greeks
pub async fn post_assess(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AssessBody>, JsonRejection>,
) -> EngineResult<Json<RiskAssessment>> {
    let Json(body) = accept(&state, body)?;
    let assessment = risk::assess(
        body.trade_type,
        body.spot,
        body.strike,
        &body.greeks,
        body.portfolio.as_ref(),
        body.event_context.as_ref(),
    );
    RequestCounters::bump(&state.counters.assessments);
    Ok(Json(assessment))
}

/// POST /api/evaluate -- greeks, risk and recommendation in one call
pub async fn post_evaluate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EvaluateBody>, JsonRejection>,
) -> EngineResult<Json<Evaluation>> {
    let Json(body) = accept(&state, body)?;

    if let Err(e) = validate_economics(body.premium, body.company_rating) {
        RequestCounters::bump(&state.counters.rejected_requests);
        return Err(e);
    }

    let request = EvaluationRequest {
        trade: body.trade.into_params(state.config.risk_free_rate),
        premium: body.premium,
        company_rating: body.company_rating,
        portfolio: Some(body.portfolio.unwrap_or(state.config.default_portfolio)),
        event_context: body.event_context,
        as_of: Some(body.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())),
    };

    let result = evaluation::evaluate(&request);

    RequestCounters::bump(&state.counters.evaluations);
    if !result.greeks.is_known() {
        RequestCounters::bump(&state.counters.invalid_inputs);
    }
    tracing::info!(
        trade_type = %request.trade.trade_type,
        spot = request.trade.spot,
        strike = request.trade.strike,
        action = %result.recommendation.action,
        score = result.recommendation.score,
        "evaluation served"
    );
    Ok(Json(result))
}

/// GET /api/config -- defaults applied to evaluate requests
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigView> {
    Json(ConfigView {
        risk_free_rate: state.config.risk_free_rate,
        portfolio: state.config.default_portfolio,
    })
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<CountersSnapshot> {
    Json(state.counters.snapshot())
}

fn accept<T>(state: &AppState, body: Result<Json<T>, JsonRejection>) -> EngineResult<Json<T>> {
    body.map_err(|rejection| {
        RequestCounters::bump(&state.counters.rejected_requests);
        EngineError::Parse(rejection.body_text())
    })
}

/// The engine accepts any numbers; the API rejects ones a form should never send.
pub fn validate_economics(premium: f64, company_rating: f64) -> EngineResult<()> {
    if !premium.is_finite() || premium < 0.0 {
        return Err(EngineError::InvalidRequest(format!(
            "premium must be a non-negative number, got {premium}"
        )));
    }
    if !company_rating.is_finite() || !(0.0..=10.0).contains(&company_rating) {
        return Err(EngineError::InvalidRequest(format!(
            "company_rating must be within 0..=10, got {company_rating}"
        )));
    }
    Ok(())
}
