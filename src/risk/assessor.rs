use crate::events::{EventContext, EventImpact};
use crate::models::GreeksResult;
use crate::portfolio::PortfolioSettings;
use crate::risk::sizing::{self, AllocationCheck};
use crate::trade::TradeType;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Put strike above this multiple of spot is likely to be assigned.
pub const PUT_ASSIGNMENT_RATIO: f64 = 1.1;
/// Call strike below this multiple of spot is likely to be called away.
pub const CALL_AWAY_RATIO: f64 = 0.95;
/// |delta| above this carries meaningful directional exposure.
pub const DIRECTIONAL_DELTA: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Positive,
    Negative,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: FactorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RiskFactor {
    fn new(kind: FactorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[inline]
    pub fn is_adverse(&self) -> bool {
        matches!(self.kind, FactorKind::Negative | FactorKind::Warning)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub max_loss: f64,
    pub capital_required: f64,
    pub premium_estimate: Option<f64>,
    pub factors: SmallVec<[RiskFactor; 8]>,
    /// Forwarded unchanged for display.
    #[serde(default)]
    pub event_context: Option<EventContext>,
}

impl RiskAssessment {
    /// True when the allocation rule fired.
    pub fn allocation_exceeded(&self) -> bool {
        self.factors.iter().any(|f| f.kind == FactorKind::Negative)
    }

    pub fn count(&self, kind: FactorKind) -> usize {
        self.factors.iter().filter(|f| f.kind == kind).count()
    }
}

/// Run the risk rule pipeline. Factor order follows rule order:
/// sizing, strike distance, delta, allocation, verdict, events.
///
/// Pure function: no I/O, inputs are only read.
pub fn assess(
    trade_type: TradeType,
    spot: f64,
    strike: f64,
    greeks: &GreeksResult,
    portfolio: Option<&PortfolioSettings>,
    event_context: Option<&EventContext>,
) -> RiskAssessment {
    let mut factors: SmallVec<[RiskFactor; 8]> = SmallVec::new();

    // 1. Sizing
    let sizing = sizing::size_position(trade_type, spot, strike, greeks);
    if sizing.premium_estimate.is_none() {
        factors.push(
            RiskFactor::new(FactorKind::Info, "Premium estimate unavailable because theta is unknown")
                .with_detail("Max loss assumes no premium credit"),
        );
    }

    let mut adverse = false;

    // 2. Strike distance
    match trade_type {
        TradeType::CashSecuredPut if strike > PUT_ASSIGNMENT_RATIO * spot => {
            adverse = true;
            factors.push(
                RiskFactor::new(
                    FactorKind::Warning,
                    "Strike is more than 10% above the stock price: higher assignment risk",
                )
                .with_detail(format!("Strike ${strike:.2} vs stock ${spot:.2}")),
            );
        }
        TradeType::CoveredCall if strike < CALL_AWAY_RATIO * spot => {
            adverse = true;
            factors.push(
                RiskFactor::new(
                    FactorKind::Warning,
                    "Strike is more than 5% below the stock price: shares likely to be called away",
                )
                .with_detail(format!("Strike ${strike:.2} vs stock ${spot:.2}")),
            );
        }
        _ => {}
    }

    // 3. Delta magnitude
    if let Some(delta) = greeks.delta {
        if delta.abs() > DIRECTIONAL_DELTA {
            adverse = true;
            let message = match trade_type {
                TradeType::CashSecuredPut => {
                    format!("Delta of {delta:.2} indicates significant directional risk")
                }
                TradeType::CoveredCall => {
                    format!("Delta of {delta:.2} means upside is capped if the stock rallies")
                }
            };
            factors.push(RiskFactor::new(FactorKind::Warning, message));
        }
    }

    // 4. Allocation
    let mut forced_high = false;
    if let Some(portfolio) = portfolio {
        if let AllocationCheck::Exceeded { limit, excess } =
            sizing::check_allocation(sizing.capital_required, portfolio)
        {
            adverse = true;
            forced_high = true;
            factors.push(
                RiskFactor::new(
                    FactorKind::Negative,
                    format!(
                        "Capital required ${:.2} exceeds the {}% per-trade allocation of ${:.2}",
                        sizing.capital_required, portfolio.max_allocation_pct, limit
                    ),
                )
                .with_detail(format!("Over the limit by ${excess:.2}")),
            );
        }
    }

    // 5. Verdict
    let overall_risk = if forced_high {
        RiskLevel::High
    } else if adverse {
        RiskLevel::Medium
    } else {
        factors.push(RiskFactor::new(
            FactorKind::Positive,
            "Strike distance, delta and allocation are within acceptable limits",
        ));
        RiskLevel::Low
    };

    // 6. Events
    if let Some(ctx) = event_context {
        append_event_factors(&mut factors, ctx);
    }

    tracing::debug!(
        %trade_type, %overall_risk,
        capital_required = sizing.capital_required,
        max_loss = sizing.max_loss,
        factors = factors.len(),
        "risk assessed"
    );

    RiskAssessment {
        overall_risk,
        max_loss: sizing.max_loss,
        capital_required: sizing.capital_required,
        premium_estimate: sizing.premium_estimate,
        factors,
        event_context: event_context.cloned(),
    }
}

fn append_event_factors(factors: &mut SmallVec<[RiskFactor; 8]>, ctx: &EventContext) {
    match ctx.next_earnings_date {
        Some(date) => {
            let confidence = ctx.earnings_confidence.as_deref().unwrap_or("unspecified");
            let source = ctx.earnings_source.as_deref().unwrap_or("unknown source");
            factors.push(
                RiskFactor::new(FactorKind::Info, format!("Next earnings expected {date}"))
                    .with_detail(format!("Confidence: {confidence}; source: {source}")),
            );
        }
        None => {
            factors.push(RiskFactor::new(
                FactorKind::Warning,
                "Next earnings date not found",
            ));
        }
    }

    for event in &ctx.upcoming_events {
        let kind = if event.impact == EventImpact::High {
            FactorKind::Warning
        } else {
            FactorKind::Info
        };
        let detail = match &event.note {
            Some(note) => format!("Impact: {}; {note}", event.impact),
            None => format!("Impact: {}", event.impact),
        };
        factors.push(
            RiskFactor::new(kind, format!("{}: {}", event.event_type, event.description))
                .with_detail(detail),
        );
    }
}
