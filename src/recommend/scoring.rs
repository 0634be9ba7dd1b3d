//! Trade scoring: fixed-weight signals summed into an integer score, then
//! bucketed into an action with confidence and rating.
//!
//! Everything here is numeric. Text for the same decisions is produced by
//! `recommend::narrative`.

use crate::risk::RiskLevel;
use crate::trade::TradeType;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub const STRONG_COMPANY_RATING: f64 = 8.0;
pub const GOOD_COMPANY_RATING: f64 = 6.0;
pub const WEAK_COMPANY_RATING: f64 = 3.0;

pub const PUT_CONSERVATIVE_DELTA: f64 = 0.3;
pub const PUT_AGGRESSIVE_DELTA: f64 = 0.6;
pub const CALL_DELTA_FLOOR: f64 = 0.2;
pub const CALL_DELTA_CEILING: f64 = 0.5;

/// Premium yield (percent of stock price) tiers.
pub const YIELD_TIER_1_PCT: f64 = 2.0;
pub const YIELD_TIER_2_PCT: f64 = 4.0;

pub const SHORT_EXPIRY_DAYS: f64 = 30.0;

pub const STRONG_BUY_SCORE: i32 = 4;
pub const BUY_SCORE: i32 = 2;
pub const HOLD_SCORE: i32 = -1;
pub const AVOID_SCORE: i32 = -3;

pub const MIN_CONFIDENCE: f64 = 10.0;
pub const MAX_CONFIDENCE: f64 = 95.0;
pub const MAX_RATING: f64 = 10.0;

/// Points awarded per signal. `Default` is the production table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub strong_company: i32,
    pub good_company: i32,
    pub weak_company: i32,
    pub low_risk: i32,
    pub high_risk: i32,
    pub conservative_put_delta: i32,
    pub aggressive_put_delta: i32,
    pub balanced_call_delta: i32,
    pub positive_theta: i32,
    pub premium_yield: i32,
    pub rich_premium_yield: i32,
    pub short_expiry: i32,
}

impl ScoringWeights {
    pub const DEFAULT: Self = Self {
        strong_company: 2,
        good_company: 1,
        weak_company: -2,
        low_risk: 2,
        high_risk: -2,
        conservative_put_delta: 1,
        aggressive_put_delta: -1,
        balanced_call_delta: 1,
        positive_theta: 1,
        premium_yield: 1,
        rich_premium_yield: 1,
        short_expiry: 1,
    };

    fn points(&self, signal: Signal) -> i32 {
        match signal {
            Signal::StrongCompany => self.strong_company,
            Signal::GoodCompany => self.good_company,
            Signal::WeakCompany => self.weak_company,
            Signal::LowRisk => self.low_risk,
            Signal::HighRisk => self.high_risk,
            Signal::ConservativePutDelta => self.conservative_put_delta,
            Signal::AggressivePutDelta => self.aggressive_put_delta,
            Signal::BalancedCallDelta => self.balanced_call_delta,
            Signal::PositiveTheta => self.positive_theta,
            Signal::PremiumYield => self.premium_yield,
            Signal::RichPremiumYield => self.rich_premium_yield,
            Signal::ShortExpiry => self.short_expiry,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StrongCompany,
    GoodCompany,
    WeakCompany,
    LowRisk,
    HighRisk,
    ConservativePutDelta,
    AggressivePutDelta,
    BalancedCallDelta,
    PositiveTheta,
    PremiumYield,
    RichPremiumYield,
    ShortExpiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub signal: Signal,
    pub points: i32,
}

/// Score plus the signals that produced it, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: i32,
    pub contributions: SmallVec<[ScoreContribution; 8]>,
}

impl ScoreCard {
    pub fn fired(&self, signal: Signal) -> bool {
        self.contributions.iter().any(|c| c.signal == signal)
    }
}

/// Scalar facts the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub trade_type: TradeType,
    pub delta: Option<f64>,
    pub theta: Option<f64>,
    pub overall_risk: RiskLevel,
    pub company_rating: f64,
    pub premium_yield_pct: f64,
    pub days_to_expiration: f64,
}

/// Sum the signal table. Unknown Greeks and non-finite inputs fire nothing.
pub fn score(inputs: &ScoreInputs, weights: &ScoringWeights) -> ScoreCard {
    let mut fired: SmallVec<[Signal; 8]> = SmallVec::new();

    let rating = inputs.company_rating;
    if rating.is_finite() {
        if rating >= STRONG_COMPANY_RATING {
            fired.push(Signal::StrongCompany);
        } else if rating >= GOOD_COMPANY_RATING {
            fired.push(Signal::GoodCompany);
        } else if rating <= WEAK_COMPANY_RATING {
            fired.push(Signal::WeakCompany);
        }
    }

    match inputs.overall_risk {
        RiskLevel::Low => fired.push(Signal::LowRisk),
        RiskLevel::High => fired.push(Signal::HighRisk),
        RiskLevel::Medium => {}
    }

    if let Some(delta) = inputs.delta {
        let abs = delta.abs();
        match inputs.trade_type {
            TradeType::CashSecuredPut => {
                if abs < PUT_CONSERVATIVE_DELTA {
                    fired.push(Signal::ConservativePutDelta);
                } else if abs > PUT_AGGRESSIVE_DELTA {
                    fired.push(Signal::AggressivePutDelta);
                }
            }
            TradeType::CoveredCall => {
                if abs > CALL_DELTA_FLOOR && abs < CALL_DELTA_CEILING {
                    fired.push(Signal::BalancedCallDelta);
                }
            }
        }
    }

    if matches!(inputs.theta, Some(theta) if theta > 0.0) {
        fired.push(Signal::PositiveTheta);
    }

    let y = inputs.premium_yield_pct;
    if y > YIELD_TIER_1_PCT {
        fired.push(Signal::PremiumYield);
        if y > YIELD_TIER_2_PCT {
            fired.push(Signal::RichPremiumYield);
        }
    }

    let days = inputs.days_to_expiration;
    if days > 0.0 && days <= SHORT_EXPIRY_DAYS {
        fired.push(Signal::ShortExpiry);
    }

    let contributions: SmallVec<[ScoreContribution; 8]> = fired
        .into_iter()
        .map(|signal| ScoreContribution {
            signal,
            points: weights.points(signal),
        })
        .collect();
    let score = contributions.iter().map(|c| c.points).sum();

    ScoreCard {
        score,
        contributions,
    }
}

/// Ordered weakest to strongest so tiers compare with `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StrongAvoid,
    Avoid,
    Hold,
    Buy,
    StrongBuy,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Avoid => "AVOID",
            Self::StrongAvoid => "STRONG AVOID",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[inline]
pub fn classify(score: i32) -> Action {
    if score >= STRONG_BUY_SCORE {
        Action::StrongBuy
    } else if score >= BUY_SCORE {
        Action::Buy
    } else if score >= HOLD_SCORE {
        Action::Hold
    } else if score >= AVOID_SCORE {
        Action::Avoid
    } else {
        Action::StrongAvoid
    }
}

/// Confidence in percent, clamped to [10, 95].
pub fn confidence(action: Action, score: i32) -> f64 {
    let s = score as f64;
    let raw = match action {
        Action::StrongBuy => 80.0 + (15.0_f64).min((s - 4.0) * 5.0),
        Action::Buy => 65.0 + (s - 2.0) * 7.5,
        Action::Hold => 45.0 + (s + 1.0) * 10.0,
        Action::Avoid => 30.0 + (s + 3.0) * 7.5,
        Action::StrongAvoid => (25.0 + (s + 3.0) * 5.0).max(10.0),
    };
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Trade rating on a 0-10 scale, one decimal.
pub fn rating(action: Action, score: i32) -> f64 {
    let s = score as f64;
    let raw = match action {
        Action::StrongBuy => (8.0 + (s - 4.0) * 0.5).min(10.0),
        Action::Buy => 6.0 + (s - 2.0),
        Action::Hold => 4.0 + (s + 1.0) * 0.7,
        Action::Avoid => 2.0 + (s + 3.0) * 0.7,
        Action::StrongAvoid => (1.0 + (s + 3.0) * 0.3).max(0.0),
    };
    (raw.clamp(0.0, MAX_RATING) * 10.0).round() / 10.0
}
