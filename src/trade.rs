use crate::events::EventContext;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days per year used to convert day counts into year fractions.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Shares controlled by one listed option contract.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Single-leg short-option strategies the engine scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    CashSecuredPut,
    CoveredCall,
}

impl TradeType {
    /// The option that gets sold for this strategy.
    #[inline]
    pub fn option_type(self) -> OptionType {
        match self {
            Self::CashSecuredPut => OptionType::Put,
            Self::CoveredCall => OptionType::Call,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CashSecuredPut => "cash-secured put",
            Self::CoveredCall => "covered call",
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Time to expiration with an explicit unit.
///
/// Serialized externally tagged: `{"days": 30}` or `{"years": 0.25}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeToExpiry {
    Days(f64),
    Years(f64),
}

impl TimeToExpiry {
    /// Magnitude-based unit inference kept for callers that still send a bare
    /// number: anything greater than 1 is a day count, otherwise years.
    /// A half-year expressed as `0.5` reads correctly, but `1.5` years would be
    /// read as 1.5 days.
    pub fn from_legacy(t: f64) -> Self {
        if t > 1.0 {
            Self::Days(t)
        } else {
            Self::Years(t)
        }
    }

    #[inline]
    pub fn years(self) -> f64 {
        match self {
            Self::Days(d) => d / DAYS_PER_YEAR,
            Self::Years(y) => y,
        }
    }

    #[inline]
    pub fn days(self) -> f64 {
        match self {
            Self::Days(d) => d,
            Self::Years(y) => y * DAYS_PER_YEAR,
        }
    }
}

/// Inputs for a single Greeks computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeParameters {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: TimeToExpiry,
    pub option_type: OptionType,
    pub trade_type: TradeType,
    pub risk_free_rate: f64,
    /// Volatility proxy standing in for implied vol.
    pub volatility: f64,
}

/// Economics of the proposed trade as quoted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDetails {
    /// Premium per share.
    pub premium: f64,
    pub stock_price: f64,
    pub strike_price: f64,
    pub days_to_expiration: f64,
    #[serde(default)]
    pub event_context: Option<EventContext>,
    /// Reference date for calendar comparisons against event dates.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl TradeDetails {
    /// Premium as a percentage of the stock price. Zero when the stock price
    /// is not usable.
    #[inline]
    pub fn premium_yield_pct(&self) -> f64 {
        if self.stock_price > 0.0 && self.premium.is_finite() {
            self.premium / self.stock_price * 100.0
        } else {
            0.0
        }
    }

    /// Per-contract premium collected.
    #[inline]
    pub fn expected_return(&self) -> f64 {
        self.premium * CONTRACT_MULTIPLIER
    }

    /// Calendar date the option expires, when an as-of date is known.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        let as_of = self.as_of?;
        if !self.days_to_expiration.is_finite() || self.days_to_expiration < 0.0 {
            return None;
        }
        as_of.checked_add_days(chrono::Days::new(self.days_to_expiration.round() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_convert_to_years() {
        let t = TimeToExpiry::Days(36.5);
        assert!((t.years() - 0.1).abs() < 1e-12);
        assert!((TimeToExpiry::Years(0.5).days() - 182.5).abs() < 1e-9);
    }

    #[test]
    fn test_legacy_inference() {
        assert_eq!(TimeToExpiry::from_legacy(30.0), TimeToExpiry::Days(30.0));
        assert_eq!(TimeToExpiry::from_legacy(0.5), TimeToExpiry::Years(0.5));
        // Exactly 1 stays in years.
        assert_eq!(TimeToExpiry::from_legacy(1.0), TimeToExpiry::Years(1.0));
    }

    #[test]
    fn test_time_serde_tagged() {
        let json = serde_json::to_string(&TimeToExpiry::Days(21.0)).unwrap();
        assert_eq!(json, r#"{"days":21.0}"#);
        let back: TimeToExpiry = serde_json::from_str(r#"{"years":0.25}"#).unwrap();
        assert_eq!(back, TimeToExpiry::Years(0.25));
    }

    #[test]
    fn test_trade_type_maps_to_option() {
        assert_eq!(TradeType::CashSecuredPut.option_type(), OptionType::Put);
        assert_eq!(TradeType::CoveredCall.option_type(), OptionType::Call);
    }

    #[test]
    fn test_premium_yield_and_return() {
        let details = TradeDetails {
            premium: 3.0,
            stock_price: 100.0,
            strike_price: 95.0,
            days_to_expiration: 30.0,
            event_context: None,
            as_of: None,
        };
        assert!((details.premium_yield_pct() - 3.0).abs() < 1e-12);
        assert!((details.expected_return() - 300.0).abs() < 1e-12);
        assert_eq!(details.expiration_date(), None);
    }

    #[test]
    fn test_expiration_date_from_as_of() {
        let details = TradeDetails {
            premium: 1.0,
            stock_price: 50.0,
            strike_price: 48.0,
            days_to_expiration: 14.0,
            event_context: None,
            as_of: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(details.expiration_date(), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_zero_stock_price_yield_is_zero() {
        let details = TradeDetails {
            premium: 2.0,
            stock_price: 0.0,
            strike_price: 10.0,
            days_to_expiration: 7.0,
            event_context: None,
            as_of: None,
        };
        assert_eq!(details.premium_yield_pct(), 0.0);
    }
}
