use crate::models::GreeksResult;
use crate::portfolio::PortfolioSettings;
use crate::trade::{TradeType, CONTRACT_MULTIPLIER};

/// Capital and loss figures for one short contract. Stack-allocated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSizing {
    /// Cash set aside (puts) or share value held (calls).
    pub capital_required: f64,
    /// |theta| x 100; `None` when theta is unknown.
    pub premium_estimate: Option<f64>,
    /// Capital at risk after the premium credit.
    pub max_loss: f64,
}

/// Cash to secure a put at the strike, or the value of 100 shares held
/// against a covered call.
#[inline]
pub fn capital_required(trade_type: TradeType, spot: f64, strike: f64) -> f64 {
    match trade_type {
        TradeType::CashSecuredPut => strike * CONTRACT_MULTIPLIER,
        TradeType::CoveredCall => spot * CONTRACT_MULTIPLIER,
    }
}

/// Theta-based premium proxy per contract.
#[inline]
pub fn premium_estimate(greeks: &GreeksResult) -> Option<f64> {
    greeks.theta.map(|theta| theta.abs() * CONTRACT_MULTIPLIER)
}

/// Unknown premium gives no credit against the capital at risk.
pub fn size_position(trade_type: TradeType, spot: f64, strike: f64, greeks: &GreeksResult) -> PositionSizing {
    let capital_required = capital_required(trade_type, spot, strike);
    let premium_estimate = premium_estimate(greeks);
    let max_loss = capital_required - premium_estimate.unwrap_or(0.0);
    PositionSizing {
        capital_required,
        premium_estimate,
        max_loss,
    }
}

/// Allocation check result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationCheck {
    /// Fits inside the per-trade allocation
    Allowed { limit: f64 },
    /// Needs more capital than one trade may use
    Exceeded { limit: f64, excess: f64 },
}

impl AllocationCheck {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, AllocationCheck::Allowed { .. })
    }

    #[inline]
    pub fn limit(&self) -> f64 {
        match *self {
            AllocationCheck::Allowed { limit } | AllocationCheck::Exceeded { limit, .. } => limit,
        }
    }
}

/// Compare required capital with the portfolio's per-trade limit.
/// Pure function, no side effects.
#[inline]
pub fn check_allocation(capital_required: f64, portfolio: &PortfolioSettings) -> AllocationCheck {
    let limit = portfolio.allocation_limit();
    if capital_required > limit {
        AllocationCheck::Exceeded {
            limit,
            excess: capital_required - limit,
        }
    } else {
        AllocationCheck::Allowed { limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PremiumTarget;

    fn greeks_with_theta(theta: Option<f64>) -> GreeksResult {
        GreeksResult {
            theta,
            ..GreeksResult::unknown("test")
        }
    }

    fn portfolio(capital: f64, pct: f64) -> PortfolioSettings {
        PortfolioSettings {
            total_capital: capital,
            max_allocation_pct: pct,
            weekly_target: PremiumTarget { min: 50.0, max: 150.0 },
        }
    }

    #[test]
    fn test_put_secures_strike() {
        let s = size_position(TradeType::CashSecuredPut, 100.0, 95.0, &greeks_with_theta(Some(-0.5)));
        assert!((s.capital_required - 9_500.0).abs() < 1e-9);
        assert_eq!(s.premium_estimate, Some(50.0));
        assert!((s.max_loss - 9_450.0).abs() < 1e-9);
    }

    #[test]
    fn test_call_uses_share_value() {
        let s = size_position(TradeType::CoveredCall, 42.0, 45.0, &greeks_with_theta(Some(0.2)));
        assert!((s.capital_required - 4_200.0).abs() < 1e-9);
        assert!((s.max_loss - 4_180.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_theta_no_credit() {
        let s = size_position(TradeType::CashSecuredPut, 100.0, 95.0, &greeks_with_theta(None));
        assert_eq!(s.premium_estimate, None);
        assert!((s.max_loss - s.capital_required).abs() < 1e-12);
    }

    #[test]
    fn test_allocation_boundary() {
        let p = portfolio(50_000.0, 20.0);
        assert!(check_allocation(10_000.0, &p).is_allowed());
        let over = check_allocation(10_000.01, &p);
        assert!(!over.is_allowed());
        assert!((over.limit() - 10_000.0).abs() < 1e-9);
    }
}
