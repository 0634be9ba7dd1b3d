use serde::{Deserialize, Serialize};

/// Weekly premium income the account is aiming for, in currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumTarget {
    pub min: f64,
    pub max: f64,
}

/// Snapshot of the account constraints a trade is sized against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSettings {
    pub total_capital: f64,
    /// Percent of total capital (e.g. 20.0 = 20%) a single trade may tie up.
    pub max_allocation_pct: f64,
    pub weekly_target: PremiumTarget,
}

impl PortfolioSettings {
    /// Largest capital commitment allowed for one trade.
    #[inline]
    pub fn allocation_limit(&self) -> f64 {
        self.total_capital * self.max_allocation_pct / 100.0
    }

    /// Share of total capital, in percent, that `capital` represents.
    /// `None` when total capital is not positive.
    #[inline]
    pub fn allocation_pct(&self, capital: f64) -> Option<f64> {
        if self.total_capital > 0.0 {
            Some(capital / self.total_capital * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_limit() {
        let p = PortfolioSettings {
            total_capital: 50_000.0,
            max_allocation_pct: 20.0,
            weekly_target: PremiumTarget { min: 100.0, max: 300.0 },
        };
        assert!((p.allocation_limit() - 10_000.0).abs() < 1e-9);
        assert_eq!(p.allocation_pct(5_000.0), Some(10.0));
    }

    #[test]
    fn test_zero_capital_pct_unknown() {
        let p = PortfolioSettings {
            total_capital: 0.0,
            max_allocation_pct: 20.0,
            weekly_target: PremiumTarget { min: 0.0, max: 0.0 },
        };
        assert_eq!(p.allocation_pct(1.0), None);
    }
}
