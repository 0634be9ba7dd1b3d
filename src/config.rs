use crate::errors::{EngineError, EngineResult};
use crate::portfolio::{PortfolioSettings, PremiumTarget};

#[derive(Debug, Clone, serde::Serialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub risk_free_rate: f64,
    pub default_portfolio: PortfolioSettings,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        let risk_free_rate = parse_f64("RISK_FREE_RATE", "0.02")?;
        let total_capital = parse_f64("TOTAL_CAPITAL", "50000")?;
        let max_allocation_pct = parse_f64("MAX_ALLOCATION_PCT", "20")?;
        let weekly_min = parse_f64("WEEKLY_TARGET_MIN", "100")?;
        let weekly_max = parse_f64("WEEKLY_TARGET_MAX", "300")?;

        let cfg = Self {
            server_port,
            risk_free_rate,
            default_portfolio: PortfolioSettings {
                total_capital,
                max_allocation_pct,
                weekly_target: PremiumTarget {
                    min: weekly_min,
                    max: weekly_max,
                },
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine would silently misread.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.risk_free_rate.is_finite() || self.risk_free_rate.abs() >= 1.0 {
            return Err(EngineError::Config(format!(
                "RISK_FREE_RATE must be a fraction (e.g. 0.02), got {}",
                self.risk_free_rate
            )));
        }
        let p = &self.default_portfolio;
        if p.total_capital.is_nan() || p.total_capital <= 0.0 {
            return Err(EngineError::Config(format!(
                "TOTAL_CAPITAL must be positive, got {}",
                p.total_capital
            )));
        }
        if p.max_allocation_pct.is_nan() || p.max_allocation_pct <= 0.0 || p.max_allocation_pct > 100.0 {
            return Err(EngineError::Config(format!(
                "MAX_ALLOCATION_PCT must be in (0, 100], got {}",
                p.max_allocation_pct
            )));
        }
        if p.weekly_target.min < 0.0 || p.weekly_target.min > p.weekly_target.max {
            return Err(EngineError::Config(format!(
                "weekly target range invalid: min={} max={}",
                p.weekly_target.min, p.weekly_target.max
            )));
        }
        Ok(())
    }
}

fn parse_f64(key: &str, default: &str) -> EngineResult<f64> {
    env_var_or(key, default)
        .parse::<f64>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
