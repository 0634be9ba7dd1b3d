//! Black-Scholes Greeks for a single European option (no dividends).
//!
//! d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
//! d2 = d1 - sigma * sqrt(T)
//!
//! Theta and rho are per year, vega per unit of volatility. Every
//! sensitivity is `None` when it cannot be computed; consumers must carry
//! that through rather than substituting zero.

use crate::models::normal;
use crate::trade::{OptionType, TimeToExpiry, TradeParameters};
use serde::{Deserialize, Serialize};

/// |delta| above this reads as a strong directional bias.
pub const STRONG_DELTA: f64 = 0.6;
/// Gamma above this means delta moves quickly as expiration nears.
pub const HIGH_GAMMA: f64 = 0.05;
/// Theta below this is significant time decay.
pub const SIGNIFICANT_THETA: f64 = -0.05;
/// Vega above this makes the position volatility-sensitive.
pub const HIGH_VEGA: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub theta: Option<f64>,
    pub vega: Option<f64>,
    pub rho: Option<f64>,
    pub d1: Option<f64>,
    pub d2: Option<f64>,
    pub interpretation: String,
}

impl GreeksResult {
    /// All sensitivities unknown, with a reason for the caller to display.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            delta: None,
            gamma: None,
            theta: None,
            vega: None,
            rho: None,
            d1: None,
            d2: None,
            interpretation: reason.into(),
        }
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        self.delta.is_some()
            && self.gamma.is_some()
            && self.theta.is_some()
            && self.vega.is_some()
            && self.rho.is_some()
    }
}

/// Compute Greeks from a full parameter set.
pub fn compute_from_params(params: &TradeParameters) -> GreeksResult {
    compute_greeks(
        params.spot,
        params.strike,
        params.time_to_expiry,
        params.option_type,
        params.risk_free_rate,
        params.volatility,
    )
}

/// Compute Black-Scholes Greeks. Never panics: invalid inputs produce an
/// all-unknown result whose interpretation names the offending parameters.
pub fn compute_greeks(
    spot: f64,
    strike: f64,
    time: TimeToExpiry,
    option_type: OptionType,
    rate: f64,
    sigma: f64,
) -> GreeksResult {
    let t = time.years();

    let invalid = invalid_parameters(spot, strike, t, sigma, rate);
    if !invalid.is_empty() {
        tracing::warn!(
            spot, strike, years = t, sigma, rate,
            "greeks requested with invalid parameters: {}", invalid.join(", ")
        );
        return GreeksResult::unknown(format!(
            "Greeks unavailable: invalid {} (spot, strike, time to expiration and volatility must be positive)",
            invalid.join(", ")
        ));
    }

    let sqrt_t = t.sqrt();
    let sigma_sqrt_t = sigma * sqrt_t;
    let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;

    let n_d1 = normal::pdf(d1);
    let discount = (-rate * t).exp();

    let gamma = n_d1 / (spot * sigma_sqrt_t);
    let vega = spot * sqrt_t * n_d1;
    let decay = -(spot * sigma * n_d1) / (2.0 * sqrt_t);

    let (delta, theta, rho) = match option_type {
        OptionType::Call => {
            let nd2 = normal::cdf(d2);
            (
                normal::cdf(d1),
                decay - rate * strike * discount * nd2,
                strike * t * discount * nd2,
            )
        }
        OptionType::Put => {
            let nmd2 = normal::cdf(-d2);
            (
                -normal::cdf(-d1),
                decay + rate * strike * discount * nmd2,
                -strike * t * discount * nmd2,
            )
        }
    };

    let mut result = GreeksResult {
        delta: finite(delta).map(|d| d.clamp(-1.0, 1.0)),
        gamma: finite(gamma).map(|g| g.max(0.0)),
        theta: finite(theta),
        vega: finite(vega).map(|v| v.max(0.0)),
        rho: finite(rho),
        d1: finite(d1),
        d2: finite(d2),
        interpretation: String::new(),
    };
    result.interpretation = interpret(&result);

    tracing::debug!(
        %option_type, spot, strike, years = t, sigma,
        delta = ?result.delta, gamma = ?result.gamma, theta = ?result.theta,
        "greeks computed"
    );

    result
}

fn invalid_parameters(spot: f64, strike: f64, t: f64, sigma: f64, rate: f64) -> Vec<&'static str> {
    let mut bad = Vec::new();
    if !(spot.is_finite() && spot > 0.0) {
        bad.push("spot");
    }
    if !(strike.is_finite() && strike > 0.0) {
        bad.push("strike");
    }
    if !(t.is_finite() && t > 0.0) {
        bad.push("time to expiration");
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        bad.push("volatility");
    }
    if !rate.is_finite() {
        bad.push("risk-free rate");
    }
    bad
}

#[inline]
fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Short qualitative reading of the Greeks using fixed thresholds.
pub fn interpret(greeks: &GreeksResult) -> String {
    let mut notes: Vec<String> = Vec::with_capacity(4);

    if let Some(delta) = greeks.delta {
        if delta.abs() > STRONG_DELTA {
            notes.push(format!("Delta of {delta:.2} shows a strong directional bias."));
        }
    }
    if let Some(gamma) = greeks.gamma {
        if gamma > HIGH_GAMMA {
            notes.push(format!(
                "Gamma of {gamma:.3}: sensitivity increases near expiration."
            ));
        }
    }
    if let Some(theta) = greeks.theta {
        if theta < SIGNIFICANT_THETA {
            notes.push(format!("Theta of {theta:.2} means significant time decay."));
        }
    }
    if let Some(vega) = greeks.vega {
        if vega > HIGH_VEGA {
            notes.push(format!("Vega of {vega:.2}: the option is volatility-sensitive."));
        }
    }

    if notes.is_empty() {
        if greeks.is_known() {
            "Greeks show low sensitivity to price, time and volatility.".to_string()
        } else {
            "Greeks could not be fully determined.".to_string()
        }
    } else {
        notes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_30d() -> GreeksResult {
        compute_greeks(100.0, 95.0, TimeToExpiry::Days(30.0), OptionType::Put, 0.02, 0.5)
    }

    #[test]
    fn test_otm_put_small_negative_delta() {
        let g = put_30d();
        let delta = g.delta.unwrap();
        assert!(delta < 0.0, "put delta must be negative: {delta}");
        assert!(delta.abs() < 0.5, "OTM put |delta| should be below 0.5: {delta}");
        assert!(g.gamma.unwrap() > 0.0);
        assert!(g.vega.unwrap() > 0.0);
        assert!(g.rho.unwrap() < 0.0);
    }

    #[test]
    fn test_put_reference_values() {
        // S=100 K=95 T=30/365 r=0.02 sigma=0.5
        // d1 = (ln(100/95) + 0.145*T)/(0.5*sqrt(T)) ~= 0.44097
        let g = put_30d();
        let d1 = g.d1.unwrap();
        assert!((d1 - 0.44097).abs() < 1e-4, "d1={d1}");
        assert!((g.delta.unwrap() + 0.32962).abs() < 1e-4, "delta={:?}", g.delta);
        assert!((g.d2.unwrap() - (d1 - 0.5 * (30.0f64 / 365.0).sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_put_call_delta_parity() {
        let call = compute_greeks(100.0, 105.0, TimeToExpiry::Years(0.25), OptionType::Call, 0.03, 0.3);
        let put = compute_greeks(100.0, 105.0, TimeToExpiry::Years(0.25), OptionType::Put, 0.03, 0.3);
        let diff = call.delta.unwrap() - put.delta.unwrap();
        assert!((diff - 1.0).abs() < 2.0 * normal::CDF_MAX_ABS_ERROR, "diff={diff}");
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
    }

    #[test]
    fn test_invariants_over_grid() {
        let spots = [20.0, 80.0, 100.0, 120.0, 400.0];
        let strikes = [50.0, 95.0, 100.0, 150.0];
        let times = [TimeToExpiry::Days(1.0), TimeToExpiry::Days(45.0), TimeToExpiry::Years(2.0)];
        let sigmas = [0.05, 0.3, 1.5];
        for &s in &spots {
            for &k in &strikes {
                for &t in &times {
                    for &sigma in &sigmas {
                        for ot in [OptionType::Call, OptionType::Put] {
                            let g = compute_greeks(s, k, t, ot, 0.02, sigma);
                            let delta = g.delta.unwrap();
                            assert!((-1.0..=1.0).contains(&delta));
                            assert!(g.gamma.unwrap() >= 0.0);
                            assert!(g.vega.unwrap() >= 0.0);
                            assert!(g.theta.unwrap().is_finite());
                            assert!(g.rho.unwrap().is_finite());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_non_positive_time_is_unknown() {
        for t in [TimeToExpiry::Days(0.0), TimeToExpiry::Years(-0.1), TimeToExpiry::Days(f64::NAN)] {
            let g = compute_greeks(100.0, 95.0, t, OptionType::Put, 0.02, 0.5);
            assert!(!g.is_known());
            assert_eq!(g.delta, None);
            assert_eq!(g.d1, None);
            assert!(
                g.interpretation.starts_with("Greeks unavailable: invalid time to expiration"),
                "{}",
                g.interpretation
            );
        }
    }

    #[test]
    fn test_invalid_inputs_named() {
        let g = compute_greeks(0.0, -5.0, TimeToExpiry::Days(30.0), OptionType::Call, 0.02, 0.0);
        assert!(!g.is_known());
        assert!(
            g.interpretation.starts_with("Greeks unavailable: invalid spot, strike, volatility"),
            "{}",
            g.interpretation
        );
    }

    #[test]
    fn test_legacy_time_matches_days() {
        let legacy = compute_greeks(50.0, 48.0, TimeToExpiry::from_legacy(30.0), OptionType::Put, 0.02, 0.4);
        let explicit = compute_greeks(50.0, 48.0, TimeToExpiry::Years(30.0 / 365.0), OptionType::Put, 0.02, 0.4);
        assert!((legacy.delta.unwrap() - explicit.delta.unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_serializes_as_null() {
        let g = GreeksResult::unknown("nope");
        let v = serde_json::to_value(&g).unwrap();
        assert!(v["delta"].is_null());
        assert!(v["vega"].is_null());
        assert_eq!(v["interpretation"], "nope");
    }

    #[test]
    fn test_interpretation_thresholds() {
        let g = GreeksResult {
            delta: Some(-0.7),
            gamma: Some(0.06),
            theta: Some(-0.2),
            vega: Some(0.15),
            rho: Some(-1.0),
            d1: Some(0.0),
            d2: Some(0.0),
            interpretation: String::new(),
        };
        let text = interpret(&g);
        assert!(text.contains("strong directional bias"));
        assert!(text.contains("sensitivity increases near expiration"));
        assert!(text.contains("significant time decay"));
        assert!(text.contains("volatility-sensitive"));

        let quiet = GreeksResult {
            delta: Some(0.6),
            gamma: Some(0.05),
            theta: Some(-0.05),
            vega: Some(0.1),
            ..g
        };
        assert_eq!(
            interpret(&quiet),
            "Greeks show low sensitivity to price, time and volatility."
        );
    }
}
