//! Black-Scholes Greeks, rule-based risk assessment and scored trade
//! recommendations for cash-secured puts and covered calls.
//!
//! The engine modules (`models`, `risk`, `recommend`, `evaluation`) are pure
//! and synchronous. `server`, `state` and `config` wrap them in an HTTP API.

pub mod config;
pub mod errors;
pub mod evaluation;
pub mod events;
pub mod models;
pub mod portfolio;
pub mod recommend;
pub mod risk;
pub mod server;
pub mod state;
pub mod trade;

pub use evaluation::{evaluate, Evaluation, EvaluationRequest};
pub use models::{compute_greeks, GreeksResult};
pub use recommend::{recommend, Recommendation};
pub use risk::{assess, RiskAssessment};
