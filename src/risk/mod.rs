pub mod assessor;
pub mod sizing;

pub use assessor::{assess, FactorKind, RiskAssessment, RiskFactor, RiskLevel};
