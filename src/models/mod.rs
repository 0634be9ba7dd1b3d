pub mod normal;
pub mod greeks;

pub use greeks::{compute_from_params, compute_greeks, GreeksResult};
