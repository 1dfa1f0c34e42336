pub mod overs;
pub mod run_rate;

pub use overs::{balls_to_overs, overs_to_balls, Overs, BALLS_PER_OVER};
pub use run_rate::{compute_rates, current_run_rate, required_run_rate, RateSummary};
