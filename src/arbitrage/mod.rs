pub mod calculator;
pub mod evaluator;
pub mod fixed_point;

pub use calculator::{is_profitable, CostEstimator};
pub use evaluator::RoundTripEvaluator;
pub use fixed_point::{divide, ratio, to_display_units};
