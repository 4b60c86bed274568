pub mod calculator;
pub mod model;

pub use calculator::{estimate_value, score};
pub use model::{Category, Classification, Condition, Score, ScoreInput};
