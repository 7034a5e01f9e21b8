pub mod classifier;
pub mod scoring;
pub mod tags;

pub use classifier::Classifier;
pub use scoring::{CategoryScore, score_mid_category, select_category};
pub use tags::TagMatcher;
