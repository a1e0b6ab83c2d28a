//! # Load Calculation Engine
//!
//! 特徵計算與評分正規化

pub mod demand;
pub mod features;
pub mod normalize;
pub mod validation;

// Re-export 主要類型
pub use demand::DemandCalculator;
pub use features::FeatureCalculator;
pub use normalize::{normalize_minmax, ScoreNormalizer};
