//! Pluggable strategies used by values and rules
//!
//! Each strategy is a closed enum of the well-known variants plus a
//! `Custom` escape hatch holding a shared closure. All of them are
//! `Clone + Send + Sync` so a [`FuzzyContext`](crate::FuzzyContext) can
//! carry them across threads.

mod combine;
mod global;
mod similarity;

pub use combine::{AntecedentCombineOperator, CombineFn};
pub use global::{GlobalContributionFn, GlobalContributionOperator};
pub use similarity::{SimilarityFn, SimilarityOperator};
