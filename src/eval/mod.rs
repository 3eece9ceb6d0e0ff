//! Position evaluation
//!
//! - [`patterns`]: the weighted pattern table and combination bonuses
//! - [`heuristic`]: [`PatternEvaluator`], which scores whole boards

pub mod heuristic;
pub mod patterns;

pub use heuristic::{PatternCounts, PatternEvaluator, OPPONENT_DISCOUNT};
pub use patterns::{ComboBonus, PatternClass, PatternKind, PatternTable};
