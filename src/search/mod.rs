//! Search module for the renju AI
//!
//! Contains:
//! - Candidate generation with neighbourhood pruning
//! - Alpha-Beta search over a shared, scoped-mutation board

pub mod alphabeta;
pub mod candidates;

pub use alphabeta::{fallback_move, AlphaBetaSearch, SearchResult};
pub use candidates::{Candidate, CandidateGenerator, DEFAULT_RADIUS};
