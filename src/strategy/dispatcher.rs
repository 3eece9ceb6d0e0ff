//! Difficulty label -> memoised tier

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::eval::PatternEvaluator;
use crate::rules::RuleEngine;
use crate::search::CandidateGenerator;

use super::{Difficulty, Strategy};

/// Builds tiers on first use and hands back the same instance afterwards.
///
/// All tiers share one rule engine, evaluator and candidate generator.
#[derive(Debug)]
pub struct StrategyDispatcher {
    rules: Arc<RuleEngine>,
    evaluator: Arc<PatternEvaluator>,
    generator: Arc<CandidateGenerator>,
    cache: HashMap<Difficulty, Strategy>,
    seed: Option<u64>,
}

impl StrategyDispatcher {
    pub fn new(rules: RuleEngine) -> Self {
        Self::with_parts(
            Arc::new(rules),
            Arc::new(PatternEvaluator::new()),
            Arc::new(CandidateGenerator::default()),
        )
    }

    pub fn with_parts(
        rules: Arc<RuleEngine>,
        evaluator: Arc<PatternEvaluator>,
        generator: Arc<CandidateGenerator>,
    ) -> Self {
        Self {
            rules,
            evaluator,
            generator,
            cache: HashMap::new(),
            seed: None,
        }
    }

    /// Seed the random source of every tier built from now on
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// Tier for a label such as `"hard"` or `"expert"`.
    ///
    /// Unknown labels fall back to [`Difficulty::Standard`].
    pub fn get(&mut self, label: &str) -> &mut Strategy {
        let difficulty = label.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to standard difficulty");
            Difficulty::Standard
        });
        self.get_tier(difficulty)
    }

    pub fn get_tier(&mut self, difficulty: Difficulty) -> &mut Strategy {
        let Self {
            rules,
            evaluator,
            generator,
            cache,
            seed,
        } = self;
        cache.entry(difficulty).or_insert_with(|| {
            let strategy = Strategy::new(
                difficulty,
                Arc::clone(rules),
                Arc::clone(evaluator),
                Arc::clone(generator),
            );
            match seed {
                Some(seed) => strategy.with_seed(*seed),
                None => strategy,
            }
        })
    }

    /// Number of tiers built so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
