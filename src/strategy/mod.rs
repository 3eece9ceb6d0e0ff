//! Difficulty tiers
//!
//! Every tier runs the same executor, [`Strategy`], configured by a
//! [`TierPolicy`]: an optional one-ply win/block pre-check, then one of three
//! selection rules.
//!
//! | Tier | Pre-check | Shortlist | Depth | Breadth | Selection |
//! |---|---|---|---|---|---|
//! | Casual | yes | 12 | - | - | random among the top 3 one-ply scores |
//! | Standard | no | - | 2 | 12 | alpha-beta |
//! | Strong | yes | 16 | 3 | 14 | alpha-beta |
//! | Expert | yes | 18 | 4 | 18 | reply lookahead |

pub mod dispatcher;

pub use dispatcher::StrategyDispatcher;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{position_to_notation, Board, Pos, Stone};
use crate::error::UnknownDifficulty;
use crate::eval::PatternEvaluator;
use crate::rules::RuleEngine;
use crate::search::{fallback_move, AlphaBetaSearch, Candidate, CandidateGenerator};

/// Score reported for a move that blocks the opponent's immediate five
pub const BLOCK_SCORE: f64 = 900_000.0;

/// AI difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "beginner")]
    Casual,
    #[default]
    #[serde(alias = "normal")]
    Standard,
    #[serde(alias = "hard")]
    Strong,
    /// Runs a full reply search for every shortlisted move, so a single
    /// move can take tens of seconds in the middle game
    #[serde(alias = "hell")]
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Casual,
        Difficulty::Standard,
        Difficulty::Strong,
        Difficulty::Expert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Casual => "casual",
            Difficulty::Standard => "standard",
            Difficulty::Strong => "strong",
            Difficulty::Expert => "expert",
        }
    }

    pub fn policy(self) -> TierPolicy {
        match self {
            Difficulty::Casual => TierPolicy {
                pre_check: true,
                shortlist: 12,
                depth: 0,
                breadth: 0,
                selection: Selection::RandomTop(3),
            },
            Difficulty::Standard => TierPolicy {
                pre_check: false,
                shortlist: 12,
                depth: 2,
                breadth: 12,
                selection: Selection::Search,
            },
            Difficulty::Strong => TierPolicy {
                pre_check: true,
                shortlist: 16,
                depth: 3,
                breadth: 14,
                selection: Selection::Search,
            },
            Difficulty::Expert => TierPolicy {
                pre_check: true,
                shortlist: 18,
                depth: 4,
                breadth: 18,
                selection: Selection::ReplyLookahead { reply_weight: 0.5 },
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" | "beginner" => Ok(Difficulty::Casual),
            "standard" | "normal" => Ok(Difficulty::Standard),
            "strong" | "hard" => Ok(Difficulty::Strong),
            "expert" | "hell" => Ok(Difficulty::Expert),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// How a tier picks its move once the pre-check found nothing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Score the shortlist one ply deep, pick uniformly among the best `n`
    RandomTop(usize),
    /// Plain alpha-beta search
    Search,
    /// Own placement, then the opponent's full search for a reply;
    /// score = static eval − `reply_weight` × reply score
    ReplyLookahead { reply_weight: f64 },
}

/// Tier configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPolicy {
    /// Look for an immediate win, then an immediate block, before anything else
    pub pre_check: bool,
    /// Number of ranked candidates the pre-check and one-ply selections consider
    pub shortlist: usize,
    pub depth: u8,
    pub breadth: usize,
    pub selection: Selection,
}

/// One AI move with the metadata callers display
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDecision {
    pub pos: Pos,
    /// Tier-specific score; `+inf` for a win, [`BLOCK_SCORE`] for a block
    pub score: f64,
    pub thinking_time_ms: u64,
    pub notation: String,
    pub difficulty: Difficulty,
}

/// A difficulty tier: shared rules, evaluator and generator, plus the
/// tier's own search and random source
#[derive(Debug)]
pub struct Strategy {
    difficulty: Difficulty,
    policy: TierPolicy,
    rules: Arc<RuleEngine>,
    evaluator: Arc<PatternEvaluator>,
    generator: Arc<CandidateGenerator>,
    search: Option<AlphaBetaSearch>,
    rng: StdRng,
    last_candidates: Vec<Candidate>,
}

impl Strategy {
    pub fn new(
        difficulty: Difficulty,
        rules: Arc<RuleEngine>,
        evaluator: Arc<PatternEvaluator>,
        generator: Arc<CandidateGenerator>,
    ) -> Self {
        Self::with_policy(difficulty, difficulty.policy(), rules, evaluator, generator)
    }

    /// Build a tier with a custom policy (tests and tuning)
    pub fn with_policy(
        difficulty: Difficulty,
        policy: TierPolicy,
        rules: Arc<RuleEngine>,
        evaluator: Arc<PatternEvaluator>,
        generator: Arc<CandidateGenerator>,
    ) -> Self {
        let search = (policy.depth > 0).then(|| {
            AlphaBetaSearch::new(
                Arc::clone(&rules),
                Arc::clone(&evaluator),
                Arc::clone(&generator),
                policy.depth,
                policy.breadth,
            )
        });
        Self {
            difficulty,
            policy,
            rules,
            evaluator,
            generator,
            search,
            rng: StdRng::from_os_rng(),
            last_candidates: Vec::new(),
        }
    }

    /// Replace the random source with a seeded one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// Ranked root candidates from the last `compute_move`
    pub fn last_candidates(&self) -> &[Candidate] {
        &self.last_candidates
    }

    /// Choose a move for `player`.
    ///
    /// The board is borrowed mutably for in-place lookahead and is restored
    /// before returning. Returns `None` only when no empty cell remains; the
    /// move is legal whenever a legal cell exists.
    pub fn compute_move(&mut self, board: &mut Board, player: Stone) -> Option<MoveDecision> {
        if board.is_full() {
            return None;
        }
        let start = Instant::now();
        let ranked = self.generator.generate(board, player, player.opponent());
        let shortlist: Vec<Candidate> = ranked
            .iter()
            .take(self.policy.shortlist)
            .filter(|c| self.rules.is_legal(board, c.pos, player))
            .copied()
            .collect();

        let selection = self.policy.selection;
        let urgent = if self.policy.pre_check {
            self.find_urgent(board, player, &shortlist)
        } else {
            None
        };

        let chosen = match urgent {
            Some(found) => Some(found),
            None => match selection {
                Selection::RandomTop(n) => self.pick_random_top(board, player, &shortlist, n),
                Selection::Search => self.search.as_ref().and_then(|search| {
                    let result = search.find_best_move(board, player);
                    result.best_move.map(|c| (c.pos, result.score))
                }),
                Selection::ReplyLookahead { reply_weight } => {
                    self.reply_lookahead(board, player, &shortlist, reply_weight)
                }
            },
        };

        let (pos, score) = match chosen {
            Some(found) => found,
            None => {
                let fallback = fallback_move(&self.rules, board, &ranked, player)?;
                (fallback.pos, 0.0)
            }
        };
        self.last_candidates = ranked;

        let thinking_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            tier = %self.difficulty,
            x = pos.x,
            y = pos.y,
            score,
            time_ms = thinking_time_ms,
            "tier chose move"
        );

        Some(MoveDecision {
            pos,
            score,
            thinking_time_ms,
            notation: position_to_notation(pos.x as i32, pos.y as i32, board.size()),
            difficulty: self.difficulty,
        })
    }

    /// Immediate win for `player`, otherwise the cell that stops the
    /// opponent's immediate five. A five the opponent may not legally play
    /// is no threat.
    fn find_urgent(&self, board: &Board, player: Stone, shortlist: &[Candidate]) -> Option<(Pos, f64)> {
        let opponent = player.opponent();
        if let Some(win) = shortlist
            .iter()
            .find(|c| self.rules.check_win(board, c.pos, player).is_win)
        {
            return Some((win.pos, f64::INFINITY));
        }
        shortlist
            .iter()
            .filter(|c| self.rules.is_legal(board, c.pos, opponent))
            .find(|c| self.rules.check_win(board, c.pos, opponent).is_win)
            .map(|block| (block.pos, BLOCK_SCORE))
    }

    fn pick_random_top(
        &mut self,
        board: &mut Board,
        player: Stone,
        shortlist: &[Candidate],
        n: usize,
    ) -> Option<(Pos, f64)> {
        let scored = score_one_ply(&self.evaluator, board, player, shortlist);
        if scored.is_empty() {
            return None;
        }
        let bucket = n.clamp(1, scored.len());
        let pick = self.rng.random_range(0..bucket);
        Some(scored[pick])
    }

    fn reply_lookahead(
        &self,
        board: &mut Board,
        player: Stone,
        shortlist: &[Candidate],
        reply_weight: f64,
    ) -> Option<(Pos, f64)> {
        let search = self.search.as_ref()?;
        let mut best: Option<(Pos, f64)> = None;
        let mut best_score = f64::NEG_INFINITY;

        for candidate in shortlist {
            let mut placed = board.place_scoped(candidate.pos, player);
            if self.rules.check_win(&placed, candidate.pos, player).is_win {
                return Some((candidate.pos, f64::INFINITY));
            }
            let reply = search.find_best_move(&mut placed, player.opponent());
            let static_score = self.evaluator.evaluate_board(&placed, player);
            let score = static_score - reply_weight * reply.score;
            if score > best_score {
                best_score = score;
                best = Some((candidate.pos, score));
            }
        }
        best
    }
}

/// One-ply scores for `shortlist`, best first; equal scores keep ranked order
fn score_one_ply(
    evaluator: &PatternEvaluator,
    board: &mut Board,
    player: Stone,
    shortlist: &[Candidate],
) -> Vec<(Pos, f64)> {
    let mut scored: Vec<(Pos, f64)> = shortlist
        .iter()
        .map(|c| (c.pos, evaluator.evaluate_move(board, c.pos, player)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleConfig;

    fn tier(difficulty: Difficulty) -> Strategy {
        Strategy::new(
            difficulty,
            Arc::new(RuleEngine::default()),
            Arc::new(PatternEvaluator::new()),
            Arc::new(CandidateGenerator::default()),
        )
        .with_seed(7)
    }

    fn board_with(black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(x, y) in black {
            board.place_stone(Pos::new(x, y), Stone::Black);
        }
        for &(x, y) in white {
            board.place_stone(Pos::new(x, y), Stone::White);
        }
        board
    }

    /// White threatens five at (6,7) through a split four
    fn split_four_threat() -> Board {
        board_with(&[(6, 6), (12, 12)], &[(4, 7), (5, 7), (7, 7), (8, 7)])
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!("casual".parse::<Difficulty>(), Ok(Difficulty::Casual));
        assert_eq!("Beginner".parse::<Difficulty>(), Ok(Difficulty::Casual));
        assert_eq!("normal".parse::<Difficulty>(), Ok(Difficulty::Standard));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Strong));
        assert_eq!(" hell ".parse::<Difficulty>(), Ok(Difficulty::Expert));
        assert!("grandmaster".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Standard);
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.label().parse::<Difficulty>(), Ok(difficulty));
        }
    }

    #[test]
    fn test_difficulty_serde_aliases() {
        let parsed: Difficulty = serde_json::from_str("\"hell\"").unwrap();
        assert_eq!(parsed, Difficulty::Expert);
        assert_eq!(serde_json::to_string(&Difficulty::Strong).unwrap(), "\"strong\"");
    }

    #[test]
    fn test_tier_policies() {
        let standard = Difficulty::Standard.policy();
        assert!(!standard.pre_check);
        assert_eq!((standard.depth, standard.breadth), (2, 12));

        let strong = Difficulty::Strong.policy();
        assert!(strong.pre_check);
        assert_eq!((strong.shortlist, strong.depth, strong.breadth), (16, 3, 14));

        let expert = Difficulty::Expert.policy();
        assert_eq!((expert.shortlist, expert.depth, expert.breadth), (18, 4, 18));
        assert_eq!(expert.selection, Selection::ReplyLookahead { reply_weight: 0.5 });

        assert_eq!(Difficulty::Casual.policy().selection, Selection::RandomTop(3));
        assert!(tier(Difficulty::Casual).search.is_none(), "Casual never searches");
    }

    #[test]
    fn test_standard_opens_at_center() {
        let mut board = Board::new();
        let decision = tier(Difficulty::Standard)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(7, 7));
        assert_eq!(decision.notation, "H8");
        assert_eq!(decision.difficulty, Difficulty::Standard);
        assert!(board.is_board_empty());
    }

    #[test]
    fn test_strong_blocks_immediate_five() {
        let mut board = split_four_threat();
        let before = board.clone();
        let decision = tier(Difficulty::Strong)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7), "Strong must block the five");
        assert_eq!(decision.score, BLOCK_SCORE);
        assert_eq!(board, before, "Board must be restored");
    }

    #[test]
    fn test_expert_blocks_immediate_five() {
        let mut board = split_four_threat();
        let decision = tier(Difficulty::Expert)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7), "Expert must block the five");
        assert_eq!(decision.score, BLOCK_SCORE);
    }

    #[test]
    fn test_strong_and_expert_block_for_defender() {
        // Black threatens five at (6,7); White is the unrestricted side
        let board = board_with(&[(4, 7), (5, 7), (7, 7), (8, 7)], &[(6, 6), (12, 12)]);
        for difficulty in [Difficulty::Strong, Difficulty::Expert] {
            let mut board = board.clone();
            let decision = tier(difficulty).compute_move(&mut board, Stone::White).unwrap();
            assert_eq!(decision.pos, Pos::new(6, 7), "{difficulty} must block");
        }
    }

    #[test]
    fn test_win_beats_block() {
        // Both sides have a split four; the mover should finish instead of blocking
        let mut board = board_with(
            &[(4, 9), (5, 9), (7, 9), (8, 9)],
            &[(4, 7), (5, 7), (7, 7), (8, 7)],
        );
        let decision = tier(Difficulty::Strong)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(6, 9));
        assert_eq!(decision.score, f64::INFINITY);
    }

    #[test]
    fn test_standard_search_blocks_immediate_five() {
        let mut board = split_four_threat();
        let decision = tier(Difficulty::Standard)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7));
    }

    #[test]
    fn test_casual_takes_win_and_blocks() {
        let mut board = board_with(&[(4, 7), (5, 7), (7, 7), (8, 7)], &[(6, 6), (12, 12)]);
        let decision = tier(Difficulty::Casual)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7));
        assert_eq!(decision.score, f64::INFINITY);

        let decision = tier(Difficulty::Casual)
            .compute_move(&mut board, Stone::White)
            .unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7));
        assert_eq!(decision.score, BLOCK_SCORE);
    }

    #[test]
    fn test_casual_picks_from_top_three() {
        let mut board = board_with(&[(7, 7), (8, 8)], &[(7, 8)]);
        let evaluator = PatternEvaluator::new();
        let rules = RuleEngine::default();
        let shortlist: Vec<Candidate> = CandidateGenerator::default()
            .generate(&board, Stone::White, Stone::Black)
            .into_iter()
            .take(12)
            .filter(|c| rules.is_legal(&board, c.pos, Stone::White))
            .collect();
        let top: Vec<Pos> = score_one_ply(&evaluator, &mut board, Stone::White, &shortlist)
            .into_iter()
            .take(3)
            .map(|(pos, _)| pos)
            .collect();

        let mut casual = tier(Difficulty::Casual);
        for _ in 0..10 {
            let decision = casual.compute_move(&mut board, Stone::White).unwrap();
            assert!(top.contains(&decision.pos), "{:?} not in {:?}", decision.pos, top);
        }
    }

    #[test]
    fn test_casual_is_reproducible_with_seed() {
        let board = board_with(&[(7, 7), (8, 8)], &[(7, 8)]);
        let mut a = tier(Difficulty::Casual).with_seed(42);
        let mut b = tier(Difficulty::Casual).with_seed(42);
        for _ in 0..5 {
            let mut board_a = board.clone();
            let mut board_b = board.clone();
            assert_eq!(
                a.compute_move(&mut board_a, Stone::White).map(|d| d.pos),
                b.compute_move(&mut board_b, Stone::White).map(|d| d.pos)
            );
        }
    }

    #[test]
    fn test_reply_lookahead_avoids_losing_reply() {
        let policy = TierPolicy {
            pre_check: false,
            shortlist: 4,
            depth: 1,
            breadth: 8,
            selection: Selection::ReplyLookahead { reply_weight: 0.5 },
        };
        let mut strategy = Strategy::with_policy(
            Difficulty::Expert,
            policy,
            Arc::new(RuleEngine::default()),
            Arc::new(PatternEvaluator::new()),
            Arc::new(CandidateGenerator::default()),
        );
        let mut board = board_with(&[(12, 12)], &[(4, 7), (5, 7), (7, 7), (8, 7)]);
        let decision = strategy.compute_move(&mut board, Stone::Black).unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7));
        assert!(decision.score.is_finite());
        assert_eq!(board.stone_count(), 5, "Board must be restored");
    }

    #[test]
    fn test_pre_check_skips_forbidden_cells() {
        // (7,7) completes White's five but is a double-three for Black
        let mut board = board_with(
            &[(5, 7), (6, 7), (7, 5), (7, 6)],
            &[(3, 3), (4, 4), (5, 5), (6, 6)],
        );
        let rules = RuleEngine::default();
        assert!(!rules.is_legal(&board, Pos::new(7, 7), Stone::Black));
        let decision = tier(Difficulty::Strong)
            .compute_move(&mut board, Stone::Black)
            .unwrap();
        assert_ne!(decision.pos, Pos::new(7, 7));
        assert!(rules.is_legal(&board, decision.pos, Stone::Black));
    }

    #[test]
    fn test_defender_ignores_forbidden_overline() {
        // (6,7) would give Black six in a row; (1,7) is already covered
        let mut board = board_with(&[(2, 7), (3, 7), (4, 7), (5, 7), (7, 7)], &[(1, 7)]);
        let overline = Pos::new(6, 7);
        let rules = RuleEngine::default();
        assert!(!rules.is_legal(&board, overline, Stone::Black));

        let only_overline = [Candidate {
            pos: overline,
            priority: 1.0,
        }];
        let strong = tier(Difficulty::Strong);
        assert_eq!(strong.find_urgent(&board, Stone::White, &only_overline), None);

        let unrestricted = Strategy::new(
            Difficulty::Strong,
            Arc::new(RuleEngine::new(RuleConfig {
                forbidden_enabled: false,
                attacker: Stone::Black,
            })),
            Arc::new(PatternEvaluator::new()),
            Arc::new(CandidateGenerator::default()),
        );
        assert_eq!(
            unrestricted.find_urgent(&board, Stone::White, &only_overline),
            Some((overline, BLOCK_SCORE)),
            "Without forbidden rules the six is a real threat"
        );

        for difficulty in [Difficulty::Casual, Difficulty::Strong] {
            let decision = tier(difficulty).compute_move(&mut board, Stone::White).unwrap();
            assert_ne!(decision.score, BLOCK_SCORE, "{difficulty} blocked a forbidden point");
        }
    }

    #[test]
    fn test_forbidden_off_allows_block_on_double_three() {
        let rules = RuleEngine::new(RuleConfig {
            forbidden_enabled: false,
            attacker: Stone::Black,
        });
        let mut strategy = Strategy::new(
            Difficulty::Strong,
            Arc::new(rules),
            Arc::new(PatternEvaluator::new()),
            Arc::new(CandidateGenerator::default()),
        );
        let mut board = board_with(
            &[(5, 7), (6, 7), (7, 5), (7, 6)],
            &[(3, 3), (4, 4), (5, 5), (6, 6)],
        );
        let decision = strategy.compute_move(&mut board, Stone::Black).unwrap();
        assert_eq!(decision.pos, Pos::new(7, 7));
    }

    #[test]
    fn test_full_board_returns_none() {
        let mut board = Board::with_size(5);
        let cells: Vec<Pos> = board.empty_cells().collect();
        for pos in cells {
            let stone = if ((pos.x / 2) + pos.y) % 2 == 0 {
                Stone::Black
            } else {
                Stone::White
            };
            board.place_stone(pos, stone);
        }
        for difficulty in Difficulty::ALL {
            assert!(tier(difficulty).compute_move(&mut board, Stone::Black).is_none());
        }
    }

    #[test]
    fn test_last_candidates_recorded() {
        let mut board = board_with(&[(7, 7)], &[]);
        let mut strategy = tier(Difficulty::Casual);
        assert!(strategy.last_candidates().is_empty());
        strategy.compute_move(&mut board, Stone::White);
        assert_eq!(strategy.last_candidates().len(), 24);
    }
}
