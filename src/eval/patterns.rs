//! Pattern scores for Renju evaluation
//!
//! Lines are encoded as bytes: `1` own stone, `0` empty, `2` opponent stone,
//! `3` board edge. A class matches at an offset when any of its shapes does.

/// Named pattern classes, ordered roughly by decreasing severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Five,
    OpenFour,
    BrokenFour,
    ClosedFour,
    OpenThree,
    ClosedThree,
    BrokenThree,
    OpenTwo,
    ClosedTwo,
}

/// Number of pattern classes
pub const KIND_COUNT: usize = 9;

impl PatternKind {
    pub const ALL: [PatternKind; KIND_COUNT] = [
        PatternKind::Five,
        PatternKind::OpenFour,
        PatternKind::BrokenFour,
        PatternKind::ClosedFour,
        PatternKind::OpenThree,
        PatternKind::ClosedThree,
        PatternKind::BrokenThree,
        PatternKind::OpenTwo,
        PatternKind::ClosedTwo,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Five => "five",
            PatternKind::OpenFour => "open four",
            PatternKind::BrokenFour => "broken four",
            PatternKind::ClosedFour => "closed four",
            PatternKind::OpenThree => "open three",
            PatternKind::ClosedThree => "closed three",
            PatternKind::BrokenThree => "broken three",
            PatternKind::OpenTwo => "open two",
            PatternKind::ClosedTwo => "closed two",
        }
    }
}

/// One row of the pattern table
#[derive(Debug, Clone)]
pub struct PatternClass {
    pub kind: PatternKind,
    pub weight: f64,
    pub shapes: &'static [&'static [u8]],
}

impl PatternClass {
    /// Offsets in `line` where any shape of this class matches
    pub fn count_in(&self, line: &[u8]) -> usize {
        (0..line.len())
            .filter(|&start| {
                self.shapes
                    .iter()
                    .any(|shape| line[start..].starts_with(shape))
            })
            .count()
    }
}

/// Bonuses for simultaneous threats, each added at most once per evaluation
pub struct ComboBonus;

impl ComboBonus {
    /// Two or more open fours
    pub const DOUBLE_OPEN_FOUR: f64 = 420_000.0;
    /// Two or more closed fours
    pub const DOUBLE_CLOSED_FOUR: f64 = 200_000.0;
    /// Open four together with an open three
    pub const FOUR_THREE: f64 = 120_000.0;
    /// Two or more open threes
    pub const DOUBLE_OPEN_THREE: f64 = 36_000.0;
    /// Open three together with a broken three
    pub const THREE_BROKEN_THREE: f64 = 18_000.0;
}

/// Weighted pattern classes used by the evaluator
#[derive(Debug, Clone)]
pub struct PatternTable {
    classes: Vec<PatternClass>,
}

impl PatternTable {
    #[inline]
    pub fn classes(&self) -> &[PatternClass] {
        &self.classes
    }

    pub fn weight(&self, kind: PatternKind) -> f64 {
        self.classes
            .iter()
            .find(|class| class.kind == kind)
            .map_or(0.0, |class| class.weight)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        let classes = vec![
            PatternClass {
                kind: PatternKind::Five,
                weight: 1_000_000.0,
                shapes: &[b"11111"],
            },
            PatternClass {
                kind: PatternKind::OpenFour,
                weight: 160_000.0,
                shapes: &[b"011110"],
            },
            PatternClass {
                kind: PatternKind::BrokenFour,
                weight: 55_000.0,
                shapes: &[b"0110110", b"0101110", b"0111010"],
            },
            PatternClass {
                kind: PatternKind::ClosedFour,
                weight: 42_000.0,
                shapes: &[b"211110", b"011112", b"10111", b"11011", b"11101"],
            },
            PatternClass {
                kind: PatternKind::OpenThree,
                weight: 12_000.0,
                shapes: &[
                    b"0011100", b"0011010", b"0101100", b"0010110", b"0101110", b"0110100",
                ],
            },
            PatternClass {
                kind: PatternKind::ClosedThree,
                weight: 2_600.0,
                shapes: &[
                    b"2111100", b"0011120", b"0211100", b"0011102", b"2111010", b"0101112",
                    b"2101110", b"0111012",
                ],
            },
            PatternClass {
                kind: PatternKind::BrokenThree,
                weight: 6_200.0,
                shapes: &[b"010100", b"001010", b"010010"],
            },
            PatternClass {
                kind: PatternKind::OpenTwo,
                weight: 600.0,
                shapes: &[b"001100", b"0010100", b"0001100"],
            },
            PatternClass {
                kind: PatternKind::ClosedTwo,
                weight: 150.0,
                shapes: &[b"201110", b"011102", b"201100", b"001102", b"200110", b"011002"],
            },
        ];
        Self { classes }
    }
}
