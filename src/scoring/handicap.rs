//! Handicap mathematics.
//!
//! Course handicap from a portable handicap index, allocation of those
//! strokes across the holes of a round, and net score derivation.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{HoleScores, ScoringError, HOLES_PER_ROUND};

/// Slope rating of a course of standard difficulty.
pub const STANDARD_SLOPE: u32 = 113;

/// Course rating assumed when no tee has been rated.
pub const DEFAULT_COURSE_RATING: Decimal = dec!(72);

/// Reference ordering used when a course has not configured its own.
const DEFAULT_STROKE_INDEX: [u8; HOLES_PER_ROUND] =
    [1, 3, 5, 7, 9, 11, 13, 15, 17, 2, 4, 6, 8, 10, 12, 14, 16, 18];

// ---------------------------------------------------------------------------
// Stroke index
// ---------------------------------------------------------------------------

/// Per-hole difficulty ranking, 1 (hardest) to 18 (easiest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct StrokeIndex([u8; HOLES_PER_ROUND]);

impl StrokeIndex {
    pub fn as_array(&self) -> &[u8; HOLES_PER_ROUND] {
        &self.0
    }

    /// Hole indices (0-based) ordered hardest first.
    pub fn holes_by_difficulty(&self) -> [usize; HOLES_PER_ROUND] {
        let mut order = [0usize; HOLES_PER_ROUND];
        for (hole, &rank) in self.0.iter().enumerate() {
            order[usize::from(rank) - 1] = hole;
        }
        order
    }
}

impl TryFrom<Vec<u8>> for StrokeIndex {
    type Error = ScoringError;

    fn try_from(raw: Vec<u8>) -> Result<Self, Self::Error> {
        if !validate_stroke_index(&raw) {
            return Err(ScoringError::InvalidStrokeIndex(format!(
                "expected a permutation of 1..={HOLES_PER_ROUND}, got {raw:?}"
            )));
        }
        let table: [u8; HOLES_PER_ROUND] = raw
            .as_slice()
            .try_into()
            .map_err(|_| ScoringError::InvalidStrokeIndex(format!("{raw:?}")))?;
        Ok(Self(table))
    }
}

impl From<StrokeIndex> for Vec<u8> {
    fn from(index: StrokeIndex) -> Self {
        index.0.to_vec()
    }
}

/// True iff `table` holds each of 1..=18 exactly once.
pub fn validate_stroke_index(table: &[u8]) -> bool {
    if table.len() != HOLES_PER_ROUND {
        return false;
    }
    let mut seen = [false; HOLES_PER_ROUND];
    for &rank in table {
        let slot = usize::from(rank);
        if slot == 0 || slot > HOLES_PER_ROUND || seen[slot - 1] {
            return false;
        }
        seen[slot - 1] = true;
    }
    true
}

pub fn default_stroke_index() -> StrokeIndex {
    StrokeIndex(DEFAULT_STROKE_INDEX)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HandicapConfig {
    /// Slope of a standard course; divisor of the course handicap formula.
    pub slope_reference: u32,
    /// Course rating used when neither competition nor category has a tee.
    pub default_course_rating: Decimal,
    /// Allowed handicap index range, inclusive. `None` disables the check.
    pub index_range: Option<(Decimal, Decimal)>,
}

impl Default for HandicapConfig {
    fn default() -> Self {
        Self {
            slope_reference: STANDARD_SLOPE,
            default_course_rating: DEFAULT_COURSE_RATING,
            index_range: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct HandicapCalculator {
    config: HandicapConfig,
}

impl HandicapCalculator {
    pub fn new(config: HandicapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HandicapConfig {
        &self.config
    }

    /// Strokes a player receives on a specific course and tee.
    ///
    /// `round(index × slope / reference + (course_rating − par))`, rounding
    /// half away from zero. Negative results are "plus" handicaps. Fails when
    /// the arithmetic overflows or the result does not fit an `i32`.
    pub fn course_handicap(
        &self,
        handicap_index: Decimal,
        slope_rating: u32,
        course_rating: Decimal,
        par: i32,
    ) -> Result<i32, ScoringError> {
        let overflow = || ScoringError::CourseHandicapOverflow {
            index: handicap_index,
        };
        let reference = Decimal::from(self.config.slope_reference);
        let adjustment = course_rating
            .checked_sub(Decimal::from(par))
            .ok_or_else(overflow)?;
        let raw = handicap_index
            .checked_mul(Decimal::from(slope_rating))
            .and_then(|v| v.checked_div(reference))
            .and_then(|v| v.checked_add(adjustment))
            .ok_or_else(overflow)?;
        let rounded = raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        debug!(
            %handicap_index,
            slope_rating,
            %course_rating,
            par,
            %raw,
            course_handicap = %rounded,
            "Course handicap computed"
        );

        rounded.to_i32().ok_or_else(overflow)
    }

    /// Reject an index outside the configured range, if one is set.
    pub fn validate_index(&self, handicap_index: Decimal) -> Result<(), ScoringError> {
        match self.config.index_range {
            Some((min, max)) if handicap_index < min || handicap_index > max => {
                Err(ScoringError::HandicapOutOfRange {
                    index: handicap_index,
                    min,
                    max,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Course handicap against the standard slope reference.
pub fn calculate_course_handicap(
    handicap_index: Decimal,
    slope_rating: u32,
    course_rating: Decimal,
    par: i32,
) -> Result<i32, ScoringError> {
    HandicapCalculator::default().course_handicap(handicap_index, slope_rating, course_rating, par)
}

/// Spread `course_handicap` strokes over the holes of a round.
///
/// Positive handicaps give one stroke per hole, hardest hole first, in full
/// passes until exhausted. Negative handicaps take strokes back starting
/// from the easiest hole. Without a stroke index, hole order stands in for
/// difficulty. The result always sums to `course_handicap`.
pub fn distribute_handicap_strokes(
    course_handicap: i32,
    stroke_index: Option<&StrokeIndex>,
) -> [i32; HOLES_PER_ROUND] {
    let order = match stroke_index {
        Some(index) => index.holes_by_difficulty(),
        None => std::array::from_fn(|hole| hole),
    };

    let holes = HOLES_PER_ROUND as u32;
    let magnitude = course_handicap.unsigned_abs();
    let full_passes = (magnitude / holes) as i32;
    let remainder = (magnitude % holes) as usize;
    let sign = course_handicap.signum();

    let mut strokes = [sign * full_passes; HOLES_PER_ROUND];
    if course_handicap >= 0 {
        for &hole in order.iter().take(remainder) {
            strokes[hole] += 1;
        }
    } else {
        for &hole in order.iter().rev().take(remainder) {
            strokes[hole] -= 1;
        }
    }
    strokes
}

/// Per-hole `gross − strokes`; unplayed (`0`) and abandoned (`-1`) holes
/// pass through untouched.
pub fn calculate_net_scores(gross: &[i32], strokes: &[i32]) -> Result<Vec<i32>, ScoringError> {
    if gross.len() != strokes.len() {
        return Err(ScoringError::LengthMismatch {
            gross: gross.len(),
            strokes: strokes.len(),
        });
    }
    Ok(gross
        .iter()
        .zip(strokes)
        .map(|(&g, &s)| match g {
            HoleScores::NOT_PLAYED | HoleScores::ABANDONED => g,
            _ => g.saturating_sub(s),
        })
        .collect())
}

pub fn calculate_net_total(gross_total: i32, course_handicap: i32) -> i32 {
    gross_total.saturating_sub(course_handicap)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
