//! Shared types for the scoring engine.
//!
//! Input snapshots (competitions, participants, tees, tours) arrive fully
//! materialized from the storage collaborator; output shapes are rendered
//! directly by the admin UI, so their field names are part of the contract.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::scoring::handicap::StrokeIndex;

/// Holes in a regulation round.
pub const HOLES_PER_ROUND: usize = 18;

// ---------------------------------------------------------------------------
// Hole scores & pars
// ---------------------------------------------------------------------------

/// Raw strokes for one round, one slot per hole.
///
/// `0` marks a hole not yet played and `-1` a hole abandoned or invalid.
/// Anything positive is strokes taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct HoleScores([i32; HOLES_PER_ROUND]);

impl HoleScores {
    pub const NOT_PLAYED: i32 = 0;
    pub const ABANDONED: i32 = -1;

    pub fn new(scores: [i32; HOLES_PER_ROUND]) -> Result<Self, ScoringError> {
        if let Some((hole, value)) = scores
            .iter()
            .enumerate()
            .find(|&(_, &s)| s < Self::ABANDONED)
        {
            return Err(ScoringError::InvalidHoleScores(format!(
                "hole {} has score {value}",
                hole + 1
            )));
        }
        Ok(Self(scores))
    }

    pub fn as_array(&self) -> &[i32; HOLES_PER_ROUND] {
        &self.0
    }

    /// Holes with a recorded result. Abandoned holes count as played so
    /// progress displays advance past them.
    pub fn holes_played(&self) -> u32 {
        self.0
            .iter()
            .filter(|&&s| s > 0 || s == Self::ABANDONED)
            .count() as u32
    }

    /// Sum of positive hole scores.
    pub fn total_shots(&self) -> i32 {
        self.0.iter().filter(|&&s| s > 0).sum()
    }

    pub fn has_invalid_hole(&self) -> bool {
        self.0.contains(&Self::ABANDONED)
    }

    /// All 18 holes played with no abandoned hole.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|&s| s > 0)
    }

    /// Sum of `score - par` over holes with a positive score.
    pub fn relative_to_par(&self, pars: &CoursePars) -> i32 {
        self.0
            .iter()
            .zip(pars.as_array())
            .filter(|&(&s, _)| s > 0)
            .map(|(s, p)| s - p)
            .sum()
    }
}

impl TryFrom<Vec<i32>> for HoleScores {
    type Error = ScoringError;

    fn try_from(raw: Vec<i32>) -> Result<Self, Self::Error> {
        let scores: [i32; HOLES_PER_ROUND] = raw.as_slice().try_into().map_err(|_| {
            ScoringError::InvalidHoleScores(format!(
                "expected {HOLES_PER_ROUND} hole scores, found {}",
                raw.len()
            ))
        })?;
        Self::new(scores)
    }
}

impl From<HoleScores> for Vec<i32> {
    fn from(scores: HoleScores) -> Self {
        scores.0.to_vec()
    }
}

/// Par for every hole of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoursePars([i32; HOLES_PER_ROUND]);

impl CoursePars {
    /// Validate raw pars from a competition record.
    pub fn from_raw(raw: Option<&[i32]>) -> Result<Self, ScoringError> {
        let raw = match raw {
            Some(pars) if !pars.is_empty() => pars,
            _ => return Err(ScoringError::MissingPars),
        };
        let pars: [i32; HOLES_PER_ROUND] =
            raw.try_into().map_err(|_| ScoringError::ParsLength {
                expected: HOLES_PER_ROUND,
                found: raw.len(),
            })?;
        Ok(Self(pars))
    }

    pub fn as_array(&self) -> &[i32; HOLES_PER_ROUND] {
        &self.0
    }

    pub fn total(&self) -> i32 {
        self.0.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which figures a competition reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Gross,
    Net,
    Both,
}

impl ScoringMode {
    pub fn includes_net(&self) -> bool {
        !matches!(self, ScoringMode::Gross)
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Gross => write!(f, "gross"),
            ScoringMode::Net => write!(f, "net"),
            ScoringMode::Both => write!(f, "both"),
        }
    }
}

/// Ranking basis for tour standings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandingsScoring {
    #[default]
    Gross,
    Net,
}

impl fmt::Display for StandingsScoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandingsScoring::Gross => write!(f, "gross"),
            StandingsScoring::Net => write!(f, "net"),
        }
    }
}

impl std::str::FromStr for StandingsScoring {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gross" => Ok(StandingsScoring::Gross),
            "net" => Ok(StandingsScoring::Net),
            _ => Err(ScoringError::InvalidScoringType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Team progress through a competition. Declaration order is sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamStatus {
    Finished,
    InProgress,
    NotStarted,
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamStatus::Finished => write!(f, "FINISHED"),
            TeamStatus::InProgress => write!(f, "IN_PROGRESS"),
            TeamStatus::NotStarted => write!(f, "NOT_STARTED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Course & tee data
// ---------------------------------------------------------------------------

/// Course rating / slope rating pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub course_rating: Decimal,
    pub slope_rating: u32,
}

/// A set of tee markers with its ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tee {
    pub id: i64,
    pub name: String,
    pub course_rating: Decimal,
    pub slope_rating: u32,
    #[serde(default)]
    pub stroke_index: Option<StrokeIndex>,
    /// Separate ratings for women playing from this tee, when rated.
    #[serde(default)]
    pub women: Option<Rating>,
}

impl Tee {
    pub fn rating_for(&self, gender: Option<Gender>) -> Rating {
        match (gender, self.women) {
            (Some(Gender::Female), Some(women)) => women,
            _ => Rating {
                course_rating: self.course_rating,
                slope_rating: self.slope_rating,
            },
        }
    }
}

/// Tee pinned to a tour category, overriding the competition's tee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTee {
    pub category_id: i64,
    pub tee: Tee,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourCategory {
    pub id: i64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Competition snapshot
// ---------------------------------------------------------------------------

/// One participant row of a competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub score: Option<HoleScores>,
    pub manual_score_total: Option<i32>,
    #[serde(default)]
    pub is_locked: bool,
    pub start_time: Option<NaiveTime>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub handicap_index: Option<Decimal>,
    /// Tour-specific override of the handicap index.
    pub playing_handicap: Option<Decimal>,
    pub gender: Option<Gender>,
}

impl Participant {
    pub fn effective_handicap_index(&self) -> Option<Decimal> {
        self.playing_handicap.or(self.handicap_index)
    }

    pub fn display_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or(&self.team_name)
    }

    pub fn has_invalid_hole(&self) -> bool {
        self.manual_score_total.is_none()
            && self.score.is_some_and(|s| s.has_invalid_hole())
    }

    /// A full round with no abandoned hole, or a manual total.
    pub fn has_valid_round(&self) -> bool {
        self.manual_score_total.is_some() || self.score.is_some_and(|s| s.is_complete())
    }

    /// Counts towards tour standings: a locked valid round or a manual total.
    pub fn is_finished(&self) -> bool {
        self.manual_score_total.is_some()
            || (self.is_locked && self.score.is_some_and(|s| s.is_complete()))
    }
}

fn default_points_multiplier() -> Decimal {
    dec!(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub tour_id: Option<i64>,
    pub series_id: Option<i64>,
    #[serde(default = "default_points_multiplier")]
    pub points_multiplier: Decimal,
    /// Raw pars as stored; validated when a leaderboard is built.
    pub pars: Option<Vec<i32>>,
    pub tee: Option<Tee>,
    /// Scoring mode of the owning tour.
    pub scoring_mode: Option<ScoringMode>,
    #[serde(default)]
    pub category_tees: Vec<CategoryTee>,
    #[serde(default)]
    pub categories: Vec<TourCategory>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

// ---------------------------------------------------------------------------
// Tours
// ---------------------------------------------------------------------------

/// Tour-configurable mapping from finishing position to points.
///
/// Keys are positions as strings (`"1"`, `"2"`, ...) plus a `"default"`
/// fallback for positions beyond the explicit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTemplate {
    pub id: i64,
    pub name: String,
    pub points_structure: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    pub name: String,
    pub scoring_mode: Option<ScoringMode>,
    pub point_template: Option<PointTemplate>,
    #[serde(default)]
    pub categories: Vec<TourCategory>,
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// One participant's result in one competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub participant: Participant,
    pub total_shots: i32,
    pub holes_played: u32,
    pub relative_to_par: i32,
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_total_shots: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_relative_to_par: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_handicap: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handicap_strokes_per_hole: Option<Vec<i32>>,
}

impl LeaderboardEntry {
    pub fn has_started(&self) -> bool {
        self.holes_played > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub competition_id: i64,
    pub scoring_mode: Option<ScoringMode>,
    pub tee: Option<Tee>,
    pub category_tees: Vec<CategoryTee>,
    pub categories: Vec<TourCategory>,
    /// Stroke index behind net figures, reported whenever net scoring is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_index: Option<StrokeIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeaderboardEntry {
    pub team_id: i64,
    pub team_name: String,
    pub status: TeamStatus,
    pub start_time: Option<NaiveTime>,
    pub display_progress: String,
    pub total_relative_score: Option<i32>,
    pub total_shots: Option<i32>,
    pub team_points: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Tour standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourSummary {
    pub id: i64,
    pub name: String,
}

/// How one player fared in one competition of a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub competition_id: i64,
    pub competition_name: String,
    pub competition_date: NaiveDate,
    pub points: Decimal,
    pub position: u32,
    pub relative_to_par: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_total_shots: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_relative_to_par: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub player_id: i64,
    pub player_name: String,
    pub position: u32,
    pub total_points: Decimal,
    pub competitions_played: u32,
    pub competitions: Vec<CompetitionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStandings {
    pub tour: TourSummary,
    pub player_standings: Vec<PlayerStanding>,
    pub total_competitions: usize,
    pub scoring_mode: StandingsScoring,
    pub point_template: Option<PointTemplate>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Broad error classes, used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedInput,
    DomainValidation,
    Storage,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Competition not found")]
    CompetitionNotFound { id: i64 },

    #[error("Tour not found")]
    TourNotFound { id: i64 },

    #[error("Invalid course pars data structure, no pars found")]
    MissingPars,

    #[error("Invalid course pars data structure: expected {expected} pars, found {found}")]
    ParsLength { expected: usize, found: usize },

    #[error("Invalid hole scores: {0}")]
    InvalidHoleScores(String),

    #[error("Invalid stroke index: {0}")]
    InvalidStrokeIndex(String),

    #[error("Length mismatch: {gross} gross scores but {strokes} stroke allocations")]
    LengthMismatch { gross: usize, strokes: usize },

    #[error("Invalid scoring type: {0}")]
    InvalidScoringType(String),

    #[error("Handicap index {index} outside allowed range {min} to {max}")]
    HandicapOutOfRange {
        index: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Course handicap for index {index} is out of range")]
    CourseHandicapOverflow { index: Decimal },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::CompetitionNotFound { .. } | ScoringError::TourNotFound { .. } => {
                ErrorKind::NotFound
            }
            ScoringError::MissingPars
            | ScoringError::ParsLength { .. }
            | ScoringError::InvalidHoleScores(_)
            | ScoringError::InvalidStrokeIndex(_)
            | ScoringError::LengthMismatch { .. }
            | ScoringError::InvalidScoringType(_) => ErrorKind::MalformedInput,
            ScoringError::HandicapOutOfRange { .. }
            | ScoringError::CourseHandicapOverflow { .. } => ErrorKind::DomainValidation,
            ScoringError::Storage(_) => ErrorKind::Storage,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
