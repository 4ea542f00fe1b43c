//! Scoring engine: handicaps, leaderboards, team results and tour standings.

pub mod handicap;
pub mod leaderboard;
pub mod points;
pub mod standings;
pub mod team;

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::storage::ScoringSource;
use crate::types::{
    LeaderboardResponse, ScoringError, StandingsScoring, TeamLeaderboardEntry, TourStandings,
};
use handicap::HandicapCalculator;
use leaderboard::LeaderboardBuilder;
use standings::{StandingsAggregator, StandingsRequest};

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Resolves records through a [`ScoringSource`] and runs the pure
/// computations over them.
///
/// Holds no mutable state; one instance can serve any number of concurrent
/// requests as long as the source can.
pub struct ScoringEngine<S> {
    source: S,
    builder: LeaderboardBuilder,
}

impl<S: ScoringSource> ScoringEngine<S> {
    pub fn new(source: S, handicap: HandicapCalculator) -> Self {
        Self {
            source,
            builder: LeaderboardBuilder::new(handicap),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Individual leaderboard for one competition.
    pub fn leaderboard(&self, competition_id: i64) -> Result<LeaderboardResponse, ScoringError> {
        let competition = self
            .source
            .competition(competition_id)
            .map_err(storage_error)?
            .ok_or(ScoringError::CompetitionNotFound { id: competition_id })?;
        self.builder.build(&competition)
    }

    /// Team leaderboard for one competition.
    ///
    /// Points scale with the series field when the competition belongs to a
    /// series, otherwise with the teams present.
    pub fn team_leaderboard(
        &self,
        competition_id: i64,
    ) -> Result<Vec<TeamLeaderboardEntry>, ScoringError> {
        let competition = self
            .source
            .competition(competition_id)
            .map_err(storage_error)?
            .ok_or(ScoringError::CompetitionNotFound { id: competition_id })?;
        let board = self.builder.build(&competition)?;

        let number_of_teams = match competition.series_id {
            Some(series_id) => self
                .source
                .series_team_count(series_id)
                .map_err(storage_error)?,
            None => board
                .entries
                .iter()
                .map(|e| e.participant.team_id)
                .collect::<BTreeSet<_>>()
                .len(),
        };

        info!(
            competition_id,
            series_id = ?competition.series_id,
            number_of_teams,
            "Aggregating team leaderboard"
        );

        Ok(team::aggregate_teams(
            &board.entries,
            number_of_teams,
            competition.points_multiplier,
        ))
    }

    /// Standings across every competition of a tour.
    pub fn tour_standings(
        &self,
        tour_id: i64,
        category_id: Option<i64>,
        scoring: Option<StandingsScoring>,
        as_of: NaiveDate,
    ) -> Result<TourStandings, ScoringError> {
        let tour = self
            .source
            .tour(tour_id)
            .map_err(storage_error)?
            .ok_or(ScoringError::TourNotFound { id: tour_id })?;
        let competitions = self
            .source
            .tour_competitions(tour_id)
            .map_err(storage_error)?;
        let enrollment_count = self
            .source
            .active_enrollment_count(tour_id)
            .map_err(storage_error)?;

        StandingsAggregator::new(&self.builder).aggregate(&StandingsRequest {
            tour: &tour,
            competitions: &competitions,
            category_id,
            scoring,
            enrollment_count,
            as_of,
        })
    }
}

fn storage_error(err: anyhow::Error) -> ScoringError {
    warn!(error = %err, "Scoring source lookup failed");
    ScoringError::Storage(format!("{err:#}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
