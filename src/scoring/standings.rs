//! Cross-competition tour standings.
//!
//! Builds every competition's leaderboard, ranks the finished rounds,
//! converts positions to points and accumulates them per player.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::leaderboard::LeaderboardBuilder;
use super::points::{shared_positions, PointsRule};
use crate::types::{
    Competition, CompetitionResult, LeaderboardEntry, PlayerStanding, ScoringError, ScoringMode,
    StandingsScoring, Tour, TourStandings, TourSummary,
};

/// Everything one standings computation reads.
#[derive(Debug, Clone)]
pub struct StandingsRequest<'a> {
    pub tour: &'a Tour,
    pub competitions: &'a [Competition],
    pub category_id: Option<i64>,
    pub scoring: Option<StandingsScoring>,
    /// Active tour enrollments; scales the built-in points scale.
    pub enrollment_count: usize,
    /// Competitions dated before this day count even with no finished round.
    pub as_of: NaiveDate,
}

/// One player's finish in one competition, before accumulation.
#[derive(Debug, Clone)]
struct RankedFinish {
    player_id: i64,
    player_name: String,
    result: CompetitionResult,
}

pub struct StandingsAggregator<'b> {
    builder: &'b LeaderboardBuilder,
}

impl<'b> StandingsAggregator<'b> {
    pub fn new(builder: &'b LeaderboardBuilder) -> Self {
        Self { builder }
    }

    pub fn aggregate(&self, request: &StandingsRequest<'_>) -> Result<TourStandings, ScoringError> {
        let scoring = request.scoring.unwrap_or(match request.tour.scoring_mode {
            Some(ScoringMode::Net) => StandingsScoring::Net,
            _ => StandingsScoring::Gross,
        });
        let rule = match &request.tour.point_template {
            Some(template) => PointsRule::Template(template),
            None => PointsRule::Scaled {
                field_size: request.enrollment_count,
            },
        };

        let mut finishes: Vec<RankedFinish> = Vec::new();
        let mut counted = 0usize;
        for competition in request.competitions {
            let mode = match scoring {
                StandingsScoring::Net => ScoringMode::Net,
                StandingsScoring::Gross => competition.scoring_mode.unwrap_or_default(),
            };
            let any_finished = competition.participants.iter().any(|p| p.is_finished());
            if competition.date >= request.as_of && !any_finished {
                debug!(
                    competition_id = competition.id,
                    date = %competition.date,
                    "Competition not yet counted"
                );
                continue;
            }
            let board = self.builder.build_with_mode(competition, mode)?;
            counted += 1;

            let ranked = rank_finishers(&board.entries, request.category_id, scoring);
            let positions = shared_positions(&ranked, |(_, score)| *score);
            finishes.extend(ranked.iter().zip(positions).map(|((entry, _), position)| {
                RankedFinish {
                    player_id: entry.participant.player_id.unwrap_or_default(),
                    player_name: entry.participant.display_name().to_string(),
                    result: CompetitionResult {
                        competition_id: competition.id,
                        competition_name: competition.name.clone(),
                        competition_date: competition.date,
                        points: rule.points_for(position),
                        position,
                        relative_to_par: entry.relative_to_par,
                        net_total_shots: entry.net_total_shots,
                        net_relative_to_par: entry.net_relative_to_par,
                    },
                }
            }));
        }

        let player_standings = rank_players(accumulate(finishes));

        info!(
            tour_id = request.tour.id,
            competitions = counted,
            players = player_standings.len(),
            scoring = %scoring,
            "Tour standings computed"
        );

        Ok(TourStandings {
            tour: TourSummary {
                id: request.tour.id,
                name: request.tour.name.clone(),
            },
            player_standings,
            total_competitions: counted,
            scoring_mode: scoring,
            point_template: request.tour.point_template.clone(),
        })
    }
}

/// Finished rounds with a linked player, best score first, ties by name.
/// Net rankings leave out entries without a net figure.
fn rank_finishers(
    entries: &[LeaderboardEntry],
    category_id: Option<i64>,
    scoring: StandingsScoring,
) -> Vec<(&LeaderboardEntry, i32)> {
    let mut ranked: Vec<(&LeaderboardEntry, i32)> = entries
        .iter()
        .filter(|e| e.participant.is_finished() && e.participant.player_id.is_some())
        .filter(|e| category_id.map_or(true, |c| e.participant.category_id == Some(c)))
        .filter_map(|e| {
            let score = match scoring {
                StandingsScoring::Gross => Some(e.relative_to_par),
                StandingsScoring::Net => e.net_relative_to_par,
            };
            score.map(|s| (e, s))
        })
        .collect();
    ranked.sort_by(|(a, sa), (b, sb)| {
        sa.cmp(sb)
            .then_with(|| a.participant.display_name().cmp(b.participant.display_name()))
    });
    ranked
}

/// Fold per-competition finishes into one record per player.
fn accumulate(finishes: Vec<RankedFinish>) -> Vec<PlayerStanding> {
    let grouped = finishes.into_iter().fold(
        BTreeMap::<i64, (String, Vec<CompetitionResult>)>::new(),
        |mut acc, finish| {
            acc.entry(finish.player_id)
                .or_insert_with(|| (finish.player_name, Vec::new()))
                .1
                .push(finish.result);
            acc
        },
    );

    grouped
        .into_iter()
        .map(|(player_id, (player_name, competitions))| PlayerStanding {
            player_id,
            player_name,
            position: 0,
            total_points: competitions.iter().map(|c| c.points).sum::<Decimal>(),
            competitions_played: competitions.len() as u32,
            competitions,
        })
        .collect()
}

/// Most points first, then most competitions, then name. Players level on
/// points and competitions share a position.
fn rank_players(mut standings: Vec<PlayerStanding>) -> Vec<PlayerStanding> {
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.competitions_played.cmp(&a.competitions_played))
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    let positions = shared_positions(&standings, |s| (s.total_points, s.competitions_played));
    standings
        .into_iter()
        .zip(positions)
        .map(|(standing, position)| PlayerStanding { position, ..standing })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
