//! Team results for a single competition.
//!
//! Groups individual leaderboard entries by team, classifies each team's
//! progress, orders the teams and awards series points.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use tracing::{debug, info};

use super::points::default_position_points;
use crate::types::{LeaderboardEntry, TeamLeaderboardEntry, TeamStatus};

/// Working totals for one team.
#[derive(Debug, Clone)]
struct TeamTally<'a> {
    team_id: i64,
    team_name: String,
    members: Vec<&'a LeaderboardEntry>,
}

/// A team's aggregate before points are assigned.
#[derive(Debug, Clone)]
struct TeamResult {
    team_id: i64,
    team_name: String,
    status: TeamStatus,
    start_time: Option<NaiveTime>,
    total_shots: Option<i32>,
    total_relative_score: Option<i32>,
    max_holes_completed: u32,
    /// Valid members' relative-to-par, ascending.
    member_scores: Vec<i32>,
}

impl TeamTally<'_> {
    fn summarize(self) -> TeamResult {
        let started: Vec<_> = self.members.iter().filter(|m| m.has_started()).collect();
        let valid: Vec<_> = started
            .iter()
            .filter(|m| !m.participant.has_invalid_hole())
            .collect();

        let status = if started.is_empty() {
            TeamStatus::NotStarted
        } else if self
            .members
            .iter()
            .all(|m| m.participant.is_locked && m.participant.has_valid_round())
        {
            TeamStatus::Finished
        } else {
            TeamStatus::InProgress
        };

        let (total_shots, total_relative_score) = if started.is_empty() {
            (None, None)
        } else {
            (
                Some(valid.iter().map(|m| m.total_shots).sum::<i32>()),
                Some(valid.iter().map(|m| m.relative_to_par).sum::<i32>()),
            )
        };

        let mut member_scores: Vec<i32> = valid.iter().map(|m| m.relative_to_par).collect();
        member_scores.sort_unstable();

        TeamResult {
            team_id: self.team_id,
            team_name: self.team_name,
            status,
            start_time: self.members.iter().filter_map(|m| m.start_time).min(),
            total_shots,
            total_relative_score,
            max_holes_completed: started.iter().map(|m| m.holes_played).max().unwrap_or(0),
            member_scores,
        }
    }
}

impl TeamResult {
    fn display_progress(&self) -> String {
        match self.status {
            TeamStatus::NotStarted => match self.start_time {
                Some(time) => format!("Starts {}", time.format("%H:%M")),
                None => "Starts TBD".to_string(),
            },
            TeamStatus::Finished => "F".to_string(),
            TeamStatus::InProgress => format!("Thru {}", self.max_holes_completed),
        }
    }
}

/// Status first; teams yet to start keep their incoming order. Started
/// teams go by total, then member by member from each team's best score.
fn compare_teams(a: &TeamResult, b: &TeamResult) -> Ordering {
    a.status.cmp(&b.status).then_with(|| {
        if a.status == TeamStatus::NotStarted {
            return Ordering::Equal;
        }
        a.total_relative_score
            .cmp(&b.total_relative_score)
            .then_with(|| compare_member_scores(&a.member_scores, &b.member_scores))
    })
}

/// First differing member score decides; a team with more valid scores
/// wins once the other runs out.
fn compare_member_scores(a: &[i32], b: &[i32]) -> Ordering {
    for i in 0..a.len().max(b.len()) {
        match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) if x != y => return x.cmp(y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Aggregate one competition's entries into ranked team results.
///
/// `number_of_teams` is the size of the series field and scales the points
/// scale; `points_multiplier` comes from the competition record. Positions
/// follow array order after sorting, so teams level on total still receive
/// different points.
pub fn aggregate_teams(
    entries: &[LeaderboardEntry],
    number_of_teams: usize,
    points_multiplier: Decimal,
) -> Vec<TeamLeaderboardEntry> {
    let mut tallies: Vec<TeamTally<'_>> = Vec::new();
    for entry in entries {
        let team_id = entry.participant.team_id;
        match tallies.iter_mut().find(|t| t.team_id == team_id) {
            Some(tally) => tally.members.push(entry),
            None => tallies.push(TeamTally {
                team_id,
                team_name: entry.participant.team_name.clone(),
                members: vec![entry],
            }),
        }
    }

    let mut teams: Vec<TeamResult> = tallies.into_iter().map(TeamTally::summarize).collect();
    teams.sort_by(compare_teams);

    let results: Vec<TeamLeaderboardEntry> = teams
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let team_points = (team.status != TeamStatus::NotStarted).then(|| {
                default_position_points(idx as u32 + 1, number_of_teams) * points_multiplier
            });
            debug!(
                team_id = team.team_id,
                status = %team.status,
                total = ?team.total_relative_score,
                points = ?team_points,
                "Team ranked"
            );
            TeamLeaderboardEntry {
                team_id: team.team_id,
                team_name: team.team_name.clone(),
                status: team.status,
                start_time: team.start_time,
                display_progress: team.display_progress(),
                total_relative_score: team.total_relative_score,
                total_shots: team.total_shots,
                team_points,
            }
        })
        .collect();

    info!(
        teams = results.len(),
        number_of_teams,
        %points_multiplier,
        "Team leaderboard aggregated"
    );

    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
