//! Per-competition leaderboard assembly.
//!
//! Turns each participant's raw hole scores (or manual total) into gross
//! figures, and into net figures when the competition scores net and the
//! player's handicap index is known.

use tracing::{debug, info};

use super::handicap::{
    calculate_net_scores, calculate_net_total, default_stroke_index,
    distribute_handicap_strokes, HandicapCalculator, StrokeIndex,
};
use crate::types::{
    Competition, CoursePars, LeaderboardEntry, LeaderboardResponse, Participant, Rating,
    ScoringError, ScoringMode, Tee, HOLES_PER_ROUND,
};

/// Ratings and stroke index a participant's net figures are computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveTee {
    pub rating: Rating,
    pub stroke_index: Option<StrokeIndex>,
}

pub struct LeaderboardBuilder {
    handicap: HandicapCalculator,
}

impl LeaderboardBuilder {
    pub fn new(handicap: HandicapCalculator) -> Self {
        Self { handicap }
    }

    pub fn handicap(&self) -> &HandicapCalculator {
        &self.handicap
    }

    /// Build the leaderboard using the competition's own scoring mode.
    pub fn build(&self, competition: &Competition) -> Result<LeaderboardResponse, ScoringError> {
        self.build_with_mode(competition, competition.scoring_mode.unwrap_or_default())
    }

    /// Build the leaderboard with an explicit scoring mode.
    ///
    /// Entries are always ordered by gross relative-to-par; the sort is
    /// stable so equal scores keep participant order.
    pub fn build_with_mode(
        &self,
        competition: &Competition,
        mode: ScoringMode,
    ) -> Result<LeaderboardResponse, ScoringError> {
        let pars = CoursePars::from_raw(competition.pars.as_deref())?;

        let mut entries = competition
            .participants
            .iter()
            .map(|p| self.entry_for(competition, p, &pars, mode))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.relative_to_par);

        let stroke_index = if mode.includes_net() {
            Some(
                competition
                    .tee
                    .as_ref()
                    .and_then(|t| t.stroke_index)
                    .unwrap_or_else(default_stroke_index),
            )
        } else {
            None
        };

        info!(
            competition_id = competition.id,
            entries = entries.len(),
            scoring_mode = %mode,
            total_par = pars.total(),
            "Leaderboard built"
        );

        Ok(LeaderboardResponse {
            entries,
            competition_id: competition.id,
            scoring_mode: competition.scoring_mode,
            tee: competition.tee.clone(),
            category_tees: competition.category_tees.clone(),
            categories: competition.categories.clone(),
            stroke_index,
        })
    }

    /// Category tee, then competition tee, then configured defaults.
    ///
    /// Only a participant with no tee at all falls back to the reference
    /// stroke index; a rated tee without one keeps hole order.
    pub fn effective_tee(&self, competition: &Competition, participant: &Participant) -> EffectiveTee {
        match resolve_tee(competition, participant) {
            Some(tee) => EffectiveTee {
                rating: tee.rating_for(participant.gender),
                stroke_index: tee.stroke_index,
            },
            None => EffectiveTee {
                rating: Rating {
                    course_rating: self.handicap.config().default_course_rating,
                    slope_rating: self.handicap.config().slope_reference,
                },
                stroke_index: Some(default_stroke_index()),
            },
        }
    }

    fn entry_for(
        &self,
        competition: &Competition,
        participant: &Participant,
        pars: &CoursePars,
        mode: ScoringMode,
    ) -> Result<LeaderboardEntry, ScoringError> {
        let (total_shots, holes_played, relative_to_par) =
            match (participant.manual_score_total, participant.score.as_ref()) {
                (Some(manual), _) => (
                    manual,
                    HOLES_PER_ROUND as u32,
                    manual.saturating_sub(pars.total()),
                ),
                (None, Some(scores)) => (
                    scores.total_shots(),
                    scores.holes_played(),
                    scores.relative_to_par(pars),
                ),
                (None, None) => (0, 0, 0),
            };

        let mut entry = LeaderboardEntry {
            participant: participant.clone(),
            total_shots,
            holes_played,
            relative_to_par,
            start_time: participant.start_time,
            net_total_shots: None,
            net_relative_to_par: None,
            course_handicap: None,
            handicap_strokes_per_hole: None,
        };

        let index = match participant.effective_handicap_index() {
            Some(index) if mode.includes_net() => index,
            _ => return Ok(entry),
        };
        self.handicap.validate_index(index)?;

        let tee = self.effective_tee(competition, participant);
        let course_handicap = self.handicap.course_handicap(
            index,
            tee.rating.slope_rating,
            tee.rating.course_rating,
            pars.total(),
        )?;
        let strokes = distribute_handicap_strokes(course_handicap, tee.stroke_index.as_ref());
        entry.course_handicap = Some(course_handicap);
        entry.handicap_strokes_per_hole = Some(strokes.to_vec());

        match (participant.manual_score_total, participant.score.as_ref()) {
            (Some(manual), _) => {
                let net_total = calculate_net_total(manual, course_handicap);
                entry.net_total_shots = Some(net_total);
                entry.net_relative_to_par = Some(net_total.saturating_sub(pars.total()));
            }
            (None, Some(scores)) if holes_played > 0 => {
                if scores.is_complete() {
                    let net_total = calculate_net_total(total_shots, course_handicap);
                    entry.net_total_shots = Some(net_total);
                    entry.net_relative_to_par = Some(net_total.saturating_sub(pars.total()));
                } else {
                    let net = calculate_net_scores(scores.as_array(), &strokes)?;
                    let running: i32 = net
                        .iter()
                        .zip(scores.as_array())
                        .zip(pars.as_array())
                        .filter(|((_, gross), _)| **gross > 0)
                        .fold(0i32, |acc, ((n, _), par)| acc.saturating_add(n.saturating_sub(*par)));
                    entry.net_relative_to_par = Some(running);
                }
            }
            _ => {}
        }

        debug!(
            competition_id = competition.id,
            participant_id = participant.id,
            total_shots = entry.total_shots,
            holes_played = entry.holes_played,
            relative_to_par = entry.relative_to_par,
            course_handicap = ?entry.course_handicap,
            net_relative_to_par = ?entry.net_relative_to_par,
            "Leaderboard entry computed"
        );

        Ok(entry)
    }
}

fn resolve_tee<'c>(competition: &'c Competition, participant: &Participant) -> Option<&'c Tee> {
    participant
        .category_id
        .and_then(|category| {
            competition
                .category_tees
                .iter()
                .find(|ct| ct.category_id == category)
        })
        .map(|ct| &ct.tee)
        .or(competition.tee.as_ref())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
