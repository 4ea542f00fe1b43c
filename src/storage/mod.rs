//! Data access.
//!
//! The engine reads competitions, tours and enrollment counts through
//! [`ScoringSource`]. [`SnapshotStore`] serves them from a JSON snapshot
//! exported by the main database, which is enough for read-only scoring.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{Competition, Tour};

/// Read-only lookups the scoring engine needs.
#[cfg_attr(test, mockall::automock)]
pub trait ScoringSource {
    fn competition(&self, id: i64) -> Result<Option<Competition>>;
    fn tour(&self, id: i64) -> Result<Option<Tour>>;
    fn tour_competitions(&self, tour_id: i64) -> Result<Vec<Competition>>;
    /// Distinct teams entered across a series' competitions.
    fn series_team_count(&self, series_id: i64) -> Result<usize>;
    fn active_enrollment_count(&self, tour_id: i64) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Requested,
    Approved,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub tour_id: i64,
    pub player_id: Option<i64>,
    pub email: Option<String>,
    pub status: EnrollmentStatus,
}

/// Everything exported from the database in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tours: Vec<Tour>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

/// In-memory [`ScoringSource`] over a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: Snapshot,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(load_snapshot(path)?))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Competitions carry the scoring mode of their tour unless they set one.
    fn with_tour_mode(&self, mut competition: Competition) -> Competition {
        if competition.scoring_mode.is_none() {
            competition.scoring_mode = competition
                .tour_id
                .and_then(|id| self.snapshot.tours.iter().find(|t| t.id == id))
                .and_then(|t| t.scoring_mode);
        }
        competition
    }
}

impl ScoringSource for SnapshotStore {
    fn competition(&self, id: i64) -> Result<Option<Competition>> {
        Ok(self
            .snapshot
            .competitions
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|c| self.with_tour_mode(c)))
    }

    fn tour(&self, id: i64) -> Result<Option<Tour>> {
        Ok(self.snapshot.tours.iter().find(|t| t.id == id).cloned())
    }

    fn tour_competitions(&self, tour_id: i64) -> Result<Vec<Competition>> {
        let mut competitions: Vec<Competition> = self
            .snapshot
            .competitions
            .iter()
            .filter(|c| c.tour_id == Some(tour_id))
            .cloned()
            .map(|c| self.with_tour_mode(c))
            .collect();
        competitions.sort_by_key(|c| (c.date, c.id));
        Ok(competitions)
    }

    fn series_team_count(&self, series_id: i64) -> Result<usize> {
        let teams: BTreeSet<i64> = self
            .snapshot
            .competitions
            .iter()
            .filter(|c| c.series_id == Some(series_id))
            .flat_map(|c| c.participants.iter().map(|p| p.team_id))
            .collect();
        Ok(teams.len())
    }

    fn active_enrollment_count(&self, tour_id: i64) -> Result<usize> {
        Ok(self
            .snapshot
            .enrollments
            .iter()
            .filter(|e| e.tour_id == tour_id && e.status == EnrollmentStatus::Active)
            .count())
    }
}

/// Save a snapshot as pretty-printed JSON.
pub fn save_snapshot(snapshot: &Snapshot, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialise snapshot")?;

    std::fs::write(path, &json).context(format!("Failed to write snapshot to {path}"))?;

    debug!(path, competitions = snapshot.competitions.len(), "Snapshot saved");
    Ok(())
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &str) -> Result<Snapshot> {
    if !Path::new(path).exists() {
        anyhow::bail!("Snapshot file not found: {path}");
    }

    let json =
        std::fs::read_to_string(path).context(format!("Failed to read snapshot from {path}"))?;

    let snapshot: Snapshot =
        serde_json::from_str(&json).context(format!("Failed to parse snapshot from {path}"))?;

    info!(
        path,
        tours = snapshot.tours.len(),
        competitions = snapshot.competitions.len(),
        enrollments = snapshot.enrollments.len(),
        "Snapshot loaded"
    );

    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
