//! Per-run hydration counters

use serde::{Deserialize, Serialize};

use super::task::TaskOutcome;
use crate::error::HydrateError;
use crate::schedule::QueueOutcome;

/// Why a feed group was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbandonReason {
    /// Network error or non-OK status
    Transport,
    EmptyFeed,
    WorkerUnavailable,
    WorkerTimeout,
    /// Worker replied `ok: false` or went away
    WorkerFailed,
}

impl From<&HydrateError> for AbandonReason {
    fn from(error: &HydrateError) -> Self {
        match error {
            HydrateError::Fetch(_) | HydrateError::HttpStatus(_) => AbandonReason::Transport,
            HydrateError::EmptyFeed => AbandonReason::EmptyFeed,
            HydrateError::WorkerUnavailable(_) => AbandonReason::WorkerUnavailable,
            HydrateError::WorkerTimeout(_) => AbandonReason::WorkerTimeout,
            HydrateError::WorkerFailed(_)
            | HydrateError::WorkerClosed
            | HydrateError::Dom(_)
            | HydrateError::Task(_) => AbandonReason::WorkerFailed,
        }
    }
}

/// Result of one feed group
#[derive(Debug)]
pub enum GroupOutcome {
    Abandoned { src: String, reason: AbandonReason },
    Hydrated { src: String, queue: QueueOutcome<TaskOutcome> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationReport {
    pub cards_scanned: usize,
    pub groups: usize,
    pub groups_hydrated: usize,
    /// Abandoned groups as (feed URL, reason)
    pub abandoned: Vec<(String, AbandonReason)>,
    pub tasks_run: usize,
    pub tasks_failed: usize,
    pub cards_updated: usize,
    pub records_not_found: usize,
    pub frames: usize,
}

impl HydrationReport {
    pub fn absorb(&mut self, outcome: GroupOutcome) {
        match outcome {
            GroupOutcome::Abandoned { src, reason } => self.abandoned.push((src, reason)),
            GroupOutcome::Hydrated { queue, .. } => {
                self.groups_hydrated += 1;
                self.tasks_run += queue.stats.ran;
                self.tasks_failed += queue.stats.failed;
                self.frames += queue.stats.frames;
                for result in queue.results {
                    match result {
                        TaskOutcome::Updated(_) => self.cards_updated += 1,
                        TaskOutcome::RecordNotFound => self.records_not_found += 1,
                        TaskOutcome::MissingSku => {}
                    }
                }
            }
        }
    }
}
