//! Step tracker
//!
//! Owns the ordered step list of one run. Every transition validates the
//! move, stamps timestamps and returns a fresh snapshot for persistence;
//! callers never mutate steps directly.

use chrono::{DateTime, Utc};
use intervue_core::domain::step::{Step, StepStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("step index {0} is out of range")]
    OutOfRange(usize),

    #[error("no step named '{0}' in this run")]
    UnknownStep(String),

    #[error("step '{name}' cannot move from {from} to {to}")]
    InvalidTransition {
        name: String,
        from: StepStatus,
        to: StepStatus,
    },

    #[error("step '{requested}' cannot start while '{active}' is processing")]
    AlreadyProcessing { requested: String, active: String },
}

#[derive(Debug, Clone)]
pub struct StepTracker {
    steps: Vec<Step>,
}

impl StepTracker {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn snapshot(&self) -> Vec<Step> {
        self.steps.clone()
    }

    /// Index of the step currently processing
    pub fn current(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.status == StepStatus::Processing)
    }

    /// Moves a step to `status`
    ///
    /// Allowed: pending -> processing, processing -> complete|error, and
    /// pending -> complete|error for steps whose work ran inside a group.
    pub fn advance(
        &mut self,
        index: usize,
        status: StepStatus,
        message: Option<String>,
    ) -> Result<Vec<Step>, TrackerError> {
        self.advance_at(index, status, message, Utc::now())
    }

    /// Like [`advance`](Self::advance), stamped with `at` instead of the current time
    pub fn advance_at(
        &mut self,
        index: usize,
        status: StepStatus,
        message: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Vec<Step>, TrackerError> {
        let from = self.get(index)?.status;

        let allowed = matches!(
            (from, status),
            (StepStatus::Pending, StepStatus::Processing)
                | (StepStatus::Processing, StepStatus::Complete)
                | (StepStatus::Processing, StepStatus::Error)
                | (StepStatus::Pending, StepStatus::Complete)
                | (StepStatus::Pending, StepStatus::Error)
        );
        if !allowed {
            return Err(TrackerError::InvalidTransition {
                name: self.steps[index].name.clone(),
                from,
                to: status,
            });
        }

        if status == StepStatus::Processing
            && let Some(active) = self.current()
        {
            return Err(TrackerError::AlreadyProcessing {
                requested: self.steps[index].name.clone(),
                active: self.steps[active].name.clone(),
            });
        }

        let now = at;
        let step = &mut self.steps[index];
        step.status = status;
        if message.is_some() {
            step.message = message;
        }

        if status == StepStatus::Processing {
            step.started_at = Some(now);
        } else {
            let started = *step.started_at.get_or_insert(now);
            step.completed_at = Some(now);
            step.duration_ms = Some((now - started).num_milliseconds().max(0));
        }

        Ok(self.snapshot())
    }

    /// Settles a pending step whose work ran inside a group
    ///
    /// The step keeps the window its work actually ran in rather than the
    /// moment it was settled.
    pub fn settle(
        &mut self,
        index: usize,
        status: StepStatus,
        message: Option<String>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Vec<Step>, TrackerError> {
        let from = self.get(index)?.status;
        if from != StepStatus::Pending || !status.is_terminal() {
            return Err(TrackerError::InvalidTransition {
                name: self.steps[index].name.clone(),
                from,
                to: status,
            });
        }

        self.steps[index].started_at = Some(started_at);
        self.advance_at(index, status, message, completed_at.max(started_at))
    }

    /// Marks a pending or processing step as failed
    pub fn mark_error(&mut self, index: usize, message: impl Into<String>) -> Result<Vec<Step>, TrackerError> {
        self.advance(index, StepStatus::Error, Some(message.into()))
    }

    /// Adds call and token counts to a step
    pub fn record_metrics(
        &mut self,
        index: usize,
        api_calls: u32,
        tokens: u64,
    ) -> Result<Vec<Step>, TrackerError> {
        let step = self.get_mut(index)?;
        step.api_calls += api_calls;
        step.tokens_used += tokens;
        Ok(self.snapshot())
    }

    /// Attaches a degradation warning without changing status
    pub fn warn(&mut self, index: usize, message: impl Into<String>) -> Result<Vec<Step>, TrackerError> {
        let step = self.get_mut(index)?;
        step.warning = Some(message.into());
        Ok(self.snapshot())
    }

    /// Total external calls and tokens across all steps
    pub fn totals(&self) -> (u32, u64) {
        self.steps.iter().fold((0, 0), |(calls, tokens), s| {
            (calls + s.api_calls, tokens + s.tokens_used)
        })
    }

    fn get(&self, index: usize) -> Result<&Step, TrackerError> {
        self.steps.get(index).ok_or(TrackerError::OutOfRange(index))
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Step, TrackerError> {
        self.steps
            .get_mut(index)
            .ok_or(TrackerError::OutOfRange(index))
    }
}
