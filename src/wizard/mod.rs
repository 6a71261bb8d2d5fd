//! Wizard Controller
//!
//! The multi-step form state machine. Owns the current step, the accumulated
//! customer profile, and the submission lifecycle. This is the only mutable
//! component — the renderer and the result presenter are pure views over it.
//!
//! Submission is split into `begin_submit` / `complete` / `fail` so the HTTP
//! round trip can run on a spawned task: `begin_submit` hands out a ticket
//! carrying a payload snapshot and a generation number, and only a completion
//! carrying the live generation is committed. A response that arrives after
//! `reset()` finds a newer generation and is dropped.

use crate::client::PredictionResult;
use crate::schema::{CustomerProfile, TOTAL_STEPS};

/// The single user-visible failure message; causes go to the log only.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while making the prediction.";

/// Mutually exclusive submission lifecycle phases
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Idle,
    Loading,
    Succeeded(PredictionResult),
    Failed(String),
}

/// Snapshot handed to the submit task. The profile is captured at
/// `begin_submit` time, so edits during the round trip cannot leak into the
/// in-flight payload.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: u64,
    pub profile: CustomerProfile,
}

/// Multi-step form state machine
#[derive(Debug)]
pub struct Wizard {
    current_step: usize,
    profile: CustomerProfile,
    submission: Submission,
    generation: u64,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Fresh wizard: step 1, seeded defaults, idle
    pub fn new() -> Self {
        Self {
            current_step: 1,
            profile: CustomerProfile::default(),
            submission: Submission::Idle,
            generation: 0,
        }
    }

    /// Current step, always in [1, TOTAL_STEPS]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Whether the final step is showing
    pub fn on_final_step(&self) -> bool {
        self.current_step == TOTAL_STEPS
    }

    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.submission, Submission::Loading)
    }

    /// Store a raw edit into the named field. Coercion follows the field's
    /// declared kind; step and submission state are untouched.
    pub fn update_field(&mut self, key: &str, raw: &str) {
        self.profile.set_raw(key, raw);
    }

    /// Move to the next step; no-op on the final step. There is no
    /// validation gate — a step with default fields can be passed.
    pub fn advance(&mut self) {
        if self.current_step < TOTAL_STEPS {
            self.current_step += 1;
        }
    }

    /// Move to the previous step; no-op on step 1
    pub fn retreat(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Progress through the wizard as a continuous fraction: 0.0 on step 1,
    /// 1.0 on the final step.
    pub fn progress(&self) -> f64 {
        (self.current_step - 1) as f64 / (TOTAL_STEPS - 1) as f64
    }

    /// Start a submission. Returns a ticket only when the final step is
    /// showing and no request is already in flight; otherwise a no-op. Any
    /// prior error is cleared when the new request starts.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.on_final_step() {
            tracing::debug!(step = self.current_step, "submit ignored before final step");
            return None;
        }
        if self.is_loading() {
            tracing::debug!("submit ignored: request already in flight");
            return None;
        }
        self.generation += 1;
        self.submission = Submission::Loading;
        Some(SubmitTicket {
            generation: self.generation,
            profile: self.profile.clone(),
        })
    }

    /// Commit a successful response. Dropped when the generation is stale or
    /// the wizard is no longer waiting.
    pub fn complete(&mut self, generation: u64, result: PredictionResult) {
        if !self.accepts(generation) {
            tracing::debug!(generation, "dropping stale prediction response");
            return;
        }
        self.submission = Submission::Succeeded(result);
    }

    /// Commit a failure as the generic user-facing message. The underlying
    /// cause must already have been logged by the caller.
    pub fn fail(&mut self, generation: u64) {
        if !self.accepts(generation) {
            tracing::debug!(generation, "dropping stale prediction failure");
            return;
        }
        self.submission = Submission::Failed(GENERIC_ERROR_MESSAGE.to_string());
    }

    fn accepts(&self, generation: u64) -> bool {
        self.is_loading() && generation == self.generation
    }

    /// Back to step 1, idle. Edited field values are kept (matching the
    /// original form behavior); the generation bump makes any in-flight
    /// response stale.
    pub fn reset(&mut self) {
        self.current_step = 1;
        self.submission = Submission::Idle;
        self.generation += 1;
    }
}
