//! Workout session state machine.
//!
//! A [`WorkoutSessionMachine`] owns all mutable state for one session: the
//! exercise cursor, rep/set counters, timers, and the form-score history. It
//! is driven by two kinds of input, both funneled through the same owner:
//! external events (play, pause, rep completed, ...) and a 1 Hz `tick()` from
//! the clock driver collaborator. The machine starts no threads and does no
//! I/O; serializing event and tick delivery is the owning context's job.
//!
//! Events fired in a state that does not permit them are tolerant no-ops
//! rather than errors. The one exception is construction: a target that can
//! never complete (zero duration, no rep/set goals) or an empty plan fails
//! with a configuration error before any session exists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::pose::KeypointFrame;
use crate::scoring::{self, FormAssessment, ScoringConfig};
use crate::throttle::FrameThrottle;
use crate::types::{Exercise, SessionResult, SessionStatus, SessionTarget};
use crate::Result;

/// State machine orchestrating exercise progression, set/rep counting, rest
/// intervals, and termination for a single session.
#[derive(Clone, Debug)]
pub struct WorkoutSessionMachine {
    target: SessionTarget,
    scoring: ScoringConfig,
    throttle: FrameThrottle,

    status: SessionStatus,
    exercise_index: usize,
    elapsed_seconds: u32,
    remaining_seconds: u32,
    current_rep: u32,
    current_set: u32,
    rest_remaining_seconds: u32,

    /// Every recorded form score this session, append-only
    form_score_history: Vec<f64>,
    average_form_score: f64,
    current_assessment: Option<FormAssessment>,

    total_elapsed_seconds: u32,
    total_reps_completed: u32,
    exercises_completed: u32,

    started_at: DateTime<Utc>,
    result: Option<SessionResult>,
}

impl WorkoutSessionMachine {
    /// Load a session over a single exercise or an ordered plan.
    ///
    /// The machine starts `Idle`; call [`play`](Self::play) to begin.
    /// Invalid static input (empty plan, uncompletable exercise, zero frame
    /// stride) fails here and prevents the session from existing at all.
    pub fn new(target: SessionTarget, scoring: ScoringConfig, frame_stride: u32) -> Result<Self> {
        target.validate()?;
        let throttle = FrameThrottle::new(frame_stride)?;

        let first_duration = match &target {
            SessionTarget::Single(exercise) => exercise.duration_seconds,
            SessionTarget::Plan(plan) => plan.exercises[0].duration_seconds,
        };

        tracing::info!(
            "Session loaded: {} ({} exercise(s))",
            target.name(),
            target.exercise_count()
        );

        Ok(Self {
            target,
            scoring,
            throttle,
            status: SessionStatus::Idle,
            exercise_index: 0,
            elapsed_seconds: 0,
            remaining_seconds: first_duration,
            current_rep: 0,
            current_set: 1,
            rest_remaining_seconds: 0,
            form_score_history: Vec::new(),
            average_form_score: 0.0,
            current_assessment: None,
            total_elapsed_seconds: 0,
            total_reps_completed: 0,
            exercises_completed: 0,
            started_at: Utc::now(),
            result: None,
        })
    }

    // ========================================================================
    // Playback events
    // ========================================================================

    /// Begin or unpause the session. No-op once completed, and while resting
    /// (the rest timer is already live).
    pub fn play(&mut self) {
        match self.status {
            SessionStatus::Idle | SessionStatus::Paused => {
                self.status = SessionStatus::Running;
                tracing::debug!("Session running");
            }
            _ => {}
        }
    }

    /// Pause a running session; ticks become no-ops until resumed
    pub fn pause(&mut self) {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
            tracing::debug!("Session paused");
        }
    }

    /// Resume from pause
    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Running;
            tracing::debug!("Session resumed");
        }
    }

    /// Terminate the session and finalize its result.
    ///
    /// Always synchronous, always yields a result (a zero-duration one if
    /// nothing ran). Returns `None` when already completed: a second stop is
    /// a no-op, and exactly one `SessionResult` exists per session.
    pub fn stop(&mut self) -> Option<SessionResult> {
        if self.status == SessionStatus::Completed {
            return None;
        }
        self.finalize();
        self.result.clone()
    }

    /// Force-advance to the next exercise, equivalent to completing the
    /// current one
    pub fn skip(&mut self) {
        if self.status == SessionStatus::Completed {
            return;
        }
        tracing::debug!("Exercise skipped");
        self.complete_current_exercise();
    }

    /// Reset counters for the current exercise. The session drops back to
    /// `Idle` and must be played again; the score history is append-only and
    /// survives a restart.
    pub fn restart(&mut self) {
        if self.status == SessionStatus::Completed {
            return;
        }
        self.reset_exercise_counters();
        self.status = SessionStatus::Idle;
        tracing::debug!("Exercise restarted");
    }

    // ========================================================================
    // Clock driver
    // ========================================================================

    /// Advance the session by one second.
    ///
    /// Invoked at 1 Hz by the external clock driver while a session is
    /// active. A no-op unless running or resting. Each call is one atomic
    /// state transition.
    pub fn tick(&mut self) {
        match self.status {
            SessionStatus::Resting => {
                self.total_elapsed_seconds += 1;
                self.rest_remaining_seconds = self.rest_remaining_seconds.saturating_sub(1);
                if self.rest_remaining_seconds == 0 {
                    self.start_next_set();
                }
            }
            SessionStatus::Running => {
                self.total_elapsed_seconds += 1;
                self.elapsed_seconds += 1;
                let duration = self.current_exercise().duration_seconds;
                self.remaining_seconds = duration.saturating_sub(self.elapsed_seconds);

                // Rep/set-only exercises (duration 0) complete via reps, not time
                if duration > 0 && self.remaining_seconds == 0 {
                    self.complete_current_exercise();
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Rep and frame input
    // ========================================================================

    /// Record one completed repetition, folding the latest form score into
    /// the session history. No-op unless running.
    pub fn rep_completed(&mut self) {
        if self.status != SessionStatus::Running {
            return;
        }

        self.current_rep += 1;
        self.total_reps_completed += 1;
        self.record_form_score();

        if let Some(reps) = self.current_exercise().reps {
            if self.current_rep >= reps {
                self.complete_set();
            }
        }
    }

    /// Submit a pose frame for scoring.
    ///
    /// Applies the frame throttle first; dropped frames return `None`.
    /// Scored frames update the live assessment that the next
    /// [`rep_completed`](Self::rep_completed) records. Scoring is pure and
    /// may run on a worker thread, but the returned assessment must be folded
    /// back through the same owner that ticks the machine.
    pub fn submit_frame(&mut self, frame: &KeypointFrame) -> Option<FormAssessment> {
        if !self.throttle.should_process() {
            return None;
        }
        let assessment = scoring::score(frame, &self.scoring);
        self.current_assessment = Some(assessment);
        Some(assessment)
    }

    // ========================================================================
    // Read access (display collaborator)
    // ========================================================================

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The exercise the session cursor is on
    pub fn current_exercise(&self) -> &Exercise {
        match &self.target {
            SessionTarget::Single(exercise) => exercise,
            SessionTarget::Plan(plan) => &plan.exercises[self.exercise_index],
        }
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn current_rep(&self) -> u32 {
        self.current_rep
    }

    /// 1-based set counter, never exceeding the exercise's set target
    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn rest_remaining_seconds(&self) -> u32 {
        self.rest_remaining_seconds
    }

    pub fn form_score_history(&self) -> &[f64] {
        &self.form_score_history
    }

    /// Running mean of recorded scores; 0.0 when none recorded
    pub fn average_form_score(&self) -> f64 {
        self.average_form_score
    }

    /// Latest scored frame, if any frame passed the throttle yet
    pub fn current_assessment(&self) -> Option<&FormAssessment> {
        self.current_assessment.as_ref()
    }

    pub fn total_reps_completed(&self) -> u32 {
        self.total_reps_completed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Finalized result, available once the session completed
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Fraction of the current exercise's duration elapsed, in [0, 1]
    pub fn progress(&self) -> f64 {
        let total = self.current_exercise().duration_seconds;
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.elapsed_seconds) / f64::from(total)).min(1.0)
    }

    /// mm:ss rendering of the remaining exercise time
    pub fn timer_display(&self) -> String {
        format_mmss(self.remaining_seconds)
    }

    /// mm:ss rendering of the remaining rest time
    pub fn rest_timer_display(&self) -> String {
        format_mmss(self.rest_remaining_seconds)
    }

    // ========================================================================
    // Internal transitions
    // ========================================================================

    fn record_form_score(&mut self) {
        let score = self.current_assessment.map(|a| a.score).unwrap_or(0.0);
        self.form_score_history.push(score);
        self.average_form_score =
            self.form_score_history.iter().sum::<f64>() / self.form_score_history.len() as f64;
    }

    /// End of a set: either rest before the next one or, with all sets done,
    /// complete the exercise. Exercises without a set target complete
    /// directly.
    fn complete_set(&mut self) {
        let exercise = self.current_exercise();
        let sets = exercise.sets;
        let rest = exercise.rest_between_sets_seconds;

        match sets {
            Some(sets) if self.current_set < sets => {
                self.current_set += 1;
                self.current_rep = 0;
                if rest > 0 {
                    self.status = SessionStatus::Resting;
                    self.rest_remaining_seconds = rest;
                    tracing::debug!("Resting {}s before set {}", rest, self.current_set);
                } else {
                    self.start_next_set();
                }
            }
            _ => self.complete_current_exercise(),
        }
    }

    /// Leave rest and restart the timers for the same exercise
    fn start_next_set(&mut self) {
        self.elapsed_seconds = 0;
        self.remaining_seconds = self.current_exercise().duration_seconds;
        self.status = SessionStatus::Running;
        tracing::debug!("Set {} started", self.current_set);
    }

    /// Advance the plan cursor or, at the end, finalize the session.
    /// Advancing auto-resumes: the next exercise starts running immediately.
    fn complete_current_exercise(&mut self) {
        self.exercises_completed += 1;
        tracing::info!(
            "Exercise completed: {} ({}/{})",
            self.current_exercise().name,
            self.exercises_completed,
            self.target.exercise_count()
        );

        let has_next = matches!(
            &self.target,
            SessionTarget::Plan(plan) if self.exercise_index + 1 < plan.exercises.len()
        );

        if has_next {
            self.exercise_index += 1;
            self.reset_exercise_counters();
            self.status = SessionStatus::Running;
        } else {
            self.finalize();
        }
    }

    fn reset_exercise_counters(&mut self) {
        self.elapsed_seconds = 0;
        self.remaining_seconds = self.current_exercise().duration_seconds;
        self.current_rep = 0;
        self.current_set = 1;
        self.rest_remaining_seconds = 0;
    }

    fn finalize(&mut self) {
        let completed_at = Utc::now();
        let result = SessionResult {
            id: Uuid::new_v4(),
            target_name: self.target.name().to_string(),
            started_at: self.started_at,
            completed_at,
            total_duration_seconds: self.total_elapsed_seconds,
            exercises_completed: self.exercises_completed,
            exercises_planned: self.target.exercise_count() as u32,
            total_reps_completed: self.total_reps_completed,
            average_form_score: self.average_form_score,
            calories_burned: SessionResult::estimate_calories(self.total_elapsed_seconds),
        };

        tracing::info!(
            "Session finalized: {} exercises, {} reps, avg form {:.2}",
            result.exercises_completed,
            result.total_reps_completed,
            result.average_form_score
        );

        self.result = Some(result);
        self.status = SessionStatus::Completed;
    }
}

fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
