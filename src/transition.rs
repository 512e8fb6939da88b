//! Eased blending between two particle layouts.
//!
//! The scheduler is a two-state machine:
//!
//! - `Idle`: the live field shows a committed pattern.
//! - `Active`: the scheduler owns a `from` snapshot (what was on screen when
//!   the transition began) and a `to` snapshot (the next pattern), and each
//!   [`tick`](TransitionScheduler::tick) moves the live field further along a
//!   cubic ease-in-out curve between them.
//!
//! Only one transition is ever in flight. Triggering while active first
//! force-completes the running transition, so a new blend always starts from
//! a fully committed layout.

use log::{debug, error};
use rand::Rng;

use crate::error::ConfigError;
use crate::field::{ParticleField, Snapshot};
use crate::pattern::Pattern;

/// Default progress step per tick (about 67 ticks, 1.1 s at 60 Hz).
pub const DEFAULT_SPEED: f32 = 0.015;

/// Symmetric cubic ease-in-out.
///
/// `4t³` for the first half, `1 - (-2t + 2)³ / 2` for the second.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A transition in flight.
#[derive(Debug, Clone)]
pub struct ActiveTransition {
    progress: f32,
    target: Pattern,
    from: Snapshot,
    to: Snapshot,
}

impl ActiveTransition {
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> Pattern {
        self.target
    }

    pub fn from(&self) -> &Snapshot {
        &self.from
    }

    pub fn to(&self) -> &Snapshot {
        &self.to
    }
}

/// Scheduler state.
#[derive(Debug, Clone, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Active(ActiveTransition),
}

/// Result of advancing the scheduler by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing in flight.
    Idle,
    /// The live field was blended at `progress` (before easing).
    Blending { progress: f32 },
    /// Progress reached 1.0 and `pattern` was committed.
    Completed { pattern: Pattern, progress: f32 },
    /// Snapshot integrity failed; the transition jumped straight to `pattern`.
    Aborted { pattern: Pattern },
}

/// Drives the live [`ParticleField`] from one pattern to the next.
#[derive(Debug, Clone)]
pub struct TransitionScheduler {
    speed: f32,
    state: TransitionState,
}

impl TransitionScheduler {
    /// Create an idle scheduler advancing `speed` progress per tick.
    ///
    /// The step must be finite and positive, otherwise a transition would
    /// never reach 1.0.
    pub fn new(speed: f32) -> Result<Self, ConfigError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::InvalidTransitionSpeed(speed));
        }
        Ok(Self {
            speed,
            state: TransitionState::Idle,
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Active(_))
    }

    /// Linear progress of the running transition, 0 when idle.
    pub fn progress(&self) -> f32 {
        match &self.state {
            TransitionState::Active(active) => active.progress,
            TransitionState::Idle => 0.0,
        }
    }

    /// Pattern the running transition is heading to.
    pub fn target(&self) -> Option<Pattern> {
        match &self.state {
            TransitionState::Active(active) => Some(active.target),
            TransitionState::Idle => None,
        }
    }

    /// Start a transition to the pattern after the field's current one.
    ///
    /// A transition already in flight is force-completed first. The `from`
    /// snapshot is taken from what is on screen, including blended colors.
    /// Returns the new target pattern.
    pub fn begin<R: Rng + ?Sized>(&mut self, field: &mut ParticleField, rng: &mut R) -> Pattern {
        self.force_complete(field);

        let target = field.pattern().next();
        let from = field.snapshot();
        let to = Snapshot::generate(target, field.len() as u32, rng);

        debug!("transition {} -> {} started", field.pattern(), target);
        self.state = TransitionState::Active(ActiveTransition {
            progress: 0.0,
            target,
            from,
            to,
        });
        target
    }

    /// Advance the running transition by one step.
    pub fn tick(&mut self, field: &mut ParticleField) -> TickOutcome {
        let TransitionState::Active(active) = &mut self.state else {
            return TickOutcome::Idle;
        };

        active.progress += self.speed;

        if active.progress >= 1.0 {
            active.progress = 1.0;
            let progress = active.progress;
            return match self.force_complete(field) {
                Some(pattern) => {
                    debug!("transition to {} completed", pattern);
                    TickOutcome::Completed { pattern, progress }
                }
                None => TickOutcome::Idle,
            };
        }

        let progress = active.progress;
        let factor = ease_in_out_cubic(progress);
        match field.blend(&active.from, &active.to, factor) {
            Ok(()) => TickOutcome::Blending { progress },
            Err(e) => {
                error!("{}", e);
                match self.force_complete(field) {
                    Some(pattern) => TickOutcome::Aborted { pattern },
                    None => TickOutcome::Idle,
                }
            }
        }
    }

    /// Jump the running transition to its target and commit it.
    ///
    /// Returns the committed pattern, or `None` if nothing was in flight, in
    /// which case the field is left untouched.
    pub fn force_complete(&mut self, field: &mut ParticleField) -> Option<Pattern> {
        match std::mem::take(&mut self.state) {
            TransitionState::Active(active) => {
                field.commit(active.to, active.target);
                Some(active.target)
            }
            TransitionState::Idle => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, active: ActiveTransition) {
        self.state = TransitionState::Active(active);
    }
}

impl Default for TransitionScheduler {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            state: TransitionState::Idle,
        }
    }
}

#[cfg(test)]
impl ActiveTransition {
    pub(crate) fn new(progress: f32, target: Pattern, from: Snapshot, to: Snapshot) -> Self {
        Self {
            progress,
            target,
            from,
            to,
        }
    }
}
