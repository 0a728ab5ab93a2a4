//! The timed settle animation: a single in-flight handle owned by the
//! animator while the stack is settling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::{Animatable, Transition};
use crate::gesture::SettleOutcome;
use crate::layout::LayerState;
use crate::role::Role;

/// Result of advancing an animation, indicating whether the value changed
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Value did not change (animation not running or same value)
    NoChange,
    /// Value changed to a new value
    Changed(T),
}

/// Unique identifier for a settle animation
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AnimationId(u64);

static NEXT_ANIMATION_ID: AtomicU64 = AtomicU64::new(1);

impl AnimationId {
    pub fn next() -> Self {
        Self(NEXT_ANIMATION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a track drives: a screen by its current role, or the overlay scrim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackTarget {
    Role(Role),
    Overlay,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub target: TrackTarget,
    pub from: LayerState,
    pub to: LayerState,
}

/// Everything needed to run one settle: duration, curve and per-layer endpoints.
#[derive(Clone, Debug)]
pub struct SettleAnimation {
    pub id: AnimationId,
    pub outcome: SettleOutcome,
    pub transition: Transition,
    pub tracks: Vec<Track>,
}

impl SettleAnimation {
    /// Interpolated state of every track at eased factor `t`.
    pub fn sample(&self, t: f32) -> Vec<(TrackTarget, LayerState)> {
        self.tracks
            .iter()
            .map(|track| (track.target, LayerState::lerp(&track.from, &track.to, t)))
            .collect()
    }
}

/// Drives a [`SettleAnimation`] from frame timestamps.
///
/// The clock starts on the first call to [`SettleRunner::advance`], so the
/// first frame always renders the `from` endpoints.
pub struct SettleRunner {
    animation: SettleAnimation,
    started_at: Option<Instant>,
    /// Normalized time from 0.0 to 1.0
    progress: f32,
    last_progress: Option<f32>,
}

impl SettleRunner {
    pub fn new(animation: SettleAnimation) -> Self {
        Self {
            animation,
            started_at: None,
            progress: 0.0,
            last_progress: None,
        }
    }

    pub fn animation(&self) -> &SettleAnimation {
        &self.animation
    }

    /// Advance to `now` and return the interpolated layer states if they moved.
    pub fn advance(&mut self, now: Instant) -> AdvanceResult<Vec<(TrackTarget, LayerState)>> {
        if self.is_finished() {
            return AdvanceResult::NoChange;
        }

        let started_at = *self.started_at.get_or_insert(now);
        let elapsed_ms = now.saturating_duration_since(started_at).as_secs_f32() * 1000.0;
        let duration_ms = self.animation.transition.duration_ms;

        let t = if duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed_ms / duration_ms).min(1.0)
        };
        self.progress = t;

        if self.last_progress == Some(t) {
            return AdvanceResult::NoChange;
        }
        self.last_progress = Some(t);

        // Land exactly on the endpoints regardless of the curve
        let eased = if t >= 1.0 {
            1.0
        } else {
            self.animation.transition.timing.evaluate(t)
        };
        AdvanceResult::Changed(self.animation.sample(eased))
    }

    /// Jump straight to the end state.
    pub fn finish_now(&mut self) -> Vec<(TrackTarget, LayerState)> {
        self.progress = 1.0;
        self.last_progress = Some(1.0);
        self.animation.sample(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }
}
