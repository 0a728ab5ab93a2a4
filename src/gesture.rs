//! Gesture interpretation: raw drag samples to progress and release outcome.

use crate::config::StackConfig;
use crate::host::Direction;

/// Phase reported by the host's horizontal drag recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    /// Ended, cancelled and failed all release the drag the same way.
    pub fn is_release(self) -> bool {
        matches!(
            self,
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed
        )
    }
}

/// One sample from the drag recognizer, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase: GesturePhase,
    /// Horizontal translation since the gesture began (negative = leftward)
    pub translation_x: f32,
    /// Horizontal velocity in units/sec (negative = leftward)
    pub velocity_x: f32,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, translation_x: f32, velocity_x: f32) -> Self {
        Self {
            phase,
            translation_x,
            velocity_x,
        }
    }

    pub fn began() -> Self {
        Self::new(GesturePhase::Began, 0.0, 0.0)
    }

    pub fn changed(translation_x: f32) -> Self {
        Self::new(GesturePhase::Changed, translation_x, 0.0)
    }

    pub fn ended(translation_x: f32, velocity_x: f32) -> Self {
        Self::new(GesturePhase::Ended, translation_x, velocity_x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    /// Toward the after screen (finger moving left)
    Forward,
    /// Toward the before screen (finger moving right)
    Backward,
}

/// A drag sample normalized against the container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// `-translation_x`; positive when dragging forward
    pub diff: f32,
    /// `diff / width`, signed
    pub raw: f32,
    /// Eased, unsigned progress used for live layout
    pub progress: f32,
    pub direction: DragDirection,
}

impl Drag {
    pub fn from_translation(translation_x: f32, width: f32, config: &StackConfig) -> Self {
        let diff = -translation_x;
        let raw = if width > 0.0 { diff / width } else { 0.0 };
        let direction = if diff >= 0.0 {
            DragDirection::Forward
        } else {
            DragDirection::Backward
        };
        Self {
            diff,
            raw,
            progress: progress(diff, width, config),
            direction,
        }
    }
}

/// Eased drag progress: `(diff/W)^forward_exponent` when dragging forward,
/// `(|diff|/W)^backward_exponent` when dragging backward.
pub fn progress(diff: f32, width: f32, config: &StackConfig) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    let raw = (diff / width).abs();
    if diff >= 0.0 {
        raw.powf(config.forward_exponent)
    } else {
        raw.powf(config.backward_exponent)
    }
}

/// How a released drag resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    CommitAfter,
    CommitBefore,
    SnapBack,
}

impl SettleOutcome {
    pub fn direction(self) -> Direction {
        match self {
            SettleOutcome::CommitAfter => Direction::After,
            SettleOutcome::CommitBefore => Direction::Before,
            SettleOutcome::SnapBack => Direction::Visible,
        }
    }
}

/// Decide the release outcome.
///
/// A commit needs a neighbor in the drag direction and either a drag past
/// `commit_fraction` of the width or a flick at least `flick_velocity` fast
/// in the drag direction. Everything else snaps back.
pub fn decide(
    drag: &Drag,
    velocity_x: f32,
    width: f32,
    has_after: bool,
    has_before: bool,
    config: &StackConfig,
) -> SettleOutcome {
    let threshold = width * config.commit_fraction;
    match drag.direction {
        DragDirection::Forward => {
            let short = drag.diff < threshold && velocity_x > -config.flick_velocity;
            if has_after && !short {
                SettleOutcome::CommitAfter
            } else {
                SettleOutcome::SnapBack
            }
        }
        DragDirection::Backward => {
            let short = -drag.diff < threshold && velocity_x < config.flick_velocity;
            if has_before && !short {
                SettleOutcome::CommitBefore
            } else {
                SettleOutcome::SnapBack
            }
        }
    }
}
