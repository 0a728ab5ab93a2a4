mod animatable;
mod settle;
mod timing;

pub use animatable::Animatable;
pub use settle::{AdvanceResult, AnimationId, SettleAnimation, SettleRunner, Track, TrackTarget};
pub use timing::TimingFunction;

/// Configuration for how a settle animation runs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Duration of the animation in milliseconds
    pub duration_ms: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            timing,
        }
    }
}
