use crate::animation::TimingFunction;

/// Tunables for drag resistance, commit thresholds and settle animations.
#[derive(Clone, Debug)]
pub struct StackConfig {
    /// How much smaller a resting neighbor is than the container (0.15 = 85%)
    pub size_diff: f32,
    /// Opacity range used for neighbor fade-in and overlay dimming
    pub alpha_diff: f32,
    /// Settle duration in milliseconds before progress scaling
    pub base_duration_ms: f32,
    /// Fraction of the drag applied to the visible screen when there is no
    /// neighbor to reveal
    pub bounce_size: f32,
    /// Drag distance, as a fraction of the width, that commits on release
    pub commit_fraction: f32,
    /// Release speed in units/sec that commits regardless of distance
    pub flick_velocity: f32,
    /// Progress curve exponent for drags toward the after screen
    pub forward_exponent: f32,
    /// Progress curve exponent for drags toward the before screen
    pub backward_exponent: f32,
    pub commit_after_timing: TimingFunction,
    pub commit_before_timing: TimingFunction,
    pub snap_back_timing: TimingFunction,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            size_diff: 0.15,
            alpha_diff: 0.775,
            base_duration_ms: 400.0,
            bounce_size: 0.2,
            commit_fraction: 1.0 / 3.0,
            flick_velocity: 500.0,
            forward_exponent: 2.0,
            backward_exponent: 0.5,
            commit_after_timing: TimingFunction::EaseIn,
            commit_before_timing: TimingFunction::EaseOut,
            snap_back_timing: TimingFunction::EaseOut,
        }
    }
}

impl StackConfig {
    /// Scale applied to a neighbor resting behind the visible screen.
    pub fn rest_scale(&self) -> f32 {
        1.0 - self.size_diff
    }

    /// Opacity of a neighbor resting behind the visible screen.
    pub fn rest_opacity(&self) -> f32 {
        1.0 - self.alpha_diff
    }

    /// Settle duration for a commit; shorter when the drag was already far along.
    pub fn commit_duration_ms(&self, progress: f32) -> f32 {
        self.base_duration_ms * (1.0 - progress.clamp(0.0, 1.0) * 0.5)
    }

    /// Settle duration for a snap-back; longer when the drag was far along.
    pub fn snap_back_duration_ms(&self, progress: f32) -> f32 {
        self.base_duration_ms * (0.5 + progress.abs().min(1.0) * 0.5)
    }
}
