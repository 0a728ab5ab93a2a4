use crate::geometry::Rect;
use crate::layout::LayerState;

/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    /// t can exceed [0, 1] range for overshoot effects
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for Rect {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Rect {
            x: from.x + (to.x - from.x) * t,
            y: from.y + (to.y - from.y) * t,
            width: from.width + (to.width - from.width) * t,
            height: from.height + (to.height - from.height) * t,
        }
    }
}

impl Animatable for LayerState {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        LayerState {
            frame: Rect::lerp(&from.frame, &to.frame, t),
            opacity: f32::lerp(&from.opacity, &to.opacity, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(f32::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 1.0), 10.0);
        // Overshoot
        assert_eq!(f32::lerp(&0.0, &10.0, 1.5), 15.0);
    }

    #[test]
    fn test_rect_lerp() {
        let from = Rect::new(0.0, 0.0, 100.0, 100.0);
        let to = Rect::new(-100.0, 10.0, 200.0, 50.0);
        let mid = Rect::lerp(&from, &to, 0.5);
        assert_eq!(mid, Rect::new(-50.0, 5.0, 150.0, 75.0));
    }

    #[test]
    fn test_layer_state_lerp() {
        let from = LayerState::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);
        let to = LayerState::new(Rect::new(10.0, 0.0, 10.0, 10.0), 1.0);
        let mid = LayerState::lerp(&from, &to, 0.25);
        assert_eq!(mid.frame.x, 2.5);
        assert_eq!(mid.opacity, 0.25);
    }
}
