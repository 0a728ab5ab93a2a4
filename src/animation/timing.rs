//! Settle curves.
//!
//! Every curve is a unit cubic Bézier from (0, 0) to (1, 1). The named
//! curves use the standard ease control points, so a host running the
//! settle natively can hand [`TimingFunction::control_points`] straight to
//! its own animation primitive.
//!
//! ```ignore
//! let config = StackConfig {
//!     commit_after_timing: TimingFunction::CubicBezier(0.2, 0.0, 0.0, 1.0),
//!     ..StackConfig::default()
//! };
//! ```

/// Curve mapping elapsed time to settle progress, both in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingFunction {
    Linear,
    /// Accelerates into the final frame
    EaseIn,
    /// Decelerates into the final frame
    EaseOut,
    /// Control points `(x1, y1, x2, y2)`; `x1` and `x2` are clamped to `0..=1`
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    pub fn control_points(&self) -> (f32, f32, f32, f32) {
        match *self {
            TimingFunction::Linear => (0.0, 0.0, 1.0, 1.0),
            TimingFunction::EaseIn => (0.42, 0.0, 1.0, 1.0),
            TimingFunction::EaseOut => (0.0, 0.0, 0.58, 1.0),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                (x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2)
            }
        }
    }

    /// Progress at elapsed fraction `t`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if *self == TimingFunction::Linear || t == 0.0 || t == 1.0 {
            return t;
        }
        UnitBezier::new(self.control_points()).solve(t)
    }
}

/// Polynomial coefficients of one axis: `((a*s + b)*s + c)*s`.
#[derive(Clone, Copy)]
struct Axis {
    a: f32,
    b: f32,
    c: f32,
}

impl Axis {
    fn new(p1: f32, p2: f32) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self {
            a: 1.0 - c - b,
            b,
            c,
        }
    }

    fn at(self, s: f32) -> f32 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    fn slope(self, s: f32) -> f32 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }
}

struct UnitBezier {
    x: Axis,
    y: Axis,
}

impl UnitBezier {
    const EPSILON: f32 = 1e-5;

    fn new((x1, y1, x2, y2): (f32, f32, f32, f32)) -> Self {
        Self {
            x: Axis::new(x1, x2),
            y: Axis::new(y1, y2),
        }
    }

    fn solve(&self, x: f32) -> f32 {
        self.y.at(self.parameter_for(x))
    }

    /// Curve parameter whose x equals `x`. Newton first, bisection when the
    /// slope flattens out.
    fn parameter_for(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..8 {
            let error = self.x.at(s) - x;
            if error.abs() < Self::EPSILON {
                return s;
            }
            let slope = self.x.slope(s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= error / slope;
        }

        let (mut low, mut high) = (0.0f32, 1.0f32);
        s = x;
        while low < high {
            let current = self.x.at(s);
            if (current - x).abs() < Self::EPSILON {
                break;
            }
            if current < x {
                low = s;
            } else {
                high = s;
            }
            let next = (low + high) * 0.5;
            if next == s {
                break;
            }
            s = next;
        }
        s
    }
}
