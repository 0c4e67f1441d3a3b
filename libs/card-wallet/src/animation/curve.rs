//! Timing curves and animation parameters.

use std::time::Duration;

/// Easing applied to an animation's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Curve {
    /// Map linear progress `t` in `0.0..=1.0` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Duration and curve of a fixed-length transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub curve: Curve,
}

impl AnimationSpec {
    pub const fn new(duration: Duration, curve: Curve) -> Self {
        Self { duration, curve }
    }

    pub const fn linear(duration: Duration) -> Self {
        Self::new(duration, Curve::Linear)
    }

    /// Linear progress after `elapsed`, clamped to `0.0..=1.0`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}
