//! Animatable property values.

use super::curve::AnimationSpec;
use kurbo::{Point, Rect, Vec2};
use std::time::Duration;

/// Values that can be blended between two endpoints.
pub trait Interpolate: Copy {
    fn interpolate(self, to: Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Point {
    fn interpolate(self, to: Self, t: f64) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(self, to: Self, t: f64) -> Self {
        self.lerp(to, t)
    }
}

impl Interpolate for Rect {
    fn interpolate(self, to: Self, t: f64) -> Self {
        Rect::new(
            self.x0.interpolate(to.x0, t),
            self.y0.interpolate(to.y0, t),
            self.x1.interpolate(to.x1, t),
            self.y1.interpolate(to.y1, t),
        )
    }
}

/// A property with a model value and an in-flight presentation transition.
///
/// The model value (`target`) changes immediately on assignment; the
/// presentation value follows it over the transition's duration.
#[derive(Debug, Clone, Copy)]
pub struct Animated<T> {
    from: T,
    to: T,
    start: Duration,
    spec: Option<AnimationSpec>,
}

impl<T: Interpolate> Animated<T> {
    pub fn new(value: T) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
            spec: None,
        }
    }

    /// The model value.
    pub fn target(&self) -> T {
        self.to
    }

    /// The presentation value at `now`.
    pub fn value_at(&self, now: Duration) -> T {
        match self.spec {
            Some(spec) => {
                let progress = spec.progress(now.saturating_sub(self.start));
                if progress >= 1.0 {
                    self.to
                } else {
                    self.from.interpolate(self.to, spec.curve.apply(progress))
                }
            }
            None => self.to,
        }
    }

    /// Assign a new model value, transitioning when `spec` is given.
    pub fn set(&mut self, value: T, now: Duration, spec: Option<AnimationSpec>) {
        match spec {
            Some(spec) if !spec.duration.is_zero() => {
                self.from = self.value_at(now);
                self.to = value;
                self.start = now;
                self.spec = Some(spec);
            }
            _ => {
                self.from = value;
                self.to = value;
                self.spec = None;
            }
        }
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.spec
            .map(|spec| spec.progress(now.saturating_sub(self.start)) < 1.0)
            .unwrap_or(false)
    }
}
