//! Time-progress-ease tween record shared by every per-body effect.
//!
//! A tween is plain data advanced by whichever system owns the property; the
//! owning component is removed once `sample` reports completion.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    CubicOut,
    CubicInOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Start time in seconds on the frame clock.
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSample {
    pub value: f32,
    pub done: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Value at `now`. The final sample is exactly `to`.
    pub fn sample(&self, now: f32) -> TweenSample {
        let p = self.progress(now);
        if p >= 1.0 {
            return TweenSample {
                value: self.to,
                done: true,
            };
        }
        let eased = self.easing.apply(p);
        TweenSample {
            value: self.from + (self.to - self.from) * eased,
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for e in [Easing::Linear, Easing::CubicOut, Easing::CubicInOut] {
            assert_eq!(e.apply(0.0), 0.0, "{e:?}");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?}");
        }
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        // ease-out front-loads motion
        assert!(Easing::CubicOut.apply(0.25) > 0.5);
    }

    #[test]
    fn sample_snaps_to_target_and_stops() {
        let tw = Tween::new(0.4, 0.0, 1.0, 0.5, Easing::CubicOut);
        let mid = tw.sample(1.25);
        assert!(!mid.done);
        assert!(mid.value > 0.0 && mid.value < 0.4);
        let end = tw.sample(1.5);
        assert!(end.done);
        assert_eq!(end.value, 0.0);
        // overshooting frames still land on the target
        assert_eq!(tw.sample(9.0).value, 0.0);
    }

    #[test]
    fn before_start_holds_origin() {
        let tw = Tween::new(1.0, 2.0, 5.0, 1.0, Easing::Linear);
        let s = tw.sample(4.0);
        assert_eq!(s.value, 1.0);
        assert!(!s.done);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let tw = Tween::new(1.0, 3.0, 0.0, 0.0, Easing::CubicInOut);
        assert_eq!(
            tw.sample(0.0),
            TweenSample {
                value: 3.0,
                done: true
            }
        );
    }
}
