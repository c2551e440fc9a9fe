use bevy::prelude::*;

/// Marker component identifying a skill ball parent (holds physics body & collider).
#[derive(Component, Debug, Default, Copy, Clone)]
pub struct SkillBall;

/// Which skill the ball shows. `index` points into `GameConfig::skills`.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub index: usize,
    pub label: String,
}

/// Logical radius used both for the collider and rendering scale.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BallRadius(pub f32);

#[derive(Component, Debug, Copy, Clone)]
pub struct BallColor(pub Color);

/// Per-body interaction state, keyed by the ball entity.
///
/// `splattered` is monotonic. Once set the body is static and the other fields stop changing.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct BallInteraction {
    pub splattered: bool,
    /// 0 = icon face, PI = label face.
    pub flip_angle: f32,
    /// Seconds (app clock) of the last externally applied drag force.
    pub last_motion: f32,
    pub idle_since: Option<f32>,
}

impl BallInteraction {
    /// Returns true only on the first call.
    pub fn mark_splattered(&mut self) -> bool {
        if self.splattered {
            return false;
        }
        self.splattered = true;
        self.idle_since = None;
        true
    }

    pub fn note_motion(&mut self, now: f32) {
        self.last_motion = now;
        self.idle_since = None;
    }

    /// Feeds one stillness sample. Returns true when the dwell just completed; the
    /// dwell restarts afterwards.
    pub fn observe_stillness(&mut self, still: bool, now: f32, dwell: f32) -> bool {
        if self.splattered {
            return false;
        }
        if !still {
            self.idle_since = None;
            return false;
        }
        match self.idle_since {
            None => {
                self.idle_since = Some(now);
                false
            }
            Some(since) if now - since >= dwell => {
                self.idle_since = None;
                true
            }
            Some(_) => false,
        }
    }
}

/// Static boundary segment. Rebuilt wholesale on resize, never edited in place.
#[derive(Component, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
    Left,
    Right,
}

/// Tag for the filled disc mesh child.
#[derive(Component)]
pub struct BallCircleVisual;

/// Tag for the outline ring mesh child.
#[derive(Component)]
pub struct BallOutlineVisual;

/// Parent of the two faces; its horizontal scale follows the flip angle.
#[derive(Component)]
pub struct BallFace;

/// Icon face (sprite). Hidden in favour of the label when the image is unavailable.
#[derive(Component)]
pub struct FaceIcon;

/// Label face (text).
#[derive(Component)]
pub struct FaceLabel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_splattered_is_idempotent() {
        let mut s = BallInteraction::default();
        assert!(s.mark_splattered());
        assert!(!s.mark_splattered());
        assert!(s.splattered);
    }

    #[test]
    fn dwell_requires_continuous_stillness() {
        let mut s = BallInteraction::default();
        assert!(!s.observe_stillness(true, 0.0, 1.0));
        assert!(!s.observe_stillness(true, 0.5, 1.0));
        // motion just before the dwell completes
        assert!(!s.observe_stillness(false, 0.999, 1.0));
        assert!(!s.observe_stillness(true, 1.0, 1.0));
        assert!(!s.observe_stillness(true, 1.999, 1.0));
        assert!(s.observe_stillness(true, 2.0, 1.0));
        // dwell restarts after a trigger
        assert_eq!(s.idle_since, None);
    }

    #[test]
    fn splattered_bodies_never_go_idle() {
        let mut s = BallInteraction::default();
        s.mark_splattered();
        assert!(!s.observe_stillness(true, 0.0, 0.0));
        assert!(!s.observe_stillness(true, 10.0, 0.0));
        assert_eq!(s.idle_since, None);
    }
}
