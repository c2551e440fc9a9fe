//! Screen <-> world mapping and the inset play area.
//!
//! Screen space is the window's logical pixel space (origin top-left, y down).
//! World space is the 2D camera space (origin at the window center, y up). The
//! camera sits at the origin with an unscaled orthographic projection, so one
//! world unit is one logical pixel.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::components::Boundary;
use crate::core::config::PlayAreaConfig;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio.
    pub scale_factor: f32,
    /// Where the canvas sits inside the window (screen px).
    pub canvas_origin: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
            canvas_origin: Vec2::ZERO,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor.max(0.01);
        self
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn physical_size(&self) -> UVec2 {
        (self.size() * self.scale_factor).ceil().max(Vec2::ONE).as_uvec2()
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.width * 0.5, self.height * 0.5 - p.y)
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x + self.width * 0.5, self.height * 0.5 - p.y)
    }

    /// True when `screen` lies more than `slack` px beyond any viewport edge.
    pub fn is_far_outside(&self, screen: Vec2, slack: f32) -> bool {
        screen.x < -slack
            || screen.y < -slack
            || screen.x > self.width + slack
            || screen.y > self.height + slack
    }
}

/// Copies the primary window's logical size and DPR into `Viewport`, touching
/// the resource only when something actually changed.
pub fn sync_viewport_from_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut vp: ResMut<Viewport>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let next = Viewport {
        width: window.width(),
        height: window.height(),
        scale_factor: window.scale_factor(),
        canvas_origin: vp.canvas_origin,
    };
    if next.width <= 0.0 || next.height <= 0.0 {
        return;
    }
    if vp.set_if_neq(next) {
        debug!(target: "skills", w = next.width, h = next.height, dpr = next.scale_factor, "viewport changed");
    }
}

/// Axis-aligned wall rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRect {
    pub side: Boundary,
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Region the dynamic bodies are kept in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    /// Screen-space rectangle between the insets.
    pub rect: Rect,
    pub wall_thickness: f32,
}

impl PlayArea {
    pub fn from_viewport(vp: &Viewport, cfg: &PlayAreaConfig) -> Self {
        let top = vp.height * cfg.top_cutoff_frac;
        let side = vp.width * cfg.side_cutoff_frac;
        let bottom = (vp.height - cfg.footer_height).max(top);
        let right = (vp.width - side).max(side);
        Self {
            rect: Rect {
                min: Vec2::new(side, top),
                max: Vec2::new(right, bottom),
            },
            wall_thickness: cfg.wall_thickness.max(1.0),
        }
    }

    /// Rectangle of valid body centers for a body of `radius`. Collapses to the
    /// center line on an axis that is too narrow.
    pub fn spawn_rect(&self, radius: f32) -> Rect {
        let c = self.rect.center();
        let inset = |lo: f32, hi: f32, mid: f32| {
            if hi - lo >= 2.0 * radius {
                (lo + radius, hi - radius)
            } else {
                (mid, mid)
            }
        };
        let (x0, x1) = inset(self.rect.min.x, self.rect.max.x, c.x);
        let (y0, y1) = inset(self.rect.min.y, self.rect.max.y, c.y);
        Rect {
            min: Vec2::new(x0, y0),
            max: Vec2::new(x1, y1),
        }
    }

    /// Whether `screen` is inside the area shrunk by `radius` on every side.
    pub fn contains_inset(&self, screen: Vec2, radius: f32) -> bool {
        let r = self.spawn_rect(radius);
        screen.x >= r.min.x && screen.x <= r.max.x && screen.y >= r.min.y && screen.y <= r.max.y
    }

    /// Four walls whose inner faces coincide with the play area edges. Horizontal
    /// walls overhang by one thickness so the corners stay closed.
    pub fn walls(&self) -> [WallRect; 4] {
        let t = self.wall_thickness;
        let c = self.rect.center();
        let half_w = self.rect.width() * 0.5 + t;
        let half_h = self.rect.height() * 0.5 + t;
        [
            WallRect {
                side: Boundary::Top,
                center: Vec2::new(c.x, self.rect.min.y - t * 0.5),
                half_extents: Vec2::new(half_w, t * 0.5),
            },
            WallRect {
                side: Boundary::Bottom,
                center: Vec2::new(c.x, self.rect.max.y + t * 0.5),
                half_extents: Vec2::new(half_w, t * 0.5),
            },
            WallRect {
                side: Boundary::Left,
                center: Vec2::new(self.rect.min.x - t * 0.5, c.y),
                half_extents: Vec2::new(t * 0.5, half_h),
            },
            WallRect {
                side: Boundary::Right,
                center: Vec2::new(self.rect.max.x + t * 0.5, c.y),
                half_extents: Vec2::new(t * 0.5, half_h),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(w: f32, h: f32) -> PlayArea {
        PlayArea::from_viewport(&Viewport::new(w, h), &PlayAreaConfig::default())
    }

    #[test]
    fn screen_world_roundtrip_and_axes() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.screen_to_world(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(vp.screen_to_world(Vec2::ZERO), Vec2::new(-400.0, 300.0));
        let p = Vec2::new(123.0, 456.0);
        assert!((vp.world_to_screen(vp.screen_to_world(p)) - p).length() < 1e-4);
    }

    #[test]
    fn insets_follow_viewport_fractions() {
        let a = area(1000.0, 800.0);
        assert!((a.rect.min.y - 72.0).abs() < 1e-4); // 9% of 800
        assert!((a.rect.min.x - 100.0).abs() < 1e-4); // 10% of 1000
        assert!((a.rect.max.x - 900.0).abs() < 1e-4);
        assert!((a.rect.max.y - 750.0).abs() < 1e-4); // footer band
    }

    #[test]
    fn walls_sit_outside_the_area() {
        let a = area(1000.0, 800.0);
        for w in a.walls() {
            let inner = match w.side {
                Boundary::Top => w.center.y + w.half_extents.y,
                Boundary::Bottom => w.center.y - w.half_extents.y,
                Boundary::Left => w.center.x + w.half_extents.x,
                Boundary::Right => w.center.x - w.half_extents.x,
            };
            let edge = match w.side {
                Boundary::Top => a.rect.min.y,
                Boundary::Bottom => a.rect.max.y,
                Boundary::Left => a.rect.min.x,
                Boundary::Right => a.rect.max.x,
            };
            assert!((inner - edge).abs() < 1e-3, "{:?} inner face off edge", w.side);
        }
    }

    #[test]
    fn spawn_rect_collapses_when_too_narrow() {
        let a = area(150.0, 800.0); // 120 px wide area, radius 60 fits exactly
        let r = a.spawn_rect(60.0);
        assert!((r.min.x - r.max.x).abs() < 1e-4);
        let tiny = area(100.0, 800.0);
        let r = tiny.spawn_rect(60.0);
        assert_eq!(r.min.x, tiny.rect.center().x);
    }

    #[test]
    fn far_outside_uses_slack() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(!vp.is_far_outside(Vec2::new(-900.0, 100.0), 1000.0));
        assert!(vp.is_far_outside(Vec2::new(-1001.0, 100.0), 1000.0));
        assert!(vp.is_far_outside(Vec2::new(10.0, 1601.0), 1000.0));
        assert!(!vp.is_far_outside(Vec2::new(1799.0, 300.0), 1000.0));
    }
}
