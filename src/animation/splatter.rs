//! One-shot paint burst played when a body is first activated.
//!
//! The burst is planned up front from the RNG, then played by a detached
//! `SplatterBurst` entity that owns a copy of everything it needs. It therefore
//! runs to completion even if the body it came from goes away.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::animation::tween::Easing;
use crate::core::config::SplatterConfig;
use crate::rendering::splatter_layer::SplatterLayer;

/// Round paint drop, offset from the body center in screen px (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    pub offset: Vec2,
    pub radius: f32,
    /// Seconds after the burst starts before this drop begins to travel.
    pub delay: f32,
}

/// Stretched ellipse laid along its travel direction. Doubles as an exclusion
/// zone for droplets generated after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drip {
    pub offset: Vec2,
    pub half_axes: Vec2,
    pub rotation: f32,
}

impl Drip {
    pub fn contains(&self, p: Vec2) -> bool {
        let d = p - self.offset;
        let (sin, cos) = self.rotation.sin_cos();
        let local = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos);
        (local.x / self.half_axes.x).powi(2) + (local.y / self.half_axes.y).powi(2) <= 1.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BurstPlan {
    pub droplets: Vec<Droplet>,
    pub drips: Vec<Drip>,
    /// Droplets dropped because they landed inside an earlier drip.
    pub suppressed: usize,
}

impl BurstPlan {
    pub fn push_drip(&mut self, offset: Vec2, radius: f32, stretch: f32, rotation: f32) {
        self.drips.push(Drip {
            offset,
            half_axes: Vec2::new(radius * stretch.max(1.0), radius),
            rotation,
        });
    }

    /// Keeps the droplet unless it lands inside a drip already placed.
    pub fn push_droplet(&mut self, droplet: Droplet) -> bool {
        if self.drips.iter().any(|d| d.contains(droplet.offset)) {
            self.suppressed += 1;
            return false;
        }
        self.droplets.push(droplet);
        true
    }

    pub fn descriptor_count(&self) -> usize {
        self.droplets.len() + self.drips.len() + self.suppressed
    }
}

fn ordered<T: PartialOrd + Copy>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Plans a burst for a body of `body_radius`. Distances follow `u^bias_exponent`
/// scaled to `spread * body_radius`, so exponents above one crowd the center.
pub fn generate_burst<R: Rng + ?Sized>(rng: &mut R, body_radius: f32, cfg: &SplatterConfig) -> BurstPlan {
    let (n_lo, n_hi) = ordered(cfg.droplets.min, cfg.droplets.max);
    let (r_lo, r_hi) = ordered(cfg.droplet_radius.min.max(0.1), cfg.droplet_radius.max.max(0.1));
    let reach = cfg.spread.max(0.0) * body_radius;
    let bias = cfg.bias_exponent.max(0.01);
    let drip_p = cfg.drip_probability.clamp(0.0, 1.0);

    let count = rng.gen_range(n_lo..=n_hi);
    let mut plan = BurstPlan::default();
    for _ in 0..count {
        let angle = rng.gen_range(0.0..TAU);
        let dist = reach * rng.gen_range(0.0f32..1.0).powf(bias);
        let radius = rng.gen_range(r_lo..=r_hi);
        let delay = if cfg.max_delay > 0.0 {
            rng.gen_range(0.0..=cfg.max_delay)
        } else {
            0.0
        };
        let offset = Vec2::from_angle(angle) * dist;
        if rng.gen_bool(drip_p) {
            plan.push_drip(offset, radius, cfg.drip_stretch, angle);
        } else {
            plan.push_droplet(Droplet { offset, radius, delay });
        }
    }
    plan
}

/// Detached burst player. Screen-space center is captured at activation.
#[derive(Component, Debug, Clone)]
pub struct SplatterBurst {
    pub body: Entity,
    pub center: Vec2,
    pub body_radius: f32,
    pub color: [u8; 4],
    pub plan: BurstPlan,
    pub start: f32,
    pub duration: f32,
}

impl SplatterBurst {
    /// Eased travel fraction of one droplet at `now`.
    fn droplet_travel(&self, d: &Droplet, now: f32) -> Option<f32> {
        let local = now - self.start - d.delay;
        if local < 0.0 {
            return None;
        }
        let span = (self.duration - d.delay).max(1e-4);
        Some(Easing::CubicOut.apply(local / span))
    }

    pub fn finished(&self, now: f32) -> bool {
        now - self.start >= self.duration
    }
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_splatter_burst<R: Rng + ?Sized>(
    commands: &mut Commands,
    rng: &mut R,
    cfg: &SplatterConfig,
    body: Entity,
    center: Vec2,
    body_radius: f32,
    color: [u8; 4],
    now: f32,
) {
    let plan = generate_burst(rng, body_radius, cfg);
    debug!(
        target: "splatter",
        ?body,
        droplets = plan.droplets.len(),
        drips = plan.drips.len(),
        suppressed = plan.suppressed,
        "splatter burst planned"
    );
    commands.spawn((
        SplatterBurst {
            body,
            center,
            body_radius,
            color,
            plan,
            start: now,
            duration: cfg.duration.max(0.0),
        },
        Name::new("SplatterBurst"),
    ));
}

/// Paints in-flight droplets each frame, then the final marks, then despawns.
pub fn advance_splatter_bursts(
    mut commands: Commands,
    time: Res<Time>,
    mut layer: ResMut<SplatterLayer>,
    bursts: Query<(Entity, &SplatterBurst)>,
) {
    let now = time.elapsed_secs();
    for (entity, burst) in &bursts {
        let canvas = layer.canvas_mut();
        if burst.finished(now) {
            for d in &burst.plan.droplets {
                canvas.fill_circle(burst.center + d.offset, d.radius, burst.color);
            }
            for drip in &burst.plan.drips {
                canvas.fill_ellipse(burst.center + drip.offset, drip.half_axes, drip.rotation, burst.color);
            }
            canvas.fill_circle(burst.center, burst.body_radius, burst.color);
            info!(target: "splatter", body = ?burst.body, "splatter painted");
            commands.entity(entity).despawn();
            continue;
        }
        for d in &burst.plan.droplets {
            if let Some(t) = burst.droplet_travel(d, now) {
                canvas.fill_circle(burst.center + d.offset * t, d.radius * t.max(0.35), burst.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn burst_counts_and_bounds() {
        let cfg = SplatterConfig::default();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = generate_burst(&mut rng, 60.0, &cfg);
            let n = plan.descriptor_count();
            assert!((20..=40).contains(&n), "seed {seed}: {n} descriptors");
            for d in &plan.droplets {
                assert!(d.offset.length() <= 1.8 * 60.0 + 1e-3);
                assert!((3.0..=11.0).contains(&d.radius));
                assert!((0.0..=0.05).contains(&d.delay));
            }
            for drip in &plan.drips {
                assert!(drip.half_axes.x >= drip.half_axes.y);
            }
        }
    }

    #[test]
    fn later_droplets_inside_drips_are_suppressed() {
        let mut plan = BurstPlan::default();
        let early = Droplet {
            offset: Vec2::new(12.0, 0.0),
            radius: 4.0,
            delay: 0.0,
        };
        assert!(plan.push_droplet(early));
        plan.push_drip(Vec2::new(10.0, 0.0), 6.0, 2.6, 0.0);
        // earlier droplet stays even though the drip now covers it
        assert_eq!(plan.droplets.len(), 1);
        assert!(!plan.push_droplet(Droplet {
            offset: Vec2::new(20.0, 1.0),
            ..early
        }));
        assert!(plan.push_droplet(Droplet {
            offset: Vec2::new(-40.0, 0.0),
            ..early
        }));
        assert_eq!(plan.suppressed, 1);
        assert_eq!(plan.descriptor_count(), 4);

        // forcing every descriptor to be a drip leaves no droplets
        let all_drips = SplatterConfig {
            drip_probability: 1.0,
            ..SplatterConfig::default()
        };
        let plan = generate_burst(&mut StdRng::seed_from_u64(1), 60.0, &all_drips);
        assert!(plan.droplets.is_empty());
        assert_eq!(plan.suppressed, 0);
    }

    #[test]
    fn droplet_at_drip_center_is_suppressed() {
        let drip = Drip {
            offset: Vec2::new(10.0, 0.0),
            half_axes: Vec2::new(20.0, 5.0),
            rotation: 0.0,
        };
        assert!(drip.contains(Vec2::new(25.0, 0.0)));
        assert!(!drip.contains(Vec2::new(10.0, 8.0)));
        let turned = Drip {
            rotation: std::f32::consts::FRAC_PI_2,
            ..drip
        };
        assert!(turned.contains(Vec2::new(10.0, 18.0)));
    }

    #[test]
    fn power_law_crowds_the_center() {
        let cfg = SplatterConfig {
            drip_probability: 0.0,
            droplets: crate::core::config::SpawnRange { min: 400, max: 400 },
            ..SplatterConfig::default()
        };
        let plan = generate_burst(&mut StdRng::seed_from_u64(9), 50.0, &cfg);
        let reach = 1.8 * 50.0;
        let inner = plan
            .droplets
            .iter()
            .filter(|d| d.offset.length() < reach * 0.5)
            .count();
        // u^2 < 0.5 for ~71% of samples
        assert!(inner > plan.droplets.len() * 6 / 10, "{inner}");
    }

    #[test]
    fn burst_runs_once_and_despawns() {
        use crate::core::viewport::Viewport;
        use bevy::time::TimeUpdateStrategy;
        use std::time::Duration;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)))
            .insert_resource(SplatterLayer::new(&Viewport::new(400.0, 400.0)))
            .add_systems(Update, advance_splatter_bursts);
        app.update();

        let body = app.world_mut().spawn_empty().id();
        let now = app.world().resource::<Time>().elapsed_secs();
        let cfg = SplatterConfig::default();
        let plan = generate_burst(&mut StdRng::seed_from_u64(3), 60.0, &cfg);
        app.world_mut().spawn(SplatterBurst {
            body,
            center: Vec2::new(200.0, 200.0),
            body_radius: 60.0,
            color: [200, 40, 40, 255],
            plan,
            start: now,
            duration: cfg.duration,
        });
        // body vanishing mid-burst does not stop it
        app.world_mut().despawn(body);

        for _ in 0..8 {
            app.update();
        }
        let mut q = app.world_mut().query::<&SplatterBurst>();
        assert_eq!(q.iter(app.world()).count(), 0);
        let layer = app.world().resource::<SplatterLayer>();
        assert_eq!(layer.canvas().pixel(200, 200), Some([200, 40, 40, 255]));
        assert!(layer.canvas().pixel(200, 250).is_some_and(|p| p[3] == 255));
    }
}
