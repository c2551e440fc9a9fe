use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::Velocity;
use skill_balls::animation::idle::{StraightenTween, body_angle};
use skill_balls::core::config::SkillEntry;
use skill_balls::interaction::drag::ActiveDrag;
use skill_balls::interaction::pointer::PointerTracker;
use skill_balls::{BallInteraction, BodyRegistry, GameConfig, SkillBoardLogicPlugin, Viewport};

fn board() -> (App, Entity) {
    let mut cfg = GameConfig::default();
    cfg.skills = vec![SkillEntry {
        name: "Rust".into(),
        stars: 4,
        ..Default::default()
    }];
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(cfg)
        .insert_resource(Viewport::new(800.0, 600.0))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
        .add_plugins(SkillBoardLogicPlugin);
    app.update();
    let e = app.world().resource::<BodyRegistry>().get("Rust").expect("registered");
    let mut tf = app.world_mut().get_mut::<Transform>(e).expect("transform");
    tf.translation = Vec3::ZERO;
    tf.rotation = Quat::from_rotation_z(0.4);
    (app, e)
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn angle(app: &App, e: Entity) -> f32 {
    body_angle(app.world().get::<Transform>(e).expect("transform"))
}

#[test]
fn still_body_rotates_upright_after_dwell() {
    let (mut app, e) = board();

    // dwell is 1 s; nothing may happen before it elapses
    run(&mut app, 10);
    assert!((angle(&app, e) - 0.4).abs() < 1e-4);
    assert!(app.world().get::<StraightenTween>(e).is_none());

    run(&mut app, 60);
    assert!(angle(&app, e).abs() < 1e-4);
    assert_eq!(app.world().get::<Velocity>(e).expect("velocity").angvel, 0.0);
    assert!(app.world().get::<StraightenTween>(e).is_none());
}

#[test]
fn moving_body_is_left_alone() {
    let (mut app, e) = board();
    for _ in 0..40 {
        // no integrator runs here, so the speed just has to stay above the threshold
        app.world_mut().get_mut::<Velocity>(e).expect("velocity").linvel = Vec2::new(50.0, 0.0);
        app.update();
    }
    assert!((angle(&app, e) - 0.4).abs() < 1e-4);
}

#[test]
fn held_body_never_straightens_until_released() {
    let (mut app, e) = board();
    let screen = app.world().resource::<Viewport>().world_to_screen(Vec2::ZERO);
    app.world_mut().resource_mut::<PointerTracker>().position = Some(screen);
    app.world_mut().resource_mut::<ActiveDrag>().grab(e, Vec2::ZERO);

    run(&mut app, 60);
    assert_eq!(app.world().resource::<ActiveDrag>().entity, Some(e));
    assert!((angle(&app, e) - 0.4).abs() < 1e-4);
    assert!(app.world().get::<BallInteraction>(e).expect("state").idle_since.is_none());

    app.world_mut().resource_mut::<ActiveDrag>().release();
    app.world_mut().resource_mut::<PointerTracker>().position = None;
    run(&mut app, 60);
    assert!(angle(&app, e).abs() < 1e-4);
}

#[test]
fn splattered_body_keeps_its_tilt() {
    let (mut app, e) = board();
    app.world_mut().get_mut::<BallInteraction>(e).expect("state").splattered = true;
    run(&mut app, 60);
    assert!((angle(&app, e) - 0.4).abs() < 1e-4);
}

#[test]
fn wrapped_angle_takes_the_short_way() {
    let (mut app, e) = board();
    app.world_mut().get_mut::<Transform>(e).expect("transform").rotation =
        Quat::from_rotation_z(std::f32::consts::TAU - 0.3);
    // sample mid-tween: the short way home passes through small negative angles
    run(&mut app, 25);
    let mid = angle(&app, e);
    assert!(mid <= 0.0 && mid > -0.31, "mid-tween angle {mid}");
    run(&mut app, 40);
    assert!(angle(&app, e).abs() < 1e-4);
}

#[test]
fn motion_before_dwell_restarts_the_wait() {
    let (mut app, e) = board();
    run(&mut app, 9);
    app.world_mut().get_mut::<Velocity>(e).expect("velocity").linvel = Vec2::new(50.0, 0.0);
    app.update();
    app.world_mut().get_mut::<Velocity>(e).expect("velocity").linvel = Vec2::ZERO;

    // the original dwell would have completed here
    run(&mut app, 11);
    assert!(app.world().get::<StraightenTween>(e).is_none());
    assert!((angle(&app, e) - 0.4).abs() < 1e-4);

    run(&mut app, 25);
    assert!(angle(&app, e).abs() < 1e-4);
}
