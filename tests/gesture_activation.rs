use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::RigidBody;
use skill_balls::core::config::SkillEntry;
use skill_balls::interaction::drag::ActiveDrag;
use skill_balls::interaction::pointer::PointerEvent;
use skill_balls::rendering::popup::PopupPresenter;
use skill_balls::rendering::splatter_layer::SplatterLayer;
use skill_balls::{BallInteraction, BodyRegistry, GameConfig, SkillBoardLogicPlugin, Viewport};

fn skill(name: &str) -> SkillEntry {
    SkillEntry {
        name: name.into(),
        stars: 3,
        description: format!("{name} description"),
        color: "#3472A6".into(),
        icon: None,
    }
}

fn board() -> App {
    let mut cfg = GameConfig::default();
    cfg.skills = vec![skill("Rust"), skill("Go")];
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(cfg)
        .insert_resource(Viewport::new(800.0, 600.0))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)))
        .add_plugins(SkillBoardLogicPlugin);
    app.update();
    app
}

/// Pins the body at a screen position so pointer coordinates are predictable.
fn place(app: &mut App, label: &str, screen: Vec2) -> Entity {
    let e = app.world().resource::<BodyRegistry>().get(label).expect("registered");
    let world = app.world().resource::<Viewport>().screen_to_world(screen);
    app.world_mut().get_mut::<Transform>(e).expect("transform").translation = world.extend(0.0);
    e
}

fn pointer(app: &mut App, ev: PointerEvent) {
    app.world_mut().send_event(ev);
    app.update();
}

fn state(app: &App, e: Entity) -> BallInteraction {
    app.world().get::<BallInteraction>(e).expect("state").clone()
}

#[test]
fn click_on_body_splatters_it_and_opens_popup() {
    let mut app = board();
    let rust = place(&mut app, "Rust", Vec2::new(300.0, 300.0));
    place(&mut app, "Go", Vec2::new(550.0, 300.0));

    pointer(&mut app, PointerEvent::Down(Vec2::new(310.0, 305.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(313.0, 302.0)));

    assert!(state(&app, rust).splattered);
    assert!(matches!(app.world().get::<RigidBody>(rust), Some(RigidBody::Fixed)));
    assert!(app.world().resource::<SplatterLayer>().has_painted(rust));
    let popup = app.world().resource::<PopupPresenter>();
    assert_eq!(popup.bound(), Some(rust));
    assert!(popup.text().starts_with("Rust ★★★☆☆\n"));
    assert!(popup.text().ends_with("Rust description"));
    // the press grabbed the body but a click must not leave it held
    assert_eq!(app.world().resource::<ActiveDrag>().entity, None);
}

#[test]
fn drag_never_activates() {
    let mut app = board();
    let rust = place(&mut app, "Rust", Vec2::new(300.0, 300.0));
    place(&mut app, "Go", Vec2::new(550.0, 300.0));

    pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
    assert_eq!(app.world().resource::<ActiveDrag>().entity, Some(rust));
    pointer(&mut app, PointerEvent::Move(Vec2::new(340.0, 300.0)));
    // coming back near the origin keeps it a drag
    pointer(&mut app, PointerEvent::Move(Vec2::new(301.0, 300.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(301.0, 300.0)));

    assert!(!state(&app, rust).splattered);
    assert!(!app.world().resource::<PopupPresenter>().is_open());
    assert_eq!(app.world().resource::<SplatterLayer>().painted_count(), 0);
    assert_eq!(app.world().resource::<ActiveDrag>().entity, None);
}

#[test]
fn click_on_empty_space_closes_popup() {
    let mut app = board();
    let rust = place(&mut app, "Rust", Vec2::new(300.0, 300.0));
    place(&mut app, "Go", Vec2::new(550.0, 300.0));

    pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(300.0, 300.0)));
    assert!(app.world().resource::<PopupPresenter>().is_open());

    pointer(&mut app, PointerEvent::Down(Vec2::new(700.0, 80.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(700.0, 80.0)));
    assert!(!app.world().resource::<PopupPresenter>().is_open());
    // closing the popup leaves the paint and the frozen body alone
    assert!(state(&app, rust).splattered);
}

#[test]
fn clicking_a_splattered_body_reopens_popup_without_repainting() {
    let mut app = board();
    let rust = place(&mut app, "Rust", Vec2::new(300.0, 300.0));
    let go = place(&mut app, "Go", Vec2::new(550.0, 300.0));

    for _ in 0..2 {
        pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
        pointer(&mut app, PointerEvent::Up(Vec2::new(300.0, 300.0)));
    }
    pointer(&mut app, PointerEvent::Down(Vec2::new(550.0, 300.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(550.0, 300.0)));
    assert_eq!(app.world().resource::<PopupPresenter>().bound(), Some(go));

    pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(300.0, 300.0)));
    assert_eq!(app.world().resource::<PopupPresenter>().bound(), Some(rust));
    assert_eq!(app.world().resource::<SplatterLayer>().painted_count(), 2);
}

#[test]
fn splattered_body_cannot_be_grabbed() {
    let mut app = board();
    place(&mut app, "Rust", Vec2::new(300.0, 300.0));
    place(&mut app, "Go", Vec2::new(550.0, 300.0));

    pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
    pointer(&mut app, PointerEvent::Up(Vec2::new(300.0, 300.0)));
    pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
    assert_eq!(app.world().resource::<ActiveDrag>().entity, None);
}

#[test]
fn pointer_leaving_cancels_the_press() {
    let mut app = board();
    let rust = place(&mut app, "Rust", Vec2::new(300.0, 300.0));
    place(&mut app, "Go", Vec2::new(550.0, 300.0));

    pointer(&mut app, PointerEvent::Down(Vec2::new(300.0, 300.0)));
    pointer(&mut app, PointerEvent::Left);
    pointer(&mut app, PointerEvent::Up(Vec2::new(300.0, 300.0)));
    assert!(!state(&app, rust).splattered);
    assert_eq!(app.world().resource::<ActiveDrag>().entity, None);
}
