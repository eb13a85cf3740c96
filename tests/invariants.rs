//! Randomized event streams checked against the navigation invariants after
//! every event.

use std::time::Duration;

use nalgebra::{Point2, Point3, Vector2};
use pointcloud_navigation::input::{
    Key, KeyEvent, Modifiers, MouseButton, PointerEvent, TimerId, WheelEvent,
};
use pointcloud_navigation::preferences::MemoryPreferences;
use pointcloud_navigation::sensitivity::{BASE_MOVEMENT_SPEED_RANGE, MOUSE_SENSITIVITY_RANGE};
use pointcloud_navigation::{Aabb, HeadlessViewport, InputEvent, Mode, Navigation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MODIFIERS: [Modifiers; 6] = [
    Modifiers::NONE,
    Modifiers::NONE,
    Modifiers::SHIFT,
    Modifiers::CTRL,
    Modifiers::ALT,
    Modifiers::NONE,
];

const KEYS: [Key; 15] = [
    Key::W,
    Key::A,
    Key::S,
    Key::D,
    Key::Q,
    Key::E,
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Shift,
    Key::Enter,
    Key::Escape,
    Key::F4,
    Key::Other,
];

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Commands beyond input events that a host UI may call at any time.
#[derive(Debug)]
enum Action {
    Event(InputEvent),
    StartFps,
    SetSensitivity(i32),
    ResetCamera,
    ResetTilt,
    ResetSpeed,
}

fn random_modifiers(rng: &mut StdRng) -> Modifiers {
    let modifiers = MODIFIERS[rng.gen_range(0..MODIFIERS.len())];
    if modifiers == Modifiers::CTRL && rng.gen_bool(0.3) {
        Modifiers::CTRL | Modifiers::SHIFT
    } else {
        modifiers
    }
}

fn random_position(rng: &mut StdRng) -> Point2<f32> {
    Point2::new(rng.gen_range(-50.0..850.0), rng.gen_range(-50.0..650.0))
}

fn random_key_event(rng: &mut StdRng) -> KeyEvent {
    KeyEvent::new(KEYS[rng.gen_range(0..KEYS.len())], random_modifiers(rng))
}

fn random_action(rng: &mut StdRng, nav: &Navigation<HeadlessViewport>) -> Action {
    let event = match rng.gen_range(0..100) {
        0..=34 => InputEvent::MouseMove(PointerEvent {
            modifiers: random_modifiers(rng),
            synthetic: rng.gen_bool(0.1),
            ..PointerEvent::moved(random_position(rng))
        }),
        35..=41 => InputEvent::MousePress(PointerEvent::button(
            random_position(rng),
            BUTTONS[rng.gen_range(0..BUTTONS.len())],
            random_modifiers(rng),
        )),
        42..=48 => InputEvent::MouseRelease(PointerEvent::button(
            random_position(rng),
            BUTTONS[rng.gen_range(0..BUTTONS.len())],
            random_modifiers(rng),
        )),
        49..=56 => InputEvent::Wheel(WheelEvent {
            angle_delta: Vector2::new(0, rng.gen_range(-3..=3) * 120),
            modifiers: random_modifiers(rng),
        }),
        57..=66 => InputEvent::KeyPress(random_key_event(rng)),
        67..=76 => InputEvent::KeyRelease(random_key_event(rng)),
        77..=86 => {
            let timer = match nav.fps_timer() {
                Some(timer) if rng.gen_bool(0.9) => timer,
                _ => TimerId(rng.gen_range(0..1000)),
            };
            InputEvent::Tick(timer)
        }
        87..=88 => InputEvent::FocusOut,
        89..=91 => InputEvent::FrameRendered(Duration::from_millis(rng.gen_range(0..300))),
        92..=95 => return Action::StartFps,
        96 => return Action::SetSensitivity(rng.gen_range(-300..=300)),
        97 => return Action::ResetCamera,
        98 => return Action::ResetTilt,
        _ => return Action::ResetSpeed,
    };
    Action::Event(event)
}

fn apply(nav: &mut Navigation<HeadlessViewport>, action: &Action) {
    match action {
        Action::Event(event) => nav.handle_event(event),
        Action::StartFps => nav.start_fps_navigation(),
        Action::SetSensitivity(value) => nav.set_mouse_sensitivity_value(*value),
        Action::ResetCamera => nav.reset_camera_location(),
        Action::ResetTilt => nav.reset_camera_tilt(),
        Action::ResetSpeed => nav.reset_movement_speed(),
    }
}

fn check_invariants(nav: &Navigation<HeadlessViewport>, step: usize, action: &Action) {
    let context = format!("step {step} after {action:?}");

    let norm = nav.camera().frame.orientation.quaternion().norm();
    assert!((norm - 1.0).abs() < 1e-5, "{context}: orientation norm {norm}");

    let fps = nav.mode() == Mode::Fps;
    assert_eq!(nav.fps_timer().is_some(), fps, "{context}: tick vs mode {}", nav.mode());
    assert_eq!(nav.viewport().timer().is_some(), fps, "{context}: viewport timer");
    assert_eq!(nav.viewport().input_captured(), fps, "{context}: input capture");

    assert!(MOUSE_SENSITIVITY_RANGE.contains(&nav.mouse_sensitivity_value()), "{context}");
    assert!(BASE_MOVEMENT_SPEED_RANGE.contains(&nav.base_movement_speed_value()), "{context}");

    if matches!(action, Action::Event(InputEvent::FocusOut)) {
        assert_eq!(nav.mode(), Mode::Idle, "{context}: focus loss");
    }

    let released = nav.key_direction().norm() <= 0.5;
    assert_eq!(
        nav.key_force().norm() == 0.0,
        released,
        "{context}: key force {:?}",
        nav.key_force()
    );
}

fn run(seed: u64, steps: usize, viewport: HeadlessViewport) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut nav = Navigation::new(viewport, MemoryPreferences::new());

    for step in 0..steps {
        let action = random_action(&mut rng, &nav);
        apply(&mut nav, &action);
        nav.take_notifications();
        check_invariants(&nav, step, &action);
    }
}

#[test]
fn random_streams_keep_invariants() {
    for seed in 0..8 {
        run(seed, 3000, HeadlessViewport::new(800, 600));
    }
}

#[test]
fn random_streams_with_scene_bounds_keep_invariants() {
    let bounds = Aabb::new(Point3::new(-20.0, -20.0, -2.0), Point3::new(20.0, 20.0, 6.0));
    for seed in 100..104 {
        run(seed, 3000, HeadlessViewport::new(1024, 768).with_aabb(bounds));
    }
}

#[test]
fn key_accumulators_reset_on_every_fps_entry() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut nav = Navigation::new(HeadlessViewport::default(), MemoryPreferences::new());

    for _ in 0..200 {
        nav.start_fps_navigation();
        assert_eq!(nav.key_speed(), 0);
        assert_eq!(nav.key_direction().norm(), 0.0);

        for _ in 0..rng.gen_range(1..20) {
            let key = KEYS[rng.gen_range(0..11)];
            let event = if rng.gen_bool(0.6) {
                InputEvent::KeyPress(KeyEvent::new(key, Modifiers::NONE))
            } else {
                InputEvent::KeyRelease(KeyEvent::new(key, Modifiers::NONE))
            };
            nav.handle_event(&event);
            assert!((0..=1).contains(&nav.key_speed()));
        }
        nav.stop_fps_navigation(rng.gen_bool(0.5));
    }
}
