//! Camera navigation controller.
//!
//! `Navigation` turns pointer, wheel, key, focus and timer events into camera
//! motion. It supports free-flight ("FPS") navigation, driven by a 25 Hz tick
//! while the viewport captures mouse and keyboard, and three pivot-centred
//! turntable gestures on the middle mouse button (rotate, shift with Shift,
//! zoom with Ctrl), integrated directly on every pointer move.
//!
//! All state lives on the UI thread; every method runs to completion between
//! two events. The viewport is reached only through the [`Viewport`] trait,
//! so navigation can be driven headlessly.

use std::ops::RangeInclusive;
use std::time::Duration;

use log::{debug, trace, warn};
use nalgebra::{Point2, Point3, Vector2, Vector3};

use crate::camera::Camera;
use crate::distance::{recentre, viewport_center};
use crate::error::PreferenceError;
use crate::frame::{Frame, angle_axis};
use crate::input::{
    InputEvent, Key, KeyEvent, Modifiers, MouseButton, PointerEvent, TimerId, WheelEvent,
};
use crate::integrator::{self, StepInput};
use crate::mode::{Mode, PressAction, press_action};
use crate::preferences::{MOUSE_SENSITIVITY_KEY, PreferenceStore};
use crate::sensitivity::{
    self, MOUSE_SENSITIVITY_RANGE, clamp_frame_duration, clamp_mouse_force,
    clamp_mouse_sensitivity_value, incr_base_movement_speed, tilt_angle,
};
use crate::viewport::{Aabb, CursorStyle, Viewport};

/// Interval of the FPS integration tick (25 Hz).
pub const FPS_TICK_INTERVAL: Duration = Duration::from_millis(40);

const INITIAL_FRAME_DURATION: f32 = 0.04;

/// Roll speed multiplier for Ctrl+Shift+wheel.
const FAST_TILT_FACTOR: f32 = 4.0;

/// Outgoing notifications for the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Carries the value that was requested, before clamping.
    MouseSensitivityChanged(i32),
    /// Alt+F4 was pressed during FPS navigation.
    QuitRequested,
}

pub struct Navigation<V: Viewport> {
    viewport: V,
    preferences: Box<dyn PreferenceStore>,
    camera: Camera,

    mode: Mode,
    fps_start_frame: Frame,
    fps_timer: Option<TimerId>,
    num_frames_in_fps_mode: u32,

    last_mouse_pos: Point2<f32>,
    mouse_force: Vector2<f32>,

    held_keys: Vec<Key>,
    key_direction: Vector3<f32>,
    key_speed: i32,
    key_force: Vector3<f32>,

    base_movement_speed: i32,
    mouse_sensitivity_value: i32,

    turntable_origin: Point3<f32>,
    turntable_origin_relative_to_camera: Point3<f32>,

    last_frame_duration: f32,
    notifications: Vec<Notification>,
}

impl<V: Viewport> Navigation<V> {
    /// Creates an idle navigation controller with an identity camera and
    /// loads the mouse sensitivity from `preferences`.
    pub fn new(viewport: V, preferences: impl PreferenceStore + 'static) -> Self {
        let mouse_sensitivity_value = preferences
            .int(MOUSE_SENSITIVITY_KEY)
            .map(|value| {
                clamp_mouse_sensitivity_value(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
            })
            .unwrap_or(0);
        let camera = Camera::default();

        Self {
            viewport,
            preferences: Box::new(preferences),
            camera,
            mode: Mode::Idle,
            fps_start_frame: camera.frame,
            fps_timer: None,
            num_frames_in_fps_mode: 0,
            last_mouse_pos: Point2::origin(),
            mouse_force: Vector2::zeros(),
            held_keys: Vec::new(),
            key_direction: Vector3::zeros(),
            key_speed: 0,
            key_force: Vector3::zeros(),
            base_movement_speed: 0,
            mouse_sensitivity_value,
            turntable_origin: Point3::origin(),
            turntable_origin_relative_to_camera: camera.frame.inverse().apply(&Point3::origin()),
            last_frame_duration: INITIAL_FRAME_DURATION,
            notifications: Vec::new(),
        }
    }

    /// Dispatches any input event to its handler.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::MouseMove(pointer) => self.mouse_move_event(pointer),
            InputEvent::MousePress(pointer) => self.mouse_press_event(pointer),
            InputEvent::MouseRelease(pointer) => self.mouse_release_event(pointer),
            InputEvent::Wheel(wheel) => self.wheel_event(wheel),
            InputEvent::KeyPress(key) => self.key_press_event(key),
            InputEvent::KeyRelease(key) => self.key_release_event(key),
            InputEvent::FocusOut => self.focus_out_event(),
            InputEvent::Tick(timer) => self.timer_event(*timer),
            InputEvent::FrameRendered(duration) => self.update_frame_render_duration(*duration),
        }
    }

    pub fn start_fps_navigation(&mut self) {
        if self.mode != Mode::Idle {
            return;
        }

        self.fps_start_frame = self.camera.frame;
        self.fps_timer = Some(self.viewport.start_timer(FPS_TICK_INTERVAL));
        self.reset_key_accumulators();
        self.num_frames_in_fps_mode = 0;
        self.enable_mode(Mode::Fps);
        self.viewport.grab_mouse(CursorStyle::Blank);
        self.viewport.grab_keyboard();
        self.viewport.set_mouse_tracking(true);
    }

    /// Leaves FPS navigation. Without `keep_changes` the camera returns to
    /// where it was when FPS navigation started.
    pub fn stop_fps_navigation(&mut self, keep_changes: bool) {
        if self.mode != Mode::Fps {
            return;
        }

        if !keep_changes {
            self.camera.frame = self.fps_start_frame;
            self.viewport.request_redraw();
        }

        if let Some(timer) = self.fps_timer.take() {
            self.viewport.kill_timer(timer);
        }
        self.reset_key_accumulators();
        self.disable_mode(Mode::Fps);
        self.viewport.release_keyboard();
        self.viewport.release_mouse();
        self.viewport.set_mouse_tracking(false);
        debug!(
            "FPS navigation stopped after {} ticks (keep changes: {keep_changes})",
            self.num_frames_in_fps_mode
        );
    }

    pub fn reset_camera_location(&mut self) {
        self.camera.frame = Frame::identity();
        self.turntable_origin = Point3::origin();
        self.turntable_origin_relative_to_camera =
            Frame::identity().inverse().apply(&Point3::origin());

        self.viewport.set_turntable_origin(self.turntable_origin);
        self.viewport.request_redraw();
    }

    pub fn reset_movement_speed(&mut self) {
        self.base_movement_speed = 0;
    }

    /// Levels the camera so its up vector points towards world `+Z`.
    pub fn reset_camera_tilt(&mut self) {
        self.camera.frame = self.camera.frame.remove_tilt();
        self.viewport.request_redraw();
    }

    /// Rolls the camera about its view direction. `scaled_delta` is a wheel
    /// angle delta (one detent is 120) times the modifier speed factor.
    pub fn tilt_camera(&mut self, scaled_delta: f32) {
        let forward = self.camera.frame.forward();
        let rotation = angle_axis(tilt_angle(scaled_delta), &forward);

        self.camera.frame.orientation = rotation * self.camera.frame.orientation;
        self.camera.frame = self.camera.frame.renormalized();
        self.viewport.request_redraw();
    }

    /// Places the pivot explicitly, e.g. after picking a point. The pivot
    /// stays attached to the camera until the next zoom gesture.
    pub fn set_turntable_origin(&mut self, origin: Point3<f32>) {
        self.turntable_origin = origin;
        self.turntable_origin_relative_to_camera = self.camera.frame.inverse().apply(&origin);

        self.viewport.set_turntable_origin(origin);
        self.viewport.request_redraw();
    }

    /// Pivot candidate: the camera-attached pivot, clamped into the scene
    /// bounds when there are any.
    pub fn find_best_turntable_origin(&self) -> Point3<f32> {
        let candidate = self.camera.frame.apply(&self.turntable_origin_relative_to_camera);

        match self.viewport.aabb().filter(Aabb::is_valid) {
            Some(aabb) => aabb.clamp(&candidate),
            None => candidate,
        }
    }

    pub fn update_frame_render_duration(&mut self, duration: Duration) {
        self.last_frame_duration = clamp_frame_duration(duration.as_secs_f32());
    }

    pub fn wheel_event(&mut self, event: &WheelEvent) {
        if self.mode != Mode::Fps {
            return;
        }

        let delta = event.angle_delta.y;
        if event.modifiers == Modifiers::NONE {
            self.base_movement_speed = incr_base_movement_speed(self.base_movement_speed, delta);
        } else if event.modifiers == Modifiers::CTRL {
            self.tilt_camera(delta as f32);
        } else if event.modifiers == Modifiers::CTRL | Modifiers::SHIFT {
            self.tilt_camera(delta as f32 * FAST_TILT_FACTOR);
        }
    }

    pub fn mouse_move_event(&mut self, event: &PointerEvent) {
        let position = event.position;
        let mut handle_event = !event.synthetic;

        if self.mode == Mode::Fps {
            let center = viewport_center(self.viewport.size());
            let decision = recentre(position, self.last_mouse_pos, center);

            if let Some(target) = decision.warp_to {
                self.viewport.warp_cursor(target);
            }
            if !decision.accept {
                trace!("dropping pointer jump to {position:?}");
                handle_event = false;
            }
        }

        if handle_event {
            let delta = position - self.last_mouse_pos;
            let force =
                sensitivity::mouse_force(delta, self.mouse_sensitivity(), self.last_frame_duration);
            self.mouse_force = clamp_mouse_force(self.mouse_force + force);

            if self.mode.is_turntable() {
                self.navigate();
                self.viewport.request_redraw();
            }
        }

        self.last_mouse_pos = position;
    }

    pub fn mouse_press_event(&mut self, event: &PointerEvent) {
        let Some(button) = event.button else {
            return;
        };

        match press_action(self.mode, button, event.modifiers) {
            Some(PressAction::StopFps { keep_changes }) => self.stop_fps_navigation(keep_changes),
            Some(PressAction::ResetTilt) => self.reset_camera_tilt(),
            Some(PressAction::EnterTurntable(mode)) => {
                self.turntable_origin = self.find_best_turntable_origin();
                self.last_mouse_pos = event.position;

                self.viewport.set_turntable_origin(self.turntable_origin);
                self.viewport.request_redraw();

                self.enable_mode(mode);
            }
            None => {}
        }
    }

    pub fn mouse_release_event(&mut self, event: &PointerEvent) {
        if event.button == Some(MouseButton::Middle) {
            for mode in Mode::TURNTABLE {
                self.disable_mode(mode);
            }
        }
    }

    pub fn key_press_event(&mut self, event: &KeyEvent) {
        if self.mode != Mode::Fps {
            return;
        }

        match (event.key, event.modifiers) {
            (Key::Enter | Key::Return, Modifiers::NONE) => {
                self.stop_fps_navigation(true);
                return;
            }
            (Key::Escape, Modifiers::NONE) => {
                self.stop_fps_navigation(false);
                return;
            }
            (Key::F4, Modifiers::ALT) => {
                self.stop_fps_navigation(true);
                self.notifications.push(Notification::QuitRequested);
                return;
            }
            _ => {}
        }

        let key = event.key;
        if !key.is_movement_key() || self.held_keys.contains(&key) {
            return;
        }
        self.held_keys.push(key);
        self.key_direction += key.direction();
        self.key_speed += key.speed();
        self.update_key_force();
    }

    pub fn key_release_event(&mut self, event: &KeyEvent) {
        let key = event.key;
        let Some(index) = self.held_keys.iter().position(|held| *held == key) else {
            return;
        };
        self.held_keys.swap_remove(index);
        self.key_direction -= key.direction();
        self.key_speed -= key.speed();
        self.update_key_force();
    }

    /// Losing focus returns to idle: FPS navigation stops keeping the camera
    /// where it is, and a turntable drag ends as if the button was released.
    pub fn focus_out_event(&mut self) {
        self.stop_fps_navigation(true);
        if self.mode.is_turntable() {
            self.disable_mode(self.mode);
        }
    }

    pub fn timer_event(&mut self, timer: TimerId) {
        if self.fps_timer != Some(timer) || self.mode != Mode::Fps {
            return;
        }

        // The cursor grab may have produced a large first delta.
        if self.num_frames_in_fps_mode == 0 {
            self.mouse_force = Vector2::zeros();
        }

        self.navigate();
        self.viewport.request_redraw();
        self.num_frames_in_fps_mode = self.num_frames_in_fps_mode.saturating_add(1);
    }

    pub fn mouse_sensitivity_value_range(&self) -> RangeInclusive<i32> {
        MOUSE_SENSITIVITY_RANGE
    }

    pub fn mouse_sensitivity_value(&self) -> i32 {
        self.mouse_sensitivity_value
    }

    /// Stores `value` clamped into range and reports the requested value.
    pub fn set_mouse_sensitivity_value(&mut self, value: i32) {
        if self.mouse_sensitivity_value == value {
            return;
        }

        self.mouse_sensitivity_value = clamp_mouse_sensitivity_value(value);
        self.notifications.push(Notification::MouseSensitivityChanged(value));
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        sensitivity::mouse_sensitivity(self.mouse_sensitivity_value)
    }

    pub fn base_movement_speed_value(&self) -> i32 {
        self.base_movement_speed
    }

    pub fn base_movement_speed(&self) -> f32 {
        sensitivity::base_movement_speed(self.base_movement_speed)
    }

    /// Writes the persisted preferences back to the store.
    pub fn persist_preferences(&mut self) -> Result<(), PreferenceError> {
        self.preferences
            .set_int(MOUSE_SENSITIVITY_KEY, i64::from(self.mouse_sensitivity_value))
    }

    /// Drains pending notifications in the order they were raised.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replaces the camera pose, e.g. when loading a scene.
    pub fn set_camera_frame(&mut self, frame: Frame) {
        self.camera.frame = frame;
        self.viewport.request_redraw();
    }

    pub fn fps_timer(&self) -> Option<TimerId> {
        self.fps_timer
    }

    pub fn num_frames_in_fps_mode(&self) -> u32 {
        self.num_frames_in_fps_mode
    }

    pub fn mouse_force(&self) -> Vector2<f32> {
        self.mouse_force
    }

    pub fn key_direction(&self) -> Vector3<f32> {
        self.key_direction
    }

    pub fn key_speed(&self) -> i32 {
        self.key_speed
    }

    pub fn key_force(&self) -> Vector3<f32> {
        self.key_force
    }

    pub fn turntable_origin(&self) -> Point3<f32> {
        self.turntable_origin
    }

    pub fn turntable_origin_relative_to_camera(&self) -> Point3<f32> {
        self.turntable_origin_relative_to_camera
    }

    pub fn last_frame_duration(&self) -> f32 {
        self.last_frame_duration
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    fn navigate(&mut self) {
        if self.mode == Mode::Idle {
            return;
        }

        let input = StepInput {
            mouse_force: self.mouse_force,
            key_force: self.key_force,
            movement_speed: self.base_movement_speed(),
        };
        integrator::navigate(self.mode, &mut self.camera.frame, &mut self.turntable_origin, &input);
        trace!("{} step: {:?}", self.mode, self.camera.frame.position);

        self.mouse_force = Vector2::zeros();
    }

    fn enable_mode(&mut self, mode: Mode) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }

        debug!("navigation mode: {} -> {mode}", self.mode);
        self.mode = mode;
        self.mouse_force = Vector2::zeros();
        true
    }

    fn disable_mode(&mut self, mode: Mode) -> bool {
        if self.mode != mode {
            return false;
        }

        // After a zoom the pivot stays fixed in the world, so later gestures
        // keep zooming towards the same point.
        if mode == Mode::TurntableZoom {
            self.turntable_origin_relative_to_camera =
                self.camera.frame.inverse().apply(&self.turntable_origin);
        }

        debug!("navigation mode: {mode} -> {}", Mode::Idle);
        self.mode = Mode::Idle;

        let origin = self.find_best_turntable_origin();
        self.viewport.set_turntable_origin(origin);
        self.viewport.request_redraw();
        true
    }

    fn reset_key_accumulators(&mut self) {
        self.held_keys.clear();
        self.key_direction = Vector3::zeros();
        self.key_speed = 0;
        self.update_key_force();
    }

    fn update_key_force(&mut self) {
        self.key_force = sensitivity::key_force(&self.key_direction, self.key_speed);
    }
}

impl<V: Viewport> Drop for Navigation<V> {
    fn drop(&mut self) {
        self.stop_fps_navigation(true);

        if let Err(err) = self.persist_preferences() {
            warn!("could not save navigation preferences: {err}");
        }
    }
}
