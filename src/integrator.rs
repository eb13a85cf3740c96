//! Per-step camera updates for each interaction mode.
//!
//! The functions here are pure with respect to the UI: they read the pending
//! input, move the camera frame (and the pivot, for shifts) and return.

use std::ops::RangeInclusive;

use nalgebra::{Point3, Vector2, Vector3};

use crate::frame::{Frame, angle_axis};
use crate::mode::Mode;

/// Scale applied to mouse input by all turntable modes.
pub const TURNTABLE_FACTOR: f32 = 0.5;

pub const ZOOM_FACTOR_RANGE: RangeInclusive<f32> = 0.5..=1.5;

/// A zoom may not bring the camera closer to the pivot than this.
pub const MIN_PIVOT_DISTANCE: f32 = 1e-2;

/// Input consumed by a single integrator step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInput {
    pub mouse_force: Vector2<f32>,
    pub key_force: Vector3<f32>,
    /// Result of [`crate::sensitivity::base_movement_speed`].
    pub movement_speed: f32,
}

/// Advances `frame` by one step of `mode`. Idle does nothing.
pub fn navigate(
    mode: Mode,
    frame: &mut Frame,
    turntable_origin: &mut Point3<f32>,
    input: &StepInput,
) {
    match mode {
        Mode::Idle => return,
        Mode::Fps => fps_step(frame, input),
        Mode::TurntableRotate => turntable_rotate(frame, turntable_origin, input.mouse_force),
        Mode::TurntableShift => turntable_shift(frame, turntable_origin, input.mouse_force),
        Mode::TurntableZoom => {
            turntable_zoom(frame, turntable_origin, input.mouse_force);
        }
    }
    *frame = frame.renormalized();
}

/// Translates along the held keys and turns with the mouse: yaw about world
/// `+Z`, pitch about the camera's right axis.
pub fn fps_step(frame: &mut Frame, input: &StepInput) {
    let forward = frame.forward();
    let up = frame.up();
    let right = frame.right();

    let key_force = input.key_force;
    let movement = right * key_force.x + forward * key_force.y + up * key_force.z;

    frame.orientation = angle_axis(-input.mouse_force.x, &Vector3::z())
        * angle_axis(-input.mouse_force.y, &right)
        * frame.orientation;
    frame.position += movement * input.movement_speed;
}

/// Orbits the whole frame about the pivot.
pub fn turntable_rotate(
    frame: &mut Frame,
    turntable_origin: &Point3<f32>,
    mouse_force: Vector2<f32>,
) {
    let right = frame.right();
    let rotation = angle_axis(TURNTABLE_FACTOR * -mouse_force.x, &Vector3::z())
        * angle_axis(TURNTABLE_FACTOR * -mouse_force.y, &right);

    let relative = Frame::new(frame.position - turntable_origin.coords, frame.orientation);
    *frame = Frame::new(turntable_origin.coords, rotation).compose(&relative);
}

/// Slides camera and pivot in the view plane. The pivot moves by the
/// unscaled shift.
pub fn turntable_shift(
    frame: &mut Frame,
    turntable_origin: &mut Point3<f32>,
    mouse_force: Vector2<f32>,
) {
    let shift = frame.up() * mouse_force.y - frame.right() * mouse_force.x;
    frame.position += shift * TURNTABLE_FACTOR;
    *turntable_origin += shift;
}

/// Scales the camera's distance to the pivot. Returns `false` when the zoom
/// was rejected because the camera would end up too close to the pivot.
pub fn turntable_zoom(
    frame: &mut Frame,
    turntable_origin: &Point3<f32>,
    mouse_force: Vector2<f32>,
) -> bool {
    let previous = frame.position - turntable_origin.coords;
    let zoom = zoom_factor(mouse_force.y);

    if zoom * previous.norm() > MIN_PIVOT_DISTANCE {
        frame.position = turntable_origin.coords + previous * zoom;
        true
    } else {
        false
    }
}

pub fn zoom_factor(mouse_force_y: f32) -> f32 {
    (TURNTABLE_FACTOR * mouse_force_y)
        .exp2()
        .clamp(*ZOOM_FACTOR_RANGE.start(), *ZOOM_FACTOR_RANGE.end())
}
