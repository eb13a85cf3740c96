//! Mapping from user-facing slider values to the real-valued factors the
//! integrator works with.

use std::ops::RangeInclusive;

use nalgebra::{Vector2, Vector3};

pub const MOUSE_SENSITIVITY_RANGE: RangeInclusive<i32> = -100..=100;
pub const BASE_MOVEMENT_SPEED_RANGE: RangeInclusive<i32> = -7200..=4800;

/// The FPS tick already limits updates to one per 40 ms, so shorter frame
/// durations gain nothing.
pub const FRAME_DURATION_RANGE: RangeInclusive<f32> = 0.04..=0.10;

/// Componentwise bound on the look input of a single integrator step.
pub const MOUSE_FORCE_LIMIT: f32 = 20.0;

const MOUSE_PIXEL_SCALE: f32 = 0.4;

/// Wheel angle delta of one detent.
pub const WHEEL_DETENT: f32 = 120.0;

pub fn clamp_mouse_sensitivity_value(value: i32) -> i32 {
    value.clamp(*MOUSE_SENSITIVITY_RANGE.start(), *MOUSE_SENSITIVITY_RANGE.end())
}

pub fn clamp_base_movement_speed(value: i32) -> i32 {
    value.clamp(
        *BASE_MOVEMENT_SPEED_RANGE.start(),
        *BASE_MOVEMENT_SPEED_RANGE.end(),
    )
}

pub fn clamp_frame_duration(seconds: f32) -> f32 {
    if seconds.is_nan() {
        return *FRAME_DURATION_RANGE.start();
    }
    seconds.clamp(*FRAME_DURATION_RANGE.start(), *FRAME_DURATION_RANGE.end())
}

/// `1.03 ^ value`; ±100 spans roughly a factor of 19 either way.
pub fn mouse_sensitivity(value: i32) -> f32 {
    1.03f32.powf(value as f32)
}

/// Per-tick translation multiplier, `1.01 ^ (value / 15)`.
pub fn base_movement_speed(value: i32) -> f32 {
    1.01f32.powf(value as f32 / 15.0)
}

/// Adds a wheel delta to the speed slider value.
pub fn incr_base_movement_speed(current: i32, increment: i32) -> i32 {
    clamp_base_movement_speed(current.saturating_add(increment))
}

/// Roll angle in radians for a wheel delta already scaled by its modifier
/// factor.
pub fn tilt_angle(scaled_delta: f32) -> f32 {
    (scaled_delta as f64 * 0.1 / (WHEEL_DETENT as f64 * std::f64::consts::PI)) as f32
}

/// Look input for a pointer delta in pixels.
pub fn mouse_force(
    pixel_delta: Vector2<f32>,
    sensitivity: f32,
    frame_duration: f32,
) -> Vector2<f32> {
    clamp_mouse_force(pixel_delta * MOUSE_PIXEL_SCALE * sensitivity * frame_duration)
}

pub fn clamp_mouse_force(force: Vector2<f32>) -> Vector2<f32> {
    force.map(|c| c.clamp(-MOUSE_FORCE_LIMIT, MOUSE_FORCE_LIMIT))
}

/// Normalised movement direction scaled by `2^clamp(speed, -1, 1) * 0.5`.
/// Directions of length up to 0.5 count as released.
pub fn key_force(direction: &Vector3<f32>, speed: i32) -> Vector3<f32> {
    if direction.norm() > 0.5 {
        direction.normalize() * (speed.clamp(-1, 1) as f32).exp2() * 0.5
    } else {
        Vector3::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitivity_curve_is_symmetric() {
        assert_eq!(mouse_sensitivity(0), 1.0);
        for v in MOUSE_SENSITIVITY_RANGE {
            let product = mouse_sensitivity(v) * mouse_sensitivity(-v);
            assert!((product - 1.0).abs() < 1e-6, "v = {v}: {product}");
        }
        let max = mouse_sensitivity(100);
        assert!(max > 19.0 && max < 19.5);
    }

    #[test]
    fn speed_curve_neutral_at_zero() {
        assert_eq!(base_movement_speed(0), 1.0);
        assert!(base_movement_speed(1500) > base_movement_speed(0));
        assert!(base_movement_speed(-1500) < base_movement_speed(0));
    }

    #[test]
    fn speed_increment_is_clamped() {
        assert_eq!(incr_base_movement_speed(4700, 120), 4800);
        assert_eq!(incr_base_movement_speed(-7100, -240), -7200);
        assert_eq!(incr_base_movement_speed(0, 120), 120);
        assert_eq!(incr_base_movement_speed(i32::MAX, i32::MAX), 4800);
    }

    #[test]
    fn frame_duration_is_clamped() {
        assert_eq!(clamp_frame_duration(0.001), 0.04);
        assert_eq!(clamp_frame_duration(0.07), 0.07);
        assert_eq!(clamp_frame_duration(3.0), 0.10);
        assert_eq!(clamp_frame_duration(f32::NAN), 0.04);
    }

    #[test]
    fn one_detent_tilts_by_a_tenth_over_pi() {
        let angle = tilt_angle(120.0);
        assert!((angle - 0.031_830_99).abs() < 1e-7);
        assert_eq!(tilt_angle(-120.0), -angle);
    }

    #[test]
    fn mouse_force_scales_and_clamps() {
        let force = mouse_force(Vector2::new(10.0, -5.0), 1.0, 0.1);
        assert!((force - Vector2::new(0.4, -0.2)).norm() < 1e-6);

        let huge = mouse_force(Vector2::new(1e6, -1e6), 19.0, 0.1);
        assert_eq!(huge, Vector2::new(MOUSE_FORCE_LIMIT, -MOUSE_FORCE_LIMIT));
    }

    #[test]
    fn key_force_zero_for_short_directions() {
        assert_eq!(key_force(&Vector3::zeros(), 1), Vector3::zeros());
        assert_eq!(key_force(&Vector3::new(0.5, 0.0, 0.0), 0), Vector3::zeros());
    }

    #[test]
    fn key_force_normalises_and_applies_speed() {
        let slow = key_force(&Vector3::new(1.0, 1.0, 0.0), 0);
        assert!((slow.norm() - 0.5).abs() < 1e-6);

        let fast = key_force(&Vector3::new(0.0, 2.0, 0.0), 1);
        assert!((fast - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);

        let clamped = key_force(&Vector3::new(0.0, 2.0, 0.0), 5);
        assert_eq!(clamped, fast);

        let negative = key_force(&Vector3::new(0.0, 1.0, 0.0), -3);
        assert!((negative.norm() - 0.25).abs() < 1e-6);
    }
}
