//! Rigid frames: a position plus a unit-quaternion orientation.
//!
//! Frames are used as the camera pose. The local axes follow the camera
//! convention: `-Z` is forward, `+Y` is up and `+X` is right.

use std::ops::Mul;

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, Unit, UnitQuaternion, Vector3};

/// Orientations whose norm drifts further than this from one get renormalised.
const NORM_TOLERANCE: f32 = 1e-6;

/// Rigid transform representing a local coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

impl Frame {
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), UnitQuaternion::identity())
    }

    /// `self ∘ other`: applies `other` first, then `self`.
    pub fn compose(&self, other: &Frame) -> Frame {
        Frame {
            position: self.position + self.orientation * other.position,
            orientation: self.orientation * other.orientation,
        }
        .renormalized()
    }

    pub fn inverse(&self) -> Frame {
        let orientation = self.orientation.inverse();
        Frame {
            position: -(orientation * self.position),
            orientation,
        }
    }

    /// Transforms a point from local into parent coordinates.
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        Point3::from(self.position + self.orientation * point.coords)
    }

    /// Rotates a direction, ignoring the translation.
    pub fn orient(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        self.orientation * direction
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.orient(&-Vector3::z())
    }

    pub fn up(&self) -> Vector3<f32> {
        self.orient(&Vector3::y())
    }

    pub fn right(&self) -> Vector3<f32> {
        self.orient(&Vector3::x())
    }

    /// Returns a copy whose orientation was renormalised if it drifted off
    /// the unit sphere.
    pub fn renormalized(mut self) -> Frame {
        if (self.orientation.quaternion().norm() - 1.0).abs() > NORM_TOLERANCE {
            self.orientation.renormalize();
        }
        self
    }

    /// Rolls the frame about its forward axis so that its local up vector
    /// points as far towards world `+Z` as possible.
    ///
    /// A frame looking straight up or down has no defined roll and is
    /// returned unchanged.
    pub fn remove_tilt(&self) -> Frame {
        let forward = self.forward();
        let Some(right) = Unit::try_new(forward.cross(&Vector3::z()), 1e-6) else {
            return *self;
        };
        let right = right.into_inner();
        let up = right.cross(&forward);
        let basis = Rotation3::from_basis_unchecked(&[right, up, -forward]);

        Frame {
            position: self.position,
            orientation: UnitQuaternion::from_rotation_matrix(&basis),
        }
    }

    pub fn to_isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.position), self.orientation)
    }
}

impl Mul<Frame> for Frame {
    type Output = Frame;

    fn mul(self, rhs: Frame) -> Frame {
        self.compose(&rhs)
    }
}

/// Rotation of `angle` radians about `axis`; a degenerate axis yields the
/// identity rotation.
pub fn angle_axis(angle: f32, axis: &Vector3<f32>) -> UnitQuaternion<f32> {
    match Unit::try_new(*axis, 1e-9) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
        None => UnitQuaternion::identity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_vec(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    fn sample_frame() -> Frame {
        Frame::new(
            Vector3::new(1.0, -2.0, 3.0),
            angle_axis(0.7, &Vector3::new(1.0, 2.0, -0.5)),
        )
    }

    #[test]
    fn identity_axes_follow_camera_convention() {
        let frame = Frame::identity();
        assert_eq!(frame.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(frame.up(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(frame.right(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn compose_with_inverse_is_identity() {
        let frame = sample_frame();
        let product = frame * frame.inverse();
        assert!(product.position.norm() < 1e-5);
        assert!(product.orientation.angle() < 1e-3);
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let a = Frame::new(Vector3::new(1.0, 0.0, 0.0), UnitQuaternion::identity());
        let b = Frame::new(Vector3::zeros(), angle_axis(FRAC_PI_2, &Vector3::z()));
        let p = Point3::new(1.0, 0.0, 0.0);

        let composed = (a * b).apply(&p);
        assert!(approx_vec(composed.coords, a.apply(&b.apply(&p)).coords));
        assert!(approx_vec(composed.coords, Vector3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn inverse_undoes_apply() {
        let frame = sample_frame();
        let p = Point3::new(4.0, 5.0, -6.0);
        let back = frame.inverse().apply(&frame.apply(&p));
        assert!(approx_vec(back.coords, p.coords));
    }

    #[test]
    fn orient_ignores_translation() {
        let frame = Frame::new(
            Vector3::new(10.0, 10.0, 10.0),
            angle_axis(FRAC_PI_2, &Vector3::z()),
        );
        assert!(approx_vec(frame.orient(&Vector3::x()), Vector3::y()));
    }

    #[test]
    fn remove_tilt_levels_a_rolled_camera() {
        // Looking along +Y with +Z up, then rolled about the view axis.
        let level = Frame::new(Vector3::zeros(), angle_axis(FRAC_PI_2, &Vector3::x()));
        let forward = level.forward();
        let rolled = Frame::new(
            level.position,
            angle_axis(0.4, &forward) * level.orientation,
        );

        let fixed = rolled.remove_tilt();
        assert!(approx_vec(fixed.forward(), forward));
        assert!(approx_vec(fixed.up(), Vector3::z()));
        assert!(fixed.right().z.abs() < 1e-5);
    }

    #[test]
    fn remove_tilt_keeps_vertical_view() {
        let frame = Frame::identity();
        assert_eq!(frame.remove_tilt(), frame);
    }

    #[test]
    fn degenerate_axis_gives_identity() {
        assert_eq!(angle_axis(1.0, &Vector3::zeros()), UnitQuaternion::identity());
    }
}
