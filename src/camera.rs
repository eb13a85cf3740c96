use nalgebra::{Matrix4, Point3};

use crate::frame::Frame;

/// The viewer camera. Its pose is a single rigid frame; the camera looks
/// along the frame's local `-Z` axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub frame: Frame,
}

impl Camera {
    pub fn new(frame: Frame) -> Self {
        Self { frame }
    }

    pub fn build_view_matrix(&self) -> Matrix4<f32> {
        self.frame.inverse().to_isometry().to_homogeneous()
    }

    /// Point expressed in camera space.
    pub fn to_camera_space(&self, point: &Point3<f32>) -> Point3<f32> {
        self.frame.inverse().apply(point)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 800.0 / 600.0,
            fovy: 45f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

impl Projection {
    pub fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }

    pub fn build_view_projection(&self, camera: &Camera) -> Matrix4<f32> {
        self.build_projection_matrix() * camera.build_view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::angle_axis;
    use nalgebra::Vector3;

    #[test]
    fn point_ahead_of_camera_has_negative_depth() {
        let camera = Camera::new(Frame::new(
            Vector3::new(0.0, -5.0, 0.0),
            angle_axis(std::f32::consts::FRAC_PI_2, &Vector3::x()),
        ));
        let local = camera.to_camera_space(&Point3::origin());
        assert!((local.coords - Vector3::new(0.0, 0.0, -5.0)).norm() < 1e-5);

        let view = camera.build_view_matrix().transform_point(&Point3::origin());
        assert!((view.coords - local.coords).norm() < 1e-5);
    }

    #[test]
    fn projection_maps_view_axis_to_screen_centre() {
        let camera = Camera::default();
        let projection = Projection::default();
        let ndc = projection
            .build_view_projection(&camera)
            .transform_point(&Point3::new(0.0, 0.0, -10.0));
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }
}
