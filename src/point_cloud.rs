//! Synthetic point cloud shown by the viewer.

use iced::Color;
use nalgebra::Point3;
use pointcloud_navigation::Aabb;

const TERRAIN_SPACING: f32 = 0.5;

/// A single colored point
#[derive(Debug, Clone, Copy)]
pub(crate) struct PointSample {
    pub(crate) position: Point3<f32>,
    pub(crate) color: Color,
}

#[derive(Debug, Clone)]
pub(crate) struct PointCloud {
    points: Vec<PointSample>,
    aabb: Aabb,
}

impl PointCloud {
    /// Rolling terrain of `columns` × `rows` samples in the XY plane, with
    /// height along +Z and colors graded by height.
    pub(crate) fn terrain(columns: usize, rows: usize) -> Self {
        let half_width = columns as f32 * TERRAIN_SPACING * 0.5;
        let half_depth = rows as f32 * TERRAIN_SPACING * 0.5;

        let positions: Vec<Point3<f32>> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| (column, row)))
            .map(|(column, row)| {
                let x = column as f32 * TERRAIN_SPACING - half_width;
                let y = row as f32 * TERRAIN_SPACING - half_depth;
                let z = 3.0 * (x * 0.15).sin() * (y * 0.1).cos() + 1.5 * (0.05 * (x + y)).sin();
                Point3::new(x, y, z)
            })
            .collect();

        let aabb = Aabb::from_points(&positions);
        let (low, high) = (aabb.min.z, aabb.max.z);
        let points = positions
            .into_iter()
            .map(|position| PointSample {
                position,
                color: height_color((position.z - low) / (high - low).max(f32::EPSILON)),
            })
            .collect();

        Self { points, aabb }
    }

    pub(crate) fn points(&self) -> &[PointSample] {
        &self.points
    }

    pub(crate) fn aabb(&self) -> Aabb {
        self.aabb
    }
}

/// Blue for low, green for middle, sand for high samples.
fn height_color(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        let s = t * 2.0;
        Color::from_rgb(0.1, 0.3 + 0.4 * s, 0.8 - 0.5 * s)
    } else {
        let s = (t - 0.5) * 2.0;
        Color::from_rgb(0.1 + 0.8 * s, 0.7 + 0.1 * s, 0.3 + 0.2 * s)
    }
}
