//! Classification of pointer offsets from the viewport centre, used to keep
//! the captured cursor away from the screen edges during FPS navigation.

use nalgebra::{Point2, Vector2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseDistance {
    Close,
    Far,
    VeryFar,
}

/// Classifies `difference` against `radius` (half the viewport size),
/// componentwise on absolute values.
pub fn classify(difference: Vector2<f32>, radius: Vector2<f32>) -> MouseDistance {
    let difference = difference.abs();
    let beyond = |fraction: f32| {
        difference.x > radius.x * fraction || difference.y > radius.y * fraction
    };

    if beyond(0.8) {
        MouseDistance::VeryFar
    } else if beyond(0.5) {
        MouseDistance::Far
    } else {
        MouseDistance::Close
    }
}

/// Centre of a viewport of `size` pixels, using integer halves.
pub fn viewport_center(size: Vector2<u32>) -> Point2<f32> {
    Point2::new((size.x / 2) as f32, (size.y / 2) as f32)
}

/// Outcome of the FPS recentring checks for one pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentreDecision {
    /// Warp the cursor here before handling further input.
    pub warp_to: Option<Point2<f32>>,
    /// Whether the move counts as user input.
    pub accept: bool,
}

/// Warps the cursor back when it strayed very far from the centre and
/// rejects any move too large to be a user gesture, as those are echoes of
/// an earlier warp.
pub fn recentre(
    position: Point2<f32>,
    last_position: Point2<f32>,
    center: Point2<f32>,
) -> RecentreDecision {
    let radius = center.coords;
    let warp_to = (classify(position - center, radius) == MouseDistance::VeryFar).then_some(center);
    let accept = classify(position - last_position, radius) == MouseDistance::Close;

    RecentreDecision { warp_to, accept }
}
