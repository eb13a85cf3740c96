//! The viewport collaborator: everything the navigation core needs from the
//! widget that renders the point cloud.

use std::time::Duration;

use nalgebra::{Point2, Point3, Vector2};

use crate::input::TimerId;

/// Cursor shape while the mouse is grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    /// Invisible cursor, used during FPS navigation.
    Blank,
}

/// Axis-aligned bounding box of the loaded scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// An AABB centered at a point with the given edge length.
    pub fn from_center_size(center: Point3<f32>, size: f32) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center.map(|c| c - half_size),
            max: center.map(|c| c + half_size),
        }
    }

    /// Smallest box containing all `points`; invalid for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f32>>) -> Self {
        let mut aabb = Self::invalid();
        for point in points {
            aabb.min = aabb.min.inf(point);
            aabb.max = aabb.max.sup(point);
        }
        aabb
    }

    pub fn invalid() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Componentwise clamp of `point` into the box.
    pub fn clamp(&self, point: &Point3<f32>) -> Point3<f32> {
        point.sup(&self.min).inf(&self.max)
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Capabilities the navigation core invokes on the rendering viewport.
///
/// Navigation assumes exclusive use of input capture while FPS navigation is
/// active.
pub trait Viewport {
    fn grab_mouse(&mut self, cursor: CursorStyle);
    fn release_mouse(&mut self);
    fn grab_keyboard(&mut self);
    fn release_keyboard(&mut self);
    fn set_mouse_tracking(&mut self, enabled: bool);

    /// Size in pixels.
    fn size(&self) -> Vector2<u32>;

    /// Moves the cursor to a viewport-local pixel position.
    fn warp_cursor(&mut self, position: Point2<f32>);

    /// Bounding box of the scene, if one is loaded.
    fn aabb(&self) -> Option<Aabb>;

    /// Notification for the pivot overlay.
    fn set_turntable_origin(&mut self, origin: Point3<f32>);

    fn request_redraw(&mut self);

    /// Schedules a repeating tick delivered back as
    /// [`crate::input::InputEvent::Tick`].
    fn start_timer(&mut self, interval: Duration) -> TimerId;

    fn kill_timer(&mut self, timer: TimerId);
}

/// A viewport without a window. It records every request made by the
/// navigation core, which makes it suitable for driving navigation from
/// tests or other non-GUI hosts.
#[derive(Debug, Clone)]
pub struct HeadlessViewport {
    pub size: Vector2<u32>,
    pub aabb: Option<Aabb>,
    pub mouse_grab: Option<CursorStyle>,
    pub keyboard_grabbed: bool,
    pub mouse_tracking: bool,
    pub cursor_position: Option<Point2<f32>>,
    pub warps: Vec<Point2<f32>>,
    pub published_origins: Vec<Point3<f32>>,
    pub redraw_requests: usize,
    pub active_timer: Option<(TimerId, Duration)>,
    next_timer: u64,
}

impl HeadlessViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Vector2::new(width, height),
            aabb: None,
            mouse_grab: None,
            keyboard_grabbed: false,
            mouse_tracking: false,
            cursor_position: None,
            warps: Vec::new(),
            published_origins: Vec::new(),
            redraw_requests: 0,
            active_timer: None,
            next_timer: 1,
        }
    }

    pub fn with_aabb(mut self, aabb: Aabb) -> Self {
        self.aabb = Some(aabb);
        self
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.active_timer.map(|(id, _)| id)
    }

    pub fn last_published_origin(&self) -> Option<Point3<f32>> {
        self.published_origins.last().copied()
    }

    pub fn input_captured(&self) -> bool {
        self.mouse_grab.is_some() || self.keyboard_grabbed
    }
}

impl Default for HeadlessViewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Viewport for HeadlessViewport {
    fn grab_mouse(&mut self, cursor: CursorStyle) {
        self.mouse_grab = Some(cursor);
    }

    fn release_mouse(&mut self) {
        self.mouse_grab = None;
    }

    fn grab_keyboard(&mut self) {
        self.keyboard_grabbed = true;
    }

    fn release_keyboard(&mut self) {
        self.keyboard_grabbed = false;
    }

    fn set_mouse_tracking(&mut self, enabled: bool) {
        self.mouse_tracking = enabled;
    }

    fn size(&self) -> Vector2<u32> {
        self.size
    }

    fn warp_cursor(&mut self, position: Point2<f32>) {
        self.cursor_position = Some(position);
        self.warps.push(position);
    }

    fn aabb(&self) -> Option<Aabb> {
        self.aabb
    }

    fn set_turntable_origin(&mut self, origin: Point3<f32>) {
        self.published_origins.push(origin);
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    fn start_timer(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.active_timer = Some((id, interval));
        id
    }

    fn kill_timer(&mut self, timer: TimerId) {
        if self.timer() == Some(timer) {
            self.active_timer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_points_spans_all() {
        let points = [
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, -5.0),
        ];
        let aabb = Aabb::from_points(&points);
        assert!(aabb.is_valid());
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, -5.0));
        assert_eq!(aabb.max, Point3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn empty_aabb_is_invalid() {
        assert!(!Aabb::from_points(std::iter::empty()).is_valid());
    }

    #[test]
    fn clamp_keeps_points_inside() {
        let aabb = Aabb::from_center_size(Point3::origin(), 2.0);
        assert_eq!(aabb.clamp(&Point3::new(5.0, -0.5, -3.0)), Point3::new(1.0, -0.5, -1.0));
        assert_eq!(aabb.center(), Point3::origin());
    }

    #[test]
    fn headless_timer_lifecycle() {
        let mut viewport = HeadlessViewport::default();
        let first = viewport.start_timer(Duration::from_millis(40));
        viewport.kill_timer(TimerId(999));
        assert_eq!(viewport.timer(), Some(first));
        viewport.kill_timer(first);
        assert_eq!(viewport.timer(), None);
        let second = viewport.start_timer(Duration::from_millis(40));
        assert_ne!(first, second);
    }
}
