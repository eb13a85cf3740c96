//! Canvas widget rendering the point cloud, and the viewport adapter the
//! navigation core drives.
//!
//! The canvas owns no camera state. It forwards translated input to the
//! application, which feeds it to [`Navigation`] and redraws with the
//! resulting camera.
//!
//! [`Navigation`]: pointcloud_navigation::Navigation

use std::time::Duration;

use iced::widget::canvas::{self, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, event, keyboard, mouse};
use log::debug;
use nalgebra::{Point2, Point3, Vector2, Vector4};
use pointcloud_navigation::camera::{Camera, Projection};
use pointcloud_navigation::iced_input::{self, translate_keyboard, translate_mouse};
use pointcloud_navigation::input::TimerId;
use pointcloud_navigation::viewport::{Aabb, CursorStyle, Viewport};

use crate::Message;
use crate::point_cloud::PointCloud;

const POINT_SIZE: f32 = 2.0;
const PIVOT_RADIUS: f32 = 6.0;

/// [`Viewport`] backed by the iced application state.
///
/// iced has no cursor warping, so warp requests are only logged. Timers are
/// realised by the application as a time subscription while one is active.
#[derive(Debug)]
pub(crate) struct IcedViewport {
    size: Vector2<u32>,
    aabb: Option<Aabb>,
    mouse_grab: Option<CursorStyle>,
    keyboard_grabbed: bool,
    mouse_tracking: bool,
    pivot: Option<Point3<f32>>,
    timer: Option<(TimerId, Duration)>,
    next_timer: u64,
    redraws: u64,
}

impl IcedViewport {
    pub(crate) fn new(aabb: Aabb) -> Self {
        Self {
            size: Vector2::new(800, 600),
            aabb: Some(aabb),
            mouse_grab: None,
            keyboard_grabbed: false,
            mouse_tracking: false,
            pivot: None,
            timer: None,
            next_timer: 1,
            redraws: 0,
        }
    }

    pub(crate) fn resize(&mut self, size: Vector2<u32>) {
        self.size = size;
    }

    pub(crate) fn timer(&self) -> Option<TimerId> {
        self.timer.map(|(id, _)| id)
    }

    pub(crate) fn timer_interval(&self) -> Option<Duration> {
        self.timer.map(|(_, interval)| interval)
    }

    pub(crate) fn pivot(&self) -> Option<Point3<f32>> {
        self.pivot
    }

    /// Whether navigation currently owns mouse and keyboard.
    pub(crate) fn capturing(&self) -> bool {
        self.mouse_grab.is_some() && self.keyboard_grabbed
    }

    /// Whether pointer moves are wanted even outside the widget.
    pub(crate) fn tracking(&self) -> bool {
        self.mouse_tracking
    }

    pub(crate) fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl Viewport for IcedViewport {
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
        debug!("cursor warp to ({}, {}) not supported by this backend", position.x, position.y);
    }

    fn aabb(&self) -> Option<Aabb> {
        self.aabb
    }

    fn set_turntable_origin(&mut self, origin: Point3<f32>) {
        self.pivot = Some(origin);
    }

    fn request_redraw(&mut self) {
        // iced redraws after every message; the counter only feeds the status line.
        self.redraws = self.redraws.wrapping_add(1);
    }

    fn start_timer(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timer = Some((id, interval));
        id
    }

    fn kill_timer(&mut self, timer: TimerId) {
        if self.timer() == Some(timer) {
            self.timer = None;
        }
    }
}

/// Modifier state seen by the canvas; mouse events carry none of their own.
#[derive(Debug, Default)]
pub(crate) struct CanvasState {
    modifiers: keyboard::Modifiers,
}

pub(crate) struct PointCloudCanvas<'a> {
    cloud: &'a PointCloud,
    camera: Camera,
    pivot: Option<Point3<f32>>,
    capturing: bool,
    tracking: bool,
}

impl<'a> PointCloudCanvas<'a> {
    pub(crate) fn new(cloud: &'a PointCloud, camera: Camera, pivot: Option<Point3<f32>>) -> Self {
        Self {
            cloud,
            camera,
            pivot,
            capturing: false,
            tracking: false,
        }
    }

    /// Forwards keyboard input and shows the capture cursor.
    pub(crate) fn capturing(mut self, capturing: bool) -> Self {
        self.capturing = capturing;
        self
    }

    /// Forwards pointer positions outside the widget bounds.
    pub(crate) fn tracking(mut self, tracking: bool) -> Self {
        self.tracking = tracking;
        self
    }

    /// Cursor in widget-local pixels. While tracking, and for releases,
    /// positions outside the widget are kept so drags do not get stuck.
    fn local_position(
        &self,
        event: &mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Point> {
        let unbounded = self.tracking || matches!(event, mouse::Event::ButtonReleased(_));
        if unbounded {
            cursor
                .position()
                .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
        } else {
            cursor.position_in(bounds)
        }
    }
}

impl canvas::Program<Message> for PointCloudCanvas<'_> {
    type State = CanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        let size = Vector2::new(bounds.width.max(0.0) as u32, bounds.height.max(0.0) as u32);

        let translated = match event {
            canvas::Event::Mouse(mouse_event) => {
                if matches!(mouse_event, mouse::Event::WheelScrolled { .. })
                    && cursor.position_in(bounds).is_none()
                {
                    return (event::Status::Ignored, None);
                }
                let position = self.local_position(&mouse_event, bounds, cursor);
                translate_mouse(&mouse_event, position, iced_input::modifiers(state.modifiers))
            }
            canvas::Event::Keyboard(keyboard_event) => {
                if let keyboard::Event::ModifiersChanged(modifiers) = keyboard_event {
                    state.modifiers = modifiers;
                }
                if !self.capturing {
                    return (event::Status::Ignored, None);
                }
                translate_keyboard(&keyboard_event)
            }
            canvas::Event::Touch(_) => None,
        };

        match translated {
            Some(event) => (event::Status::Captured, Some(Message::Input { event, size })),
            None => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::from_rgb(0.05, 0.05, 0.08));

        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let projection = Projection {
            aspect: bounds.width / bounds.height,
            ..Projection::default()
        };
        let view_projection = projection.build_view_projection(&self.camera);
        let project = |point: &Point3<f32>| -> Option<Point> {
            let clip = view_projection * Vector4::new(point.x, point.y, point.z, 1.0);
            if clip.w <= projection.znear {
                return None;
            }
            let ndc_x = clip.x / clip.w;
            let ndc_y = clip.y / clip.w;
            if ndc_x.abs() > 1.0 || ndc_y.abs() > 1.0 {
                return None;
            }
            Some(Point::new(
                (ndc_x + 1.0) * 0.5 * bounds.width,
                (1.0 - ndc_y) * 0.5 * bounds.height,
            ))
        };

        let half = POINT_SIZE * 0.5;
        for sample in self.cloud.points() {
            if let Some(screen) = project(&sample.position) {
                frame.fill_rectangle(
                    Point::new(screen.x - half, screen.y - half),
                    Size::new(POINT_SIZE, POINT_SIZE),
                    sample.color,
                );
            }
        }

        if let Some(screen) = self.pivot.as_ref().and_then(project) {
            frame.stroke(
                &Path::circle(screen, PIVOT_RADIUS),
                Stroke::default().with_color(Color::WHITE).with_width(1.5),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.capturing {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
