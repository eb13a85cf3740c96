//! Point-cloud viewer demonstrating the navigation core with iced.
//!
//! Middle-drag orbits the pivot (Shift: pan, Ctrl: zoom). "Fly" starts FPS
//! navigation: WASD/arrows move, Q/E descend/ascend, Shift runs, the wheel
//! changes speed and Ctrl+wheel rolls. Enter or left click keeps the new
//! pose, Escape or right click returns to where the flight began.
//!
//! iced cannot move the pointer, so during flight the cursor is not pulled
//! back to the centre: looking around stops once it reaches the edge of the
//! screen. Leave and restart flight to recentre it.

use iced::time::Instant;
use iced::widget::{Button, Canvas, Column, Row, Slider, text};
use iced::{Element, Length, Settings, Subscription, Task, event, window};
use log::{info, warn};
use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use pointcloud_navigation::frame::Frame;
use pointcloud_navigation::input::InputEvent;
use pointcloud_navigation::preferences::JsonFilePreferences;
use pointcloud_navigation::{Navigation, Notification};

mod point_cloud;
mod viewport_widget;

use point_cloud::PointCloud;
use viewport_widget::{IcedViewport, PointCloudCanvas};

const PREFERENCES_ENV: &str = "POINTCLOUD_NAV_PREFS";
const DEFAULT_PREFERENCES_PATH: &str = "navigation_prefs.json";

#[derive(Debug, Clone)]
pub(crate) enum Message {
    Input { event: InputEvent, size: Vector2<u32> },
    Tick(Instant),
    FocusLost,
    CloseRequested,
    StartFps,
    ResetCamera,
    ResetSpeed,
    MouseSensitivity(i32),
}

struct PointCloudViewer {
    navigation: Navigation<IcedViewport>,
    cloud: PointCloud,
    last_tick: Option<Instant>,
}

impl PointCloudViewer {
    fn new() -> (Self, Task<Message>) {
        let cloud = PointCloud::terrain(160, 160);
        let center = cloud.aabb().center();

        let mut navigation = Navigation::new(IcedViewport::new(cloud.aabb()), open_preferences());
        navigation.set_camera_frame(overview_frame(&center));
        navigation.set_turntable_origin(center);
        info!("loaded {} points", cloud.points().len());

        let viewer = Self {
            navigation,
            cloud,
            last_tick: None,
        };
        (viewer, Task::none())
    }

    fn title(&self) -> String {
        format!("Point Cloud Viewer [{}]", self.navigation.mode())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Input { event, size } => {
                self.navigation.viewport_mut().resize(size);
                self.navigation.handle_event(&event);
            }
            Message::Tick(now) => {
                if let Some(previous) = self.last_tick.replace(now) {
                    let elapsed = now.saturating_duration_since(previous);
                    self.navigation.handle_event(&InputEvent::FrameRendered(elapsed));
                }
                if let Some(timer) = self.navigation.viewport().timer() {
                    self.navigation.handle_event(&InputEvent::Tick(timer));
                }
            }
            Message::FocusLost => self.navigation.handle_event(&InputEvent::FocusOut),
            Message::CloseRequested => return self.quit(),
            Message::StartFps => {
                self.last_tick = None;
                self.navigation.start_fps_navigation();
            }
            Message::ResetCamera => self.navigation.reset_camera_location(),
            Message::ResetSpeed => self.navigation.reset_movement_speed(),
            Message::MouseSensitivity(value) => self.navigation.set_mouse_sensitivity_value(value),
        }

        let mut task = Task::none();
        for notification in self.navigation.take_notifications() {
            match notification {
                Notification::MouseSensitivityChanged(value) => {
                    info!("mouse sensitivity set to {value}")
                }
                Notification::QuitRequested => task = self.quit(),
            }
        }
        task
    }

    fn quit(&mut self) -> Task<Message> {
        self.navigation.stop_fps_navigation(true);
        if let Err(err) = self.navigation.persist_preferences() {
            warn!("could not save navigation preferences: {err}");
        }
        iced::exit()
    }

    fn view(&self) -> Element<'_, Message> {
        let navigation = &self.navigation;
        let viewport = navigation.viewport();

        let controls = Column::new()
            .spacing(20)
            .width(250)
            .push(
                Column::new()
                    .spacing(5)
                    .push(text(format!(
                        "Mouse Sensitivity: {}",
                        navigation.mouse_sensitivity_value()
                    )))
                    .push(Slider::new(
                        navigation.mouse_sensitivity_value_range(),
                        navigation.mouse_sensitivity_value(),
                        Message::MouseSensitivity,
                    )),
            )
            .push(
                Row::new()
                    .spacing(5)
                    .push(Button::new("Fly").on_press(Message::StartFps))
                    .push(Button::new("Reset Camera").on_press(Message::ResetCamera))
                    .push(Button::new("Reset Speed").on_press(Message::ResetSpeed)),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(text(format!("Mode: {}", navigation.mode())))
                    .push(text(format!("Speed: {:.2}", navigation.base_movement_speed())))
                    .push(text(format!("Redraws: {}", viewport.redraws()))),
            );

        let canvas = Canvas::new(
            PointCloudCanvas::new(&self.cloud, *navigation.camera(), viewport.pivot())
                .capturing(viewport.capturing())
                .tracking(viewport.tracking()),
        )
        .width(Length::Fill)
        .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(iced::widget::container(controls).height(Length::Fill))
            .push(canvas)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let window_events = event::listen_with(|event, _status, _id| match event {
            iced::Event::Window(window::Event::Unfocused) => Some(Message::FocusLost),
            iced::Event::Window(window::Event::CloseRequested) => Some(Message::CloseRequested),
            _ => None,
        });

        match self.navigation.viewport().timer_interval() {
            Some(interval) => Subscription::batch([
                window_events,
                iced::time::every(interval).map(Message::Tick),
            ]),
            None => window_events,
        }
    }
}

/// Camera above and behind the cloud, looking at its centre.
fn overview_frame(center: &Point3<f32>) -> Frame {
    let position = center + Vector3::new(0.0, -60.0, 40.0);
    let orientation = UnitQuaternion::look_at_rh(&(center - position), &Vector3::z()).inverse();
    Frame::new(position.coords, orientation)
}

fn open_preferences() -> JsonFilePreferences {
    let path =
        std::env::var(PREFERENCES_ENV).unwrap_or_else(|_| DEFAULT_PREFERENCES_PATH.to_string());
    match JsonFilePreferences::open(&path) {
        Ok(preferences) => preferences,
        Err(err) => {
            warn!("ignoring unreadable preferences: {err}");
            JsonFilePreferences::empty(path)
        }
    }
}

fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    iced::application(PointCloudViewer::title, PointCloudViewer::update, PointCloudViewer::view)
        .subscription(PointCloudViewer::subscription)
        .window(window::Settings {
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(PointCloudViewer::new)
}
