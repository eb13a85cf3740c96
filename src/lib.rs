//! Interactive camera navigation for a 3D point-cloud viewer.
//!
//! The core translates pointer and key input into camera motion with two
//! idioms sharing one rigid-frame camera: free-flight FPS navigation and
//! pivot-centred turntable gestures. It talks to the rendering widget only
//! through the [`viewport::Viewport`] trait and to persisted settings only
//! through [`preferences::PreferenceStore`], so it runs equally well inside
//! an iced application or a headless test harness.

pub mod camera;
pub mod distance;
pub mod error;
pub mod frame;
pub mod iced_input;
pub mod input;
pub mod integrator;
pub mod mode;
pub mod navigation;
pub mod preferences;
pub mod sensitivity;
pub mod viewport;

pub use camera::Camera;
pub use error::PreferenceError;
pub use frame::Frame;
pub use input::InputEvent;
pub use mode::Mode;
pub use navigation::{Navigation, Notification};
pub use viewport::{Aabb, HeadlessViewport, Viewport};
