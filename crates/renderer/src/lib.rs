//! Rendering-substrate seam for the factory game.
//!
//! The game never touches GPU state directly. It talks to a [`RenderSurface`]
//! through opaque [`engine_core::VisualHandle`]s, drives an FPS [`Camera`],
//! and loads glTF models off the frame thread through [`PendingModel`].

pub mod camera;
pub mod headless;
pub mod model;
pub mod surface;

pub use camera::*;
pub use headless::*;
pub use model::*;
pub use surface::*;
