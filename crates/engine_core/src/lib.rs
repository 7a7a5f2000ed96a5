//! Core engine types and utilities for the Deformed factory game.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Frame time management
//! - Small shared components (health, visual handles)

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
