//! Utility Module
//!
//! Small math helpers shared across the animation and behavior layers:
//!
//! - [`easing`]: interpolation curves and frame-rate independent smoothing
//! - [`angles`]: angle normalization helpers

pub mod angles;
pub mod easing;

pub use angles::normalize_angle;
pub use easing::{damp, smoothstep};
