//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

/// Width of a new map in pixels
pub const DEFAULT_MAP_WIDTH: i32 = 320;

/// Height of a new map in pixels
pub const DEFAULT_MAP_HEIGHT: i32 = 240;

/// Grid step entity sizes must be multiples of
pub const SIZE_STEP: i32 = 8;

/// Maximum number of actions kept in the undo history
pub const MAX_HISTORY_SIZE: usize = 100;
