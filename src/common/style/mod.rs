//! Common style and formatting types.
//!
//! This module provides the value types used to describe character formatting.

// Submodule declarations
pub mod color;
pub mod len;

// Re-exports
pub use color::RGBColor;
pub use len::Length;
