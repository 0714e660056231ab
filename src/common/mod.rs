//! Common types and utilities shared by the document model and the letter generator.
//!
//! This module provides the value types used for run formatting and the
//! generic XML tree that the WordprocessingML model is built on.

// Submodule declarations
pub mod style;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use style::{Length, RGBColor};
