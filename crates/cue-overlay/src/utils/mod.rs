//! Utility types for overlay layout

pub mod errors;

pub use errors::LayoutError;
