//! Viewer module: module declarations and re-exports for the playback core.

pub mod clock;
pub mod controller;
pub mod navigator;
pub mod social;
pub mod tracker;

pub use controller::Viewer;
