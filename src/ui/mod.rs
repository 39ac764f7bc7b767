//! UI module - tutorial overlay and skip button

mod overlay;

pub use overlay::*;
