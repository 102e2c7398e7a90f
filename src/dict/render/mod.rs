//! Turns raw entries into fixed-width display lines.

pub mod formatter;
pub mod markup;

pub use formatter::{render, Layout};
