//! Query normalization and resolution against an index catalog.

pub mod normalize;
pub mod resolver;

pub use normalize::Normalizer;
pub use resolver::{resolve, Pattern, Resolution, SearchOptions};
