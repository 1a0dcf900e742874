//! Geometry and colour types shared across the designer.
//!
//! Canonical canvas space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down

mod color;
mod rect;
mod vec2;

pub use color::Color32;
pub use rect::Rect;
pub use vec2::Vec2;
