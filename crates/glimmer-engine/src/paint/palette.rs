//! Named tint presets for text and UI sprites.
//!
//! All presets are opaque, so their premultiplied and straight forms coincide.

use super::Color;

pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
pub const YELLOW: Color = Color::from_premul(1.0, 1.0, 0.0, 1.0);
pub const CYAN: Color = Color::from_premul(0.0, 1.0, 1.0, 1.0);
pub const GREEN: Color = Color::from_premul(0.2, 1.0, 0.2, 1.0);
pub const RED: Color = Color::from_premul(1.0, 0.3, 0.3, 1.0);
pub const ORANGE: Color = Color::from_premul(1.0, 0.6, 0.1, 1.0);
pub const BLUE: Color = Color::from_premul(0.3, 0.5, 1.0, 1.0);
pub const PINK: Color = Color::from_premul(1.0, 0.5, 0.7, 1.0);
pub const GRAY: Color = Color::from_premul(0.5, 0.5, 0.5, 1.0);
pub const DARK_GRAY: Color = Color::from_premul(0.3, 0.3, 0.3, 1.0);
pub const LIGHT_BLUE: Color = Color::from_premul(0.5, 0.7, 1.0, 1.0);
pub const PURPLE: Color = Color::from_premul(0.7, 0.3, 1.0, 1.0);

/// Default clear color for sprite scenes (deep blue-black).
pub const BACKDROP: Color = Color::from_premul(0.05, 0.05, 0.1, 1.0);
