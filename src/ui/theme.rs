// DomainLens - ui/theme.rs
//
// Colour conversion for measure readings, neutral tile colours, and layout
// constants. No dependencies on app state or business logic.

use crate::core::colour::Hsl;
use egui::Color32;

/// Fill colour for a measure reading.
pub fn measure_fill(colour: &Hsl) -> Color32 {
    let [r, g, b] = colour.to_rgb();
    Color32::from_rgb(r, g, b)
}

/// Text colour that stays readable on the measure ramp (every ramp colour
/// has lightness of 50% or more).
pub const MEASURE_TEXT: Color32 = Color32::from_rgb(17, 24, 39); // Gray 900

/// Tile fill when no measure colour applies.
pub fn neutral_fill(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(55, 65, 81) // Gray 700
    } else {
        Color32::from_rgb(229, 231, 235) // Gray 200
    }
}

/// Outline for tiles the focus brand applies to.
pub const FOCUS_STROKE: Color32 = Color32::from_rgb(59, 130, 246); // Blue 500

/// Dimmed text for tiles the focus brand does not apply to.
pub const UNFOCUSED_TEXT: Color32 = Color32::from_rgb(107, 114, 128); // Gray 500

/// Error text (failed load).
pub const ERROR_TEXT: Color32 = Color32::from_rgb(220, 38, 38); // Red 600

/// Warning text (config problems).
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const DETAIL_PANE_WIDTH: f32 = 300.0;
pub const CARD_WIDTH: f32 = 280.0;
pub const TILE_HEIGHT: f32 = 26.0;
pub const CARD_SPACING: f32 = 12.0;
