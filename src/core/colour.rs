// DomainLens - core/colour.rs
//
// Measure colour mapping: a 0-100 score becomes an HSL colour running from
// red (0) through yellow to green (100), getting darker as the score rises.
//
//   hue        = v * 1.2          (0..=120 degrees)
//   saturation = 80 %
//   lightness  = 90 - v * 0.4     (90 %..=50 %, strictly decreasing)
//
// Non-numeric input maps to no colour; presentation renders that unstyled.

use crate::core::coerce::to_number;
use crate::core::model::Scalar;
use crate::util::constants::{
    HUE_PER_POINT, LIGHTNESS_AT_ZERO, LIGHTNESS_PER_POINT, MEASURE_MAX, MEASURE_MIN,
    MEASURE_SATURATION,
};
use serde::Serialize;

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    /// CSS colour string, e.g. `hsl(120deg 80% 50%)`.
    pub fn to_css(&self) -> String {
        format!(
            "hsl({}deg {}% {}%)",
            trim_float(self.hue),
            trim_float(self.saturation),
            trim_float(self.lightness)
        )
    }

    /// Convert to 8-bit sRGB.
    pub fn to_rgb(&self) -> [u8; 3] {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b)]
    }
}

fn trim_float(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Colour for a measure value, or `None` when the value is not numeric.
///
/// Values outside 0..=100 are clamped to the nearest boundary first.
pub fn colour_for(value: &Scalar) -> Option<Hsl> {
    let v = to_number(value)?.clamp(MEASURE_MIN, MEASURE_MAX);
    Some(Hsl {
        hue: v * HUE_PER_POINT,
        saturation: MEASURE_SATURATION,
        lightness: LIGHTNESS_AT_ZERO - v * LIGHTNESS_PER_POINT,
    })
}
