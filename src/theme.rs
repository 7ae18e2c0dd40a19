//! Dark colour scheme and figure geometry shared by the three figures.

use palette::{LinSrgb, Mix, Srgb};
use plotters::prelude::*;

use crate::Season;

pub const FACE: RGBColor = RGBColor(0x1a, 0x1a, 0x1a);
pub const LEGEND_FACE: RGBColor = RGBColor(0x2a, 0x2a, 0x2a);
pub const TEXT: RGBColor = RGBColor(0xff, 0xff, 0xff);

pub const WINTER: RGBColor = RGBColor(0x64, 0xb5, 0xf6);
pub const SPRING: RGBColor = RGBColor(0x81, 0xc7, 0x84);
pub const ANNUAL: RGBColor = RGBColor(0xff, 0xb7, 0x4d);
pub const HIGHLIGHT: RGBColor = RGBColor(0xf0, 0x62, 0x92);

pub const FONT: &str = "sans-serif";

pub fn season_color(season: Season) -> RGBColor {
    match season {
        Season::Winter => WINTER,
        Season::Spring => SPRING,
        Season::Annual => ANNUAL,
    }
}

/// Figure size in inches, rasterised at a given DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    pub dpi: u32,
}

impl Figure {
    pub fn new(width: f64, height: f64, dpi: u32) -> Self {
        Self { width, height, dpi }
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width * self.dpi as f64).round() as u32,
            (self.height * self.dpi as f64).round() as u32,
        )
    }

    /// Typographic points to pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    /// Points to a whole number of pixels, for stroke widths and margins.
    pub fn px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }

    pub fn font(&self, points: f64) -> TextStyle<'static> {
        (FONT, self.pt(points)).into_font().color(&TEXT)
    }

    pub fn bold(&self, points: f64) -> TextStyle<'static> {
        (FONT, self.pt(points), FontStyle::Bold)
            .into_font()
            .color(&TEXT)
    }
}

// ColorBrewer RdBu, from dark red to dark blue
const RD_BU: [(u8, u8, u8); 11] = [
    (0x67, 0x00, 0x1f),
    (0xb2, 0x18, 0x2b),
    (0xd6, 0x60, 0x4d),
    (0xf4, 0xa5, 0x82),
    (0xfd, 0xdb, 0xc7),
    (0xf7, 0xf7, 0xf7),
    (0xd1, 0xe5, 0xf0),
    (0x92, 0xc5, 0xde),
    (0x43, 0x93, 0xc3),
    (0x21, 0x66, 0xac),
    (0x05, 0x30, 0x61),
];

/// Reversed red/blue diverging colormap: blue below zero, red above,
/// near-white at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diverging {
    bound: f64,
}

impl Diverging {
    /// Symmetric around zero, wide enough for every value.
    pub fn centered(values: impl Iterator<Item = f64>) -> Self {
        let bound = values.map(f64::abs).fold(0.0, f64::max);
        Self {
            bound: if bound > 0.0 { bound } else { 1.0 },
        }
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    pub fn color(&self, value: f64) -> RGBColor {
        // 0 is the blue end, 1 the red end
        let t = ((value / self.bound + 1.0) / 2.0).clamp(0.0, 1.0);
        let position = (1.0 - t) * (RD_BU.len() - 1) as f64;
        let idx = (position.floor() as usize).min(RD_BU.len() - 2);
        let factor = (position - idx as f64) as f32;

        let from = linear(RD_BU[idx]);
        let to = linear(RD_BU[idx + 1]);
        let mixed: Srgb<u8> = Srgb::from_linear(from.mix(to, factor));
        RGBColor(mixed.red, mixed.green, mixed.blue)
    }
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}
