use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::physics::spectrum::wavelength_to_rgb;

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let [r, g, b] = [rgb.red, rgb.green, rgb.blue].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgb(r, g, b)
}

/// Fixed colours for the data series of one chart: measured points first,
/// then fitted curves.
pub struct SeriesColors {
    colors: Vec<Color32>,
}

impl SeriesColors {
    pub fn new(n: usize) -> Self {
        Self {
            colors: generate_palette(n.max(1)),
        }
    }

    pub fn get(&self, i: usize) -> Color32 {
        self.colors[i % self.colors.len()]
    }
}

// ---------------------------------------------------------------------------
// Intensity map: black → light colour
// ---------------------------------------------------------------------------

/// Maps a normalised intensity onto a gradient from black to the colour of
/// the light, blended in linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityMap {
    tint: LinSrgb,
}

impl IntensityMap {
    /// Gradient for monochromatic light. Wavelengths outside the visible
    /// range fall back to white.
    pub fn for_wavelength(nm: f64) -> Self {
        let [r, g, b] = wavelength_to_rgb(nm);
        let tint = if [r, g, b] == [0, 0, 0] {
            [255, 255, 255]
        } else {
            [r, g, b]
        };
        Self::from_rgb(tint)
    }

    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let srgb = Srgb::new(r, g, b).into_format::<f32>();
        Self {
            tint: srgb.into_linear(),
        }
    }

    pub fn grayscale() -> Self {
        Self::from_rgb([255, 255, 255])
    }

    /// RGBA bytes for `val` in `[0, 1]`.
    pub fn apply(&self, val: f64) -> [u8; 4] {
        let black = LinSrgb::new(0.0, 0.0, 0.0);
        let mixed = black.mix(self.tint, val.clamp(0.0, 1.0) as f32);
        let c = to_color32(Srgb::from_linear(mixed));
        [c.r(), c.g(), c.b(), 255]
    }

    pub fn color(&self) -> Color32 {
        to_color32(Srgb::from_linear(self.tint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn series_colors_wrap() {
        let c = SeriesColors::new(3);
        assert_eq!(c.get(0), c.get(3));
    }

    #[test]
    fn intensity_endpoints() {
        let map = IntensityMap::for_wavelength(632.8);
        assert_eq!(map.apply(0.0), [0, 0, 0, 255]);
        let full = map.apply(1.0);
        assert_eq!(full[0], 255);
        assert_eq!(full[2], 0);
    }

    #[test]
    fn invisible_light_is_white() {
        assert_eq!(IntensityMap::for_wavelength(1064.0).apply(1.0), [255, 255, 255, 255]);
        assert_eq!(IntensityMap::grayscale().color(), Color32::WHITE);
    }
}
