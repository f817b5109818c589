use eframe::egui::{self, Color32, ColorImage, Rect, TextureHandle, TextureOptions, Ui};
use egui_plot::{Line, LineStyle, PlotPoints, Points};

use crate::color::IntensityMap;

// ---------------------------------------------------------------------------
// Series helpers
// ---------------------------------------------------------------------------

pub fn xy_points(x: &[f64], y: &[f64]) -> PlotPoints<'static> {
    x.iter().zip(y).map(|(&xi, &yi)| [xi, yi]).collect()
}

pub fn line(name: &str, x: &[f64], y: &[f64], color: Color32) -> Line<'static> {
    Line::new(xy_points(x, y)).name(name).color(color).width(2.0)
}

pub fn dashed(line: Line) -> Line {
    line.style(LineStyle::dashed_dense())
}

pub fn scatter(name: &str, x: &[f64], y: &[f64], color: Color32) -> Points<'static> {
    Points::new(xy_points(x, y))
        .name(name)
        .color(color)
        .radius(3.0)
}

/// A straight segment as a two-point line.
pub fn segment(name: &str, from: [f64; 2], to: [f64; 2], color: Color32) -> Line<'static> {
    Line::new(PlotPoints::from(vec![from, to]))
        .name(name)
        .color(color)
        .width(2.0)
}

/// How much of a freshly calculated series is on screen. Charts draw the
/// first `shown` samples and the window advances it once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reveal {
    shown: usize,
    total: usize,
}

impl Reveal {
    pub fn start(total: usize) -> Self {
        Self { shown: 0, total }
    }

    /// Show `step` more samples. Returns true while samples remain hidden.
    pub fn advance(&mut self, step: usize) -> bool {
        self.shown = (self.shown + step).min(self.total);
        self.shown < self.total
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    /// The first samples of `values` that are on screen.
    pub fn visible<'a>(&self, values: &'a [f64]) -> &'a [f64] {
        &values[..self.shown.min(values.len())]
    }
}

// ---------------------------------------------------------------------------
// Intensity images
// ---------------------------------------------------------------------------

/// Turn a row-major grid of intensities into an image. Values are scaled by
/// the grid maximum so the brightest pixel is the full light colour.
pub fn intensity_image(values: &[f64], width: usize, height: usize, map: IntensityMap) -> ColorImage {
    let peak = values.iter().copied().fold(0.0_f64, f64::max);
    let scale = if peak > 0.0 { 1.0 / peak } else { 0.0 };

    let mut pixels = vec![0u8; width * height * 4];
    for (idx, chunk) in pixels.chunks_exact_mut(4).enumerate() {
        let v = values.get(idx).copied().unwrap_or(0.0) * scale;
        chunk.copy_from_slice(&map.apply(v));
    }
    ColorImage::from_rgba_unmultiplied([width, height], &pixels)
}

/// One intensity profile stretched vertically into a band, as a fringe
/// pattern appears on a screen.
pub fn fringe_band(profile: &[f64], height: usize, map: IntensityMap) -> ColorImage {
    let width = profile.len();
    let mut grid = Vec::with_capacity(width * height);
    for _ in 0..height {
        grid.extend_from_slice(profile);
    }
    intensity_image(&grid, width, height, map)
}

/// Upload (or replace) a texture and return its handle.
pub fn upload(ui: &Ui, name: &str, image: ColorImage) -> TextureHandle {
    ui.ctx().load_texture(name, image, TextureOptions::LINEAR)
}

/// Draw a texture `width` points wide, keeping its aspect ratio.
/// Returns the rectangle it occupies.
pub fn show_texture(ui: &mut Ui, texture: &TextureHandle, width: f32) -> Rect {
    let [w, h] = texture.size();
    let scale = width / w.max(1) as f32;
    let size = egui::vec2(width, h as f32 * scale);
    ui.image((texture.id(), size)).rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_runs_to_the_end_and_stops() {
        let mut reveal = Reveal::start(10);
        assert_eq!(reveal.shown(), 0);
        assert!(reveal.advance(4));
        assert_eq!(reveal.visible(&[1.0; 6]).len(), 4);
        assert!(reveal.advance(4));
        // Shorter series are clipped to their own length.
        assert_eq!(reveal.visible(&[1.0; 6]).len(), 6);
        assert!(!reveal.advance(4));
        assert_eq!(reveal.shown(), 10);
        assert!(!reveal.advance(4));
    }

    #[test]
    fn image_is_normalised_to_peak() {
        let img = intensity_image(&[0.0, 2.0, 4.0, 1.0], 2, 2, IntensityMap::grayscale());
        assert_eq!(img.size, [2, 2]);
        assert_eq!(img.pixels[0], Color32::BLACK);
        assert_eq!(img.pixels[2], Color32::WHITE);
    }

    #[test]
    fn dark_grid_stays_black() {
        let img = intensity_image(&[0.0; 6], 3, 2, IntensityMap::grayscale());
        assert!(img.pixels.iter().all(|&p| p == Color32::BLACK));
    }

    #[test]
    fn band_repeats_profile() {
        let img = fringe_band(&[1.0, 0.0, 1.0], 4, IntensityMap::grayscale());
        assert_eq!(img.size, [3, 4]);
        assert_eq!(img.pixels[3], Color32::WHITE);
        assert_eq!(img.pixels[4], Color32::BLACK);
    }
}
