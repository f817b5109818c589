/// Approximate sRGB colour of monochromatic light, black outside 380–780 nm.
///
/// Piecewise-linear ramps through violet, blue, cyan, green, yellow and red
/// with a gamma of 0.8, dimmed towards both ends of the visible range.
pub fn wavelength_to_rgb(nm: f64) -> [u8; 3] {
    const GAMMA: f64 = 0.8;
    let (r, g, b) = if (380.0..=440.0).contains(&nm) {
        let att = 0.3 + 0.7 * (nm - 380.0) / 60.0;
        ((-(nm - 440.0) / 60.0 * att).powf(GAMMA), 0.0, att.powf(GAMMA))
    } else if (440.0..=490.0).contains(&nm) {
        (0.0, ((nm - 440.0) / 50.0).powf(GAMMA), 1.0)
    } else if (490.0..=510.0).contains(&nm) {
        (0.0, 1.0, (-(nm - 510.0) / 20.0).powf(GAMMA))
    } else if (510.0..=580.0).contains(&nm) {
        (((nm - 510.0) / 70.0).powf(GAMMA), 1.0, 0.0)
    } else if (580.0..=645.0).contains(&nm) {
        (1.0, (-(nm - 645.0) / 65.0).powf(GAMMA), 0.0)
    } else if (645.0..=780.0).contains(&nm) {
        let att = 0.3 + 0.7 * (750.0 - nm) / 105.0;
        (att, 0.0, 0.0)
    } else {
        (0.0, 0.0, 0.0)
    };
    let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invisible_is_black() {
        assert_eq!(wavelength_to_rgb(300.0), [0, 0, 0]);
        assert_eq!(wavelength_to_rgb(900.0), [0, 0, 0]);
    }

    #[test]
    fn primary_regions() {
        assert_eq!(wavelength_to_rgb(645.0), [255, 0, 0]);
        assert_eq!(wavelength_to_rgb(510.0), [0, 255, 0]);
        assert_eq!(wavelength_to_rgb(440.0), [0, 0, 255]);
    }

    #[test]
    fn helium_neon_is_red() {
        let [r, g, b] = wavelength_to_rgb(632.8);
        assert_eq!(r, 255);
        assert!(g < 100);
        assert_eq!(b, 0);
    }
}
