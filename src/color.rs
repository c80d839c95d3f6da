use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Perceptually uniform colormap
// ---------------------------------------------------------------------------

const LOOKUP_SIZE: usize = 256;

/// Maps a scalar in `[vmin, vmax]` to a color through a lookup table.
#[derive(Debug, Clone)]
pub struct ColorMap {
    lookup: Vec<Color32>,
}

impl ColorMap {
    /// Viridis, sampled from `colorgrad` into a 256-entry table.
    pub fn viridis() -> Self {
        Self::from_gradient(&colorgrad::viridis())
    }

    fn from_gradient(gradient: &colorgrad::Gradient) -> Self {
        let lookup = (0..LOOKUP_SIZE)
            .map(|i| {
                let [r, g, b, _] = gradient
                    .at(i as f64 / (LOOKUP_SIZE - 1) as f64)
                    .to_rgba8();
                Color32::from_rgb(r, g, b)
            })
            .collect();

        ColorMap { lookup }
    }

    /// Color at a normalised position, clamped to `[0, 1]`.
    pub fn color_at(&self, t: f64) -> Color32 {
        if t.is_nan() {
            return Color32::TRANSPARENT;
        }
        let i = (t.clamp(0.0, 1.0) * (LOOKUP_SIZE - 1) as f64).round() as usize;
        self.lookup[i]
    }

    /// Color for `value` on the `[vmin, vmax]` scale. NaN is transparent.
    pub fn color_for(&self, value: f64, vmin: f64, vmax: f64) -> Color32 {
        let span = vmax - vmin;
        if span <= 0.0 {
            return self.color_at(if value.is_nan() { f64::NAN } else { 0.0 });
        }
        self.color_at((value - vmin) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color32, rgba: [u8; 4]) -> bool {
        [a.r(), a.g(), a.b()]
            .iter()
            .zip(rgba.iter())
            .all(|(x, y)| x.abs_diff(*y) <= 1)
    }

    #[test]
    fn matches_reference_viridis() {
        let cmap = ColorMap::viridis();
        let reference = colorgrad::viridis();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let expected = reference.at(t).to_rgba8();
            assert!(
                close(cmap.color_at(t), expected),
                "t = {t}: {:?} vs {expected:?}",
                cmap.color_at(t)
            );
        }
    }

    #[test]
    fn viridis_runs_from_purple_to_yellow() {
        let cmap = ColorMap::viridis();
        let low = cmap.color_at(0.0);
        let high = cmap.color_at(1.0);
        assert!(low.b() > low.g() && low.r() < 0x60);
        assert!(high.r() > 0xe0 && high.g() > 0xd0 && high.b() < 0x40);
    }

    #[test]
    fn values_are_clamped_to_the_scale() {
        let cmap = ColorMap::viridis();
        assert_eq!(cmap.color_for(-3.0, 0.0, 2.0), cmap.color_at(0.0));
        assert_eq!(cmap.color_for(7.5, 0.0, 2.0), cmap.color_at(1.0));
        assert_eq!(cmap.color_for(1.0, 0.0, 2.0), cmap.color_at(0.5));
    }

    #[test]
    fn nan_is_transparent() {
        let cmap = ColorMap::viridis();
        assert_eq!(cmap.color_for(f64::NAN, 0.0, 1.0), Color32::TRANSPARENT);
    }

    #[test]
    fn brightness_increases_along_the_map() {
        let cmap = ColorMap::viridis();
        let luma = |c: Color32| 0.2126 * c.r() as f64 + 0.7152 * c.g() as f64 + 0.0722 * c.b() as f64;
        let samples: Vec<f64> = (0..=10).map(|i| luma(cmap.color_at(i as f64 / 10.0))).collect();
        assert!(samples.windows(2).all(|w| w[1] > w[0]));
    }
}
