use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

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

/// Colour of the first series of a chart.
pub fn series_color() -> Color32 {
    generate_palette(1)[0]
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Maps a correlation in `[-1, 1]` onto blue → white → red.  NaN is grey.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let t = r.clamp(-1.0, 1.0) as f32;

    let white: LinSrgb = Srgb::new(0.97, 0.97, 0.97).into_linear();
    let end: LinSrgb = if t < 0.0 {
        Srgb::new(0.13, 0.40, 0.67).into_linear()
    } else {
        Srgb::new(0.70, 0.09, 0.17).into_linear()
    };

    let mixed = white.mix(end, t.abs());
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on a heatmap cell.
pub fn label_color(r: f64) -> Color32 {
    if r.abs() > 0.6 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        assert_ne!(colors[0], colors[3]);
    }

    #[test]
    fn correlation_scale_endpoints() {
        assert_eq!(correlation_color(f64::NAN), Color32::GRAY);
        let zero = correlation_color(0.0);
        assert!(zero.r() > 240 && zero.g() > 240 && zero.b() > 240);
        let pos = correlation_color(1.0);
        assert!(pos.r() > pos.b());
        let neg = correlation_color(-1.0);
        assert!(neg.b() > neg.r());
    }
}
