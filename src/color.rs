use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar colour ramp
// ---------------------------------------------------------------------------

/// Map a normalized value in `0..=1` onto a blue ramp: small bars render
/// pale, large bars render saturated.
pub fn value_color(norm: f32) -> Color32 {
    let norm = norm.clamp(0.0, 1.0);
    let lightness = 0.80 - 0.45 * norm;
    let hsl = Hsl::new(210.0, 0.75, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Normalize a slice of bar values into `0..=1` for [`value_color`].
/// A flat series maps every bar to 1.0 (all fully saturated).
pub fn normalized(values: &[f64]) -> Vec<f32> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            if range.abs() < f64::EPSILON {
                1.0
            } else {
                ((v - min) / range) as f32
            }
        })
        .collect()
}
