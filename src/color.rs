use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
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
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Status colours: category → Color32
// ---------------------------------------------------------------------------

/// Maps each status category of the dataset to a distinct colour.
#[derive(Debug, Clone)]
pub struct StatusColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl StatusColors {
    pub fn new(statuses: &BTreeSet<String>) -> Self {
        let mapping = statuses
            .iter()
            .cloned()
            .zip(generate_palette(statuses.len()))
            .collect();

        StatusColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a status; unknown statuses are grey.
    pub fn color_for(&self, status: &str) -> Color32 {
        self.mapping
            .get(status)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (status → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(s, c)| (s.clone(), *c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Depth scale
// ---------------------------------------------------------------------------

/// Continuous depth colour: dark purple at the surface through teal to
/// yellow at `max_depth`. Missing depth is grey.
pub fn depth_color(depth_km: Option<f64>, max_depth: f64) -> Color32 {
    let Some(depth) = depth_km.filter(|d| d.is_finite()) else {
        return Color32::GRAY;
    };
    let t = if max_depth > 0.0 {
        (depth / max_depth).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    // Hue 280° (purple) → 60° (yellow), brightening with depth.
    let hue = 280.0 - t * 220.0;
    let lightness = 0.30 + t * 0.30;
    hsl_to_color32(hue, 0.80, lightness)
}

/// Marker radius in points for a magnitude. Grows with magnitude; absent
/// magnitudes get the smallest marker.
pub fn marker_radius(magnitude: Option<f64>) -> f32 {
    const MIN_RADIUS: f32 = 1.5;
    match magnitude.filter(|m| m.is_finite()) {
        Some(m) => (MIN_RADIUS + (m as f32 + 1.0).max(0.0) * 1.2).max(MIN_RADIUS),
        None => MIN_RADIUS,
    }
}
