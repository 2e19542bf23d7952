use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, Points};

use crate::color::{depth_color, marker_radius};
use crate::data::filter::nearest_record;
use crate::state::{AppState, ColorBy};

/// Number of depth bands in the depth legend.
const DEPTH_BANDS: usize = 8;

/// Hover pick radius in screen points.
const HOVER_RADIUS_PX: f64 = 8.0;

/// A batch of markers sharing colour, size and legend name.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGroup {
    pub name: String,
    pub color: Color32,
    pub radius: f32,
    /// `[longitude, latitude]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Group the visible records into marker batches. Drawing one `Points`
/// item per record is too slow for a month-long feed.
pub fn marker_groups(state: &AppState) -> Vec<MarkerGroup> {
    // Key: (legend sort key, half-magnitude bucket)
    let mut groups: BTreeMap<(String, i32), MarkerGroup> = BTreeMap::new();
    let band_width = if state.max_depth > 0.0 {
        state.max_depth / DEPTH_BANDS as f64
    } else {
        1.0
    };

    for rec in state.visible_records() {
        let (key, name, color) = match state.color_by {
            ColorBy::Status => {
                let color = state
                    .status_colors
                    .as_ref()
                    .map_or(Color32::GRAY, |sc| sc.color_for(&rec.status));
                let name = if rec.status.is_empty() {
                    "(no status)".to_string()
                } else {
                    rec.status.clone()
                };
                (name.clone(), name, color)
            }
            ColorBy::Depth => match rec.depth_km.filter(|d| d.is_finite()) {
                Some(depth) => {
                    let band = ((depth.max(0.0) / band_width) as usize).min(DEPTH_BANDS - 1);
                    let lo = band as f64 * band_width;
                    let hi = lo + band_width;
                    let color = depth_color(Some(lo + band_width / 2.0), state.max_depth);
                    (
                        format!("{band:02}"),
                        format!("{lo:.0}–{hi:.0} km"),
                        color,
                    )
                }
                None => ("zz".to_string(), "depth unknown".to_string(), Color32::GRAY),
            },
        };

        let bucket = rec
            .finite_magnitude()
            .map_or(i32::MIN, |m| (m * 2.0).floor() as i32);
        let radius = marker_radius(rec.finite_magnitude().map(|_| f64::from(bucket) / 2.0));

        groups
            .entry((key, bucket))
            .or_insert_with(|| MarkerGroup {
                name,
                color,
                radius,
                points: Vec::new(),
            })
            .points
            .push([rec.location.longitude, rec.location.latitude]);
    }

    groups.into_values().collect()
}

// ---------------------------------------------------------------------------
// Earthquake map (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter map in the central panel.
pub fn quake_map(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an earthquake feed to begin  (File → Open…)");
        });
        return;
    }

    let groups = marker_groups(state);

    let response = Plot::new("quake_map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for group in groups {
                plot_ui.points(
                    Points::new(group.points)
                        .name(&group.name)
                        .color(group.color)
                        .radius(group.radius)
                        .shape(MarkerShape::Circle)
                        .filled(true),
                );
            }
            let degrees_per_px = plot_ui.transform().dvalue_dpos()[0].abs();
            plot_ui
                .pointer_coordinate()
                .map(|p: PlotPoint| (p, degrees_per_px * HOVER_RADIUS_PX))
        });

    state.hovered = match (&state.dataset, response.inner) {
        (Some(ds), Some((pointer, max_distance))) => nearest_record(
            ds,
            &state.visible_indices,
            pointer.x,
            pointer.y,
            max_distance,
        ),
        _ => None,
    };

    if let Some(rec) = state.hovered_record() {
        response.response.on_hover_text(format!(
            "{}\nType: {}\nMagnitude: {}\nDepth: {}\nStatus: {}\n{}",
            rec.title,
            rec.event_type,
            rec.magnitude_label(),
            rec.depth_km
                .map_or_else(|| "–".to_string(), |d| format!("{d:.1} km")),
            rec.status,
            rec.time_label(),
        ));
    }
}
