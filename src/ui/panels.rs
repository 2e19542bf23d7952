use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::depth_color;
use crate::data::filter::{StatusFilter, MAGNITUDE_MAX, MAGNITUDE_MIN};
use crate::state::{AppState, ColorBy};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let statuses = dataset.statuses.clone();
    let magnitude_range = dataset.magnitude_range;

    // ---- Magnitude bounds ----
    egui::Grid::new("magnitude_bounds")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Min Magnitude:");
            ui.add(
                egui::DragValue::new(&mut state.pending.min_magnitude)
                    .range(MAGNITUDE_MIN..=MAGNITUDE_MAX)
                    .speed(0.05)
                    .fixed_decimals(2),
            );
            ui.end_row();

            ui.label("Max Magnitude:");
            ui.add(
                egui::DragValue::new(&mut state.pending.max_magnitude)
                    .range(MAGNITUDE_MIN..=MAGNITUDE_MAX)
                    .speed(0.05)
                    .fixed_decimals(2),
            );
            ui.end_row();
        });

    if let Some((lo, hi)) = magnitude_range {
        ui.small(format!("Feed magnitudes: {lo:.1} – {hi:.1}"));
    }
    if state.pending.min_magnitude > state.pending.max_magnitude {
        ui.small(RichText::new("Min is above max: nothing will match.").color(Color32::YELLOW));
    }

    // ---- Status selector ----
    ui.add_space(4.0);
    ui.strong("Status");
    egui::ComboBox::from_id_salt("status_filter")
        .selected_text(state.pending.status.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut state.pending.status, StatusFilter::Any, "Any");
            for status in &statuses {
                ui.selectable_value(
                    &mut state.pending.status,
                    StatusFilter::Exact(status.clone()),
                    status,
                );
            }
        });

    ui.add_space(6.0);
    let apply_label = if state.has_pending_changes() {
        "Apply Filter •"
    } else {
        "Apply Filter"
    };
    if ui.button(apply_label).clicked() {
        state.apply_filter();
    }

    ui.separator();

    // ---- Colour-by selector + legend ----
    ui.strong("Color by");
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut state.color_by, ColorBy::Depth, "Depth");
        ui.radio_value(&mut state.color_by, ColorBy::Status, "Status");
    });

    match state.color_by {
        ColorBy::Status => {
            if let Some(colors) = &state.status_colors {
                for (status, color) in colors.legend_entries() {
                    ui.label(RichText::new(format!("● {status}")).color(color));
                }
            }
        }
        ColorBy::Depth => {
            let max = state.max_depth;
            ui.label(RichText::new("● shallow").color(depth_color(Some(0.0), max)));
            ui.label(
                RichText::new(format!("● deep ({max:.0} km)")).color(depth_color(Some(max), max)),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – matching places
// ---------------------------------------------------------------------------

/// Render the list of visible records.
pub fn place_list(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        return;
    }
    if let Some(message) = state.list_placeholder() {
        ui.label(message);
        return;
    }

    let rows: Vec<_> = state.visible_records().collect();
    let hovered_id = state.hovered_record().map(|r| r.id.as_str());

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(150.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Mag");
            });
            header.col(|ui| {
                ui.strong("Status");
            });
            header.col(|ui| {
                ui.strong("Time");
            });
            header.col(|ui| {
                ui.strong("Place");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = rows[row.index()];
                let highlight = !rec.id.is_empty() && hovered_id == Some(rec.id.as_str());
                row.set_selected(highlight);
                row.col(|ui| {
                    ui.label(rec.magnitude_label());
                });
                row.col(|ui| {
                    ui.label(&rec.status);
                });
                row.col(|ui| {
                    ui.label(rec.time_label());
                });
                row.col(|ui| {
                    let place = ui.label(&rec.place);
                    if !rec.url.is_empty() {
                        place.on_hover_text(&rec.url);
                    }
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} earthquakes loaded, {} shown",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open earthquake feed")
        .add_filter("Supported files", &["geojson", "json", "csv"])
        .add_filter("GeoJSON", &["geojson", "json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_into_state(state, &path);
    }
}

/// Load `path` and hand the result to `state`, reporting failures in the
/// status message instead of aborting.
pub fn load_into_state(state: &mut AppState, path: &std::path::Path) {
    match crate::data::loader::load_file(path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} earthquakes from {} (statuses {:?})",
                dataset.len(),
                path.display(),
                dataset.statuses
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
