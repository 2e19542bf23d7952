use crate::color::StatusColors;
use crate::data::filter::{filtered_indices, FilterCriteria, StatusFilter};
use crate::data::model::{Dataset, EarthquakeRecord};

/// Message shown in place of the list when the filter matches nothing.
pub const NO_MATCHES_MESSAGE: &str = "No earthquakes found in range.";

/// What the map markers are coloured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorBy {
    #[default]
    Depth,
    Status,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded feed (None until the user loads a file).
    pub dataset: Option<Dataset>,

    /// Criteria being edited in the side panel; not yet applied.
    pub pending: FilterCriteria,

    /// Criteria behind `visible_indices`.
    pub applied: FilterCriteria,

    /// Indices of records passing `applied` (cached).
    pub visible_indices: Vec<usize>,

    pub color_by: ColorBy,

    /// Colours per status of the current dataset.
    pub status_colors: Option<StatusColors>,

    /// Deepest event, for scaling depth colours.
    pub max_depth: f64,

    /// Record under the pointer on the map.
    pub hovered: Option<usize>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// State with initial criteria (e.g. from the command line).
    pub fn with_criteria(criteria: FilterCriteria) -> Self {
        let criteria = criteria.clamped();
        Self {
            pending: criteria.clone(),
            applied: criteria,
            ..Default::default()
        }
    }

    /// Ingest a newly loaded dataset and run the initial filter.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        // A status from a previous file may not exist in this one.
        if let StatusFilter::Exact(s) = &self.pending.status {
            if !dataset.statuses.contains(s) {
                log::info!("Status '{s}' not present in new dataset, resetting to Any");
                self.pending.status = StatusFilter::Any;
            }
        }

        self.status_colors = Some(StatusColors::new(&dataset.statuses));
        self.max_depth = dataset.max_depth().unwrap_or(0.0);
        self.hovered = None;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.apply_filter();
    }

    /// Copy the pending criteria to the applied ones and recompute
    /// `visible_indices`.
    pub fn apply_filter(&mut self) {
        self.pending = self.pending.clamped();
        self.applied = self.pending.clone();
        self.hovered = None;
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.applied);
        }
    }

    /// Whether the widgets hold edits that have not been applied.
    pub fn has_pending_changes(&self) -> bool {
        self.pending != self.applied
    }

    /// Visible records in feed order.
    pub fn visible_records(&self) -> impl Iterator<Item = &EarthquakeRecord> + '_ {
        let records = self.dataset.as_ref().map(|ds| &ds.records[..]).unwrap_or(&[]);
        self.visible_indices.iter().filter_map(move |&i| records.get(i))
    }

    /// Text shown instead of the place list: `None` while there are rows
    /// to show or before anything is loaded.
    pub fn list_placeholder(&self) -> Option<&'static str> {
        (self.dataset.is_some() && self.visible_indices.is_empty()).then_some(NO_MATCHES_MESSAGE)
    }

    /// Record currently hovered on the map.
    pub fn hovered_record(&self) -> Option<&EarthquakeRecord> {
        let idx = self.hovered?;
        self.dataset.as_ref()?.records.get(idx)
    }
}
