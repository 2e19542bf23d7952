use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Location – point geometry of an event
// ---------------------------------------------------------------------------

/// Epicentre coordinates in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// EarthquakeRecord – one feature of the feed
// ---------------------------------------------------------------------------

/// A single earthquake event. Never mutated after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeRecord {
    /// Feed event id (e.g. `us7000abcd`). Empty if the feed omits it.
    pub id: String,
    /// Magnitude; absent for some automatic solutions.
    pub magnitude: Option<f64>,
    pub place: String,
    /// Origin time. `None` if the feed value was missing or unparsable.
    pub time: Option<DateTime<Utc>>,
    /// Review status category, e.g. `automatic` or `reviewed`.
    pub status: String,
    /// Event type, e.g. `earthquake`, `quarry blast`.
    pub event_type: String,
    pub title: String,
    pub location: Location,
    /// Hypocentre depth in kilometres (third point coordinate).
    pub depth_km: Option<f64>,
    pub url: String,
}

impl EarthquakeRecord {
    /// Magnitude if it is present and a real number.
    pub fn finite_magnitude(&self) -> Option<f64> {
        self.magnitude.filter(|m| m.is_finite())
    }

    /// Origin time formatted for list display.
    pub fn time_label(&self) -> String {
        self.time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "–".to_string())
    }

    /// Magnitude formatted for list display.
    pub fn magnitude_label(&self) -> String {
        match self.finite_magnitude() {
            Some(m) => format!("{m:.1}"),
            None => "–".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded feed
// ---------------------------------------------------------------------------

/// The full parsed feed with pre-computed indices for the filter widgets.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records in feed order.
    pub records: Vec<EarthquakeRecord>,
    /// Sorted set of distinct status values.
    pub statuses: BTreeSet<String>,
    /// Smallest and largest finite magnitude, if any record has one.
    pub magnitude_range: Option<(f64, f64)>,
}

impl Dataset {
    /// Build the status index and magnitude range from the loaded records.
    pub fn from_records(records: Vec<EarthquakeRecord>) -> Self {
        let statuses: BTreeSet<String> = records.iter().map(|r| r.status.clone()).collect();

        let magnitude_range = records
            .iter()
            .filter_map(EarthquakeRecord::finite_magnitude)
            .fold(None, |acc: Option<(f64, f64)>, m| match acc {
                None => Some((m, m)),
                Some((lo, hi)) => Some((lo.min(m), hi.max(m))),
            });

        Dataset {
            records,
            statuses,
            magnitude_range,
        }
    }

    /// Largest finite depth in the dataset, used to scale depth colours.
    pub fn max_depth(&self) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|r| r.depth_km)
            .filter(|d| d.is_finite())
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
