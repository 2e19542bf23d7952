use std::fmt;

use super::model::{Dataset, EarthquakeRecord};

/// Lowest magnitude the bound widgets accept.
pub const MAGNITUDE_MIN: f64 = -1.0;
/// Highest magnitude the bound widgets accept.
pub const MAGNITUDE_MAX: f64 = 10.0;

pub const DEFAULT_MIN_MAGNITUDE: f64 = 0.0;
pub const DEFAULT_MAX_MAGNITUDE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Status predicate
// ---------------------------------------------------------------------------

/// Status half of the filter: match everything, or one exact category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    /// Exact, case-sensitive match on the record's status.
    Exact(String),
}

impl StatusFilter {
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::Exact(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::Any => write!(f, "Any"),
            StatusFilter::Exact(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Active filter parameters. Recreated per filter pass; `min <= max` is
/// expected but not enforced (an inverted range simply matches nothing).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub status: StatusFilter,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_magnitude: DEFAULT_MIN_MAGNITUDE,
            max_magnitude: DEFAULT_MAX_MAGNITUDE,
            status: StatusFilter::Any,
        }
    }
}

impl FilterCriteria {
    /// Both bounds clamped into `MAGNITUDE_MIN..=MAGNITUDE_MAX`.
    /// The order of the bounds is left alone.
    pub fn clamped(&self) -> Self {
        Self {
            min_magnitude: self.min_magnitude.clamp(MAGNITUDE_MIN, MAGNITUDE_MAX),
            max_magnitude: self.max_magnitude.clamp(MAGNITUDE_MIN, MAGNITUDE_MAX),
            status: self.status.clone(),
        }
    }

    /// A record passes when its magnitude lies in `[min, max]` (inclusive)
    /// and its status passes the status predicate. Missing or NaN
    /// magnitudes never pass.
    pub fn matches(&self, record: &EarthquakeRecord) -> bool {
        let in_range = record
            .magnitude
            .is_some_and(|m| self.min_magnitude <= m && m <= self.max_magnitude);
        in_range && self.status.matches(&record.status)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records passing `criteria`, in input order.
pub fn filter_records<'a>(
    records: &'a [EarthquakeRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a EarthquakeRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Return indices of records that pass `criteria`, ascending.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Filter {:.1}..={:.1} status={} kept {} of {}",
        criteria.min_magnitude,
        criteria.max_magnitude,
        criteria.status,
        indices.len(),
        dataset.len()
    );
    indices
}

/// Index (into `dataset.records`) of the visible record nearest to
/// `(lon, lat)`, if one lies within `max_distance` degrees.
pub fn nearest_record(
    dataset: &Dataset,
    visible: &[usize],
    lon: f64,
    lat: f64,
    max_distance: f64,
) -> Option<usize> {
    visible
        .iter()
        .filter_map(|&i| {
            let loc = dataset.records.get(i)?.location;
            let d = (loc.longitude - lon).hypot(loc.latitude - lat);
            (d <= max_distance).then_some((i, d))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
