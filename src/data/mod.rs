//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .geojson / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse feed → Dataset (bad features skipped)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<EarthquakeRecord>, status index, magnitude range
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  magnitude bounds + status match → visible indices
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
