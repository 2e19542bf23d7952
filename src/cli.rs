use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::data::filter::{
    filter_records, FilterCriteria, StatusFilter, DEFAULT_MAX_MAGNITUDE, DEFAULT_MIN_MAGNITUDE,
};
use crate::data::loader::load_file;
use crate::state::NO_MATCHES_MESSAGE;

#[derive(Parser, Debug)]
#[command(name = "quake-filter", version, about)]
pub struct Cli {
    /// GeoJSON or CSV earthquake feed to open (use File → Open… if omitted).
    pub path: Option<PathBuf>,

    /// Initial minimum magnitude (inclusive).
    #[arg(long = "min-mag", default_value_t = DEFAULT_MIN_MAGNITUDE, allow_negative_numbers = true)]
    pub min_mag: f64,

    /// Initial maximum magnitude (inclusive).
    #[arg(long = "max-mag", default_value_t = DEFAULT_MAX_MAGNITUDE, allow_negative_numbers = true)]
    pub max_mag: f64,

    /// Only show events with exactly this status (e.g. "reviewed").
    #[arg(short = 's', long = "status")]
    pub status: Option<String>,

    /// Print matching places to stdout and exit instead of opening a window.
    #[arg(short = 'l', long = "list", requires = "path")]
    pub list: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl Cli {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_magnitude: self.min_mag,
            max_magnitude: self.max_mag,
            status: match &self.status {
                Some(s) => StatusFilter::Exact(s.clone()),
                None => StatusFilter::Any,
            },
        }
    }
}

/// Run the filter once over `path` and write one place per line.
pub fn run_list(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let path = cli
        .path
        .as_deref()
        .context("--list needs a feed file")?;
    let dataset = load_file(path)?;
    let criteria = cli.criteria().clamped();

    let matches = filter_records(&dataset.records, &criteria);
    log::info!("{} of {} earthquakes match", matches.len(), dataset.len());

    if matches.is_empty() {
        writeln!(out, "{NO_MATCHES_MESSAGE}").context("writing place list")?;
    }
    for rec in matches {
        writeln!(out, "{}", rec.place).context("writing place list")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_defaults() {
        let cli = Cli::parse_from(["quake-filter"]);
        assert_eq!(cli.criteria(), FilterCriteria::default());
        assert!(!cli.list);
    }

    #[test]
    fn flags_build_criteria() {
        let cli = Cli::parse_from([
            "quake-filter",
            "all_month.geojson",
            "--min-mag",
            "-0.5",
            "--max-mag",
            "4",
            "--status",
            "automatic",
        ]);
        let c = cli.criteria();
        assert_eq!(c.min_magnitude, -0.5);
        assert_eq!(c.max_magnitude, 4.0);
        assert_eq!(c.status, StatusFilter::Exact("automatic".to_string()));
    }

    #[test]
    fn list_requires_a_path() {
        assert!(Cli::try_parse_from(["quake-filter", "--list"]).is_err());
    }

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "properties": { "mag": 1.2, "place": "Yakutat, Alaska", "status": "automatic" },
              "geometry": { "type": "Point", "coordinates": [-139.7, 60.0, 12.5] } },
            { "properties": { "mag": 3.4, "place": "Valparaiso, Chile", "status": "reviewed" },
              "geometry": { "type": "Point", "coordinates": [-71.6, -33.0, 40.0] } },
            { "properties": { "mag": null, "place": "The Geysers, CA", "status": "automatic" },
              "geometry": { "type": "Point", "coordinates": [-122.8, 38.8] } },
            { "properties": { "mag": 4.8, "place": "Honshu, Japan", "status": "automatic" },
              "geometry": { "type": "Point", "coordinates": [141.5, 37.5, 60.0] } }
        ]
    }"#;

    fn list_output(feed_args: &[&str]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_month.geojson");
        std::fs::write(&path, FEED).unwrap();

        let mut args = vec!["quake-filter", path.to_str().unwrap(), "--list"];
        args.extend_from_slice(feed_args);
        let cli = Cli::parse_from(args);

        let mut out = Vec::new();
        run_list(&cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn list_mode_prints_matching_places_in_feed_order() {
        assert_eq!(
            list_output(&[]),
            "Yakutat, Alaska\nValparaiso, Chile\nHonshu, Japan\n"
        );
        assert_eq!(
            list_output(&["--min-mag", "-1", "--status", "automatic"]),
            "Yakutat, Alaska\nHonshu, Japan\n"
        );
    }

    #[test]
    fn list_mode_prints_message_when_nothing_matches() {
        assert_eq!(
            list_output(&["--min-mag", "5", "--max-mag", "6"]),
            format!("{NO_MATCHES_MESSAGE}\n")
        );
        assert_eq!(
            list_output(&["--status", "deleted"]),
            format!("{NO_MATCHES_MESSAGE}\n")
        );
    }

    #[test]
    fn list_mode_reports_unsupported_file() {
        let cli = Cli::parse_from(["quake-filter", "feed.txt", "--list"]);
        let mut out = Vec::new();
        assert!(run_list(&cli, &mut out).is_err());
        assert!(out.is_empty());
    }
}
