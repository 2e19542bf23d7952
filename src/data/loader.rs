use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::FeatureError;
use super::model::{Dataset, EarthquakeRecord, Location};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an earthquake feed from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.geojson` / `.json` – USGS GeoJSON `FeatureCollection` (recommended)
/// * `.csv`               – USGS CSV feed (`time,latitude,longitude,depth,mag,...`)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "geojson" | "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_geojson(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// GeoJSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    /// `null` is valid GeoJSON here.
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

/// The subset of USGS feature properties we keep. Everything is nullable in
/// the feed, so everything is optional here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Properties {
    /// Anything that is not a JSON number counts as absent.
    #[serde(deserialize_with = "lenient_f64")]
    mag: Option<f64>,
    place: Option<String>,
    /// Epoch milliseconds.
    #[serde(deserialize_with = "lenient_f64")]
    time: Option<f64>,
    status: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    title: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    /// Kept untyped: only `Point` is usable, but other geometry kinds must
    /// still deserialize so they can be reported and skipped.
    #[serde(default)]
    coordinates: JsonValue,
}

fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(de)?;
    Ok(value.as_ref().and_then(JsonValue::as_f64))
}

/// Parse a GeoJSON `FeatureCollection` document.
///
/// Features without a usable point geometry are skipped with a warning;
/// a document that is not a feature collection fails as a whole.
pub fn parse_geojson(text: &str) -> Result<Dataset> {
    let collection: FeatureCollection =
        serde_json::from_str(text).context("parsing GeoJSON")?;

    if collection.kind != "FeatureCollection" {
        bail!(
            "Expected a GeoJSON FeatureCollection, got type '{}'",
            collection.kind
        );
    }

    let total = collection.features.len();
    let mut records = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for (i, feature) in collection.features.into_iter().enumerate() {
        match convert_feature(i, feature) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                log::warn!("Skipping {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} of {total} features without a usable point geometry");
    }

    Ok(Dataset::from_records(records))
}

fn convert_feature(index: usize, feature: Feature) -> Result<EarthquakeRecord, FeatureError> {
    let geometry = feature
        .geometry
        .ok_or(FeatureError::MissingGeometry { index })?;

    if geometry.kind != "Point" {
        return Err(FeatureError::NotAPoint {
            index,
            kind: geometry.kind,
        });
    }

    // GeoJSON order: [longitude, latitude, depth?]
    let coords: &[JsonValue] = geometry
        .coordinates
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default();

    if coords.len() < 2 {
        return Err(FeatureError::TooFewCoordinates {
            index,
            found: coords.len(),
        });
    }

    let axis = |position: usize| {
        coords[position]
            .as_f64()
            .ok_or(FeatureError::NonNumericCoordinate { index, position })
    };
    let longitude = axis(0)?;
    let latitude = axis(1)?;
    let depth_km = coords.get(2).and_then(JsonValue::as_f64);

    let props = feature.properties.unwrap_or_default();
    let place = props.place.unwrap_or_default();
    let magnitude = props.mag;
    let title = props
        .title
        .unwrap_or_else(|| default_title(magnitude, &place));

    Ok(EarthquakeRecord {
        id: feature.id.unwrap_or_default(),
        magnitude,
        time: props
            .time
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64)),
        status: props.status.unwrap_or_default(),
        event_type: props.event_type.unwrap_or_default(),
        title,
        location: Location {
            longitude,
            latitude,
        },
        depth_km,
        url: props.url.unwrap_or_default(),
        place,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One row of the USGS CSV feed. Columns we do not use are ignored;
/// empty cells become `None`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    time: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    depth: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    mag: Option<f64>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default, rename = "type")]
    event_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Parse a USGS CSV feed (header row required).
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        match convert_row(row_no, row) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                log::warn!("Skipping {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} CSV rows without coordinates");
    }

    Ok(Dataset::from_records(records))
}

fn convert_row(index: usize, row: CsvRow) -> Result<EarthquakeRecord, FeatureError> {
    let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
        return Err(FeatureError::InvalidCoordinates { index });
    };

    let place = row.place.unwrap_or_default();
    let title = row
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| default_title(row.mag, &place));

    Ok(EarthquakeRecord {
        id: row.id.unwrap_or_default(),
        magnitude: row.mag,
        time: row.time.as_deref().and_then(parse_rfc3339),
        status: row.status.unwrap_or_default(),
        event_type: row.event_type.unwrap_or_default(),
        title,
        location: Location {
            latitude,
            longitude,
        },
        depth_km: row.depth,
        url: row.url.unwrap_or_default(),
        place,
    })
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

/// Title in the feed's own style: `M 4.5 - 10 km SW of Somewhere`.
fn default_title(magnitude: Option<f64>, place: &str) -> String {
    match magnitude {
        Some(m) => format!("M {m:.1} - {place}"),
        None => place.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "metadata": { "title": "USGS All Earthquakes, Past Month" },
        "features": [
            {
                "type": "Feature",
                "id": "ak0251",
                "properties": {
                    "mag": 1.2, "place": "50 km N of Yakutat, Alaska",
                    "time": 1714566896789, "status": "automatic",
                    "type": "earthquake", "title": "M 1.2 - 50 km N of Yakutat, Alaska",
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ak0251"
                },
                "geometry": { "type": "Point", "coordinates": [-139.7, 60.0, 12.5] }
            },
            {
                "type": "Feature",
                "id": "nc0001",
                "properties": {
                    "mag": null, "place": "The Geysers, CA", "time": 1714566000000,
                    "status": "reviewed", "type": "earthquake", "title": "M ? - The Geysers, CA"
                },
                "geometry": { "type": "Point", "coordinates": [-122.8, 38.8] }
            },
            {
                "type": "Feature",
                "id": "broken",
                "properties": { "mag": 3.0, "place": "nowhere" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn geojson_feed_parses_points_and_skips_missing_geometry() {
        let ds = parse_geojson(FEED).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.id, "ak0251");
        assert_eq!(first.magnitude, Some(1.2));
        assert_eq!(first.status, "automatic");
        assert_eq!(first.location.longitude, -139.7);
        assert_eq!(first.location.latitude, 60.0);
        assert_eq!(first.depth_km, Some(12.5));
        assert_eq!(
            first.time.map(|t| t.timestamp_millis()),
            Some(1_714_566_896_789)
        );

        let second = &ds.records[1];
        assert_eq!(second.magnitude, None);
        assert_eq!(second.depth_km, None);
        assert!(second.url.is_empty());
    }

    #[test]
    fn non_feature_collection_is_rejected() {
        let err = parse_geojson(r#"{ "type": "Feature", "features": [] }"#).unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_geojson("not json").is_err());
    }

    #[test]
    fn polygon_geometry_is_reported() {
        let feature: Feature = serde_json::from_str(
            r#"{ "properties": {}, "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,1],[1,0],[0,0]]] } }"#,
        )
        .unwrap();
        assert_eq!(
            convert_feature(7, feature).unwrap_err(),
            FeatureError::NotAPoint {
                index: 7,
                kind: "Polygon".to_string()
            }
        );
    }

    #[test]
    fn short_point_is_reported() {
        let feature: Feature = serde_json::from_str(
            r#"{ "properties": {}, "geometry": { "type": "Point", "coordinates": [10.0] } }"#,
        )
        .unwrap();
        assert_eq!(
            convert_feature(0, feature).unwrap_err(),
            FeatureError::TooFewCoordinates { index: 0, found: 1 }
        );
    }

    #[test]
    fn missing_title_is_built_from_magnitude_and_place() {
        let feature: Feature = serde_json::from_str(
            r#"{ "properties": { "mag": 4.56, "place": "Off Honshu" },
                 "geometry": { "type": "Point", "coordinates": [142.0, 38.0, 30.0] } }"#,
        )
        .unwrap();
        let rec = convert_feature(0, feature).unwrap();
        assert_eq!(rec.title, "M 4.6 - Off Honshu");
        assert!(rec.status.is_empty());
    }

    #[test]
    fn csv_feed_parses_usgs_columns() {
        let csv = "\
time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,type,horizontalError,depthError,magError,magNst,status,locationSource,magSource
2024-05-01T12:34:56.789Z,38.8,-122.8,2.1,0.9,md,12,80,0.01,0.02,nc,nc0002,2024-05-01T12:40:00.000Z,\"5 km NW of The Geysers, CA\",earthquake,0.2,0.5,0.1,8,automatic,nc,nc
2024-05-01T13:00:00.000Z,19.4,-155.3,,,ml,,,,,hv,hv0003,2024-05-01T13:05:00.000Z,Volcano Hawaii,earthquake,,,,,reviewed,hv,hv
";
        let ds = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let a = &ds.records[0];
        assert_eq!(a.id, "nc0002");
        assert_eq!(a.place, "5 km NW of The Geysers, CA");
        assert_eq!(a.magnitude, Some(0.9));
        assert_eq!(a.title, "M 0.9 - 5 km NW of The Geysers, CA");
        assert!(a.time.is_some());

        let b = &ds.records[1];
        assert_eq!(b.magnitude, None);
        assert_eq!(b.depth_km, None);
        assert_eq!(b.title, "Volcano Hawaii");
        assert_eq!(b.status, "reviewed");
    }

    #[test]
    fn csv_rows_without_coordinates_are_skipped() {
        let csv = "time,latitude,longitude,mag,place,status\n\
                   2024-05-01T00:00:00Z,,,2.0,nowhere,automatic\n\
                   2024-05-01T00:00:00Z,1.0,2.0,2.5,somewhere,automatic\n";
        let ds = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].place, "somewhere");
    }

    #[test]
    fn null_longitude_is_reported_not_shifted() {
        let feature: Feature = serde_json::from_str(
            r#"{ "properties": { "mag": 2.0 },
                 "geometry": { "type": "Point", "coordinates": [null, 40.0, 10.0] } }"#,
        )
        .unwrap();
        assert_eq!(
            convert_feature(3, feature).unwrap_err(),
            FeatureError::NonNumericCoordinate {
                index: 3,
                position: 0
            }
        );
    }

    #[test]
    fn non_numeric_depth_is_dropped() {
        let feature: Feature = serde_json::from_str(
            r#"{ "properties": { "mag": 2.0 },
                 "geometry": { "type": "Point", "coordinates": [-120.0, 36.0, "deep"] } }"#,
        )
        .unwrap();
        let rec = convert_feature(0, feature).unwrap();
        assert_eq!(rec.location.longitude, -120.0);
        assert_eq!(rec.location.latitude, 36.0);
        assert_eq!(rec.depth_km, None);
    }

    #[test]
    fn malformed_magnitude_and_null_properties_keep_the_feature() {
        let feed = r#"{
            "type": "FeatureCollection",
            "features": [
                { "properties": { "mag": "4.5", "place": "quoted mag", "time": "yesterday" },
                  "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "properties": null,
                  "geometry": { "type": "Point", "coordinates": [3.0, 4.0] } },
                { "properties": { "mag": 3.1, "place": "fine" },
                  "geometry": { "type": "Point", "coordinates": [5.0, 6.0] } }
            ]
        }"#;
        let ds = parse_geojson(feed).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].magnitude, None);
        assert_eq!(ds.records[0].place, "quoted mag");
        assert_eq!(ds.records[0].time, None);
        assert_eq!(ds.records[1].magnitude, None);
        assert!(ds.records[1].place.is_empty());
        assert_eq!(ds.records[2].magnitude, Some(3.1));
    }

    #[test]
    fn bad_csv_magnitude_cell_keeps_the_row() {
        let csv = "time,latitude,longitude,mag,place,status\n\
                   2024-05-01T00:00:00Z,1.0,2.0,abc,garbled,automatic\n\
                   2024-05-01T00:00:00Z,3.0,4.0,2.5,clean,automatic\n";
        let ds = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].magnitude, None);
        assert_eq!(ds.records[0].place, "garbled");
        assert_eq!(ds.records[1].magnitude, Some(2.5));
    }

    #[test]
    fn load_file_reads_geojson_and_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let geojson = dir.path().join("all_month.geojson");
        std::fs::write(&geojson, FEED).unwrap();
        assert_eq!(load_file(&geojson).unwrap().len(), 2);

        let csv = dir.path().join("all_month.CSV");
        std::fs::write(&csv, "latitude,longitude,mag,place\n1.0,2.0,3.0,here\n").unwrap();
        let ds = load_file(&csv).unwrap();
        assert_eq!(ds.records[0].place, "here");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("gone.geojson")).unwrap_err();
        assert!(err.to_string().contains("gone.geojson"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("quakes.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
