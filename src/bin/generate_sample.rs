use anyhow::{Context, Result};
use serde_json::{json, Value};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Gutenberg–Richter-like magnitude: many small events, few large ones.
    fn magnitude(&mut self) -> f64 {
        let m = -0.5 - self.next_f64().max(1e-12).ln() / 1.6;
        (m.min(9.5) * 100.0).round() / 100.0
    }
}

/// Seismic zones: (name, centre lon, centre lat, spread in degrees, typical depth km)
const ZONES: &[(&str, f64, f64, f64, f64)] = &[
    ("Southern Alaska", -150.0, 61.0, 3.0, 40.0),
    ("Northern California", -122.5, 38.5, 1.5, 8.0),
    ("Island of Hawaii", -155.4, 19.4, 0.5, 5.0),
    ("Honshu, Japan", 141.5, 37.5, 3.0, 60.0),
    ("Central Chile", -71.5, -33.0, 3.0, 80.0),
    ("Tonga", -175.0, -20.0, 2.5, 300.0),
    ("Puerto Rico", -66.5, 18.0, 1.0, 15.0),
];

const START_MS: i64 = 1_714_521_600_000; // 2024-05-01T00:00:00Z
const MONTH_MS: f64 = 30.0 * 24.0 * 3600.0 * 1000.0;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_events = 2_000;

    let features: Vec<Value> = (0..n_events)
        .map(|i| {
            let zone = ZONES[(rng.next_u64() % ZONES.len() as u64) as usize];
            let (name, lon0, lat0, spread, depth0) = zone;

            let lon = rng.gauss(lon0, spread);
            let lat = rng.gauss(lat0, spread).clamp(-89.9, 89.9);
            let depth = (rng.gauss(depth0, depth0 * 0.4)).max(0.1);
            let time = START_MS + rng.uniform(0.0, MONTH_MS) as i64;

            // A few events have no magnitude yet, as in the live feed.
            let mag = (rng.next_f64() > 0.01).then(|| rng.magnitude());
            let status = if rng.next_f64() < 0.6 { "automatic" } else { "reviewed" };
            let distance = rng.uniform(1.0, 120.0).round();
            let place = format!("{distance} km of {name}");
            let title = match mag {
                Some(m) => format!("M {m:.1} - {place}"),
                None => format!("M ? - {place}"),
            };
            let id = format!("sm{i:06}");

            json!({
                "type": "Feature",
                "id": id,
                "properties": {
                    "mag": mag,
                    "place": place,
                    "time": time,
                    "status": status,
                    "type": "earthquake",
                    "title": title,
                    "url": format!("https://example.invalid/event/{id}"),
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [lon, lat, depth],
                },
            })
        })
        .collect();

    let collection = json!({
        "type": "FeatureCollection",
        "metadata": { "title": "Synthetic earthquakes, one month", "count": n_events },
        "features": features,
    });

    let output_path = "sample_quakes.geojson";
    let text = serde_json::to_string_pretty(&collection).context("serializing GeoJSON")?;
    std::fs::write(output_path, text).with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {n_events} earthquakes to {output_path}");
    Ok(())
}
