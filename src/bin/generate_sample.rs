use anyhow::{Context, Result};
use serde::Serialize;

/// One row of the generated CSV.
#[derive(Debug, Serialize)]
struct Reading {
    id: i64,
    site: &'static str,
    temperature: Option<f64>,
    humidity: f64,
    rainfall: Option<f64>,
    sunny: bool,
    day: String,
}

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// `Some(value)` except for a `missing` fraction of draws.
    fn maybe(&mut self, missing: f64, value: f64) -> Option<f64> {
        (self.next_f64() >= missing).then_some(value)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Site → (mean temperature, mean humidity)
    let sites = [("North", 12.0, 70.0), ("Coast", 18.0, 80.0), ("Desert", 31.0, 20.0)];
    let days_per_site = 60;

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut row_id: i64 = 0;
    for &(site, mean_temp, mean_humidity) in &sites {
        for day in 0..days_per_site {
            let temperature = round2(rng.gauss(mean_temp, 4.0));
            // Humidity falls as temperature rises so the heatmap has something to show.
            let humidity = round2((mean_humidity - 0.8 * (temperature - mean_temp)).clamp(0.0, 100.0));
            let rain = round2((humidity - 50.0).max(0.0) * rng.next_f64() / 5.0);

            let reading = Reading {
                id: row_id,
                site,
                temperature: rng.maybe(0.05, temperature),
                humidity,
                rainfall: rng.maybe(0.1, rain),
                sunny: rain < 1.0,
                day: format!("2024-{:02}-{:02}", 1 + day / 28, 1 + day % 28),
            };
            writer.serialize(&reading).context("writing CSV row")?;
            row_id += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {row_id} rows from {} sites to {output_path}", sites.len());
    Ok(())
}
