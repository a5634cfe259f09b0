//! Generate a deterministic mock sales spreadsheet for trying out the
//! dashboard:  `cargo run --bin generate_sample`  writes
//! `data/sample_sales.csv`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct SampleRow {
    state: String,
    month: String,
    category: String,
    subcategory: String,
    revenue: f64,
    units: u32,
    profit: f64,
}

/// Minimal deterministic PRNG (splitmix64).
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }
}

const STATES: [&str; 6] = ["BA", "MG", "PR", "RJ", "RS", "SP"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// (category, subcategory, typical unit price, typical margin)
const PRODUCTS: [(&str, &str, f64, f64); 8] = [
    ("Food", "Snacks", 8.5, 0.35),
    ("Food", "Frozen", 22.0, 0.25),
    ("Drink", "Soda", 6.0, 0.40),
    ("Drink", "Juice", 9.5, 0.30),
    ("Home", "Cleaning", 14.0, 0.28),
    ("Home", "Kitchen", 45.0, 0.22),
    ("Electronics", "Audio", 180.0, 0.15),
    ("Electronics", "Accessories", 55.0, 0.32),
];

fn main() -> Result<()> {
    let out_dir = Path::new("data");
    fs::create_dir_all(out_dir).context("creating data directory")?;
    let out_path = out_dir.join("sample_sales.csv");

    let mut writer = csv::Writer::from_path(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;

    let mut rng = SampleRng::new(20_250_101);
    let mut rows = 0usize;

    for state in STATES {
        for month in MONTHS {
            for (category, subcategory, unit_price, margin) in PRODUCTS {
                // Not every product sells everywhere every month.
                if rng.uniform() < 0.15 {
                    continue;
                }
                let transactions = rng.range(1, 4);
                for _ in 0..transactions {
                    let units = rng.range(1, 25);
                    let price_jitter = 0.85 + 0.3 * rng.uniform();
                    let revenue = f64::from(units) * unit_price * price_jitter;
                    let margin_jitter = 0.8 + 0.4 * rng.uniform();
                    let profit = revenue * margin * margin_jitter;

                    writer.serialize(SampleRow {
                        state: state.to_string(),
                        month: month.to_string(),
                        category: category.to_string(),
                        subcategory: subcategory.to_string(),
                        revenue: (revenue * 100.0).round() / 100.0,
                        units,
                        profit: (profit * 100.0).round() / 100.0,
                    })?;
                    rows += 1;
                }
            }
        }
    }

    writer.flush().context("flushing CSV writer")?;
    println!("wrote {rows} rows to {}", out_path.display());
    Ok(())
}
