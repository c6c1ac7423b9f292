use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use launch_dash::data::loader::{BOOSTER_COLUMN, OUTCOME_COLUMN, PAYLOAD_COLUMN, SITE_COLUMN};
use launch_dash::LaunchSite;

const FLIGHTS: usize = 56;
const CSV_PATH: &str = "spacex_launch_dash.csv";
const PARQUET_PATH: &str = "spacex_launch_dash.parquet";

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated launch row, in the column order of the dashboard CSV.
struct Row {
    flight_number: i64,
    site: &'static str,
    class: i64,
    payload_mass_kg: f64,
    booster_version: String,
    booster_category: &'static str,
}

/// Booster generations in flight order: (category, max payload kg, success probability).
const BOOSTERS: [(&str, f64, f64); 5] = [
    ("v1.0", 700.0, 0.4),
    ("v1.1", 4500.0, 0.5),
    ("FT", 9600.0, 0.8),
    ("B4", 9600.0, 0.6),
    ("B5", 9600.0, 0.9),
];

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..FLIGHTS)
        .map(|i| {
            // Early flights fly early boosters.
            let generation = (i * BOOSTERS.len() / FLIGHTS).min(BOOSTERS.len() - 1);
            let (category, max_payload, p_success) = BOOSTERS[generation];
            let site = rng.pick(&LaunchSite::ALL).label();
            let payload = (rng.next_f64() * max_payload).round();
            let class = i64::from(rng.next_f64() < p_success);
            Row {
                flight_number: i as i64 + 1,
                site,
                class,
                payload_mass_kg: payload,
                booster_version: format!("F9 {category} B{:04}", 1000 + i),
                booster_category: category,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV")?;
    writer.write_record([
        "Flight Number",
        SITE_COLUMN,
        OUTCOME_COLUMN,
        PAYLOAD_COLUMN,
        "Booster Version",
        BOOSTER_COLUMN,
    ])?;
    for r in rows {
        writer.write_record([
            r.flight_number.to_string(),
            r.site.to_string(),
            r.class.to_string(),
            r.payload_mass_kg.to_string(),
            r.booster_version.clone(),
            r.booster_category.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new(SITE_COLUMN, DataType::Utf8, false),
        Field::new(OUTCOME_COLUMN, DataType::Int64, false),
        Field::new(PAYLOAD_COLUMN, DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new(BOOSTER_COLUMN, DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.site))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.booster_category))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    let successes = rows.iter().filter(|r| r.class == 1).count();
    log::info!("{successes} of {} generated launches succeeded", rows.len());
    println!("Wrote {} launches to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    Ok(())
}
