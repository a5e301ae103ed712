use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
}

/// GDP per capita path: compound growth with yearly noise.
fn generate_path(start: f64, growth: f64, years: usize, rng: &mut SimpleRng) -> Vec<f64> {
    let mut value = start;
    (0..years)
        .map(|_| {
            let current = value;
            value *= 1.0 + growth + rng.gauss(0.0, 0.03);
            value = value.max(50.0);
            current
        })
        .collect()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let years: Vec<i32> = (1950..=2020).collect();

    // (country, GDP per capita in 1950, mean yearly growth)
    let countries: [(&str, f64, f64); 10] = [
        ("Argentina", 5200.0, 0.012),
        ("Botswana", 450.0, 0.055),
        ("Chile", 3800.0, 0.025),
        ("Denmark", 9800.0, 0.020),
        ("Ethiopia", 380.0, 0.018),
        ("France", 7200.0, 0.022),
        ("Ghana", 1100.0, 0.012),
        ("India", 620.0, 0.035),
        ("Japan", 2400.0, 0.045),
        ("Peru", 2900.0, 0.015),
    ];

    // One Option<f64> column per year, one row per country.
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); years.len()];
    for (row, &(_, start, growth)) in countries.iter().enumerate() {
        let path = generate_path(start, growth, years.len(), &mut rng);
        for (col, value) in path.into_iter().enumerate() {
            // Ethiopia has no records before 1960; elsewhere ~3% of cells are gaps.
            let missing = (row == 4 && years[col] < 1960) || rng.next_f64() < 0.03;
            columns[col].push(if missing { None } else { Some(value.round()) });
        }
    }

    // ---- CSV ----
    let csv_path = "sample_gdp.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    let mut header = vec!["country".to_string()];
    header.extend(years.iter().map(|y| y.to_string()));
    writer.write_record(&header).expect("Failed to write header");
    for (row, &(name, _, _)) in countries.iter().enumerate() {
        let mut record = vec![name.to_string()];
        record.extend(
            columns
                .iter()
                .map(|col| col[row].map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let mut fields = vec![Field::new("country", DataType::Utf8, false)];
    fields.extend(
        years
            .iter()
            .map(|y| Field::new(y.to_string(), DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        countries.iter().map(|(name, _, _)| *name).collect::<Vec<_>>(),
    ))];
    arrays.extend(
        columns
            .into_iter()
            .map(|col| Arc::new(Float64Array::from(col)) as ArrayRef),
    );

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let parquet_path = "sample_gdp.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} countries × {} years to {csv_path} and {parquet_path}",
        countries.len(),
        years.len()
    );
}
