use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Simple xoshiro256** PRNG (no external dependency needed)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        s[0] = seed;
        s[1] = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        s[2] = s[1].wrapping_mul(6364136223846793005).wrapping_add(1);
        s[3] = s[2].wrapping_mul(6364136223846793005).wrapping_add(1);
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

/// PM2.5 (µg/m³) → air-quality category label.
fn categorize(pm25: f64) -> &'static str {
    match pm25 {
        v if v <= 15.5 => "Baik",
        v if v <= 55.4 => "Sedang",
        v if v <= 150.4 => "Tidak Sehat",
        v if v <= 250.4 => "Sangat Tidak Sehat",
        _ => "Berbahaya",
    }
}

/// Columns of the cleaned Shunyi file, in file order.
const COLUMNS: [&str; 11] = [
    "No",
    "year",
    "month",
    "day",
    "hour",
    "PM2.5",
    "PM10",
    "RAIN",
    "WSPM",
    "station",
    "Kategori Kualitas Udara",
];

const STATION: &str = "Shunyi";

/// One hourly reading of the cleaned source file.
struct Reading {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    pm25: f64,
    pm10: f64,
    rain: f64,
    wspm: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Reading> {
    let mut readings = Vec::new();
    // March 2013 through February 2017, like the source dataset.
    for year in 2013..=2017i64 {
        let months: Vec<i64> = match year {
            2013 => (3..=12).collect(),
            2017 => (1..=2).collect(),
            _ => (1..=12).collect(),
        };
        // Slow year-on-year improvement so the trend view has something to show.
        let year_factor = 1.0 - (year - 2013) as f64 * 0.06;

        for month in months {
            let winter = matches!(month, 11 | 12 | 1 | 2);
            let summer = matches!(month, 6..=8);
            for day in 1..=28 {
                for hour in 0..24 {
                    let wspm = rng.gauss(if winter { 2.4 } else { 1.7 }, 0.9).max(0.0);
                    let rain = if summer && rng.next_f64() < 0.12 {
                        rng.gauss(1.5, 2.0).abs()
                    } else {
                        0.0
                    };
                    let base = (if winter { 110.0 } else { 65.0 }) * year_factor;
                    // Wind and rain wash particulates out.
                    let pm25 = (base * (-0.25 * wspm).exp() * (-0.3 * rain).exp()
                        + rng.gauss(0.0, 25.0))
                    .abs()
                    .max(3.0);
                    // Coarse particulates track PM2.5 with some extra dust.
                    let pm10 = pm25 * 1.2 + rng.gauss(15.0, 10.0).abs();

                    readings.push(Reading {
                        year,
                        month,
                        day,
                        hour,
                        pm25: (pm25 * 10.0).round() / 10.0,
                        pm10: (pm10 * 10.0).round() / 10.0,
                        rain: (rain * 10.0).round() / 10.0,
                        wspm: (wspm * 10.0).round() / 10.0,
                    });
                }
            }
        }
    }
    readings
}

fn write_csv(path: &str, readings: &[Reading]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer.write_record(COLUMNS).expect("Failed to write CSV header");
    for (i, r) in readings.iter().enumerate() {
        writer
            .write_record([
                (i + 1).to_string(),
                r.year.to_string(),
                r.month.to_string(),
                r.day.to_string(),
                r.hour.to_string(),
                r.pm25.to_string(),
                r.pm10.to_string(),
                r.rain.to_string(),
                r.wspm.to_string(),
                STATION.to_string(),
                categorize(r.pm25).to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &str, readings: &[Reading]) {
    let ints = |f: fn(usize, &Reading) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(
            readings.iter().enumerate().map(|(i, r)| f(i, r)),
        ))
    };
    let floats = |f: fn(&Reading) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(readings.iter().map(f)))
    };

    let columns: Vec<ArrayRef> = vec![
        ints(|i, _| i as i64 + 1),
        ints(|_, r| r.year),
        ints(|_, r| r.month),
        ints(|_, r| r.day),
        ints(|_, r| r.hour),
        floats(|r| r.pm25),
        floats(|r| r.pm10),
        floats(|r| r.rain),
        floats(|r| r.wspm),
        Arc::new(StringArray::from(vec![STATION; readings.len()])),
        Arc::new(StringArray::from(
            readings.iter().map(|r| categorize(r.pm25)).collect::<Vec<_>>(),
        )),
    ];

    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .zip(&columns)
            .map(|(name, col)| Field::new(*name, col.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let readings = generate(&mut rng);

    write_csv("shunyi_sample.csv", &readings);
    write_parquet("shunyi_sample.parquet", &readings);

    println!(
        "Wrote {} hourly readings to shunyi_sample.csv and shunyi_sample.parquet",
        readings.len()
    );
}

#[cfg(test)]
mod tests {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;

    #[test]
    fn test_categorize_breakpoints() {
        assert_eq!(categorize(15.5), "Baik");
        assert_eq!(categorize(15.6), "Sedang");
        assert_eq!(categorize(150.4), "Tidak Sehat");
        assert_eq!(categorize(250.4), "Sangat Tidak Sehat");
        assert_eq!(categorize(400.0), "Berbahaya");
    }

    #[test]
    fn test_both_files_carry_every_column() {
        let readings = generate(&mut SimpleRng::new(7));
        let sample = &readings[..48];
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("sample.csv");
        write_csv(csv_path.to_str().unwrap(), sample);
        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS);
        assert_eq!(reader.records().count(), sample.len());

        let pq_path = dir.path().join("sample.parquet");
        write_parquet(pq_path.to_str().unwrap(), sample);
        let file = std::fs::File::open(&pq_path).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let names: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, COLUMNS);
    }
}
