//! Writes synthetic air-quality records (header first) to stdout.

use std::io::{self, BufWriter, Write};

use aqindex::record::HEADER;
use clap::Parser;
use rand::Rng;
use rand_distr::{Distribution, Normal};

const STATES: [&str; 12] = [
    "Alabama",
    "Arizona",
    "California",
    "Colorado",
    "Florida",
    "Illinois",
    "Massachusetts",
    "New Jersey",
    "New York",
    "Ohio",
    "Texas",
    "Washington",
];

const POLLUTANTS: [(&str, f64); 5] = [
    ("Ozone", 45.0),
    ("PM2.5", 55.0),
    ("PM10", 30.0),
    ("NO2", 25.0),
    ("CO", 8.0),
];

#[derive(Parser)]
#[command(name = "create_records")]
#[command(about = "Generate synthetic air-quality records", long_about = None)]
struct Cli {
    /// Number of records, underscores allowed (e.g. 1_000_000)
    records: String,

    /// Distinct counties per state
    #[arg(long, default_value_t = 60)]
    counties: usize,
}

#[derive(Debug)]
struct Pollutant {
    name: &'static str,
    distribution: Normal<f64>,
}

impl Pollutant {
    fn new(name: &'static str, mean: f64) -> Result<Self, rand_distr::NormalError> {
        Ok(Self {
            name,
            distribution: Normal::new(mean, mean / 2.0)?,
        })
    }

    fn sample(&self, rng: &mut impl Rng) -> i32 {
        self.distribution.sample(rng).clamp(0.0, 500.0).round() as i32
    }
}

/// EPA AQI category colors.
fn color(aqi: i32) -> &'static str {
    match aqi {
        ..=50 => "Green",
        51..=100 => "Yellow",
        101..=150 => "Orange",
        151..=200 => "Red",
        201..=300 => "Purple",
        _ => "Maroon",
    }
}

fn main() {
    let cli = Cli::parse();

    let num: u64 = match cli.records.replace('_', "").parse() {
        Ok(num) => num,
        Err(e) => {
            eprintln!("Error: invalid record count {:?}: {}", cli.records, e);
            std::process::exit(2);
        }
    };

    if let Err(e) = write_records(num, cli.counties.max(1)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn write_records(num: u64, counties: usize) -> io::Result<()> {
    let pollutants = POLLUTANTS
        .iter()
        .map(|&(name, mean)| Pollutant::new(name, mean))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io::Error::other)?;

    let mut rng = rand::rng();
    let mut out = BufWriter::new(io::stdout().lock());

    writeln!(out, "{}", HEADER)?;

    for _ in 0..num {
        let state_idx = rng.random_range(0..STATES.len());
        let county = rng.random_range(0..counties);
        let pollutant = &pollutants[rng.random_range(0..pollutants.len())];
        let aqi = pollutant.sample(&mut rng);

        // Coordinates are a function of the county so repeats agree.
        let latitude = 25.0 + (state_idx * 2) as f64 + (county % 100) as f64 * 0.01;
        let longitude = -70.0 - (state_idx * 4) as f64 - (county / 100) as f64 * 0.01;

        writeln!(
            out,
            "{},County {},{},{:.4},{:.4},{},{}",
            STATES[state_idx],
            county,
            aqi,
            latitude,
            longitude,
            pollutant.name,
            color(aqi)
        )?;
    }

    out.flush()
}
