//! Command-line driver: builds the index from a CSV file and reports on it.

use std::path::PathBuf;
use std::process;

use aqindex::config::{DEFAULT_COUNTY_BUCKETS, DEFAULT_LOAD_FACTOR};
use aqindex::logging::init_logging;
use aqindex::{Index, IndexConfig, IndexError};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aqindex")]
#[command(about = "Index air-quality readings by state and county", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print average, highest and lowest AQI per state
    Stats(Input),
    /// List counties of a state with a pollutant reading at or above a threshold
    Threshold {
        #[command(flatten)]
        input: Input,

        /// State name, exactly as it appears in the file
        #[arg(long)]
        state: String,

        /// Pollutant name, exactly as it appears in the file
        #[arg(long)]
        pollutant: String,

        /// Minimum AQI (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        aqi: i32,
    },
    /// Print the bucket placement of every state and county
    Layout(Input),
}

#[derive(Args)]
struct Input {
    /// CSV file with a header line
    file: PathBuf,

    /// Initial buckets of every county table
    #[arg(long, default_value_t = DEFAULT_COUNTY_BUCKETS)]
    county_buckets: usize,

    /// County tables double once counties >= buckets * load factor
    #[arg(long, default_value_t = DEFAULT_LOAD_FACTOR)]
    load_factor: f64,
}

impl Input {
    fn load(&self) -> Result<Index, IndexError> {
        let config = IndexConfig::default()
            .with_county_buckets(self.county_buckets)
            .with_load_factor(self.load_factor);
        Index::load(&self.file, config)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), IndexError> {
    match command {
        Command::Stats(input) => {
            let mut index = input.load()?;
            index.compute_state_stats();
            print_stats(&index);
        }
        Command::Threshold {
            input,
            state,
            pollutant,
            aqi,
        } => {
            let index = input.load()?;
            for county in index.find_counties_meeting_threshold(&state, &pollutant, aqi) {
                println!(
                    "{name} ({lat:.4}, {lon:.4})",
                    name = county.name(),
                    lat = county.latitude(),
                    lon = county.longitude()
                );
            }
        }
        Command::Layout(input) => {
            let index = input.load()?;
            print_layout(&index);
        }
    }

    Ok(())
}

fn print_stats(index: &Index) {
    for state in index.states().iter() {
        let avg = state
            .avg_aqi()
            .map_or_else(|| "-".to_string(), |avg| format!("{avg:.2}"));
        let highest = state.highest_aqi_county().map_or("-", |c| c.name());
        let lowest = state.lowest_aqi_county().map_or("-", |c| c.name());

        println!(
            "{name}: counties={counties} buckets={buckets} avg={avg} highest={highest} lowest={lowest}",
            name = state.name(),
            counties = state.county_count(),
            buckets = state.counties().size(),
        );
    }
}

fn print_layout(index: &Index) {
    let states = index.states();
    for slot in 0..states.size() {
        let chain: Vec<_> = states.chain(slot).map(|s| s.name()).collect();
        println!("[{slot}] {}", chain.join(" -> "));

        for state in states.chain(slot) {
            let counties = state.counties();
            for county_slot in 0..counties.size() {
                let chain: Vec<_> = counties.chain(county_slot).map(|c| c.name()).collect();
                if !chain.is_empty() {
                    println!("    {}[{county_slot}] {}", state.name(), chain.join(" -> "));
                }
            }
        }
    }
}
