use tracing::{debug, info};

use crate::config::{IndexConfig, MAX_COUNTY_BUCKETS};
use crate::county::County;
use crate::error::IndexError;
use crate::hash_table::{Chained, Table};
use crate::record::Record;

/// A state, its county table, and the statistics of the last stats pass.
///
/// The highest/lowest AQI counties are remembered by name only and resolved
/// through the county table when asked for.
#[derive(Debug)]
pub struct State {
    name: String,
    counties: Table<County>,
    county_count: usize,
    load_factor: f64,
    avg_aqi: Option<f64>,
    highest_aqi_county: Option<String>,
    lowest_aqi_county: Option<String>,
    next: Option<Box<State>>,
}

impl State {
    pub fn new(name: &str, config: &IndexConfig) -> Self {
        Self {
            name: name.to_string(),
            counties: Table::new(config.county_buckets),
            county_count: 0,
            load_factor: config.load_factor,
            avg_aqi: None,
            highest_aqi_county: None,
            lowest_aqi_county: None,
            next: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn counties(&self) -> &Table<County> {
        &self.counties
    }

    pub fn county(&self, name: &str) -> Option<&County> {
        self.counties.lookup(name)
    }

    pub fn county_count(&self) -> usize {
        self.county_count
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Mean AQI over every reading, as of the last stats pass.
    pub fn avg_aqi(&self) -> Option<f64> {
        self.avg_aqi
    }

    pub fn highest_aqi_county(&self) -> Option<&County> {
        self.highest_aqi_county
            .as_deref()
            .and_then(|name| self.counties.lookup(name))
    }

    pub fn lowest_aqi_county(&self) -> Option<&County> {
        self.lowest_aqi_county
            .as_deref()
            .and_then(|name| self.counties.lookup(name))
    }

    /// Adds the record's county if it is new (growing the county table when
    /// the load factor is reached), then adds or overwrites the record's
    /// pollutant reading in that county.
    ///
    /// An existing county keeps its original coordinates.
    pub fn insert_county_and_pollutant(&mut self, record: &Record<'_>) -> Result<(), IndexError> {
        let mut added = false;
        let county = self.counties.get_or_insert_with(record.county, || {
            added = true;
            Box::new(County::new(record.county, record.latitude, record.longitude))
        });
        county.upsert_pollutant(record.pollutant, record.aqi, record.color);

        if added {
            self.county_count += 1;
            debug!(state = %self.name, county = record.county, "new county");

            if self.needs_rehash() {
                self.rehash()?;
            }
        }

        Ok(())
    }

    /// `county_count >= buckets * load_factor`
    pub fn needs_rehash(&self) -> bool {
        self.county_count as f64 >= self.counties.size() as f64 * self.load_factor
    }

    /// Doubles the county table size until the load-factor check no longer
    /// holds, then relinks every county into a table of that size once.
    ///
    /// Fails without touching the table when the size would pass
    /// [`MAX_COUNTY_BUCKETS`].
    pub fn rehash(&mut self) -> Result<(), IndexError> {
        let old_size = self.counties.size();
        let mut size = old_size;

        loop {
            size = size.saturating_mul(2);
            if size > MAX_COUNTY_BUCKETS {
                return Err(IndexError::TableLimit {
                    state: self.name.clone(),
                    buckets: size,
                    limit: MAX_COUNTY_BUCKETS,
                });
            }
            if (self.county_count as f64) < size as f64 * self.load_factor {
                break;
            }
        }

        self.counties
            .rehash(size)
            .map_err(|source| IndexError::Capacity {
                state: self.name.clone(),
                source,
            })?;

        info!(
            state = %self.name,
            old_size,
            new_size = size,
            counties = self.county_count,
            "rehashed county table"
        );

        Ok(())
    }

    /// Recomputes the average AQI and the counties holding the highest and
    /// lowest single readings. Walks counties slot ascending, chains head to
    /// tail, readings in insertion order; ties keep the first county seen.
    ///
    /// Without any readings the average is left as it was and both counties
    /// are cleared.
    pub fn refresh_stats(&mut self) {
        let mut total_aqi: i64 = 0;
        let mut readings: u64 = 0;
        let mut highest: Option<(i32, &str)> = None;
        let mut lowest: Option<(i32, &str)> = None;

        for county in self.counties.iter() {
            for pollutant in county.pollutants() {
                let aqi = pollutant.aqi();
                total_aqi += aqi as i64;
                readings += 1;

                if highest.is_none_or(|(max, _)| aqi > max) {
                    highest = Some((aqi, county.name()));
                }

                if lowest.is_none_or(|(min, _)| aqi < min) {
                    lowest = Some((aqi, county.name()));
                }
            }
        }

        let highest = highest.map(|(_, name)| name.to_string());
        let lowest = lowest.map(|(_, name)| name.to_string());

        if readings > 0 {
            self.avg_aqi = Some(total_aqi as f64 / readings as f64);
        }
        self.highest_aqi_county = highest;
        self.lowest_aqi_county = lowest;
    }

    /// Counties with a reading of `pollutant` at or above `threshold`, each
    /// once, in table order.
    pub fn counties_meeting_threshold(&self, pollutant: &str, threshold: i32) -> Vec<&County> {
        self.counties
            .iter()
            .filter(|county| county.meets_threshold(pollutant, threshold))
            .collect()
    }

    /// Total pollutant readings across all counties.
    pub fn reading_count(&self) -> usize {
        self.counties.iter().map(|c| c.pollutants().len()).sum()
    }
}

impl Chained for State {
    fn key(&self) -> &str {
        &self.name
    }

    fn link(&self) -> &Option<Box<Self>> {
        &self.next
    }

    fn link_mut(&mut self) -> &mut Option<Box<Self>> {
        &mut self.next
    }
}
