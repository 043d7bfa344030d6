use std::fs::File;
use std::path::Path;
use std::str;

use memmap2::Mmap;
use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::county::County;
use crate::error::IndexError;
use crate::hash_table::Table;
use crate::record::Record;
use crate::state::State;

/// Two-level index of air-quality readings: a fixed-size table of states,
/// each owning a growable table of counties.
#[derive(Debug)]
pub struct Index {
    states: Table<State>,
    config: IndexConfig,
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    pub fn new() -> Self {
        let config = IndexConfig::default();
        Self {
            states: Table::new(config.state_buckets),
            config,
        }
    }

    pub fn with_config(config: IndexConfig) -> Result<Self, IndexError> {
        config.validate()?;
        Ok(Self {
            states: Table::new(config.state_buckets),
            config,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The whole outer table, for inspection.
    pub fn states(&self) -> &Table<State> {
        &self.states
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.lookup(name)
    }

    pub fn state_count(&self) -> usize {
        self.states.iter().count()
    }

    pub fn reading_count(&self) -> usize {
        self.states.iter().map(State::reading_count).sum()
    }

    /// Returns the state called `name`, creating it at the head of its chain
    /// if it does not exist yet. An existing state is returned untouched.
    pub fn insert_state(&mut self, name: &str) -> &mut State {
        let config = &self.config;
        let slot = self.states.slot(name);

        self.states.get_or_insert_with(name, || {
            debug!(state = name, slot, "new state");
            Box::new(State::new(name, config))
        })
    }

    /// Files one reading under its state and county.
    pub fn insert(&mut self, record: &Record<'_>) -> Result<(), IndexError> {
        self.insert_state(record.state).insert_county_and_pollutant(record)
    }

    /// Ingests data lines (no header). Stops at the first malformed line;
    /// lines before it stay in the index. Returns the number of records read.
    pub fn ingest<'a, I>(&mut self, lines: I) -> Result<usize, IndexError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut count = 0;

        for (i, line) in lines.into_iter().enumerate() {
            let record =
                Record::parse(line).map_err(|source| IndexError::Parse { line: i + 1, source })?;
            self.insert(&record)?;
            count += 1;
        }

        info!(
            records = count,
            states = self.state_count(),
            "ingested records"
        );

        Ok(count)
    }

    /// Ingests `text` whose first line is a header. Error line numbers count
    /// data lines only.
    ///
    /// Whitespace-only lines at the end of the text end the input; anywhere
    /// else they are malformed records.
    pub fn ingest_with_header(&mut self, text: &str) -> Result<usize, IndexError> {
        // Cut after the last line with content, keeping that line whole.
        let content = text.trim_end().len();
        let end = text[content..]
            .find('\n')
            .map_or(text.len(), |newline| content + newline);

        self.ingest(text[..end].lines().skip(1))
    }

    /// Builds an index from a CSV file with a header line.
    pub fn load<P: AsRef<Path>>(path: P, config: IndexConfig) -> Result<Self, IndexError> {
        let mut index = Self::with_config(config)?;

        let file = File::open(path.as_ref())?;
        if file.metadata()?.len() == 0 {
            return Ok(index);
        }

        // SAFETY: the map is read-only and dropped before this function returns.
        let buf = unsafe { Mmap::map(&file)? };
        index.ingest_with_header(str::from_utf8(&buf)?)?;

        Ok(index)
    }

    /// Recomputes average, highest and lowest AQI for every state.
    pub fn compute_state_stats(&mut self) {
        let mut states = 0;
        self.states.for_each_mut(|state| {
            state.refresh_stats();
            states += 1;
        });
        info!(states, "computed state statistics");
    }

    /// Counties of `state_name` with a `pollutant_name` reading at or above
    /// `threshold`, in county-table order. Unknown states yield nothing.
    pub fn find_counties_meeting_threshold(
        &self,
        state_name: &str,
        pollutant_name: &str,
        threshold: i32,
    ) -> Vec<&County> {
        self.state(state_name)
            .map(|state| state.counties_meeting_threshold(pollutant_name, threshold))
            .unwrap_or_default()
    }
}
