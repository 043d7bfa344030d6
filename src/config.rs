use crate::error::IndexError;

/// Buckets in the outer (state) table. Never changes after construction.
pub const DEFAULT_STATE_BUCKETS: usize = 10;

/// Initial buckets in every per-state county table.
pub const DEFAULT_COUNTY_BUCKETS: usize = 5;

/// County tables double once `counties >= buckets * load_factor`.
pub const DEFAULT_LOAD_FACTOR: f64 = 2.0;

/// Upper bound on the buckets of a county table. A rehash that would need
/// more fails with [`IndexError::TableLimit`] before allocating anything.
pub const MAX_COUNTY_BUCKETS: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexConfig {
    pub state_buckets: usize,
    pub county_buckets: usize,
    pub load_factor: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            state_buckets: DEFAULT_STATE_BUCKETS,
            county_buckets: DEFAULT_COUNTY_BUCKETS,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl IndexConfig {
    pub fn with_state_buckets(mut self, buckets: usize) -> Self {
        self.state_buckets = buckets;
        self
    }

    pub fn with_county_buckets(mut self, buckets: usize) -> Self {
        self.county_buckets = buckets;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.state_buckets == 0 {
            return Err(IndexError::Config("state_buckets must be at least 1".into()));
        }
        if self.county_buckets == 0 {
            return Err(IndexError::Config("county_buckets must be at least 1".into()));
        }
        if self.county_buckets > MAX_COUNTY_BUCKETS {
            return Err(IndexError::Config(format!(
                "county_buckets must be at most {MAX_COUNTY_BUCKETS}, got {}",
                self.county_buckets
            )));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(IndexError::Config(format!(
                "load_factor must be a positive number, got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}
