//! Two-level chained hash index of air-quality readings.
//!
//! States live in a fixed-size outer [`Table`]; each [`State`] owns a county
//! table that doubles under its load factor; each [`County`] owns its
//! [`Pollutant`] readings.

pub mod byte_buffer;
pub mod config;
pub mod county;
pub mod error;
pub mod hash_table;
pub mod index;
pub mod logging;
pub mod pollutant;
pub mod record;
pub mod state;

pub use config::IndexConfig;
pub use county::County;
pub use error::IndexError;
pub use hash_table::{Chained, Table};
pub use index::Index;
pub use pollutant::Pollutant;
pub use record::{ParseRecordError, Record};
pub use state::State;
