//! One line of the air-quality input.
//!
//! Lines carry seven comma-separated fields in a fixed order:
//! `State Name,County Name,AQI,Latitude,Longitude,Pollutant Name,Color`.

use std::num::{ParseFloatError, ParseIntError};
use std::str::{self, FromStr};

use crate::byte_buffer::{self, ByteBuffer};

pub const HEADER: &str = "State Name,County Name,AQI,Latitude,Longitude,Pollutant Name,Color";

pub const FIELD_COUNT: usize = 7;

const DELIMITER: u8 = b',';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseRecordError {
    #[error("expected 7 fields, found {found}")]
    FieldCount { found: usize },
    #[error("invalid AQI {value:?}: {source}")]
    InvalidAqi {
        value: String,
        source: ParseIntError,
    },
    #[error("invalid latitude {value:?}: {source}")]
    InvalidLatitude {
        value: String,
        source: ParseFloatError,
    },
    #[error("invalid longitude {value:?}: {source}")]
    InvalidLongitude {
        value: String,
        source: ParseFloatError,
    },
}

/// A borrowed view of one reading. Names are kept verbatim; numeric fields
/// are parsed eagerly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub state: &'a str,
    pub county: &'a str,
    pub aqi: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub pollutant: &'a str,
    pub color: &'a str,
}

impl<'a> Record<'a> {
    pub fn parse(line: &'a str) -> Result<Self, ParseRecordError> {
        let bytes = line.as_bytes();
        let [state, county, aqi, latitude, longitude, pollutant, color] = bytes
            .split_fields::<FIELD_COUNT>(DELIMITER)
            .ok_or_else(|| ParseRecordError::FieldCount {
                found: byte_buffer::field_count(bytes, DELIMITER),
            })?;

        let aqi = as_str(aqi);
        let latitude = as_str(latitude);
        let longitude = as_str(longitude);

        Ok(Self {
            state: as_str(state),
            county: as_str(county),
            aqi: parse_number::<i32>(aqi)
                .map_err(|source| ParseRecordError::InvalidAqi {
                    value: aqi.to_string(),
                    source,
                })?,
            latitude: parse_number::<f64>(latitude).map_err(|source| {
                ParseRecordError::InvalidLatitude {
                    value: latitude.to_string(),
                    source,
                }
            })?,
            longitude: parse_number::<f64>(longitude).map_err(|source| {
                ParseRecordError::InvalidLongitude {
                    value: longitude.to_string(),
                    source,
                }
            })?,
            pollutant: as_str(pollutant),
            color: as_str(color),
        })
    }
}

// Fields are cut at an ASCII delimiter of valid UTF-8, so every field is
// itself valid UTF-8.
#[inline(always)]
fn as_str(field: &[u8]) -> &str {
    str::from_utf8(field).unwrap_or_default()
}

#[inline(always)]
fn parse_number<T: FromStr>(field: &str) -> Result<T, T::Err> {
    field.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let record = Record::parse("California,Orange,50,33.7,-117.8,Ozone,Green").unwrap();

        assert_eq!(record.state, "California");
        assert_eq!(record.county, "Orange");
        assert_eq!(record.aqi, 50);
        assert_eq!(record.latitude, 33.7);
        assert_eq!(record.longitude, -117.8);
        assert_eq!(record.pollutant, "Ozone");
        assert_eq!(record.color, "Green");
    }

    #[test]
    fn test_parse_keeps_names_verbatim() {
        let record = Record::parse("New York, Kings ,7, 40.6 ,-73.9 ,PM2.5,Green").unwrap();

        assert_eq!(record.county, " Kings ");
        assert_eq!(record.latitude, 40.6);
        assert_eq!(record.longitude, -73.9);
    }

    #[test]
    fn test_parse_field_count() {
        assert_eq!(
            Record::parse("California,Orange,50,33.7,-117.8,Ozone"),
            Err(ParseRecordError::FieldCount { found: 6 })
        );
        assert_eq!(
            Record::parse("California,Orange,50,33.7,-117.8,Ozone,Green,extra"),
            Err(ParseRecordError::FieldCount { found: 8 })
        );
        assert_eq!(
            Record::parse(""),
            Err(ParseRecordError::FieldCount { found: 1 })
        );
    }

    #[test]
    fn test_parse_invalid_numbers() {
        let err = Record::parse("California,Orange,high,33.7,-117.8,Ozone,Green").unwrap_err();
        assert!(matches!(err, ParseRecordError::InvalidAqi { ref value, .. } if value == "high"));

        let err = Record::parse("California,Orange,50.5,33.7,-117.8,Ozone,Green").unwrap_err();
        assert!(matches!(err, ParseRecordError::InvalidAqi { .. }));

        let err = Record::parse("California,Orange,50,north,-117.8,Ozone,Green").unwrap_err();
        assert!(matches!(err, ParseRecordError::InvalidLatitude { .. }));

        let err = Record::parse("California,Orange,50,33.7,,Ozone,Green").unwrap_err();
        assert!(matches!(err, ParseRecordError::InvalidLongitude { .. }));
    }

    #[test]
    fn test_header_is_not_a_record() {
        assert!(matches!(
            Record::parse(HEADER),
            Err(ParseRecordError::InvalidAqi { .. })
        ));
    }

    #[test]
    fn test_error_message() {
        let err = Record::parse("a,b").unwrap_err();
        assert_eq!(err.to_string(), "expected 7 fields, found 2");
    }
}
