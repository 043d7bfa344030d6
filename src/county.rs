use crate::hash_table::Chained;
use crate::pollutant::Pollutant;

/// A county of one state, and a node in that state's county chains.
#[derive(Debug)]
pub struct County {
    name: String,
    latitude: f64,
    longitude: f64,
    pollutants: Vec<Pollutant>,
    next: Option<Box<County>>,
}

impl County {
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            pollutants: Vec::new(),
            next: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Readings in first-insertion order.
    pub fn pollutants(&self) -> &[Pollutant] {
        &self.pollutants
    }

    pub fn pollutant(&self, name: &str) -> Option<&Pollutant> {
        self.pollutants.iter().find(|p| p.name() == name)
    }

    /// Overwrites the reading for `name` if the county already has one,
    /// otherwise appends a new reading.
    pub fn upsert_pollutant(&mut self, name: &str, aqi: i32, color: &str) {
        match self.pollutants.iter_mut().find(|p| p.name() == name) {
            Some(pollutant) => {
                pollutant.set_aqi(aqi);
                pollutant.set_color(color);
            }
            None => self.pollutants.push(Pollutant::new(name, aqi, color)),
        }
    }

    /// True if the county has a reading of `pollutant` at or above `threshold`.
    pub fn meets_threshold(&self, pollutant: &str, threshold: i32) -> bool {
        self.pollutants
            .iter()
            .any(|p| p.name() == pollutant && p.aqi() >= threshold)
    }
}

impl Chained for County {
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
