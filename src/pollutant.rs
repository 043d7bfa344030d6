/// One pollutant reading of a county. Unique by name within its county;
/// later readings overwrite the AQI and color in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pollutant {
    name: String,
    aqi: i32,
    color: String,
}

impl Pollutant {
    pub fn new(name: &str, aqi: i32, color: &str) -> Self {
        Self {
            name: name.to_string(),
            aqi,
            color: color.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aqi(&self) -> i32 {
        self.aqi
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_aqi(&mut self, aqi: i32) {
        self.aqi = aqi;
    }

    pub fn set_color(&mut self, color: &str) {
        self.color.clear();
        self.color.push_str(color);
    }
}
