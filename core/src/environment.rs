use serde::{Deserialize, Serialize};

/// Conditions outside the plant fence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherModel {
    /// °C
    pub temperature: f64,
    /// percent
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// mm/hour
    pub precipitation: f64,
}

impl Default for WeatherModel {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity: 60.0,
            wind_speed: 5.0,
            precipitation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub weather: WeatherModel,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_weather(&mut self, temperature: f64, humidity: f64, wind_speed: f64, precipitation: f64) {
        self.weather = WeatherModel {
            temperature,
            humidity,
            wind_speed,
            precipitation,
        };
    }
}
