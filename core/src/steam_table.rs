//! Saturated water/steam properties with piecewise-linear interpolation.
//!
//! Lookups outside the table clamp to the nearest boundary entry.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SteamTableEntry {
    pub temperature: f64,     // °C
    pub pressure: f64,        // MPa
    pub specific_volume: f64, // m³/kg
    pub enthalpy: f64,        // kJ/kg
}

const fn entry(temperature: f64, pressure: f64, specific_volume: f64, enthalpy: f64) -> SteamTableEntry {
    SteamTableEntry {
        temperature,
        pressure,
        specific_volume,
        enthalpy,
    }
}

pub static STEAM_TABLE: [SteamTableEntry; 18] = [
    entry(0.01, 0.000611, 0.001000, 0.00),
    entry(20.0, 0.002339, 0.001002, 83.96),
    entry(50.0, 0.012349, 0.001012, 209.33),
    entry(100.0, 0.101325, 0.001043, 419.04),
    entry(120.0, 0.198540, 0.001060, 503.71),
    entry(140.0, 0.361390, 0.001079, 589.13),
    entry(160.0, 0.617800, 0.001100, 675.47),
    entry(180.0, 1.002600, 0.001123, 762.81),
    entry(200.0, 1.554900, 0.001148, 851.24),
    entry(220.0, 2.319600, 0.001175, 940.87),
    entry(240.0, 3.344000, 0.001204, 1031.80),
    entry(260.0, 4.688000, 0.001236, 1124.20),
    entry(280.0, 6.412000, 0.001272, 1218.30),
    entry(300.0, 8.581000, 0.001312, 1314.30),
    entry(320.0, 11.270000, 0.001357, 1412.60),
    entry(340.0, 14.586000, 0.001410, 1513.80),
    entry(360.0, 18.651000, 0.001475, 1619.00),
    entry(374.14, 22.064000, 0.003155, 2099.30),
];

/// Exact table hit, no interpolation.
pub fn lookup(temperature: f64) -> Option<SteamTableEntry> {
    STEAM_TABLE.iter().copied().find(|e| e.temperature == temperature)
}

fn blend(low: &SteamTableEntry, high: &SteamTableEntry, ratio: f64) -> SteamTableEntry {
    let lerp = |a: f64, b: f64| a + ratio * (b - a);
    SteamTableEntry {
        temperature: lerp(low.temperature, high.temperature),
        pressure: lerp(low.pressure, high.pressure),
        specific_volume: lerp(low.specific_volume, high.specific_volume),
        enthalpy: lerp(low.enthalpy, high.enthalpy),
    }
}

/// Interpolates along the table by a monotonic key (temperature or pressure).
fn interpolate(value: f64, key: impl Fn(&SteamTableEntry) -> f64) -> SteamTableEntry {
    let first = &STEAM_TABLE[0];
    let last = &STEAM_TABLE[STEAM_TABLE.len() - 1];
    if value <= key(first) {
        return *first;
    }
    if value >= key(last) {
        return *last;
    }

    let upper = STEAM_TABLE
        .iter()
        .position(|e| key(e) > value)
        .unwrap_or(STEAM_TABLE.len() - 1);
    let low = &STEAM_TABLE[upper - 1];
    let high = &STEAM_TABLE[upper];
    let ratio = (value - key(low)) / (key(high) - key(low));
    blend(low, high, ratio)
}

pub fn from_temperature(temperature: f64) -> SteamTableEntry {
    let mut props = interpolate(temperature, |e| e.temperature);
    if temperature > STEAM_TABLE[0].temperature && temperature < STEAM_TABLE[STEAM_TABLE.len() - 1].temperature {
        props.temperature = temperature;
    }
    props
}

pub fn from_pressure(pressure: f64) -> SteamTableEntry {
    let mut props = interpolate(pressure, |e| e.pressure);
    if pressure > STEAM_TABLE[0].pressure && pressure < STEAM_TABLE[STEAM_TABLE.len() - 1].pressure {
        props.pressure = pressure;
    }
    props
}

pub fn saturation_pressure(temperature: f64) -> f64 {
    from_temperature(temperature).pressure
}

pub fn saturation_temperature(pressure: f64) -> f64 {
    from_pressure(pressure).temperature
}
