//! Fixed-phrase advice derived from a single reading.
//!
//! Each rule is evaluated top to bottom, first match wins. Comparisons use the
//! raw values; only the numbers quoted back to the user are rounded.

use crate::{condition::Condition, model::WeatherReading};

pub const NO_TEMPERATURE: &str = "Cannot advise without temperature data.";
pub const NO_WIND: &str = "I have no current wind data.";

const WINDY_ABOVE_KMH: f64 = 40.0;
const VERY_HOT_FROM_C: f64 = 35.0;

/// Round to the nearest whole unit, halves toward positive infinity.
pub fn whole(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn umbrella(reading: &WeatherReading) -> &'static str {
    use Condition::*;

    match reading.condition() {
        Some(LightRain | ModerateRain | HeavyRain | Showers | Thunderstorm | DenseDrizzle) => {
            "Yes, there's rain or showers indicated; take an umbrella."
        }
        Some(LightDrizzle | ModerateDrizzle) => {
            "Probably useful: light drizzle is possible, so carry a small umbrella."
        }
        None if reading.temperature.is_some_and(|t| t < 5.0) => {
            "Unlikely to rain, but it's cold; consider a jacket instead."
        }
        _ => "Unlikely to rain based on current data, but keep an eye on the sky.",
    }
}

pub fn clothing(reading: &WeatherReading) -> &'static str {
    let Some(t) = reading.temperature else {
        return NO_TEMPERATURE;
    };

    if t <= 5.0 {
        "It's cold; wear a warm jacket."
    } else if t <= 15.0 {
        "Cool; a light jacket or sweater is recommended."
    } else if t <= 25.0 {
        "Mild; you'll be comfortable in light layers."
    } else {
        "Hot; wear breathable clothes and stay hydrated."
    }
}

pub fn outdoor(reading: &WeatherReading) -> &'static str {
    use Condition::*;

    match reading.condition() {
        Some(Thunderstorm | HeavyRain | Showers) => {
            "Not ideal for outdoor activities; heavy rain or thunderstorms expected."
        }
        Some(LightDrizzle | ModerateDrizzle | DenseDrizzle | LightRain | ModerateRain) => {
            "Might be wet; bring waterproof gear and consider rescheduling outdoor plans."
        }
        _ if reading.temperature.is_some_and(|t| t >= VERY_HOT_FROM_C) => {
            "It's very hot; avoid strenuous outdoor activity during peak sun."
        }
        _ => "Looks fine for outdoor activities; enjoy, but dress appropriately.",
    }
}

pub fn wind(reading: &WeatherReading) -> String {
    match reading.wind_speed {
        None => NO_WIND.to_string(),
        Some(speed) if speed > WINDY_ABOVE_KMH => format!(
            "It's quite windy ({} km/h). Secure loose items and avoid pitching tents outdoors.",
            whole(speed)
        ),
        Some(speed) => {
            format!("Wind is {} km/h, not too strong for normal outdoor plans.", whole(speed))
        }
    }
}
