//! Plain-text rendering of a snapshot.

use chrono::{DateTime, NaiveDateTime};
use weathernow_core::{
    Snapshot, WeatherReading,
    advice::whole,
    condition::UNKNOWN_ICON,
};

pub fn snapshot(snapshot: &Snapshot) -> String {
    let weather = &snapshot.weather;

    format!(
        "{}\n{}\n{}\nWind: {}\n{}",
        snapshot.place.display_name(),
        temperature(weather),
        condition(weather),
        wind(weather),
        observed_at(weather.observed_at.as_deref()),
    )
}

fn temperature(weather: &WeatherReading) -> String {
    weather.temperature.map_or_else(|| "temperature unknown".to_string(), |t| format!("{}°C", whole(t)))
}

fn condition(weather: &WeatherReading) -> String {
    match weather.condition() {
        Some(c) => format!("{} {}", c.icon(), c.display_label()),
        None => UNKNOWN_ICON.to_string(),
    }
}

fn wind(weather: &WeatherReading) -> String {
    weather.wind_speed.map_or_else(|| "unknown".to_string(), |w| format!("{} km/h", whole(w)))
}

/// Open-Meteo reports local ISO times without seconds, e.g. `2024-07-15T14:00`.
pub fn observed_at(time: Option<&str>) -> String {
    let Some(raw) = time.map(str::trim).filter(|t| !t.is_empty()) else {
        return "—".to_string();
    };

    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()));

    match parsed {
        Ok(dt) => dt.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
