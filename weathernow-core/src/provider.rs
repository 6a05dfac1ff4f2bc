use crate::{Config, Snapshot, provider::open_meteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Lookup failures callers may want to tell apart from transport errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("City not found: {0}")]
    CityNotFound(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve `city` and fetch its current weather.
    async fn snapshot(&self, city: &str) -> anyhow::Result<Snapshot>;
}

/// Construct the weather provider described by config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::from_settings(&config.weather)?;
    Ok(Box::new(provider))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
