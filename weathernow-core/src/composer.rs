//! Turns a snapshot and a free-text question into a short answer.

use crate::{
    advice::{self, whole},
    condition::condition_label,
    model::{Snapshot, WeatherReading},
};

/// What a question is about, decided by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Empty question.
    Overview,
    Umbrella,
    Clothing,
    Outdoor,
    Wind,
    Summary,
    /// Nothing matched.
    Fallback,
}

/// Ordered keyword table; the first entry with a matching keyword wins.
const ROUTES: &[(Intent, &[&str])] = &[
    (Intent::Umbrella, &["umbrella", "rain", "rainy", "raining", "drizzle", "shower"]),
    (Intent::Clothing, &["wear", "clothes", "jacket", "cold", "hot", "warm", "what to wear"]),
    (Intent::Outdoor, &["walk", "outside", "outdoor", "run", "exercise"]),
    (Intent::Wind, &["wind", "windy"]),
    (Intent::Summary, &["summary", "what's the weather", "how is the weather"]),
];

pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

pub fn classify(question: &str) -> Intent {
    let q = normalize(question);
    if q.is_empty() {
        return Intent::Overview;
    }

    ROUTES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| q.contains(k)))
        .map_or(Intent::Fallback, |(intent, _)| *intent)
}

pub fn compose(snapshot: &Snapshot, question: &str) -> String {
    let weather = &snapshot.weather;
    let place = snapshot.place.display_name();

    match classify(question) {
        Intent::Overview => format!(
            "Currently in {place}: {}, {}. {}",
            temperature_part(weather),
            condition_label(weather.condition_code),
            advice::outdoor(weather)
        ),
        Intent::Umbrella => advice::umbrella(weather).to_string(),
        Intent::Clothing => advice::clothing(weather).to_string(),
        Intent::Outdoor => advice::outdoor(weather).to_string(),
        Intent::Wind => advice::wind(weather),
        Intent::Summary => format!(
            "Right now in {place}: {}, {}. {}",
            temperature_part(weather),
            condition_label(weather.condition_code),
            advice::outdoor(weather)
        ),
        Intent::Fallback => format!(
            "In {place} it's {} and {}. {}",
            temperature_part(weather),
            condition_label(weather.condition_code),
            advice::outdoor(weather)
        ),
    }
}

fn temperature_part(weather: &WeatherReading) -> String {
    match weather.temperature {
        Some(t) => format!("{}°C", whole(t)),
        None => "temperature unknown".to_string(),
    }
}
