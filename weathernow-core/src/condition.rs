//! WMO weather interpretation codes, as reported by Open-Meteo.
//!
//! Only the codes below are recognized; everything else is "unknown".

/// Label used for missing or unrecognized codes.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Icon shown next to an unrecognized condition.
pub const UNKNOWN_ICON: &str = "❔";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    ModerateDrizzle,
    DenseDrizzle,
    LightRain,
    ModerateRain,
    HeavyRain,
    Snow,
    Showers,
    Thunderstorm,
}

impl Condition {
    pub fn from_code(code: i64) -> Option<Self> {
        let condition = match code {
            0 => Self::Clear,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::RimeFog,
            51 => Self::LightDrizzle,
            53 => Self::ModerateDrizzle,
            55 => Self::DenseDrizzle,
            61 => Self::LightRain,
            63 => Self::ModerateRain,
            65 => Self::HeavyRain,
            71 => Self::Snow,
            80 => Self::Showers,
            95 => Self::Thunderstorm,
            _ => return None,
        };
        Some(condition)
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Self::Clear,
            Self::MainlyClear,
            Self::PartlyCloudy,
            Self::Overcast,
            Self::Fog,
            Self::RimeFog,
            Self::LightDrizzle,
            Self::ModerateDrizzle,
            Self::DenseDrizzle,
            Self::LightRain,
            Self::ModerateRain,
            Self::HeavyRain,
            Self::Snow,
            Self::Showers,
            Self::Thunderstorm,
        ]
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Clear => 0,
            Self::MainlyClear => 1,
            Self::PartlyCloudy => 2,
            Self::Overcast => 3,
            Self::Fog => 45,
            Self::RimeFog => 48,
            Self::LightDrizzle => 51,
            Self::ModerateDrizzle => 53,
            Self::DenseDrizzle => 55,
            Self::LightRain => 61,
            Self::ModerateRain => 63,
            Self::HeavyRain => 65,
            Self::Snow => 71,
            Self::Showers => 80,
            Self::Thunderstorm => 95,
        }
    }

    /// Lowercase label used inside composed answers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::MainlyClear => "mainly clear",
            Self::PartlyCloudy => "partly cloudy",
            Self::Overcast => "overcast",
            Self::Fog => "fog",
            Self::RimeFog => "rime fog",
            Self::LightDrizzle => "light drizzle",
            Self::ModerateDrizzle => "moderate drizzle",
            Self::DenseDrizzle => "dense drizzle",
            Self::LightRain => "light rain",
            Self::ModerateRain => "moderate rain",
            Self::HeavyRain => "heavy rain",
            Self::Snow => "snow",
            Self::Showers => "showers",
            Self::Thunderstorm => "thunderstorm",
        }
    }

    /// Label for the snapshot view.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Clear => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::RimeFog => "Rime fog",
            Self::LightDrizzle => "Light drizzle",
            Self::ModerateDrizzle => "Moderate drizzle",
            Self::DenseDrizzle => "Dense drizzle",
            Self::LightRain => "Slight rain",
            Self::ModerateRain => "Moderate rain",
            Self::HeavyRain => "Heavy rain",
            Self::Snow => "Snow fall",
            Self::Showers => "Rain showers",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::MainlyClear => "🌤️",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁️",
            Self::Fog | Self::RimeFog => "🌫️",
            Self::LightDrizzle | Self::ModerateDrizzle | Self::Showers => "🌦️",
            Self::DenseDrizzle | Self::LightRain | Self::ModerateRain | Self::HeavyRain => "🌧️",
            Self::Snow => "🌨️",
            Self::Thunderstorm => "⛈️",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an optional code, falling back to [`UNKNOWN_LABEL`].
pub fn condition_label(code: Option<i64>) -> &'static str {
    code.and_then(Condition::from_code).map_or(UNKNOWN_LABEL, Condition::label)
}
