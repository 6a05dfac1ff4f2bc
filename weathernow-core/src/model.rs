use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::Condition;

/// Shown in place of a missing or empty place name.
pub const PLACEHOLDER_PLACE: &str = "the location";

/// A geocoded place. Only `name` and `country` matter for answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Place {
    pub fn new(name: impl Into<String>, country: Option<String>) -> Self {
        Self { name: Some(name.into()), country, ..Self::default() }
    }

    /// "Name, Country", or the placeholder when the name is missing.
    pub fn display_name(&self) -> String {
        let name = self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(PLACEHOLDER_PLACE);

        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{name}, {country}"),
            None => name.to_string(),
        }
    }
}

/// A current-weather reading in the Open-Meteo `current_weather` shape.
///
/// Every field is optional. Values of the wrong JSON type are read as absent
/// instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Degrees Celsius.
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    /// km/h.
    #[serde(rename = "windspeed", default, deserialize_with = "lenient::number")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "weathercode", default, deserialize_with = "lenient::integer")]
    pub condition_code: Option<i64>,
    #[serde(rename = "time", default, deserialize_with = "lenient::string")]
    pub observed_at: Option<String>,
}

impl WeatherReading {
    /// The recognized condition, or `None` when the code is missing or unmapped.
    pub fn condition(&self) -> Option<Condition> {
        self.condition_code.and_then(Condition::from_code)
    }
}

/// A reading tied to the place it was taken for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient::object")]
    pub place: Place,
    #[serde(default, deserialize_with = "lenient::object")]
    pub weather: WeatherReading,
}

/// Body of an `/api/ai` request: a snapshot plus the user's question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    #[serde(default, deserialize_with = "lenient::text")]
    pub question: String,
}

impl AskRequest {
    pub fn new(snapshot: Snapshot, question: impl Into<String>) -> Self {
        Self { snapshot, question: question.into() }
    }

    /// Any JSON document; non-objects are the all-absent request.
    pub fn from_value(value: Value) -> Self {
        match value {
            value @ Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Parse a request body. Only syntactically invalid JSON is an error;
    /// a blank body is the all-absent request.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice::<Value>(body).map(Self::from_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Field deserializers that turn wrong-typed values into "absent".
mod lenient {
    use serde::{Deserialize, Deserializer, de::DeserializeOwned};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        Ok(Value::deserialize(de)?.as_f64())
    }

    /// Integers, including floats with no fractional part (`61.0`).
    pub fn integer<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        Ok(whole_number(&Value::deserialize(de)?))
    }

    /// Truthy values as text; `null`, `false`, `0` and `""` are absent.
    pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(de)?;
        Ok(is_truthy(&value).then(|| stringify(&value)))
    }

    /// Free text; falsy values read as empty.
    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(string(de)?.unwrap_or_default())
    }

    pub fn object<'de, D, T>(de: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(match Value::deserialize(de)? {
            value @ Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => T::default(),
        })
    }

    fn whole_number(value: &Value) -> Option<i64> {
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Arrays join their items with `,`; objects have no useful text form.
    fn stringify(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => whole_number(value).map_or_else(|| n.to_string(), |i| i.to_string()),
            Value::String(s) => s.clone(),
            Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }
}
