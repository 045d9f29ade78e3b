use serde::{Deserialize, Serialize};

/// Lenient numeric fields: the feed carries measurements either as JSON
/// numbers or as numeric strings, both are coerced to `f64` at ingestion.
pub mod lenient_number {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => parse_str(&s).map_err(de::Error::custom),
        }
    }

    /// Blank strings become NaN (a missing reading), anything else must parse.
    pub fn parse_str(s: &str) -> Result<f64, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(f64::NAN);
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| format!("not a number: {:?}", s))
    }
}

/// A single gage reading as delivered by the data feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub date: String,
    /// Site identifier shared by every reading of one gage.
    pub key: String,
    /// Name of the externally drawn element for this site (hover target).
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub time: String,
    #[serde(with = "lenient_number")]
    pub time_mili: f64,
    #[serde(default)]
    pub timezone: String,
    #[serde(with = "lenient_number")]
    pub value: f64,
}

impl Observation {
    pub fn new(key: impl Into<String>, time_mili: f64, value: f64) -> Self {
        let key = key.into();
        Self {
            date: String::new(),
            name: format!("#{}", key),
            key,
            time: String::new(),
            time_mili,
            timezone: String::new(),
            value,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_display(
        mut self,
        date: impl Into<String>,
        time: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        self.date = date.into();
        self.time = time.into();
        self.timezone = timezone.into();
        self
    }

    /// Whether this reading has a defined position on the log value axis.
    pub fn is_plottable(&self) -> bool {
        self.time_mili.is_finite() && self.value.is_finite() && self.value > 0.0
    }

    /// Focus label text: `"<key>: <value> <units> <time> <timezone>"`.
    pub fn hover_label(&self, units: &str) -> String {
        format!(
            "{}: {} {} {} {}",
            self.key, self.value, units, self.time, self.timezone
        )
    }
}
