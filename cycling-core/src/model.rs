use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;

/// Number of hourly samples in a full forecast day.
pub const HOURS_PER_DAY: usize = 24;

/// One hour of forecast weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Sent as `0`/`1` by the API.
    #[serde(deserialize_with = "flag_from_int", serialize_with = "flag_to_int")]
    pub will_it_rain: bool,
    pub precip_mm: f64,
    /// Cloud coverage in percent.
    pub cloud: f64,
    pub temp_c: f64,
    pub wind_kph: f64,
}

fn flag_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(u64::from(other)),
            &"0 or 1",
        )),
    }
}

fn flag_to_int<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

/// Hourly samples for a single day, ordered by hour starting at midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    hours: Vec<HourlySample>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidDay {
    #[error("forecast day contains no hourly samples")]
    Empty,
    #[error("forecast day contains {0} hourly samples, at most 24 expected")]
    TooManyHours(usize),
}

impl ForecastDay {
    pub fn new(hours: Vec<HourlySample>) -> Result<Self, InvalidDay> {
        if hours.is_empty() {
            return Err(InvalidDay::Empty);
        }
        if hours.len() > HOURS_PER_DAY {
            return Err(InvalidDay::TooManyHours(hours.len()));
        }
        Ok(Self { hours })
    }

    pub fn hours(&self) -> &[HourlySample] {
        &self.hours
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// Raw `forecast.json` document as returned by weatherapi.com.
///
/// Only the hourly samples of the first day are kept; every other field is ignored.
#[derive(Debug, Deserialize)]
pub struct ForecastDocument {
    pub forecast: ForecastBody,
}

#[derive(Debug, Deserialize)]
pub struct ForecastBody {
    pub forecastday: Vec<ForecastDayEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastDayEntry {
    pub hour: Vec<HourlySample>,
}

impl ForecastDocument {
    /// Take the first forecast day out of the document.
    ///
    /// Returns `None` when the document carries no day at all.
    pub fn into_first_day(self) -> Option<Result<ForecastDay, InvalidDay>> {
        self.forecast
            .forecastday
            .into_iter()
            .next()
            .map(|day| ForecastDay::new(day.hour))
    }
}

/// Why a ride is not recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    NoData,
    TooCold,
    TooHot,
    TooWindy,
    LikelyRain,
}

impl Reason {
    pub fn message(&self) -> &'static str {
        match self {
            Reason::NoData => "There is no data yet.",
            Reason::TooCold => "Temperature is too cold.",
            Reason::TooHot => "Temperature is too hot.",
            Reason::TooWindy => "There is too much wind.",
            Reason::LikelyRain => "It will probably rain.",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Verdict on whether the coming hours are good for cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub suitable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,
}

impl Decision {
    pub const fn go() -> Self {
        Self { suitable: true, reason: None }
    }

    pub const fn reject(reason: Reason) -> Self {
        Self { suitable: false, reason: Some(reason) }
    }

    /// The state before any forecast has been received.
    pub const fn no_data() -> Self {
        Self::reject(Reason::NoData)
    }
}

impl Default for Decision {
    fn default() -> Self {
        Self::no_data()
    }
}
