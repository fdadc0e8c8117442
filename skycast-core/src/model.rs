//! Typed results handed to the presentation layer.
//!
//! [`CurrentConditions`] and [`Forecast`] keep OpenWeather's field names so
//! consumers written against the provider's JSON keep working. Required fields
//! are enforced at decode time; a body missing one is a parse failure rather
//! than a half-filled value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Primary condition classifier, e.g. `main = "Rain"`, `description = "light rain"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    /// Icon family for the classifier, as used by the app's icon set.
    pub fn icon_name(&self) -> &'static str {
        match self.main.to_lowercase().as_str() {
            "clear" => "weather-sunny",
            "clouds" => "weather-cloudy",
            "rain" => "weather-rainy",
            "drizzle" => "weather-pouring",
            "thunderstorm" => "weather-lightning",
            "snow" => "weather-snowy",
            "mist" | "smoke" | "haze" | "dust" | "fog" => "weather-fog",
            _ => "weather-partly-cloudy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grnd_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_kf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSys {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions for one place, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub coord: Coordinate,
    pub weather: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    pub main: MainReadings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub dt: i64,
    pub sys: CurrentSys,
    pub timezone: i64,
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod: Option<i64>,
}

impl CurrentConditions {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }

    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sys.sunrise)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.sys.sunset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSys {
    /// Part of day: `d` or `n`.
    pub pod: String,
}

/// One 3-hour sample of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    /// Probability of precipitation, 0.0..=1.0.
    pub pop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<ForecastSys>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_txt: Option<String>,
}

impl ForecastEntry {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub id: i64,
    pub name: String,
    pub coord: Coordinate,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,
    pub timezone: i64,
    pub sunrise: i64,
    pub sunset: i64,
}

/// 5-day/3-hour forecast. `list` is in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<f64>,
    pub cnt: u32,
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

/// Air quality for a place query. Concentrations in µg/m³, `aqi` on the provider's 1-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub aqi: u8,
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nh3: Option<f64>,
    pub city: String,
}

impl AirQuality {
    pub fn category(&self) -> AirQualityCategory {
        AirQualityCategory::from_aqi(self.aqi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQualityCategory {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AirQualityCategory {
    pub fn from_aqi(aqi: u8) -> Self {
        match aqi {
            0 | 1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "#00E400",
            Self::Fair => "#FFFF00",
            Self::Moderate => "#FF7E00",
            Self::Poor => "#FF0000",
            Self::VeryPoor => "#7E0023",
        }
    }
}

/// Substitute reading used when the UV lookup cannot complete.
pub const FALLBACK_UV_VALUE: f64 = 5.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvIndex {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    pub city: String,
}

impl UvIndex {
    pub fn fallback(city: &str) -> Self {
        Self {
            value: FALLBACK_UV_VALUE,
            date: None,
            city: city.to_string(),
        }
    }

    pub fn category(&self) -> UvCategory {
        UvCategory::from_value(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvCategory {
    pub fn from_value(value: f64) -> Self {
        if value <= 2.0 {
            Self::Low
        } else if value <= 5.0 {
            Self::Moderate
        } else if value <= 7.0 {
            Self::High
        } else if value <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#299501",
            Self::Moderate => "#F7E400",
            Self::High => "#F85900",
            Self::VeryHigh => "#D80011",
            Self::Extreme => "#6B49C8",
        }
    }
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
