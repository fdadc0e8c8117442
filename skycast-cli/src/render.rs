//! Plain-text summaries of lookup results.

use chrono::{DateTime, Utc};
use skycast_core::{AirQuality, CurrentConditions, Forecast, UvIndex};

fn temperature(celsius: f64) -> String {
    format!("{}°C", celsius.round())
}

fn clock(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%H:%M UTC").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn current(c: &CurrentConditions) -> String {
    let condition = c
        .primary_condition()
        .map(|w| format!("{} ({})", w.main, w.description))
        .unwrap_or_else(|| "Unknown".to_string());

    [
        format!("{}, {}", c.name, c.sys.country),
        format!(
            "  {}  feels like {}  (min {} / max {})",
            temperature(c.main.temp),
            temperature(c.main.feels_like),
            temperature(c.main.temp_min),
            temperature(c.main.temp_max),
        ),
        format!("  {condition}"),
        format!(
            "  humidity {}%  pressure {} hPa  clouds {}%",
            c.main.humidity,
            c.main.pressure,
            c.clouds.all,
        ),
        format!("  wind {} m/s at {}°", c.wind.speed, c.wind.deg),
        format!(
            "  sunrise {}  sunset {}",
            clock(c.sunrise_at()),
            clock(c.sunset_at()),
        ),
    ]
    .join("\n")
}

pub fn forecast(f: &Forecast) -> String {
    let header = format!(
        "{}, {}: {} entries",
        f.city.name,
        f.city.country,
        f.list.len(),
    );
    let mut lines = vec![header];

    for entry in &f.list {
        let when = entry
            .at()
            .map(|t| t.format("%a %d %b %H:%M").to_string())
            .unwrap_or_else(|| entry.dt.to_string());
        let condition = entry
            .primary_condition()
            .map(|w| w.description.as_str())
            .unwrap_or("unknown");

        lines.push(format!(
            "  {when}  {:>6}  {:>3.0}% rain  {condition}",
            temperature(entry.main.temp),
            entry.pop * 100.0,
        ));
    }

    lines.join("\n")
}

pub fn air_quality(a: &AirQuality) -> String {
    let mut lines = vec![
        format!(
            "Air quality in {}: {} (AQI {})",
            a.city,
            a.category().label(),
            a.aqi,
        ),
        format!("  PM2.5 {} µg/m³  PM10 {} µg/m³", a.pm25, a.pm10),
        format!("  NO2 {} µg/m³  O3 {} µg/m³", a.no2, a.o3),
    ];

    let extras: Vec<String> = [("SO2", a.so2), ("CO", a.co), ("NH3", a.nh3)]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| format!("{name} {v} µg/m³")))
        .collect();
    if !extras.is_empty() {
        lines.push(format!("  {}", extras.join("  ")));
    }

    lines.join("\n")
}

pub fn uv_index(u: &UvIndex) -> String {
    let measured = match u.date {
        Some(at) => format!("measured {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => "estimate".to_string(),
    };

    format!(
        "UV index in {}: {} ({}, {measured})",
        u.city,
        u.value,
        u.category().label(),
    )
}
