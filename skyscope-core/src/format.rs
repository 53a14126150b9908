//! Unit- and locale-aware display strings.
//!
//! Numbers are rendered with their plain decimal representation first and
//! only then, for Arabic, mapped digit by digit to Arabic-Indic numerals.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::{
    icon::{IconId, resolve_icon},
    model::{DailyForecastEntry, HourlyForecastEntry, WeatherReading},
    units::{Language, UnitPreference, resolve_unit_strings},
};

/// Values that can be rendered as a plain decimal string.
pub trait Numeral {
    fn decimal_string(&self) -> String;
}

macro_rules! impl_numeral {
    ($($t:ty),*) => {
        $(impl Numeral for $t {
            fn decimal_string(&self) -> String {
                self.to_string()
            }
        })*
    };
}

impl_numeral!(u8, u16, u32, u64, i32, i64, usize, f32, f64);

/// Render `value` in the numeral script of `language`.
pub fn localize_numeral<N: Numeral + ?Sized>(value: &N, language: Language) -> String {
    let digits = value.decimal_string();
    match language {
        Language::En => digits,
        Language::Ar => digits.chars().map(arabic_indic_digit).collect(),
    }
}

fn arabic_indic_digit(c: char) -> char {
    match c.to_digit(10) {
        Some(d) if c.is_ascii_digit() => char::from_u32(0x0660 + d).unwrap_or(c),
        _ => c,
    }
}

/// Formatted current conditions, ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayStrings {
    pub temperature: String,
    pub humidity: String,
    pub pressure: String,
    pub clouds: String,
    pub visibility: String,
    pub uv_index: String,
    pub wind_speed: String,
}

struct MeasureSuffixes {
    percent: &'static str,
    pressure: &'static str,
    visibility: &'static str,
}

fn measure_suffixes(language: Language) -> MeasureSuffixes {
    match language {
        Language::En => MeasureSuffixes {
            percent: "%",
            pressure: " hPa",
            visibility: "m",
        },
        Language::Ar => MeasureSuffixes {
            percent: "٪",
            pressure: " هب",
            visibility: "م",
        },
    }
}

/// Temperatures are shown truncated toward zero.
fn whole(value: f64) -> i64 {
    value.trunc() as i64
}

pub fn format_temperature(value: f64, prefs: UnitPreference) -> String {
    let units = resolve_unit_strings(prefs.unit_system, prefs.language);
    format!("{}{}", localize_numeral(&whole(value), prefs.language), units.temperature)
}

pub fn format_reading(reading: &WeatherReading, prefs: UnitPreference) -> DisplayStrings {
    let lang = prefs.language;
    let units = resolve_unit_strings(prefs.unit_system, lang);
    let suffix = measure_suffixes(lang);

    DisplayStrings {
        temperature: format_temperature(reading.temperature, prefs),
        humidity: format!("{}{}", localize_numeral(&reading.humidity_pct, lang), suffix.percent),
        pressure: format!("{}{}", localize_numeral(&reading.pressure_hpa, lang), suffix.pressure),
        clouds: format!("{}{}", localize_numeral(&reading.clouds_pct, lang), suffix.percent),
        visibility: format!(
            "{}{}",
            localize_numeral(&reading.visibility_m, lang),
            suffix.visibility
        ),
        uv_index: match lang {
            Language::En => reading.uv_index.to_string(),
            Language::Ar => localize_numeral(&whole(reading.uv_index), lang),
        },
        wind_speed: format!("{}{}", localize_numeral(&reading.wind_speed, lang), units.wind_speed),
    }
}

/// Long weekday name, e.g. "Monday".
pub fn format_day_name<Tz>(instant: &DateTime<Tz>, language: Language) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format_localized("%A", language.chrono_locale()).to_string()
}

/// "10 Apr, 2023".
pub fn format_date<Tz>(instant: &DateTime<Tz>, language: Language) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format_localized("%-d %b, %Y", language.chrono_locale()).to_string()
}

/// 12-hour clock, e.g. "3:30 PM".
pub fn format_time<Tz>(instant: &DateTime<Tz>, language: Language) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format_localized("%-I:%M %p", language.chrono_locale()).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyRow {
    pub time: String,
    pub icon: IconId,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRow {
    pub day: String,
    pub icon: IconId,
    pub description: String,
    /// "max/min" with the temperature suffix.
    pub temperature: String,
}

pub fn format_hourly<Tz>(
    entries: &[HourlyForecastEntry],
    prefs: UnitPreference,
    tz: &Tz,
) -> Vec<HourlyRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    entries
        .iter()
        .map(|entry| HourlyRow {
            time: format_time(&entry.time.with_timezone(tz), prefs.language),
            icon: resolve_icon(&entry.condition_code),
            temperature: format_temperature(entry.temperature, prefs),
        })
        .collect()
}

pub fn format_daily<Tz>(
    entries: &[DailyForecastEntry],
    prefs: UnitPreference,
    tz: &Tz,
) -> Vec<DailyRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let units = resolve_unit_strings(prefs.unit_system, prefs.language);
    entries
        .iter()
        .map(|entry| DailyRow {
            day: format_day_name(&entry.time.with_timezone(tz), prefs.language),
            icon: resolve_icon(&entry.condition_code),
            description: entry.description.clone(),
            temperature: format!(
                "{}/{}{}",
                localize_numeral(&whole(entry.max_temperature), prefs.language),
                localize_numeral(&whole(entry.min_temperature), prefs.language),
                units.temperature
            ),
        })
        .collect()
}
