use std::fmt;

/// Display icon for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    ClearSkyDay,
    ClearSkyNight,
    CloudsMediumDay,
    CloudsMediumNight,
    CloudsHigh,
    RainMediumDay,
    RainMediumNight,
    RainHighDay,
    RainHighNight,
    ThunderstormDay,
    ThunderstormNight,
    SnowDay,
    SnowNight,
    MistDay,
    MistNight,
}

impl IconId {
    /// Stable identifier front ends map to an asset.
    pub fn name(&self) -> &'static str {
        match self {
            IconId::ClearSkyDay => "clearsky_day",
            IconId::ClearSkyNight => "clearsky_night",
            IconId::CloudsMediumDay => "clouds_medium_day",
            IconId::CloudsMediumNight => "clouds_medium_night",
            IconId::CloudsHigh => "clouds_high",
            IconId::RainMediumDay => "rain_medium_day",
            IconId::RainMediumNight => "rain_medium_night",
            IconId::RainHighDay => "rain_high_day",
            IconId::RainHighNight => "rain_high_night",
            IconId::ThunderstormDay => "thunderstorm_day",
            IconId::ThunderstormNight => "thunderstorm_night",
            IconId::SnowDay => "snow_day",
            IconId::SnowNight => "snow_night",
            IconId::MistDay => "mist_day",
            IconId::MistNight => "mist_night",
        }
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Map an OpenWeather condition code ("01d", "10n", ...) to an icon.
///
/// Unknown codes fall back to [`IconId::CloudsHigh`].
pub fn resolve_icon(code: &str) -> IconId {
    match code {
        "01d" => IconId::ClearSkyDay,
        "01n" => IconId::ClearSkyNight,
        "02d" => IconId::CloudsMediumDay,
        "02n" => IconId::CloudsMediumNight,
        // 03 has its day/night variants swapped upstream; kept for parity.
        "03n" => IconId::CloudsMediumDay,
        "03d" => IconId::CloudsMediumNight,
        "04d" | "04n" => IconId::CloudsHigh,
        "09d" => IconId::RainMediumDay,
        "09n" => IconId::RainMediumNight,
        "10d" => IconId::RainHighDay,
        "10n" => IconId::RainHighNight,
        "11d" => IconId::ThunderstormDay,
        "11n" => IconId::ThunderstormNight,
        "13d" => IconId::SnowDay,
        "13n" => IconId::SnowNight,
        "50d" => IconId::MistDay,
        "50n" => IconId::MistNight,
        _ => IconId::CloudsHigh,
    }
}
