use skyscope_core::{
    Destination, FavoriteLocation, Language, Notice, favorite_view::FavoriteDisplay,
};

const HOURLY_ROWS: usize = 12;

struct Labels {
    humidity: &'static str,
    pressure: &'static str,
    clouds: &'static str,
    visibility: &'static str,
    uv_index: &'static str,
    wind: &'static str,
    hourly: &'static str,
    daily: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::En => Labels {
            humidity: "Humidity",
            pressure: "Pressure",
            clouds: "Clouds",
            visibility: "Visibility",
            uv_index: "UV index",
            wind: "Wind",
            hourly: "Next hours",
            daily: "Next days",
        },
        Language::Ar => Labels {
            humidity: "الرطوبة",
            pressure: "الضغط",
            clouds: "السحب",
            visibility: "الرؤية",
            uv_index: "مؤشر الأشعة",
            wind: "الرياح",
            hourly: "الساعات القادمة",
            daily: "الأيام القادمة",
        },
    }
}

pub fn weather(display: &FavoriteDisplay) {
    let l = labels(display.units.language);
    let r = &display.readings;

    println!("{} ({})", display.location.name, display.location.coordinate);
    println!("{}, {}", display.day_name, display.date);
    println!();
    println!("  {}  [{}]  {}", r.temperature, display.icon, display.description);
    println!("  {:<12} {}", l.humidity, r.humidity);
    println!("  {:<12} {}", l.pressure, r.pressure);
    println!("  {:<12} {}", l.clouds, r.clouds);
    println!("  {:<12} {}", l.visibility, r.visibility);
    println!("  {:<12} {}", l.uv_index, r.uv_index);
    println!("  {:<12} {}", l.wind, r.wind_speed);

    if !display.hourly.is_empty() {
        println!();
        println!("{}:", l.hourly);
        for row in display.hourly.iter().take(HOURLY_ROWS) {
            println!("  {:>9}  {:<20} {}", row.time, row.icon, row.temperature);
        }
    }

    if !display.daily.is_empty() {
        println!();
        println!("{}:", l.daily);
        for row in &display.daily {
            println!(
                "  {:<10} {:<20} {:<12} {}",
                row.day, row.icon, row.temperature, row.description
            );
        }
    }
}

pub fn notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("! {notice}");
    }
}

pub fn destination(destination: Destination) {
    match destination {
        Destination::Favorites => println!("Saved. Run `skyscope favorites` to see all favorites."),
        Destination::Home => println!("Location set. It will be used for your next lookup."),
    }
}

pub fn favorites(favorites: &[FavoriteLocation]) {
    if favorites.is_empty() {
        println!("No favorites yet. Add one with `skyscope pick --favorite`.");
        return;
    }

    for fav in favorites {
        let cached = match &fav.snapshot {
            Some(s) => format!("cached {}", s.current.observed_at.format("%Y-%m-%d %H:%M UTC")),
            None => "no cached weather".to_string(),
        };
        println!(
            "{:>4}  {:<22} {}/{}  {}",
            fav.id, fav.coordinate, fav.units.unit_system, fav.units.language, cached
        );
    }
}
