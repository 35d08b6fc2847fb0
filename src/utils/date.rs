use chrono::{Datelike, NaiveDate, Weekday};

pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).ok()
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

/// Every date from `start` to `end`, both inclusive. Empty when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Weekday index with Monday = 0 … Sunday = 6.
pub fn weekday_index(d: &NaiveDate) -> u32 {
    d.weekday().num_days_from_monday()
}

/// Spanish sheet abbreviation (L, M, MX, J, V, S, D).
pub fn weekday_abbr(d: &NaiveDate) -> &'static str {
    match d.weekday() {
        Weekday::Mon => "L",
        Weekday::Tue => "M",
        Weekday::Wed => "MX",
        Weekday::Thu => "J",
        Weekday::Fri => "V",
        Weekday::Sat => "S",
        Weekday::Sun => "D",
    }
}

/// Column header used in attendance sheets, e.g. `L 06/01/25`.
pub fn sheet_header(d: &NaiveDate) -> String {
    format!("{} {}", weekday_abbr(d), d.format("%d/%m/%y"))
}

/// Parse a weekday filter such as `0,2,4` (Monday = 0).
pub fn parse_weekday_filter(s: &str) -> Result<Vec<u32>, String> {
    let mut out = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let n: u32 = part
            .parse()
            .map_err(|_| format!("Invalid weekday '{}': use numbers 0-6", part))?;
        if n > 6 {
            return Err(format!("Invalid weekday '{}': use numbers 0-6", part));
        }
        if !out.contains(&n) {
            out.push(n);
        }
    }
    Ok(out)
}
