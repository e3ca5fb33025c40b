//! Clock and calendar collaborators. Dates leave this module as display
//! strings; the rest of the crate never does calendar arithmetic.

use chrono::{Datelike, Duration, Local, NaiveDate};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Source of "today" and the current week, in the user's calendar.
pub trait Calendar: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// Opaque identifier that changes exactly when a new week starts.
    fn week_id(&self, date: NaiveDate) -> String;

    /// Labels for the seven days of the week containing `date`, first day first.
    fn week_dates(&self, date: NaiveDate) -> Vec<String>;

    fn current_week(&self) -> String {
        self.week_id(self.today())
    }
}

/// Solar Hijri calendar with Saturday-first weeks, reading the local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct JalaliCalendar;

impl Calendar for JalaliCalendar {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn week_id(&self, date: NaiveDate) -> String {
        JalaliDate::from_gregorian(week_start(date)).to_string()
    }

    fn week_dates(&self, date: NaiveDate) -> Vec<String> {
        let start = week_start(date);
        (0..7)
            .map(|offset| JalaliDate::from_gregorian(start + Duration::days(offset)).to_string())
            .collect()
    }
}

/// Jalali calendar pinned to a day the caller chooses and can move.
#[derive(Debug)]
pub struct FixedCalendar {
    today: Mutex<NaiveDate>,
}

impl FixedCalendar {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = today;
    }
}

impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn week_id(&self, date: NaiveDate) -> String {
        JalaliCalendar.week_id(date)
    }

    fn week_dates(&self, date: NaiveDate) -> Vec<String> {
        JalaliCalendar.week_dates(date)
    }
}

/// Saturday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_since_saturday = (date.weekday().num_days_from_sunday() + 1) % 7;
    date - Duration::days(i64::from(days_since_saturday))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

// Years at which the 33-year leap cycle is re-anchored.
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324, 2394, 2456, 3178,
];

struct YearInfo {
    /// Years since the last leap year, 0 for a leap year.
    leap: i32,
    /// March day of the Gregorian year on which Farvardin 1 falls.
    march: u32,
}

fn year_info(jalali_year: i32) -> YearInfo {
    let gregorian_year = jalali_year + 621;
    let mut leap_j = -14;
    let mut previous = BREAKS[0];
    let mut jump = 0;

    for &next in &BREAKS[1..] {
        jump = next - previous;
        if jalali_year < next {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        previous = next;
    }

    let mut n = jalali_year - previous;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }
    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    YearInfo {
        leap,
        march: u32::try_from(march).unwrap_or(21),
    }
}

impl JalaliDate {
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let gregorian_year = date.year();
        let mut year = gregorian_year - 621;
        let info = year_info(year);
        let nowruz = NaiveDate::from_ymd_opt(gregorian_year, 3, info.march).unwrap_or(date);
        let mut k = (date - nowruz).num_days() as i32;

        if k >= 0 {
            if k <= 185 {
                return Self {
                    year,
                    month: (1 + k / 31) as u32,
                    day: (k % 31 + 1) as u32,
                };
            }
            k -= 186;
        } else {
            year -= 1;
            k += 179;
            if info.leap == 1 {
                k += 1;
            }
        }

        Self {
            year,
            month: (7 + k / 30) as u32,
            day: (k % 30 + 1) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn converts_known_dates() {
        assert_eq!(JalaliDate::from_gregorian(date(2026, 3, 21)).to_string(), "1405/01/01");
        assert_eq!(JalaliDate::from_gregorian(date(2026, 10, 18)).to_string(), "1405/07/26");
        assert_eq!(JalaliDate::from_gregorian(date(2023, 12, 6)).to_string(), "1402/09/15");
        assert_eq!(JalaliDate::from_gregorian(date(2026, 3, 20)).to_string(), "1404/12/29");
        assert_eq!(JalaliDate::from_gregorian(date(2025, 3, 20)).to_string(), "1403/12/30");
    }

    #[test]
    fn weeks_start_on_saturday() {
        // 2026-10-18 is a Sunday.
        assert_eq!(week_start(date(2026, 10, 18)), date(2026, 10, 17));
        assert_eq!(week_start(date(2026, 10, 17)), date(2026, 10, 17));
        assert_eq!(week_start(date(2026, 10, 23)), date(2026, 10, 17));
        assert_eq!(week_start(date(2026, 10, 24)), date(2026, 10, 24));
    }

    #[test]
    fn week_id_changes_only_at_week_boundary() {
        let calendar = JalaliCalendar;
        let saturday = calendar.week_id(date(2026, 10, 17));
        assert_eq!(saturday, "1405/07/25");
        assert_eq!(calendar.week_id(date(2026, 10, 23)), saturday);
        assert_ne!(calendar.week_id(date(2026, 10, 24)), saturday);
    }

    #[test]
    fn week_dates_cover_seven_days() {
        let dates = JalaliCalendar.week_dates(date(2026, 10, 18));
        assert_eq!(dates.len(), 7);
        assert_eq!(dates.first().map(String::as_str), Some("1405/07/25"));
        // Mehr has 30 days, so the week runs into Aban.
        assert_eq!(dates[5], "1405/07/30");
        assert_eq!(dates.last().map(String::as_str), Some("1405/08/01"));
    }
}
