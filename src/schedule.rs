//! Opening-hours schedule: parsing and open/closed evaluation.
//!
//! Accepted input:
//! - `Mon-Thu 11:00-23:00; Fri 11:00-15:00; Sat 19:00-23:30; Sun 11:00-23:00`
//! - `Sun-Thu 08:00-16:00, 18:00-23:00; Fri Closed`
//! - a bare `10:00-22:00`, applied to all seven days
//!
//! Anything else yields no schedule; callers fall back to showing the raw text.

use chrono::{Datelike, NaiveDateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Venue hours are always interpreted in Israeli local time.
pub const LOCAL_TZ: Tz = chrono_tz::Asia::Jerusalem;

/// Mon-first storage order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

static BARE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2}:[0-9]{2})\s*-\s*([0-9]{1,2}:[0-9]{2})$").unwrap());
static HAS_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{3}").unwrap());
static DAY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Mon|Tue|Wed|Thu|Fri|Sat|Sun)(?:-(Mon|Tue|Wed|Thu|Fri|Sat|Sun))?").unwrap()
});
static CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}$").unwrap());

/// One opening window, times kept exactly as written ("HH:MM", 24h local).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub opens: String,
    pub closes: String,
}

impl TimeRange {
    pub fn new(opens: impl Into<String>, closes: impl Into<String>) -> Self {
        Self { opens: opens.into(), closes: closes.into() }
    }

    /// Whether `minute` (minutes since midnight) falls inside this window.
    /// A window whose close is not after its open spans midnight.
    pub fn contains_minute(&self, minute: u32) -> bool {
        let (Some(start), Some(end)) = (clock_minutes(&self.opens), clock_minutes(&self.closes)) else {
            return false;
        };
        if end > start {
            minute >= start && minute < end
        } else {
            minute >= start || minute < end
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.opens, self.closes)
    }
}

/// Weekly opening hours. Every weekday is present; an empty list means closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    days: [Vec<TimeRange>; 7],
}

impl Schedule {
    /// The same window on every day of the week.
    pub fn uniform(range: TimeRange) -> Self {
        Self { days: std::array::from_fn(|_| vec![range.clone()]) }
    }

    pub fn ranges(&self, day: Weekday) -> &[TimeRange] {
        &self.days[day.num_days_from_monday() as usize]
    }

    pub fn push(&mut self, day: Weekday, range: TimeRange) {
        self.days[day.num_days_from_monday() as usize].push(range);
    }

    pub fn is_closed(&self, day: Weekday) -> bool {
        self.ranges(day).is_empty()
    }

    /// True when no day has any range.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Days in Mon..Sun order with their ranges.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[TimeRange])> {
        WEEK.iter().map(move |&d| (d, self.ranges(d)))
    }

    /// Open/closed at a local wall-clock time.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        let minute = at.hour() * 60 + at.minute();
        self.ranges(at.weekday())
            .iter()
            .any(|r| r.contains_minute(minute))
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, ranges) in self.iter() {
            map.serialize_entry(day_key(day), ranges)?;
        }
        map.end()
    }
}

/// Three-letter key used by the hours grammar and the serialized form.
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

fn parse_day_key(s: &str) -> Option<Weekday> {
    WEEK.iter().copied().find(|&d| day_key(d) == s)
}

/// Parse an hours string. Returns `None` when nothing usable was found.
pub fn parse_schedule(text: &str) -> Option<Schedule> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = BARE_RANGE.captures(trimmed) {
        return Some(Schedule::uniform(TimeRange::new(&caps[1], &caps[2])));
    }

    if !HAS_WORD.is_match(text) {
        return None;
    }

    let mut schedule = Schedule::default();

    for clause in text.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let Some(caps) = DAY_TOKEN.captures(clause) else {
            continue;
        };
        let Some(start) = parse_day_key(&caps[1]) else {
            continue;
        };
        let end = caps.get(2).and_then(|m| parse_day_key(m.as_str())).unwrap_or(start);

        let rest = clause[caps.get(0).map_or(0, |m| m.end())..].trim();
        if rest.is_empty() || rest.to_lowercase().contains("closed") {
            continue;
        }

        let days = expand_days(start, end);
        for item in rest.split(',').map(str::trim) {
            let times: Vec<&str> = item.split('-').map(str::trim).collect();
            if times.len() != 2 || !CLOCK.is_match(times[0]) || !CLOCK.is_match(times[1]) {
                continue;
            }
            for &day in &days {
                schedule.push(day, TimeRange::new(times[0], times[1]));
            }
        }
    }

    if schedule.is_empty() {
        None
    } else {
        Some(schedule)
    }
}

/// Expand a `Start-End` day token into concrete days.
///
/// `Sun-Thu` (and `Sun-Mon`..`Sun-Fri`) is the Israeli working week: Sunday
/// followed by Mon..End. Naive index slicing would get it wrong because
/// Sunday is last in Mon-first order.
pub fn expand_days(start: Weekday, end: Weekday) -> Vec<Weekday> {
    let s = start.num_days_from_monday() as usize;
    let e = end.num_days_from_monday() as usize;

    if start == Weekday::Sun && e <= Weekday::Fri.num_days_from_monday() as usize {
        std::iter::once(Weekday::Sun).chain(WEEK[..=e].iter().copied()).collect()
    } else if s <= e {
        WEEK[s..=e].to_vec()
    } else {
        WEEK[s..].iter().chain(WEEK[..=e].iter()).copied().collect()
    }
}

/// Open/closed for an optional schedule; `None` means unknown.
pub fn is_open_at(schedule: Option<&Schedule>, at: NaiveDateTime) -> Option<bool> {
    schedule.map(|s| s.is_open_at(at))
}

/// Current wall-clock time in Israel.
pub fn local_now() -> NaiveDateTime {
    Utc::now().with_timezone(&LOCAL_TZ).naive_local()
}

/// Local wall-clock time as `YYYY-MM-DDTHH:MM[:SS]`, `T` or a space between.
pub fn parse_local_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// "H:MM" / "HH:MM" to minutes since midnight.
fn clock_minutes(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    Some(h * 60 + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2026-10-12 is a Monday.
    fn at(day: Weekday, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 12 + day.num_days_from_monday())
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    fn ranges(s: &Schedule, day: Weekday) -> Vec<String> {
        s.ranges(day).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_single_clause_targets_only_named_days() {
        let s = parse_schedule("Tue-Thu 09:00-17:00").unwrap();
        for day in WEEK {
            let expected: Vec<String> = match day {
                Weekday::Tue | Weekday::Wed | Weekday::Thu => vec!["09:00-17:00".into()],
                _ => vec![],
            };
            assert_eq!(ranges(&s, day), expected, "{:?}", day);
        }
    }

    #[test]
    fn test_sun_thu_business_week() {
        let s = parse_schedule("Sun-Thu 08:00-20:00").unwrap();
        for day in [Weekday::Sun, Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu] {
            assert_eq!(s.ranges(day), &[TimeRange::new("08:00", "20:00")]);
        }
        assert!(s.is_closed(Weekday::Fri));
        assert!(s.is_closed(Weekday::Sat));
    }

    #[test]
    fn test_bare_range_applies_to_all_days() {
        let s = parse_schedule("10:00-22:00").unwrap();
        for day in WEEK {
            assert_eq!(s.ranges(day), &[TimeRange::new("10:00", "22:00")]);
        }
        assert!(parse_schedule("  9:30 - 18:00 ").is_some());
    }

    #[test]
    fn test_unparseable_is_none() {
        assert!(parse_schedule("").is_none());
        assert!(parse_schedule("   ").is_none());
        assert!(parse_schedule("garbage no days").is_none());
        assert!(parse_schedule("12345").is_none());
        assert!(parse_schedule("Mon Closed; Tue closed").is_none());
    }

    #[test]
    fn test_full_week_with_closed_day() {
        let s = parse_schedule("Mon-Thu 11:00-23:00; Fri 11:00-15:00; Sat 19:00-23:30; Sun Closed").unwrap();
        assert_eq!(ranges(&s, Weekday::Wed), vec!["11:00-23:00"]);
        assert_eq!(ranges(&s, Weekday::Fri), vec!["11:00-15:00"]);
        assert_eq!(ranges(&s, Weekday::Sat), vec!["19:00-23:30"]);
        assert!(s.is_closed(Weekday::Sun));
    }

    #[test]
    fn test_split_shifts_accumulate() {
        let s = parse_schedule("Mon 08:00-12:00; Mon 16:00-20:00; Tue 08:00-12:00, 17:00-21:00").unwrap();
        assert_eq!(ranges(&s, Weekday::Mon), vec!["08:00-12:00", "16:00-20:00"]);
        assert_eq!(ranges(&s, Weekday::Tue), vec!["08:00-12:00", "17:00-21:00"]);
    }

    #[test]
    fn test_wrap_around_range() {
        assert_eq!(
            expand_days(Weekday::Fri, Weekday::Mon),
            vec![Weekday::Fri, Weekday::Sat, Weekday::Sun, Weekday::Mon]
        );
        assert_eq!(expand_days(Weekday::Sun, Weekday::Sun), vec![Weekday::Sun]);
        assert_eq!(
            expand_days(Weekday::Sun, Weekday::Tue),
            vec![Weekday::Sun, Weekday::Mon, Weekday::Tue]
        );
    }

    #[test]
    fn test_malformed_ranges_are_skipped() {
        let s = parse_schedule("Mon 9-17, 10:00-18:00; Funday 10:00-12:00; Tue").unwrap();
        assert_eq!(ranges(&s, Weekday::Mon), vec!["10:00-18:00"]);
        assert!(s.is_closed(Weekday::Tue));
    }

    #[test]
    fn test_open_boundaries() {
        let s = parse_schedule("Mon 09:00-17:00").unwrap();
        assert!(!s.is_open_at(at(Weekday::Mon, 8, 59)));
        assert!(s.is_open_at(at(Weekday::Mon, 9, 0)));
        assert!(s.is_open_at(at(Weekday::Mon, 16, 59)));
        assert!(!s.is_open_at(at(Weekday::Mon, 17, 0)));
        assert!(!s.is_open_at(at(Weekday::Tue, 12, 0)));
    }

    #[test]
    fn test_overnight_range() {
        let s = parse_schedule("Sat 22:00-02:00").unwrap();
        assert!(s.is_open_at(at(Weekday::Sat, 23, 30)));
        assert!(s.is_open_at(at(Weekday::Sat, 1, 0)));
        assert!(!s.is_open_at(at(Weekday::Sat, 12, 0)));
    }

    #[test]
    fn test_unknown_without_schedule() {
        assert_eq!(is_open_at(None, at(Weekday::Mon, 12, 0)), None);
        let s = parse_schedule("Mon 09:00-17:00").unwrap();
        assert_eq!(is_open_at(Some(&s), at(Weekday::Mon, 12, 0)), Some(true));
        assert_eq!(is_open_at(Some(&s), at(Weekday::Wed, 12, 0)), Some(false));
    }

    #[test]
    fn test_serialized_in_week_order() {
        let s = parse_schedule("Sun 10:00-12:00").unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.starts_with(r#"{"Mon":[],"Tue":[]"#));
        assert!(json.ends_with(r#""Sun":[{"opens":"10:00","closes":"12:00"}]}"#));
    }

    #[test]
    fn test_parse_local_time() {
        assert_eq!(parse_local_time("2026-10-16T12:00").map(|t| t.weekday()), Some(Weekday::Fri));
        assert!(parse_local_time(" 2026-10-16 12:00:30 ").is_some());
        assert!(parse_local_time("noon").is_none());
    }
}
