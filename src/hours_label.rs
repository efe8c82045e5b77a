//! Human-readable labels built from a [`Schedule`].
//!
//! Two display rules matter here: Friday and Saturday are never merged into a
//! run with neighbouring days (the Israeli weekend is always shown on its own),
//! and every other run of consecutive days with identical hours collapses
//! into a single `first-last` group.

use crate::i18n::Language;
use crate::schedule::{Schedule, WEEK};
use chrono::Weekday;
use serde::Serialize;
use std::fmt;

/// Sunday-first order, as the Israeli week is read.
const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// A run of consecutive days sharing the same hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    /// Rendered day span, e.g. `א-ה` or `Fri`.
    pub days: String,
    pub closed: bool,
    /// Ranges joined by ` / `, or the localized closed word.
    pub hours: String,
}

/// Condensed weekly label, one group per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CondensedLabel {
    pub groups: Vec<DayGroup>,
}

impl fmt::Display for CondensedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, g) in self.groups.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {}", g.days, g.hours)?;
        }
        Ok(())
    }
}

struct Run {
    signature: (bool, String),
    first: Weekday,
    last: Weekday,
}

/// Build the condensed weekly label, e.g. `א-ה 08:00-23:00 / ו 08:00-15:00 / ש 09:30-23:30`.
pub fn condensed_weekly(schedule: &Schedule, lang: Language) -> CondensedLabel {
    let closed_word = lang.messages().closed;
    let mut runs: Vec<Run> = Vec::new();

    for day in SUNDAY_FIRST {
        let ranges = schedule.ranges(day);
        let signature = if ranges.is_empty() {
            (false, closed_word.to_string())
        } else {
            (true, ranges.iter().map(ToString::to_string).collect::<Vec<_>>().join(","))
        };

        let weekend = matches!(day, Weekday::Fri | Weekday::Sat);
        match runs.last_mut() {
            Some(run) if !weekend && run.signature == signature => run.last = day,
            _ => runs.push(Run { signature, first: day, last: day }),
        }
    }

    let groups = runs
        .into_iter()
        .map(|run| {
            let days = if run.first == run.last {
                lang.day_short(run.first).to_string()
            } else {
                format!("{}-{}", lang.day_short(run.first), lang.day_short(run.last))
            };
            let (open, label) = run.signature;
            DayGroup {
                days,
                closed: !open,
                hours: if open { label.replace(',', " / ") } else { label },
            }
        })
        .collect();

    CondensedLabel { groups }
}

/// Label for a single day: `"<day> 09:00-17:00, 19:00-23:00"`, `"<day> <closed>"`,
/// or `"<day> <raw hours>"` when the hours could not be parsed.
pub fn day_label(schedule: Option<&Schedule>, raw_hours: Option<&str>, day: Weekday, lang: Language) -> String {
    let name = lang.day_name(day);
    match schedule {
        Some(s) if !s.is_closed(day) => format!("{} {}", name, join_ranges(s, day, ", ")),
        Some(_) => format!("{} {}", name, lang.messages().closed),
        None => match raw_hours.map(str::trim).filter(|h| !h.is_empty()) {
            Some(raw) => format!("{} {}", name, raw),
            None => String::new(),
        },
    }
}

/// Full week, one `"<day>: <hours>"` line per day in Mon..Sun order.
/// Falls back to the raw text when there is no schedule.
pub fn full_week(schedule: Option<&Schedule>, raw_hours: Option<&str>, lang: Language) -> String {
    let Some(s) = schedule else {
        return raw_hours.unwrap_or_default().to_string();
    };
    WEEK.iter()
        .map(|&d| {
            let hours = if s.is_closed(d) {
                lang.messages().closed.to_string()
            } else {
                join_ranges(s, d, ", ")
            };
            format!("{}: {}", lang.day_name(d), hours)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_ranges(s: &Schedule, day: Weekday, sep: &str) -> String {
    s.ranges(day).iter().map(ToString::to_string).collect::<Vec<_>>().join(sep)
}
