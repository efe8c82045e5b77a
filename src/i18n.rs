//! Hebrew/English message table and day names.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language. Hebrew is the default, as the directory is Israeli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    He,
    En,
}

impl Language {
    pub fn is_rtl(self) -> bool {
        self == Self::He
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Self::He => &HE,
            Self::En => &EN,
        }
    }

    /// Day name used in today/tooltip labels.
    pub fn day_name(self, day: Weekday) -> &'static str {
        match self {
            Self::He => match day {
                Weekday::Mon => "שני",
                Weekday::Tue => "שלישי",
                Weekday::Wed => "רביעי",
                Weekday::Thu => "חמישי",
                Weekday::Fri => "שישי",
                Weekday::Sat => "שבת",
                Weekday::Sun => "ראשון",
            },
            Self::En => day_abbrev(day),
        }
    }

    /// Short day marker used in the condensed weekly label (Hebrew letters א..ש).
    pub fn day_short(self, day: Weekday) -> &'static str {
        match self {
            Self::He => match day {
                Weekday::Sun => "א",
                Weekday::Mon => "ב",
                Weekday::Tue => "ג",
                Weekday::Wed => "ד",
                Weekday::Thu => "ה",
                Weekday::Fri => "ו",
                Weekday::Sat => "ש",
            },
            Self::En => day_abbrev(day),
        }
    }
}

fn day_abbrev(day: Weekday) -> &'static str {
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

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::He => write!(f, "he"),
            Self::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "he" | "iw" | "hebrew" | "עב" => Ok(Self::He),
            "en" | "english" => Ok(Self::En),
            other => Err(format!("Unknown language '{}'. Use 'he' or 'en'.", other)),
        }
    }
}

/// User-visible strings.
#[derive(Debug)]
pub struct Messages {
    pub title: &'static str,
    pub general_region: &'static str,
    pub visit_website: &'static str,
    pub no_places_found: &'static str,
    pub load_error: &'static str,
    pub expand_all: &'static str,
    pub collapse_all: &'static str,
    pub open_now: &'static str,
    pub closed_now: &'static str,
    pub closed: &'static str,
    pub suggestion_sent: &'static str,
    pub mail_invalid_data: &'static str,
    pub mail_configuration: &'static str,
    pub mail_failed: &'static str,
    pub subscribe_success: &'static str,
    pub subscribe_exists: &'static str,
    pub subscribe_error: &'static str,
    pub missing_fields: &'static str,
}

static HE: Messages = Messages {
    title: "מקומות טבעוניים בישראל",
    general_region: "כללי",
    visit_website: "בקרו באתר",
    no_places_found: "לא נמצאו מקומות טבעוניים התואמים לחיפוש.",
    load_error: "שגיאה בטעינת המקומות הטבעוניים. אנא נסה שוב מאוחר יותר.",
    expand_all: "הרחב הכל",
    collapse_all: "צמצם הכל",
    open_now: "פתוח עכשיו",
    closed_now: "סגור עכשיו",
    closed: "סגור",
    suggestion_sent: "תודה! ההצעה נשלחה בהצלחה. נבדוק אותה ונוסיף למאגר בהקדם.",
    mail_invalid_data: "שגיאה: נתונים שגויים. אנא בדקו שכל השדות מלאים כראוי.",
    mail_configuration: "שגיאה: בעיה בהגדרות שירות הדואר. צרו קשר באימייל.",
    mail_failed: "אופס! הייתה שגיאה בשליחה. אנא נסו שוב או צרו קשר באימייל.",
    subscribe_success: "נרשמתם בהצלחה! תודה.",
    subscribe_exists: "אתם כבר רשומים לקבלת עדכונים.",
    subscribe_error: "אירעה שגיאה בהרשמה. נסו שוב או פנו אלינו.",
    missing_fields: "אנא מלאו את כל שדות החובה.",
};

static EN: Messages = Messages {
    title: "Vegan Places in Israel",
    general_region: "General",
    visit_website: "Visit Website",
    no_places_found: "No vegan places found matching your search.",
    load_error: "Failed to load vegan places. Please try again later.",
    expand_all: "Expand All",
    collapse_all: "Collapse All",
    open_now: "Open now",
    closed_now: "Closed now",
    closed: "Closed",
    suggestion_sent: "Thank you! Your suggestion has been sent successfully. We'll review it and add it to our database soon.",
    mail_invalid_data: "Error: Invalid data. Please check that all fields are filled correctly.",
    mail_configuration: "Error: Mail service configuration issue. Please contact via email.",
    mail_failed: "Oops! There was an error sending your suggestion. Please try again or contact us via email.",
    subscribe_success: "You are subscribed. Thank you!",
    subscribe_exists: "You are already subscribed.",
    subscribe_error: "There was an error subscribing. Please try again or contact us.",
    missing_fields: "Please fill in all required fields.",
};
