// src/data/datetime.rs

//! Recognize and regenerate dates, times and datetimes.
//!
//! Every recognized format is written once as a strftime-like
//! [`DateTimePattern_str`], e.g. `"%a, %d %b %Y %H:%M:%S GMT"`. Patterns are
//! grouped into [`DtFamily`]s (the named RFC forms, ISO 8601, and the looser
//! "user-typed" forms). Each pattern is parsed once into a
//! [`DateTimeTemplate`]: ordered [`DtField`] codes plus literal separators,
//! and an anchored [`Regex`] built from the per-field capture patterns
//! (the `CGP_*` constants).
//!
//! A match is accepted only when the captured fields form a valid calendar
//! date and time. The resulting [`DateTimeNode`] can render a randomized
//! instant that is strictly earlier than the original, in the original
//! layout: same separators, same field widths, same name case, same zone
//! text.
//!
//! [`Regex`]: https://docs.rs/regex/1.11.1/regex/bytes/struct.Regex.html

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use crate::common::char_len;
use crate::debug::printers::str_to_String_noraw;

use std::fmt;

use ::chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use ::const_format::concatcp;
use ::itertools::Itertools;
use ::lazy_static::lazy_static;
use ::more_asserts::debug_assert_le;
use ::once_cell::sync::Lazy;
use ::rand::Rng;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// type aliases, constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A strftime-like pattern, e.g. `"%Y-%m-%dT%H:%M:%S%z"`.
///
/// Supported codes:
///
/// | code | field |
/// |---|---|
/// | `%Y` `%y` `%G` | year, 2-digit year, ISO week-year |
/// | `%m` `%-m` | month, month without padding |
/// | `%d` `%-d` `%e` | day, day without padding, space-padded day |
/// | `%j` `%V` `%u` | day of year, ISO week, ISO weekday `1`-`7` |
/// | `%H` `%-H` `%I` `%-I` | hour, hour without padding, 12-hour, 12-hour without padding |
/// | `%M` `%S` `%f` | minute, second, fractional second digits |
/// | `%p` | `AM`/`PM` |
/// | `%b` `%B` | month name (abbreviated or full) |
/// | `%a` `%A` | weekday name (abbreviated or full) |
/// | `%z` `%:z` | numeric offset or `Z` |
/// | `%Z` | zone abbreviation |
/// | `%%` | literal `%` |
pub type DateTimePattern_str = str;

/// Year used when the text has no year, e.g. syslog `Feb 29 10:00:00`.
/// A leap year so that February 29 is valid.
pub const YEAR_FALLBACKDUMMY: i32 = 1972;

/// Number of times fields are re-rolled looking for a strictly earlier
/// instant before walking backwards.
pub const REROLL_ATTEMPTS: usize = 8;

/// Maximum number of days walked backwards looking for a strictly earlier
/// instant that renders in the original widths.
pub const EARLIER_WALK_CAP: usize = 400;

pub const MONTHS_FULL: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december",
];
pub const MONTHS_ABBR: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
pub const WEEKDAYS_FULL: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];
pub const WEEKDAYS_ABBR: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Zone abbreviations accepted by `%Z`.
pub const TZZ_LIST: [&str; 41] = [
    "ACDT", "ACST", "AEDT", "AEST", "AKDT", "AKST", "AWST", "BST", "CAT", "CDT", "CEST", "CET", "CST",
    "EAT", "EDT", "EEST", "EET", "EST", "GMT", "HKT", "HST", "IST", "JST", "KST", "MDT", "MSK", "MST",
    "NZDT", "NZST", "PDT", "PHT", "PST", "SAST", "SGT", "UTC", "UT", "WAT", "WEST", "WET", "WIB", "Z",
];

// capture group patterns, one per field

pub const CGP_YEAR: &str = r"\d{4}";
pub const CGP_YEARy: &str = r"\d{2}";
pub const CGP_2DIGITS: &str = r"\d{2}";
pub const CGP_1_2DIGITS: &str = r"\d{1,2}";
pub const CGP_DAYe: &str = r"[ \d]\d";
pub const CGP_ORDINAL: &str = r"\d{3}";
pub const CGP_ISO_WEEKDAY: &str = r"[1-7]";
pub const CGP_FRACTIONAL: &str = r"\d{1,9}";
pub const CGP_AMPM: &str = r"[ap]m";
pub const CGP_MONTH_NAME: &str = concatcp!(
    "january|february|march|april|may|june|july|august|september|october|november|december",
    "|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec"
);
pub const CGP_WEEKDAY_NAME: &str = concatcp!(
    "monday|tuesday|wednesday|thursday|friday|saturday|sunday",
    "|mon|tue|wed|thu|fri|sat|sun"
);
pub const CGP_TZz: &str = r"z|[+-]\d{2}:?\d{2}";

/// `%Z` alternation of [`TZZ_LIST`]
pub static CGP_TZZ: Lazy<String> = Lazy::new(|| TZZ_LIST.iter().join("|"));

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// fields and templates
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One field of a [`DateTimeTemplate`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DtField {
    /// `%Y`
    Year,
    /// `%y`
    Year2,
    /// `%G`
    IsoYear,
    /// `%m`
    Month,
    /// `%-m`
    MonthNp,
    /// `%d`
    Day,
    /// `%-d`
    DayNp,
    /// `%e`
    DaySp,
    /// `%j`
    Ordinal,
    /// `%V`
    IsoWeek,
    /// `%u`
    IsoWeekday,
    /// `%H`
    Hour,
    /// `%-H`
    HourNp,
    /// `%I`
    Hour12,
    /// `%-I`
    Hour12Np,
    /// `%M`
    Minute,
    /// `%S`
    Second,
    /// `%f`
    Fraction,
    /// `%p`
    AmPm,
    /// `%b`
    MonthAbbr,
    /// `%B`
    MonthFull,
    /// `%a`
    WeekdayAbbr,
    /// `%A`
    WeekdayFull,
    /// `%z`
    Offset,
    /// `%:z`
    OffsetColon,
    /// `%Z`
    Zone,
}

impl DtField {
    pub fn from_code(code: &str) -> Option<DtField> {
        let field = match code {
            "Y" => DtField::Year,
            "y" => DtField::Year2,
            "G" => DtField::IsoYear,
            "m" => DtField::Month,
            "-m" => DtField::MonthNp,
            "d" => DtField::Day,
            "-d" => DtField::DayNp,
            "e" => DtField::DaySp,
            "j" => DtField::Ordinal,
            "V" => DtField::IsoWeek,
            "u" => DtField::IsoWeekday,
            "H" => DtField::Hour,
            "-H" => DtField::HourNp,
            "I" => DtField::Hour12,
            "-I" => DtField::Hour12Np,
            "M" => DtField::Minute,
            "S" => DtField::Second,
            "f" => DtField::Fraction,
            "p" => DtField::AmPm,
            "b" => DtField::MonthAbbr,
            "B" => DtField::MonthFull,
            "a" => DtField::WeekdayAbbr,
            "A" => DtField::WeekdayFull,
            "z" => DtField::Offset,
            ":z" => DtField::OffsetColon,
            "Z" => DtField::Zone,
            _ => return None,
        };

        Some(field)
    }

    /// The pattern code, e.g. `"%-m"`.
    pub const fn code(self) -> &'static str {
        match self {
            DtField::Year => "%Y",
            DtField::Year2 => "%y",
            DtField::IsoYear => "%G",
            DtField::Month => "%m",
            DtField::MonthNp => "%-m",
            DtField::Day => "%d",
            DtField::DayNp => "%-d",
            DtField::DaySp => "%e",
            DtField::Ordinal => "%j",
            DtField::IsoWeek => "%V",
            DtField::IsoWeekday => "%u",
            DtField::Hour => "%H",
            DtField::HourNp => "%-H",
            DtField::Hour12 => "%I",
            DtField::Hour12Np => "%-I",
            DtField::Minute => "%M",
            DtField::Second => "%S",
            DtField::Fraction => "%f",
            DtField::AmPm => "%p",
            DtField::MonthAbbr => "%b",
            DtField::MonthFull => "%B",
            DtField::WeekdayAbbr => "%a",
            DtField::WeekdayFull => "%A",
            DtField::Offset => "%z",
            DtField::OffsetColon => "%:z",
            DtField::Zone => "%Z",
        }
    }

    /// Regex for the field, without the capture group.
    pub fn pattern(self) -> &'static str {
        match self {
            DtField::Year | DtField::IsoYear => CGP_YEAR,
            DtField::Year2 => CGP_YEARy,
            DtField::Month
            | DtField::Day
            | DtField::IsoWeek
            | DtField::Hour
            | DtField::Hour12
            | DtField::Minute
            | DtField::Second => CGP_2DIGITS,
            DtField::MonthNp | DtField::DayNp | DtField::HourNp | DtField::Hour12Np => CGP_1_2DIGITS,
            DtField::DaySp => CGP_DAYe,
            DtField::Ordinal => CGP_ORDINAL,
            DtField::IsoWeekday => CGP_ISO_WEEKDAY,
            DtField::Fraction => CGP_FRACTIONAL,
            DtField::AmPm => CGP_AMPM,
            DtField::MonthAbbr | DtField::MonthFull => CGP_MONTH_NAME,
            DtField::WeekdayAbbr | DtField::WeekdayFull => CGP_WEEKDAY_NAME,
            DtField::Offset | DtField::OffsetColon => CGP_TZz,
            DtField::Zone => CGP_TZZ.as_str(),
        }
    }

    /// Fields that place the text on a calendar day.
    pub const fn is_date(self) -> bool {
        matches!(
            self,
            DtField::Year
                | DtField::Year2
                | DtField::IsoYear
                | DtField::Month
                | DtField::MonthNp
                | DtField::Day
                | DtField::DayNp
                | DtField::DaySp
                | DtField::Ordinal
                | DtField::IsoWeek
                | DtField::IsoWeekday
                | DtField::MonthAbbr
                | DtField::MonthFull
        )
    }
}

/// A piece of a [`DateTimeTemplate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DtPart {
    Field(DtField),
    Literal(String),
}

/// Parse `pattern` into [`DtPart`]s. Unknown codes are kept as literal
/// text.
pub fn parse_pattern(pattern: &DateTimePattern_str) -> Vec<DtPart> {
    let mut parts: Vec<DtPart> = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        let mut code = String::new();
        match chars.next() {
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(flag @ ('-' | ':')) => {
                code.push(flag);
                if let Some(c_) = chars.next() {
                    code.push(c_);
                }
            }
            Some(c_) => code.push(c_),
            None => {
                literal.push('%');
                continue;
            }
        }
        match DtField::from_code(&code) {
            Some(field) => {
                if !literal.is_empty() {
                    parts.push(DtPart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(DtPart::Field(field));
            }
            None => {
                literal.push('%');
                literal.push_str(&code);
            }
        }
    }
    if !literal.is_empty() {
        parts.push(DtPart::Literal(literal));
    }

    parts
}

/// A family of formats, tried as a unit and in a fixed priority.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DtFamily {
    Rfc1123,
    Rfc2822,
    Rfc5322,
    Rfc1036,
    Rfc822,
    Rfc850,
    Rfc3339,
    Rfc7231,
    Iso8601,
    UserDateTime,
    UserDate,
    UserTime,
}

impl fmt::Display for DtFamily {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        let name = match self {
            DtFamily::Rfc1123 => "RFC 1123",
            DtFamily::Rfc2822 => "RFC 2822",
            DtFamily::Rfc5322 => "RFC 5322",
            DtFamily::Rfc1036 => "RFC 1036",
            DtFamily::Rfc822 => "RFC 822",
            DtFamily::Rfc850 => "RFC 850",
            DtFamily::Rfc3339 => "RFC 3339",
            DtFamily::Rfc7231 => "RFC 7231",
            DtFamily::Iso8601 => "ISO 8601",
            DtFamily::UserDateTime => "user datetime",
            DtFamily::UserDate => "user date",
            DtFamily::UserTime => "user time",
        };
        write!(f, "{}", name)
    }
}

/// All families in priority order.
pub const DT_FAMILIES_ALL: [DtFamily; 12] = [
    DtFamily::Rfc1123,
    DtFamily::Rfc2822,
    DtFamily::Rfc5322,
    DtFamily::Rfc1036,
    DtFamily::Rfc822,
    DtFamily::Rfc850,
    DtFamily::Rfc3339,
    DtFamily::Rfc7231,
    DtFamily::Iso8601,
    DtFamily::UserDateTime,
    DtFamily::UserDate,
    DtFamily::UserTime,
];

/// Families tried for text with an `AM`/`PM` marker.
pub const DT_FAMILIES_AMPM: [DtFamily; 3] = [
    DtFamily::UserDateTime,
    DtFamily::UserTime,
    DtFamily::UserDate,
];

/// Families tried for text starting with a 4-digit year.
pub const DT_FAMILIES_YEAR_FIRST: [DtFamily; 5] = [
    DtFamily::Rfc3339,
    DtFamily::Iso8601,
    DtFamily::UserDateTime,
    DtFamily::UserDate,
    DtFamily::UserTime,
];

pub const RFC1123_PATTERNS: [&DateTimePattern_str; 1] = ["%a, %d %b %Y %H:%M:%S GMT"];
pub const RFC2822_PATTERNS: [&DateTimePattern_str; 2] = [
    "%a, %d %b %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
];
pub const RFC5322_PATTERNS: [&DateTimePattern_str; 2] = ["%d %b %Y %H:%M:%S %z", "%d %b %Y %H:%M %z"];
pub const RFC1036_PATTERNS: [&DateTimePattern_str; 2] = [
    "%a, %d %b %Y %H:%M:%S %Z",
    "%d %b %Y %H:%M:%S %Z",
];
pub const RFC822_PATTERNS: [&DateTimePattern_str; 4] = [
    "%d %b %y %H:%M:%S %Z",
    "%a, %d %b %y %H:%M:%S %Z",
    "%d %b %y %H:%M %Z",
    "%a, %d %b %y %H:%M %Z",
];
pub const RFC850_PATTERNS: [&DateTimePattern_str; 1] = ["%A, %d-%b-%y %H:%M:%S %Z"];
pub const RFC3339_PATTERNS: [&DateTimePattern_str; 4] = [
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S.%f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S.%f%:z",
];
pub const RFC7231_PATTERNS: [&DateTimePattern_str; 1] = ["%a %b %e %H:%M:%S %Y"];

const ISO8601_DATES_EXTENDED: [&DateTimePattern_str; 3] = ["%Y-%m-%d", "%Y-%j", "%G-W%V-%u"];
const ISO8601_DATES_BASIC: [&DateTimePattern_str; 3] = ["%Y%m%d", "%Y%j", "%GW%V%u"];
const ISO8601_TIMES_EXTENDED: [&DateTimePattern_str; 3] = ["%H:%M:%S.%f", "%H:%M:%S", "%H:%M"];
const ISO8601_TIMES_BASIC: [&DateTimePattern_str; 3] = ["%H%M%S.%f", "%H%M%S", "%H%M"];
const ISO8601_ZONES: [&DateTimePattern_str; 2] = ["", "%z"];

const USER_DATES: [&DateTimePattern_str; 30] = [
    "%a, %b %-d, %Y",
    "%a %b %-d, %Y",
    "%a, %b %-d %Y",
    "%a %b %-d %Y",
    "%b %-d, %Y",
    "%b %-d %Y",
    "%a, %-d %b %Y",
    "%a %-d %b %Y",
    "%-d %b %Y",
    "%-d %b, %Y",
    "%-d-%b-%Y",
    "%-m/%-d/%Y",
    "%-m-%-d-%Y",
    "%-m/%-d/%y",
    "%-m-%-d-%y",
    "%-d/%-m/%Y",
    "%-d-%-m-%Y",
    "%-d.%-m.%Y",
    "%-d/%-m/%y",
    "%-d.%-m.%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%G-W%V-%u",
    "%GW%V%u",
    "%Y-%j",
    "%Y%j",
    "%b %-d",
    "%-d %b",
];
const USER_TIMES_EXTENDED: [&DateTimePattern_str; 11] = [
    "%-I %p",
    "%-I%p",
    "%-I:%M %p",
    "%-I:%M%p",
    "%-I:%M:%S %p",
    "%-I:%M:%S%p",
    "%-I:%M:%S.%f %p",
    "%-I:%M:%S.%f%p",
    "%-H:%M",
    "%-H:%M:%S",
    "%-H:%M:%S.%f",
];
const USER_TIMES_BASIC: [&DateTimePattern_str; 9] = [
    "%I%M%S.%f%p",
    "%I%M%S%p",
    "%I%M%p",
    "%I%M %p",
    "%I%M%S %p",
    "%I%M%S.%f %p",
    "%H%M%S.%f",
    "%H%M%S",
    "%H%M",
];
const USER_ZONES_SPACED: [&DateTimePattern_str; 3] = ["", " %z", " %Z"];
const USER_ZONES_JOINED: [&DateTimePattern_str; 3] = ["", "%z", "%Z"];
const USER_COMPACT_DATETIMES: [&DateTimePattern_str; 3] = ["%Y%m%d%H%M", "%Y%m%d%H%M%S", "%Y%m%d%H%M%S.%f"];
const USER_SYSLOG_DATETIMES: [&DateTimePattern_str; 4] = [
    "%b %e %H:%M:%S",
    "%b %e %H:%M:%S.%f",
    "%b %-d %H:%M:%S",
    "%b %-d %H:%M:%S.%f",
];

/// Every `(date, separator, time, zone)` combination as one pattern.
fn combine(
    dates: &[&DateTimePattern_str],
    separator: &str,
    times: &[&DateTimePattern_str],
    zones: &[&DateTimePattern_str],
) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();
    for date in dates.iter() {
        for time in times.iter() {
            for zone in zones.iter() {
                patterns.push(format!("{}{}{}{}", date, separator, time, zone));
            }
        }
    }

    patterns
}

/// The patterns of `family`, in the order they are tried.
pub fn family_patterns(family: DtFamily) -> Vec<String> {
    let owned = |patterns: &[&DateTimePattern_str]| -> Vec<String> {
        patterns.iter().map(|p| String::from(*p)).collect()
    };
    match family {
        DtFamily::Rfc1123 => owned(&RFC1123_PATTERNS),
        DtFamily::Rfc2822 => owned(&RFC2822_PATTERNS),
        DtFamily::Rfc5322 => owned(&RFC5322_PATTERNS),
        DtFamily::Rfc1036 => owned(&RFC1036_PATTERNS),
        DtFamily::Rfc822 => owned(&RFC822_PATTERNS),
        DtFamily::Rfc850 => owned(&RFC850_PATTERNS),
        DtFamily::Rfc3339 => owned(&RFC3339_PATTERNS),
        DtFamily::Rfc7231 => owned(&RFC7231_PATTERNS),
        DtFamily::Iso8601 => {
            let mut patterns = combine(&ISO8601_DATES_EXTENDED, "T", &ISO8601_TIMES_EXTENDED, &ISO8601_ZONES);
            patterns.extend(combine(&ISO8601_DATES_BASIC, "T", &ISO8601_TIMES_BASIC, &ISO8601_ZONES));
            patterns.extend(owned(&ISO8601_DATES_EXTENDED));
            patterns.extend(owned(&ISO8601_DATES_BASIC));
            patterns
        }
        DtFamily::UserDateTime => {
            let mut patterns = combine(&USER_DATES, " ", &USER_TIMES_EXTENDED, &USER_ZONES_SPACED);
            patterns.extend(combine(&USER_COMPACT_DATETIMES, "", &[""], &USER_ZONES_JOINED));
            patterns.extend(combine(&USER_COMPACT_DATETIMES, "", &[""], &USER_ZONES_SPACED[1..]));
            patterns.extend(combine(&["%a"], " ", &USER_TIMES_EXTENDED[..8], &USER_ZONES_SPACED));
            patterns.extend(owned(&USER_SYSLOG_DATETIMES));
            patterns
        }
        DtFamily::UserDate => owned(&USER_DATES),
        DtFamily::UserTime => {
            let mut patterns = combine(&[""], "", &USER_TIMES_EXTENDED, &USER_ZONES_SPACED);
            patterns.extend(combine(&[""], "", &USER_TIMES_BASIC, &USER_ZONES_JOINED));
            patterns
        }
    }
}

/// A parsed [`DateTimePattern_str`] with its compiled regex.
#[derive(Clone, Debug)]
pub struct DateTimeTemplate {
    pub family: DtFamily,
    pub pattern: String,
    pub parts: Vec<DtPart>,
    regex: Regex,
}

impl DateTimeTemplate {
    pub fn new(
        family: DtFamily,
        pattern: &DateTimePattern_str,
    ) -> Result<DateTimeTemplate, ::regex::Error> {
        let parts = parse_pattern(pattern);
        let mut regex_pattern = String::from("(?i)^");
        for part in parts.iter() {
            match part {
                DtPart::Field(field) => {
                    regex_pattern.push('(');
                    regex_pattern.push_str(field.pattern());
                    regex_pattern.push(')');
                }
                DtPart::Literal(literal) => regex_pattern.push_str(&::regex::escape(literal)),
            }
        }
        regex_pattern.push('$');
        let regex = Regex::new(&regex_pattern)?;

        Ok(DateTimeTemplate {
            family,
            pattern: String::from(pattern),
            parts,
            regex,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = DtField> + '_ {
        self.parts.iter().filter_map(|part| match part {
            DtPart::Field(field) => Some(*field),
            DtPart::Literal(_) => None,
        })
    }

    pub fn has_field(
        &self,
        field: DtField,
    ) -> bool {
        self.fields().any(|f| f == field)
    }

    /// Does the template place the text on a calendar day?
    pub fn has_date(&self) -> bool {
        self.fields().any(DtField::is_date)
    }

    /// Match `text` and validate the calendar fields. Returns the raw text of
    /// each field, in order, and the parsed instant.
    pub fn recognize(
        &self,
        text: &str,
    ) -> Option<(Vec<String>, NaiveDateTime)> {
        let caps = self.regex.captures(text)?;
        let raws: Vec<String> = caps
            .iter()
            .skip(1)
            .map(|m| m.map_or_else(String::new, |m| String::from(m.as_str())))
            .collect();
        let values = DtValues::collect(self.fields(), &raws)?;
        let instant = values.to_naive()?;

        Some((raws, instant))
    }
}

/// All templates of all families, in [`DT_FAMILIES_ALL`] order.
pub static DATETIME_TEMPLATES: Lazy<Vec<DateTimeTemplate>> = Lazy::new(|| {
    let mut templates: Vec<DateTimeTemplate> = Vec::new();
    for family in DT_FAMILIES_ALL.iter() {
        for pattern in family_patterns(*family).iter() {
            match DateTimeTemplate::new(*family, pattern) {
                Ok(template) => templates.push(template),
                Err(_err) => {
                    defo!("bad pattern {:?}: {}", pattern, _err);
                }
            }
        }
    }
    templates
});

lazy_static! {
    /// punctuation surrounding a datetime, e.g. `[2026-02-15]`
    static ref RE_DT_SURROUND: Regex = Regex::new(
        r"^(?P<prefix>[[:punct:]]*)(?P<core>[[:alnum:]](?:.*[[:alnum:]])?)(?P<suffix>[[:punct:]]*)$"
    ).unwrap();
    static ref RE_DT_AMPM: Regex = Regex::new(r"(?i)\d\s*[ap]m").unwrap();
    static ref RE_DT_YEAR_FIRST: Regex = Regex::new(r"^\d{4}").unwrap();
}

/// The families to try for `text`, in order.
///
/// An `AM`/`PM` marker or a leading 4-digit year route directly to the
/// families that can match them.
pub fn family_order(text: &str) -> &'static [DtFamily] {
    if RE_DT_AMPM.is_match(text) {
        &DT_FAMILIES_AMPM
    } else if RE_DT_YEAR_FIRST.is_match(text) {
        &DT_FAMILIES_YEAR_FIRST
    } else {
        &DT_FAMILIES_ALL
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// field values
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Index `0..12` of a month name, abbreviated or full, any case.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS_ABBR
        .iter()
        .position(|abbr| name.starts_with(abbr))
        .map(|at| at as u32)
}

/// Convert a 2-digit year; `69`-`99` are the 1900s.
pub const fn year_from_yy(yy: i32) -> i32 {
    if yy < 69 {
        2000 + yy
    } else {
        1900 + yy
    }
}

/// Values captured by one template match.
#[derive(Clone, Copy, Debug, Default)]
struct DtValues {
    year: Option<i32>,
    iso_year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    ordinal: Option<u32>,
    iso_week: Option<u32>,
    iso_weekday: Option<u32>,
    hour: Option<u32>,
    hour12: Option<u32>,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    nanos: Option<u32>,
}

impl DtValues {
    fn collect(
        fields: impl Iterator<Item = DtField>,
        raws: &[String],
    ) -> Option<DtValues> {
        let mut values = DtValues::default();
        for (field, raw) in fields.zip(raws.iter()) {
            let number = || raw.trim().parse::<u32>().ok();
            match field {
                DtField::Year => values.year = Some(raw.parse().ok()?),
                DtField::Year2 => values.year = Some(year_from_yy(raw.parse().ok()?)),
                DtField::IsoYear => values.iso_year = Some(raw.parse().ok()?),
                DtField::Month | DtField::MonthNp => values.month = Some(number()?),
                DtField::Day | DtField::DayNp | DtField::DaySp => values.day = Some(number()?),
                DtField::Ordinal => values.ordinal = Some(number()?),
                DtField::IsoWeek => values.iso_week = Some(number()?),
                DtField::IsoWeekday => values.iso_weekday = Some(number()?),
                DtField::Hour | DtField::HourNp => values.hour = Some(number()?),
                DtField::Hour12 | DtField::Hour12Np => values.hour12 = Some(number()?),
                DtField::Minute => values.minute = Some(number()?),
                DtField::Second => values.second = Some(number()?),
                DtField::Fraction => {
                    let mut digits: String = raw.chars().take(9).collect();
                    while digits.len() < 9 {
                        digits.push('0');
                    }
                    values.nanos = Some(digits.parse().ok()?);
                }
                DtField::AmPm => values.pm = Some(raw.eq_ignore_ascii_case("pm")),
                DtField::MonthAbbr | DtField::MonthFull => values.month = Some(month_from_name(raw)? + 1),
                DtField::WeekdayAbbr
                | DtField::WeekdayFull
                | DtField::Offset
                | DtField::OffsetColon
                | DtField::Zone => {}
            }
        }

        Some(values)
    }

    fn to_date(&self) -> Option<NaiveDate> {
        if let (Some(month), Some(day)) = (self.month, self.day) {
            return NaiveDate::from_ymd_opt(self.year.unwrap_or(YEAR_FALLBACKDUMMY), month, day);
        }
        if let Some(ordinal) = self.ordinal {
            return NaiveDate::from_yo_opt(self.year?, ordinal);
        }
        if let (Some(week), Some(weekday)) = (self.iso_week, self.iso_weekday) {
            let weekday = Weekday::try_from(u8::try_from(weekday.checked_sub(1)?).ok()?).ok()?;
            return NaiveDate::from_isoywd_opt(self.iso_year.or(self.year)?, week, weekday);
        }
        if self.year.is_some() || self.month.is_some() || self.day.is_some() {
            return None;
        }

        NaiveDate::from_ymd_opt(YEAR_FALLBACKDUMMY, 1, 1)
    }

    fn to_time(&self) -> Option<NaiveTime> {
        let hour: u32 = match self.hour12 {
            Some(hour12) => {
                if !(1..=12).contains(&hour12) {
                    return None;
                }
                hour12 % 12 + if self.pm.unwrap_or(false) { 12 } else { 0 }
            }
            None => self.hour.unwrap_or(0),
        };

        NaiveTime::from_hms_nano_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanos.unwrap_or(0),
        )
    }

    fn to_naive(&self) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::new(self.to_date()?, self.to_time()?))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// random fields
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A random day or month no larger than `base` and of the same digit
/// width.
pub fn random_day_or_month<R: Rng + ?Sized>(
    base: u32,
    rng: &mut R,
) -> u32 {
    match base {
        0 | 1 => base,
        2..=9 => rng.random_range(1..=base),
        10..=28 => rng.random_range(10..=base),
        _ => rng.random_range(10..=29),
    }
}

/// A random hour, minute or second no larger than `base` and of the same
/// digit width.
pub fn random_time_component<R: Rng + ?Sized>(
    base: u32,
    rng: &mut R,
) -> u32 {
    if base < 10 {
        rng.random_range(0..=base)
    } else {
        rng.random_range(10..=base)
    }
}

/// A random 12-hour clock hour no larger than `hour12`, of the same digit
/// width.
fn random_hour12<R: Rng + ?Sized>(
    hour12: u32,
    rng: &mut R,
) -> u32 {
    match hour12 {
        0 | 1 | 12 => hour12,
        2..=9 => rng.random_range(1..=hour12),
        _ => rng.random_range(10..=hour12),
    }
}

pub fn days_in_month(
    year: i32,
    month: u32,
) -> u32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
        .unwrap_or(28)
}

/// `word` in the letter case of `raw`: all upper, all lower, or
/// capitalized.
pub fn apply_case_style(
    raw: &str,
    word: &str,
) -> String {
    let letters: Vec<char> = raw.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if !letters.is_empty() && letters.iter().all(|c| c.is_ascii_uppercase()) {
        return word.to_uppercase();
    }
    if letters.iter().all(|c| c.is_ascii_lowercase()) {
        return word.to_lowercase();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTimeNode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A recognized datetime span.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateTimeNode {
    prefix: String,
    /// the text between `prefix` and `suffix`
    core: String,
    suffix: String,
    /// index into [`DATETIME_TEMPLATES`]
    template: usize,
    /// raw text of each template field, in order
    raws: Vec<String>,
    instant: NaiveDateTime,
}

/// Recognize a date, time or datetime in `text`.
///
/// Surrounding punctuation is split off and kept. Never fails loudly; a
/// miss is `None`.
pub fn parse_datetime(text: &str) -> Option<DateTimeNode> {
    defn!("({:?})", str_to_String_noraw(text));
    let caps = RE_DT_SURROUND.captures(text)?;
    let core = caps.name("core")?.as_str();
    let templates: &'static Vec<DateTimeTemplate> = &DATETIME_TEMPLATES;
    for family in family_order(core).iter() {
        for (index, template) in templates
            .iter()
            .enumerate()
            .filter(|(_, t)| t.family == *family)
        {
            if let Some((raws, instant)) = template.recognize(core) {
                defx!("{} {:?} {:?}", family, template.pattern, instant);
                return Some(DateTimeNode {
                    prefix: String::from(caps.name("prefix").map_or("", |m| m.as_str())),
                    core: String::from(core),
                    suffix: String::from(caps.name("suffix").map_or("", |m| m.as_str())),
                    template: index,
                    raws,
                    instant,
                });
            }
        }
    }
    defx!("no match");

    None
}

impl DateTimeNode {
    pub fn template(&self) -> &'static DateTimeTemplate {
        let templates: &'static Vec<DateTimeTemplate> = &DATETIME_TEMPLATES;
        &templates[self.template]
    }

    pub fn family(&self) -> DtFamily {
        self.template().family
    }

    pub fn pattern(&self) -> &'static str {
        self.template().pattern.as_str()
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    pub fn suffix(&self) -> &str {
        self.suffix.as_str()
    }

    /// The parsed instant. Dates missing from the text are
    /// `YEAR_FALLBACKDUMMY-01-01`; a missing year is [`YEAR_FALLBACKDUMMY`].
    pub const fn instant(&self) -> NaiveDateTime {
        self.instant
    }

    /// Raw text of each field, in template order.
    pub fn raw_fields(&self) -> impl Iterator<Item = (DtField, &str)> + '_ {
        self.template()
            .fields()
            .zip(self.raws.iter().map(String::as_str))
    }

    fn raw_of(
        &self,
        field: DtField,
    ) -> Option<&str> {
        self.raw_fields()
            .find(|(f, _)| *f == field)
            .map(|(_, raw)| raw)
    }

    /// The `chrono` format to re-read a rewritten value of this node's
    /// core: the template pattern with the zone abbreviation as literal
    /// text, since `chrono` cannot parse `%Z`. A fraction after `.` reads
    /// as `%.f`.
    pub fn output_format(&self) -> String {
        let mut out = String::new();
        let mut raws = self.raws.iter();
        for part in self.template().parts.iter() {
            match part {
                DtPart::Literal(literal) => out.push_str(&literal.replace('%', "%%")),
                DtPart::Field(field) => {
                    let raw = raws.next().map_or("", String::as_str);
                    match field {
                        DtField::Zone => out.push_str(&raw.replace('%', "%%")),
                        DtField::Fraction if out.ends_with('.') => {
                            out.pop();
                            out.push_str("%.f");
                        }
                        _ => out.push_str(field.code()),
                    }
                }
            }
        }

        out
    }

    /// Recognize `text` with this node's template only, returning the
    /// instant.
    pub fn reparse(
        &self,
        text: &str,
    ) -> Option<NaiveDateTime> {
        let core = text
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;

        self.template()
            .recognize(core)
            .map(|(_, instant)| instant)
    }

    /// Render `instant` in this node's layout.
    fn render(
        &self,
        instant: &NaiveDateTime,
        fraction: &str,
    ) -> String {
        let has_date = self.template().has_date();
        let mut out = String::with_capacity(self.core.len());
        let mut raws = self.raws.iter();
        let hour12 = match instant.hour() % 12 {
            0 => 12,
            h => h,
        };
        for part in self.template().parts.iter() {
            let field = match part {
                DtPart::Literal(literal) => {
                    out.push_str(literal);
                    continue;
                }
                DtPart::Field(field) => field,
            };
            let raw: &str = raws.next().map_or("", String::as_str);
            let width = raw.len();
            let rendered: String = match field {
                DtField::Year => format!("{:04}", instant.year()),
                DtField::Year2 => format!("{:02}", instant.year().rem_euclid(100)),
                DtField::IsoYear => format!("{:04}", instant.iso_week().year()),
                DtField::Month => format!("{:02}", instant.month()),
                DtField::MonthNp => format!("{:0width$}", instant.month(), width = width),
                DtField::Day => format!("{:02}", instant.day()),
                DtField::DayNp => format!("{:0width$}", instant.day(), width = width),
                // space padded as in RFC 7231 `asctime`, not zero padded
                DtField::DaySp => format!("{:>2}", instant.day()),
                DtField::Ordinal => format!("{:03}", instant.ordinal()),
                DtField::IsoWeek => format!("{:02}", instant.iso_week().week()),
                DtField::IsoWeekday => format!("{}", instant.weekday().number_from_monday()),
                DtField::Hour => format!("{:02}", instant.hour()),
                DtField::HourNp => format!("{:0width$}", instant.hour(), width = width),
                DtField::Hour12 => format!("{:02}", hour12),
                DtField::Hour12Np => format!("{:0width$}", hour12, width = width),
                DtField::Minute => format!("{:02}", instant.minute()),
                DtField::Second => format!("{:02}", instant.second()),
                DtField::Fraction => String::from(fraction),
                DtField::AmPm => apply_case_style(raw, if instant.hour() >= 12 { "pm" } else { "am" }),
                DtField::MonthAbbr | DtField::MonthFull => {
                    let at = instant.month0() as usize;
                    let name = if raw.len() > 3 { MONTHS_FULL[at] } else { MONTHS_ABBR[at] };
                    apply_case_style(raw, name)
                }
                DtField::WeekdayAbbr | DtField::WeekdayFull => {
                    if has_date {
                        let at = instant.weekday().num_days_from_monday() as usize;
                        let name = if raw.len() > 3 { WEEKDAYS_FULL[at] } else { WEEKDAYS_ABBR[at] };
                        apply_case_style(raw, name)
                    } else {
                        String::from(raw)
                    }
                }
                DtField::Offset | DtField::OffsetColon | DtField::Zone => String::from(raw),
            };
            out.push_str(&rendered);
        }

        out
    }

    /// Re-roll the fields present in the template, each no larger than the
    /// original.
    fn reroll<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> NaiveDateTime {
        let template = self.template();
        let original = self.instant;
        let year = original.year();
        let mut month = original.month();
        let mut day = original.day();
        if template.has_date() {
            month = random_day_or_month(month, rng);
            day = random_day_or_month(day, rng).min(days_in_month(year, month));
        }
        let mut hour = original.hour();
        if template.has_field(DtField::Hour12) || template.has_field(DtField::Hour12Np) {
            let pm = hour >= 12;
            let hour12 = random_hour12(match hour % 12 { 0 => 12, h => h }, rng);
            hour = hour12 % 12 + if pm { 12 } else { 0 };
        } else if template.has_field(DtField::Hour) || template.has_field(DtField::HourNp) {
            hour = random_time_component(hour, rng);
        }
        let mut minute = original.minute();
        if template.has_field(DtField::Minute) {
            minute = random_time_component(minute, rng);
        }
        let mut second = original.second();
        if template.has_field(DtField::Second) {
            second = random_time_component(second, rng);
        }
        debug_assert_le!(month, original.month(), "re-rolled month is later");

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_nano_opt(hour, minute, second, original.nanosecond()))
            .unwrap_or(original)
    }

    fn random_fraction<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> String {
        let width = self.raw_of(DtField::Fraction).map_or(0, str::len);

        (0..width)
            .map(|_| char::from(b'0' + rng.random_range(0..10_u8)))
            .collect()
    }

    fn wrap(
        &self,
        core: &str,
    ) -> String {
        format!("{}{}{}", self.prefix, core, self.suffix)
    }

    /// Render a random instant strictly earlier than the original, in the
    /// original layout and widths.
    ///
    /// Fields are re-rolled; if no re-roll is strictly earlier then the last
    /// re-roll is walked back a day at a time, up to [`EARLIER_WALK_CAP`]
    /// days. When that fails too the best candidate seen is returned.
    pub fn generate_new<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> String {
        defn!("{:?} {:?}", self.core, self.pattern());
        let fraction = self.random_fraction(rng);
        let width = char_len(&self.core);
        let fits = |rendered: &str| char_len(rendered) == width;
        let mut best: Option<String> = None;
        let mut candidate = self.instant;
        for _ in 0..REROLL_ATTEMPTS {
            candidate = self.reroll(rng);
            let rendered = self.render(&candidate, &fraction);
            if candidate < self.instant {
                if fits(&rendered) {
                    defx!("re-rolled {:?}", rendered);
                    return self.wrap(&rendered);
                }
                best.get_or_insert(rendered);
            }
        }
        if self.template().has_date() {
            let mut walk = candidate;
            for _ in 0..EARLIER_WALK_CAP {
                walk = match walk.checked_sub_days(Days::new(1)) {
                    Some(walk_) => walk_,
                    None => break,
                };
                let rendered = self.render(&walk, &fraction);
                if walk < self.instant {
                    if fits(&rendered) {
                        defx!("walked back {:?}", rendered);
                        return self.wrap(&rendered);
                    }
                    best.get_or_insert(rendered);
                }
            }
        }
        let rendered = best.unwrap_or_else(|| self.render(&candidate, &fraction));
        defx!("best effort {:?}", rendered);

        self.wrap(&rendered)
    }
}
