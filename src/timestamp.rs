//! ISO 8601 UTC timestamps.
//!
//! Every envelope carries a [`Timestamp`] rendered as
//! `YYYY-MM-DDTHH:mm:ss.SSSZ`. Parsing is strict: only the `Z` suffix is
//! accepted, numeric offsets are rejected.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Locale, SecondsFormat, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

static ISO_UTC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d{3})?Z$")
        .expect("timestamp pattern is valid")
});

/// Default pattern for [`format_date`].
pub const DEFAULT_DATE_PATTERN: &str = "%B %-d, %Y at %I:%M:%S %p UTC";

/// Rejected timestamp string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid ISO 8601 timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// A UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current instant, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap an instant, dropping anything below a millisecond.
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(3))
    }

    /// Parse a strict `...Z` timestamp. Returns `None` for offset forms,
    /// malformed strings and impossible calendar dates, including second 60.
    pub fn parse(s: &str) -> Option<Self> {
        if !ISO_UTC.is_match(s) {
            return None;
        }
        let parsed = DateTime::parse_from_rfc3339(s).ok()?;
        // chrono keeps `:60` as a leap second with nanos past one second
        if parsed.timestamp_subsec_nanos() >= 1_000_000_000 {
            return None;
        }
        Some(Self::from_datetime(parsed.with_timezone(&Utc)))
    }

    /// The underlying instant.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TimestampError(s.to_string()))
    }
}

impl TryFrom<&str> for Timestamp {
    type Error = TimestampError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::from_datetime(instant)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether `s` is a strict ISO 8601 UTC timestamp.
pub fn is_valid(s: &str) -> bool {
    Timestamp::parse(s).is_some()
}

/// Render an instant as a human-readable string in the given locale.
///
/// `pattern` uses chrono's strftime syntax; month and weekday names follow
/// `locale`. Falls back to [`DEFAULT_DATE_PATTERN`].
pub fn format_date(instant: DateTime<Utc>, locale: Locale, pattern: Option<&str>) -> String {
    instant
        .format_localized(pattern.unwrap_or(DEFAULT_DATE_PATTERN), locale)
        .to_string()
}

/// Units used by [`relative_time`], largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    const ALL: [TimeUnit; 6] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
    ];

    /// Length of the unit in seconds.
    pub const fn seconds(self) -> i64 {
        match self {
            TimeUnit::Year => 31_536_000,
            TimeUnit::Month => 2_592_000,
            TimeUnit::Day => 86_400,
            TimeUnit::Hour => 3_600,
            TimeUnit::Minute => 60,
            TimeUnit::Second => 1,
        }
    }
}

/// Pick the largest unit with a non-zero truncated quotient.
///
/// A zero delta yields `(0, Second)`.
pub fn relative_parts(delta_secs: i64) -> (i64, TimeUnit) {
    TimeUnit::ALL
        .iter()
        .map(|&unit| (delta_secs / unit.seconds(), unit))
        .find(|&(value, _)| value != 0)
        .unwrap_or((0, TimeUnit::Second))
}

/// Relative phrase for `target` as seen from `now` in `locale`, e.g.
/// "in 3 days", "il y a 2 heures", "morgen" or "now".
///
/// English, French, German and Spanish phrasing is built in; other locales
/// fall back to English.
pub fn relative_time(target: DateTime<Utc>, now: DateTime<Utc>, locale: Locale) -> String {
    let delta_ms = (target - now).num_milliseconds();
    // round half up, like the millisecond clocks this output is compared to
    let delta_secs = (delta_ms as f64 / 1000.0 + 0.5).floor() as i64;
    let (value, unit) = relative_parts(delta_secs);
    Language::of(locale).phrase(value, unit)
}

/// [`relative_time`] against the current clock.
pub fn relative_time_from_now(target: DateTime<Utc>, locale: Locale) -> String {
    relative_time(target, Utc::now(), locale)
}

/// Languages with relative-time phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    English,
    French,
    German,
    Spanish,
}

impl Language {
    fn of(locale: Locale) -> Self {
        // chrono locales are named `<language>_<territory>`
        let name = format!("{locale:?}");
        match name.split('_').next().unwrap_or_default() {
            "fr" => Language::French,
            "de" => Language::German,
            "es" => Language::Spanish,
            _ => Language::English,
        }
    }

    fn phrase(self, value: i64, unit: TimeUnit) -> String {
        if let Some(word) = self.idiom(value, unit) {
            return word.to_string();
        }
        let count = value.unsigned_abs();
        let name = self.unit_name(unit, count);
        match (self, value > 0) {
            (Language::English, true) => format!("in {count} {name}"),
            (Language::English, false) => format!("{count} {name} ago"),
            (Language::French, true) => format!("dans {count} {name}"),
            (Language::French, false) => format!("il y a {count} {name}"),
            (Language::German, true) => format!("in {count} {name}"),
            (Language::German, false) => format!("vor {count} {name}"),
            (Language::Spanish, true) => format!("dentro de {count} {name}"),
            (Language::Spanish, false) => format!("hace {count} {name}"),
        }
    }

    /// Single-word forms for zero and for one day, month or year.
    fn idiom(self, value: i64, unit: TimeUnit) -> Option<&'static str> {
        use Language::*;
        use TimeUnit::*;

        let word = match (self, value, unit) {
            (English, 0, _) => "now",
            (English, 1, Year) => "next year",
            (English, -1, Year) => "last year",
            (English, 1, Month) => "next month",
            (English, -1, Month) => "last month",
            (English, 1, Day) => "tomorrow",
            (English, -1, Day) => "yesterday",
            (French, 0, _) => "maintenant",
            (French, 1, Year) => "l’année prochaine",
            (French, -1, Year) => "l’année dernière",
            (French, 1, Month) => "le mois prochain",
            (French, -1, Month) => "le mois dernier",
            (French, 1, Day) => "demain",
            (French, -1, Day) => "hier",
            (German, 0, _) => "jetzt",
            (German, 1, Year) => "nächstes Jahr",
            (German, -1, Year) => "letztes Jahr",
            (German, 1, Month) => "nächsten Monat",
            (German, -1, Month) => "letzten Monat",
            (German, 1, Day) => "morgen",
            (German, -1, Day) => "gestern",
            (Spanish, 0, _) => "ahora",
            (Spanish, 1, Year) => "el próximo año",
            (Spanish, -1, Year) => "el año pasado",
            (Spanish, 1, Month) => "el próximo mes",
            (Spanish, -1, Month) => "el mes pasado",
            (Spanish, 1, Day) => "mañana",
            (Spanish, -1, Day) => "ayer",
            _ => return None,
        };
        Some(word)
    }

    fn unit_name(self, unit: TimeUnit, count: u64) -> &'static str {
        use Language::*;
        use TimeUnit::*;

        let one = count == 1;
        match (self, unit) {
            (English, Year) => if one { "year" } else { "years" },
            (English, Month) => if one { "month" } else { "months" },
            (English, Day) => if one { "day" } else { "days" },
            (English, Hour) => if one { "hour" } else { "hours" },
            (English, Minute) => if one { "minute" } else { "minutes" },
            (English, Second) => if one { "second" } else { "seconds" },
            (French, Year) => if one { "an" } else { "ans" },
            (French, Month) => "mois",
            (French, Day) => if one { "jour" } else { "jours" },
            (French, Hour) => if one { "heure" } else { "heures" },
            (French, Minute) => if one { "minute" } else { "minutes" },
            (French, Second) => if one { "seconde" } else { "secondes" },
            // German takes the dative plural after both "in" and "vor"
            (German, Year) => if one { "Jahr" } else { "Jahren" },
            (German, Month) => if one { "Monat" } else { "Monaten" },
            (German, Day) => if one { "Tag" } else { "Tagen" },
            (German, Hour) => if one { "Stunde" } else { "Stunden" },
            (German, Minute) => if one { "Minute" } else { "Minuten" },
            (German, Second) => if one { "Sekunde" } else { "Sekunden" },
            (Spanish, Year) => if one { "año" } else { "años" },
            (Spanish, Month) => if one { "mes" } else { "meses" },
            (Spanish, Day) => if one { "día" } else { "días" },
            (Spanish, Hour) => if one { "hora" } else { "horas" },
            (Spanish, Minute) => if one { "minuto" } else { "minutos" },
            (Spanish, Second) => if one { "segundo" } else { "segundos" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn now_matches_strict_pattern() {
        let rendered = Timestamp::now().to_string();
        assert!(ISO_UTC.is_match(&rendered), "{rendered}");
        assert!(rendered.ends_with('Z'));
        assert_eq!(rendered.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn parse_accepts_with_and_without_millis() {
        let whole = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(whole.as_datetime(), at(2024, 1, 1, 0, 0, 0));

        let millis = Timestamp::parse("2024-01-01T00:00:00.250Z").unwrap();
        assert_eq!(
            millis.as_datetime(),
            at(2024, 1, 1, 0, 0, 0) + Duration::milliseconds(250)
        );
    }

    #[test]
    fn parse_rejects_offsets_and_garbage() {
        assert!(Timestamp::parse("2024-01-01T00:00:00+02:00").is_none());
        assert!(Timestamp::parse("not-a-date").is_none());
        assert!(Timestamp::parse("2024-01-01").is_none());
        assert!(Timestamp::parse("2024-01-01T00:00:00.12Z").is_none());
        assert!(Timestamp::parse("2024-13-01T00:00:00Z").is_none());
        assert!(Timestamp::parse("2023-02-29T00:00:00Z").is_none());
        assert!(Timestamp::parse("2024-01-01T12:34:60Z").is_none());
        assert!(Timestamp::parse("2024-06-01T12:00:60.500Z").is_none());
        assert!(Timestamp::parse("2016-12-31T23:59:60Z").is_none());
        assert!(!is_valid("2024-01-01T12:34:60Z"));
        assert!(!is_valid("2024-01-01T00:00:00+02:00"));
        assert!(is_valid("2024-02-29T23:59:59.999Z"));
    }

    #[test]
    fn format_then_parse_is_identity_to_the_millisecond() {
        let instant = at(2031, 7, 4, 13, 5, 9) + Duration::nanoseconds(123_456_789);
        let ts = Timestamp::from_datetime(instant);
        assert_eq!(ts.to_string(), "2031-07-04T13:05:09.123Z");
        assert_eq!(Timestamp::parse(&ts.to_string()), Some(ts));

        let now = Timestamp::now();
        assert_eq!(Timestamp::parse(&now.to_string()), Some(now));
    }

    #[test]
    fn strict_conversion_reports_the_input() {
        let err = Timestamp::try_from("yesterday").unwrap_err();
        assert_eq!(err, TimestampError("yesterday".to_string()));
        assert!("2024-01-01T00:00:00.000Z".parse::<Timestamp>().is_ok());
    }

    #[test]
    fn serde_uses_the_string_form() {
        let ts = Timestamp::parse("2024-05-06T07:08:09.010Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-05-06T07:08:09.010Z\"");
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
        assert!(serde_json::from_str::<Timestamp>("\"2024-05-06T07:08:09+01:00\"").is_err());
    }

    #[test]
    fn format_date_uses_locale_names() {
        let instant = at(2024, 1, 1, 0, 0, 0);
        assert_eq!(
            format_date(instant, Locale::en_US, None),
            "January 1, 2024 at 12:00:00 AM UTC"
        );
        assert_eq!(format_date(instant, Locale::fr_FR, Some("%B")), "janvier");
    }

    #[test]
    fn relative_parts_picks_first_non_zero_unit() {
        assert_eq!(relative_parts(90_000), (1, TimeUnit::Day));
        assert_eq!(relative_parts(-7_200), (-2, TimeUnit::Hour));
        assert_eq!(relative_parts(59), (59, TimeUnit::Second));
        assert_eq!(relative_parts(31_536_000 * 3), (3, TimeUnit::Year));
        assert_eq!(relative_parts(0), (0, TimeUnit::Second));
    }

    #[test]
    fn relative_time_phrases() {
        let now = at(2024, 6, 1, 12, 0, 0);
        let en = Locale::en_US;
        assert_eq!(relative_time(now, now, en), "now");
        assert_eq!(relative_time(now + Duration::seconds(90_000), now, en), "tomorrow");
        assert_eq!(relative_time(now - Duration::seconds(86_400), now, en), "yesterday");
        assert_eq!(relative_time(now + Duration::days(3), now, en), "in 3 days");
        assert_eq!(relative_time(now - Duration::hours(2), now, en), "2 hours ago");
        assert_eq!(relative_time(now + Duration::minutes(1), now, en), "in 1 minute");
        assert_eq!(relative_time(now - Duration::days(400), now, en), "last year");
        assert_eq!(relative_time(now + Duration::milliseconds(400), now, en), "now");
    }

    #[test]
    fn relative_time_follows_locale() {
        let now = at(2024, 6, 1, 12, 0, 0);
        assert_eq!(relative_time(now, now, Locale::fr_FR), "maintenant");
        assert_eq!(relative_time(now + Duration::seconds(90_000), now, Locale::fr_FR), "demain");
        assert_eq!(relative_time(now - Duration::hours(2), now, Locale::fr_FR), "il y a 2 heures");
        assert_eq!(relative_time(now + Duration::days(3), now, Locale::de_DE), "in 3 Tagen");
        assert_eq!(relative_time(now - Duration::minutes(1), now, Locale::de_DE), "vor 1 Minute");
        assert_eq!(relative_time(now - Duration::days(1), now, Locale::es_ES), "ayer");
        assert_eq!(relative_time(now + Duration::hours(5), now, Locale::es_ES), "dentro de 5 horas");
        // no built-in phrasing: English
        assert_eq!(relative_time(now - Duration::hours(2), now, Locale::ja_JP), "2 hours ago");
    }
}
