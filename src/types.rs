// src/types.rs
//
// Entities reconstructed from the legacy server's rendered output, plus the
// serializable session state. Project/Activity/WeekTimecard values are
// transient: rebuilt fresh on every fetch, never cached across calls.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A project as presented by the week page dropdown (or synthesized from
/// activity declarations when the dropdown yields nothing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub activities: Vec<Activity>,
}

/// An activity declared by an inline `act.append(...)` script call.
///
/// `id` is a local disambiguator (`{project_id}_{name}_{uid}`), not a
/// server-issued identifier. `indent_level` is the count of leading
/// whitespace characters in the raw label; `is_bottom` marks leaf
/// activities selectable for time entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub full_name: String,
    pub is_bottom: bool,
    pub uid: String,
    pub progress: String,
    pub indent_level: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectsAndActivities {
    pub date: String,
    pub projects: Vec<Project>,
}

/// A day-hours value as the legacy form actually carries it: a finite
/// non-negative number, an explicit blank, or a raw string the source
/// emitted that does not parse as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Hours {
    Num(f64),
    Blank,
    Raw(String),
}

impl Hours {
    /// Numeric value for totals; parsable raw strings count, blanks don't.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Hours::Num(n) => Some(*n),
            Hours::Blank => None,
            Hours::Raw(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// The value as submitted in a form field.
    pub fn form_value(&self) -> String {
        match self {
            Hours::Num(n) => format!("{n}"),
            Hours::Blank => s!(),
            Hours::Raw(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Hours::Blank)
    }
}

// JSON form: number | "" | string. Mirrors the wire shape of the legacy
// form fields and the `save --file` input.
impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Hours::Num(n) => serializer.serialize_f64(*n),
            Hours::Blank => serializer.serialize_str(""),
            Hours::Raw(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HoursVisitor;

        impl<'de> Visitor<'de> for HoursVisitor {
            type Value = Hours;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, an empty string, or a string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Hours, E> {
                Ok(Hours::Num(v))
            }
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Hours, E> {
                Ok(Hours::Num(v as f64))
            }
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Hours, E> {
                Ok(Hours::Num(v as f64))
            }
            fn visit_str<E: de::Error>(self, v: &str) -> Result<Hours, E> {
                if v.trim().is_empty() {
                    Ok(Hours::Blank)
                } else {
                    Ok(Hours::Raw(s!(v)))
                }
            }
            fn visit_none<E: de::Error>(self) -> Result<Hours, E> {
                Ok(Hours::Blank)
            }
            fn visit_unit<E: de::Error>(self) -> Result<Hours, E> {
                Ok(Hours::Blank)
            }
        }

        deserializer.deserialize_any(HoursVisitor)
    }
}

impl Default for Hours {
    fn default() -> Self {
        Hours::Blank
    }
}

/// One of the 7 ordered day slots (Monday-first) of a week row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub hours: Hours,
    pub note: String,
    pub progress: i32,
}

impl Default for DayEntry {
    fn default() -> Self {
        Self { hours: Hours::Blank, note: s!(), progress: 0 }
    }
}

/// One populated row of the week timecard grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekEntry {
    pub project_id: String,
    pub project_name: String,
    /// Opaque 4-part activity token exactly as the server rendered it.
    pub activity_data: String,
    pub progress: i32,
    pub days: Vec<DayEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekTimecard {
    pub week_start_date: String,
    pub entries: Vec<WeekEntry>,
    pub daily_totals: Vec<f64>,
    /// True when the totals came from the server's subtotal row; false
    /// means they are the best-effort sum accumulated during parsing.
    pub totals_authoritative: bool,
}

/// Session metadata persisted alongside the cookie jar. Created on a
/// successful login, read on every subsequent command, deleted on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub cookie_count: usize,
}

/// Serializable form of one transport cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

/// One row of a save request as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntry {
    pub project_id: String,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub days: Vec<SaveDayEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDayEntry {
    #[serde(default)]
    pub hours: Hours,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub progress: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_json_three_way() {
        let n: Hours = serde_json::from_str("8.5").unwrap();
        assert_eq!(n, Hours::Num(8.5));
        let b: Hours = serde_json::from_str("\"\"").unwrap();
        assert_eq!(b, Hours::Blank);
        let r: Hours = serde_json::from_str("\"n/a\"").unwrap();
        assert_eq!(r, Hours::Raw(s!("n/a")));
    }

    #[test]
    fn hours_form_value_renders_integral_without_fraction() {
        assert_eq!(Hours::Num(8.0).form_value(), "8");
        assert_eq!(Hours::Num(7.5).form_value(), "7.5");
        assert_eq!(Hours::Blank.form_value(), "");
        assert_eq!(Hours::Raw(s!("n/a")).form_value(), "n/a");
    }

    #[test]
    fn raw_hours_count_toward_totals_only_when_parsable() {
        assert_eq!(Hours::Raw(s!("4.5")).numeric(), Some(4.5));
        assert_eq!(Hours::Raw(s!("n/a")).numeric(), None);
        assert_eq!(Hours::Blank.numeric(), None);
    }
}
