// src/form.rs
//
// Builds the save submission exactly the way the browser serializes the
// legacy week form. The endpoint parses the body by fixed field-name
// patterns and fixed slot cardinality (25 project rows x 7 days, plus a
// mirrored overtime block), not as an arbitrary key/value map: slots with
// no data must still be present as empty fields, and the whole payload
// must be byte-identical for identical logical input. Keys inside each
// block are emitted in lexicographically sorted order — the server
// tolerates any order, but determinism is mandatory.

use std::collections::BTreeMap;

use crate::core::net::urlencode;
use crate::error::{Error, Result};
use crate::params::{DAYS_PER_WEEK, PROJECT_SLOTS};
use crate::types::SaveEntry;

/// Placeholder activity id when an entry has none selected.
const NO_ACTIVITY: &str = "xx";

/// Literal value of the save trigger field.
const SAVE_TRIGGER: &str = " save ";

/// View-context tag; the rendered page carries this control twice, and the
/// server rejects submissions that only carry it once.
const CALLER: &str = "caller=this_week";

pub fn build_save_payload(week_start_date: &str, entries: &[SaveEntry]) -> Result<String> {
    if entries.len() > PROJECT_SLOTS {
        return Err(Error::TooManyEntries(entries.len()));
    }

    // BTreeMap gives the sorted key order the serialized form must carry,
    // independent of any map-iteration nondeterminism.
    let mut slots: BTreeMap<String, String> = BTreeMap::new();
    let mut daily_totals = [0f64; DAYS_PER_WEEK];

    for (idx, entry) in entries.iter().enumerate() {
        // An entry without a project consumes its slot index but
        // contributes no fields.
        if entry.project_id.is_empty() {
            continue;
        }

        slots.insert(format!("project{idx}"), entry.project_id.clone());

        let activity_id = if entry.activity_id.is_empty() {
            NO_ACTIVITY
        } else {
            entry.activity_id.as_str()
        };
        slots.insert(
            format!("activity{idx}"),
            format!("true${activity_id}${}$0", entry.project_id),
        );
        slots.insert(format!("actprogress{idx}"), entry.progress.to_string());

        for day_idx in 0..DAYS_PER_WEEK {
            let (hours, note, progress) = match entry.days.get(day_idx) {
                Some(day) => (day.hours.form_value(), day.note.clone(), day.progress),
                None => (s!(), s!(), 0),
            };
            if let Some(day) = entry.days.get(day_idx) {
                if let Some(h) = day.hours.numeric() {
                    daily_totals[day_idx] += h;
                }
            }
            slots.insert(format!("record{idx}_{day_idx}"), hours);
            slots.insert(format!("note{idx}_{day_idx}"), note);
            slots.insert(format!("progress{idx}_{day_idx}"), progress.to_string());
        }
    }

    // Remaining slots up to the fixed cardinality, all empty. Omitting
    // them makes the server misalign its positional parsing.
    for idx in entries.len()..PROJECT_SLOTS {
        slots.insert(format!("project{idx}"), s!());
        slots.insert(format!("activity{idx}"), s!());
        slots.insert(format!("actprogress{idx}"), s!());
        for day_idx in 0..DAYS_PER_WEEK {
            slots.insert(format!("record{idx}_{day_idx}"), s!());
            slots.insert(format!("note{idx}_{day_idx}"), s!());
            slots.insert(format!("progress{idx}_{day_idx}"), s!());
        }
    }

    let mut parts: Vec<String> = Vec::with_capacity(slots.len() + 64);

    // Leading control block
    parts.push(join!("save2=", &urlencode(SAVE_TRIGGER)));
    parts.push(s!(CALLER));
    parts.push(join!("cdate=", &urlencode(week_start_date)));

    for (key, value) in &slots {
        parts.push(format!("{key}={}", urlencode(value)));
    }

    // Per-day normal-hours totals; integral sums render without a
    // fractional part.
    for (day_idx, total) in daily_totals.iter().enumerate() {
        parts.push(format!("norTotal{day_idx}={}", urlencode(&format!("{total}"))));
    }

    // The form renders the caller control in two page areas; the server
    // rejects saves that omit the duplicate.
    parts.push(s!(CALLER));

    // Overtime block: structurally mirrored, every field empty or zero.
    // This tool never writes overtime, but the server requires the shape.
    let mut overtime: BTreeMap<String, String> = BTreeMap::new();
    for idx in 0..PROJECT_SLOTS {
        overtime.insert(format!("overactprogress{idx}"), s!("0"));
        for day_idx in 0..DAYS_PER_WEEK {
            overtime.insert(format!("overrecord{idx}_{day_idx}"), s!());
            overtime.insert(format!("overnote{idx}_{day_idx}"), s!());
            overtime.insert(format!("overprogress{idx}_{day_idx}"), s!("0"));
        }
    }
    for (key, value) in &overtime {
        parts.push(format!("{key}={}", urlencode(value)));
    }
    for day_idx in 0..DAYS_PER_WEEK {
        parts.push(format!("oveTotal{day_idx}=0"));
    }

    Ok(parts.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Hours, SaveDayEntry};

    fn entry(project: &str, activity: &str, hours: &[f64]) -> SaveEntry {
        SaveEntry {
            project_id: s!(project),
            activity_id: s!(activity),
            progress: 0,
            days: hours
                .iter()
                .map(|&h| SaveDayEntry { hours: Hours::Num(h), note: s!(), progress: 0 })
                .collect(),
        }
    }

    #[test]
    fn leading_control_block_and_trigger_encoding() {
        let payload = build_save_payload("2025-01-06", &[]).unwrap();
        assert!(payload.starts_with("save2=+save+&caller=this_week&cdate=2025-01-06&"));
    }

    #[test]
    fn activity_token_uses_placeholder_when_unselected() {
        let payload = build_save_payload("2025-01-06", &[entry("101", "", &[8.0])]).unwrap();
        assert!(payload.contains("activity0=true%24xx%24101%240"));
        let payload = build_save_payload("2025-01-06", &[entry("101", "42", &[8.0])]).unwrap();
        assert!(payload.contains("activity0=true%2442%24101%240"));
    }

    #[test]
    fn totals_render_without_fraction_when_integral() {
        let payload =
            build_save_payload("2025-01-06", &[entry("101", "42", &[8.0, 7.5])]).unwrap();
        assert!(payload.contains("norTotal0=8&"));
        assert!(payload.contains("norTotal1=7.5&"));
        assert!(payload.contains("norTotal2=0&"));
    }

    #[test]
    fn duplicate_caller_field_is_present() {
        let payload = build_save_payload("2025-01-06", &[]).unwrap();
        assert_eq!(payload.matches("caller=this_week").count(), 2);
    }

    #[test]
    fn rejects_more_entries_than_slots() {
        let entries: Vec<SaveEntry> = (0..26).map(|i| entry(&format!("{i}"), "", &[])).collect();
        assert!(matches!(
            build_save_payload("2025-01-06", &entries),
            Err(Error::TooManyEntries(26))
        ));
    }
}
