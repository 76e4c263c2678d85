// src/extract/week.rs
//
// Recovers the populated week grid from the rendered timecard table. Each
// data row carries a `project{N}` selector whose name encodes the row
// index; day fields are keyed `{rowIndex}_{dayIndex}`, Monday-first.
// Per-day totals are accumulated as a fallback while rows are read, then
// overwritten by the server's own subtotal row when one is present.

use crate::core::html::{
    attr_ci, inner_after_open_tag, next_tag_block_ci, open_tag, open_tags_ci, strip_tags, to_lower,
};
use crate::params::DAYS_PER_WEEK;
use crate::types::{DayEntry, Hours, WeekEntry, WeekTimecard};

const NO_SELECTION: &str = "--";

pub fn parse_week_timecard(markup: &str, week_start_date: &str) -> WeekTimecard {
    let mut result = WeekTimecard {
        week_start_date: s!(week_start_date),
        entries: Vec::new(),
        daily_totals: vec![0.0; DAYS_PER_WEEK],
        totals_authoritative: false,
    };

    let Some(table) = find_timecard_table(markup) else {
        return result;
    };

    let mut pos = 0usize;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(table, "<tr", "</tr>", pos) {
        let row = &table[tr_s..tr_e];
        pos = tr_e;

        if let Some(entry) = parse_row(row, &mut result.daily_totals) {
            result.entries.push(entry);
        }
    }

    // An authoritative subtotal row wins over the accumulated fallback.
    if let Some(totals) = parse_subtotal_row(markup) {
        for (day, total) in totals.into_iter().enumerate() {
            if let Some(t) = total {
                result.daily_totals[day] = t;
            }
        }
        result.totals_authoritative = true;
    }

    result
}

/// Inner HTML of the `<table class="timecard_table">` block.
fn find_timecard_table(markup: &str) -> Option<&str> {
    let mut pos = 0usize;
    while let Some((t_s, t_e)) = next_tag_block_ci(markup, "<table", "</table>", pos) {
        let block = &markup[t_s..t_e];
        let tag = open_tag(block);
        if to_lower(tag).contains("timecard_table") {
            let inner_start = t_s + tag.len();
            let inner_end = t_e - "</table>".len();
            return Some(&markup[inner_start..inner_end]);
        }
        pos = t_e;
    }
    None
}

/// One data row. Returns None for header/filler rows and rows with no
/// selected project (or the "no selection" sentinel) — those are excluded
/// entirely, not emitted as empty entries.
fn parse_row(row: &str, daily_totals: &mut [f64]) -> Option<WeekEntry> {
    let (row_idx, project_select) = find_project_select(row)?;

    let (project_id, project_name) = selected_option(project_select)?;
    if project_id.is_empty() || project_id == NO_SELECTION {
        return None;
    }

    let activity_data = find_select(row, &format!("activity{row_idx}"))
        .and_then(selected_option)
        .map(|(value, _)| value)
        .unwrap_or_default();

    let progress = input_value(row, &format!("actprogress{row_idx}"))
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(0);

    let mut days = Vec::with_capacity(DAYS_PER_WEEK);
    for day_idx in 0..DAYS_PER_WEEK {
        let mut day = DayEntry::default();

        if let Some(raw) = input_value(row, &format!("record{row_idx}_{day_idx}")) {
            if !raw.trim().is_empty() {
                match raw.trim().parse::<f64>() {
                    Ok(hours) => {
                        daily_totals[day_idx] += hours;
                        day.hours = Hours::Num(hours);
                    }
                    // Non-numeric source value: keep it verbatim
                    Err(_) => day.hours = Hours::Raw(raw.clone()),
                }
            }
        }
        if let Some(note) = input_value(row, &format!("note{row_idx}_{day_idx}")) {
            day.note = note;
        }
        if let Some(p) = input_value(row, &format!("progress{row_idx}_{day_idx}")) {
            day.progress = p.trim().parse::<i32>().unwrap_or(0);
        }

        days.push(day);
    }

    Some(WeekEntry { project_id, project_name, activity_data, progress, days })
}

/// First select in the row whose name is `project{N}`; N is the row index.
fn find_project_select(row: &str) -> Option<(usize, &str)> {
    let mut pos = 0usize;
    while let Some((s_s, s_e)) = next_tag_block_ci(row, "<select", "</select>", pos) {
        let block = &row[s_s..s_e];
        pos = s_e;
        let Some(name) = attr_ci(open_tag(block), "name") else {
            continue;
        };
        if let Some(idx_str) = name.strip_prefix("project") {
            if let Ok(idx) = idx_str.parse::<usize>() {
                return Some((idx, block));
            }
        }
    }
    None
}

fn find_select<'a>(row: &'a str, name: &str) -> Option<&'a str> {
    let mut pos = 0usize;
    while let Some((s_s, s_e)) = next_tag_block_ci(row, "<select", "</select>", pos) {
        let block = &row[s_s..s_e];
        pos = s_e;
        if attr_ci(open_tag(block), "name").as_deref() == Some(name) {
            return Some(block);
        }
    }
    None
}

/// Value and text of the option marked `selected` within a select block.
fn selected_option(select_block: &str) -> Option<(String, String)> {
    let mut pos = 0usize;
    while let Some((o_s, o_e)) = next_tag_block_ci(select_block, "<option", "</option>", pos) {
        let block = &select_block[o_s..o_e];
        pos = o_e;
        let tag = open_tag(block);
        if !to_lower(tag).contains("selected") {
            continue;
        }
        let value = attr_ci(tag, "value").unwrap_or_default();
        let label = strip_tags(&inner_after_open_tag(block));
        return Some((value, label));
    }
    None
}

/// Value attribute of the `<input name="...">` with the given name.
fn input_value(row: &str, name: &str) -> Option<String> {
    for tag in open_tags_ci(row, "<input") {
        if attr_ci(tag, "name").as_deref() == Some(name) {
            return Some(attr_ci(tag, "value").unwrap_or_default());
        }
    }
    None
}

/// Per-day values from the `subtotal` row, if the document has one.
/// The first cell is a label and is skipped.
fn parse_subtotal_row(markup: &str) -> Option<Vec<Option<f64>>> {
    let mut pos = 0usize;
    while let Some((tr_s, tr_e)) = next_tag_block_ci(markup, "<tr", "</tr>", pos) {
        let row = &markup[tr_s..tr_e];
        pos = tr_e;

        let class = attr_ci(open_tag(row), "class").unwrap_or_default();
        if !to_lower(&class).contains("subtotal") {
            continue;
        }

        let mut totals = vec![None; DAYS_PER_WEEK];
        let mut td_pos = 0usize;
        let mut cell = 0usize;
        while let Some((td_s, td_e)) = next_tag_block_ci(row, "<td", "</td>", td_pos) {
            let inner = strip_tags(&inner_after_open_tag(&row[td_s..td_e]));
            td_pos = td_e;
            if cell > 0 && cell - 1 < DAYS_PER_WEEK {
                totals[cell - 1] = inner.trim().parse::<f64>().ok();
            }
            cell += 1;
        }
        return Some(totals);
    }
    None
}
