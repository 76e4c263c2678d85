// tests/week_parser.rs
//
// Week-grid recovery from rendered timecard tables.

use tcrs::extract::week::parse_week_timecard;
use tcrs::types::Hours;

const WEEK: &str = "2025-01-06";

fn day_inputs(row: usize, hours: &[&str]) -> String {
    let mut out = String::new();
    for (d, h) in hours.iter().enumerate() {
        out.push_str(&format!(
            r#"<td><input name="record{row}_{d}" value="{h}">
                <input name="note{row}_{d}" value="">
                <input name="progress{row}_{d}" value="0"></td>"#
        ));
    }
    out
}

fn fixture(extra_rows: &str, subtotal: &str) -> String {
    format!(
        r#"<html><body><table class="timecard_table">
        <tr><th>Project</th><th>Activity</th></tr>
        <tr>
          <td><select name="project0">
            <option value="--">--</option>
            <option value="101" selected>Alpha</option>
          </select></td>
          <td><select name="activity0">
            <option value="true$5$101$0" selected>Design</option>
          </select></td>
          <td><input name="actprogress0" value="20"></td>
          {days}
        </tr>
        {extra_rows}
        {subtotal}
        </table></body></html>"#,
        days = day_inputs(0, &["8", "8", "8", "8", "8", "", ""]),
    )
}

#[test]
fn populated_row_is_recovered() {
    let tc = parse_week_timecard(&fixture("", ""), WEEK);

    assert_eq!(tc.week_start_date, WEEK);
    assert_eq!(tc.entries.len(), 1);

    let entry = &tc.entries[0];
    assert_eq!(entry.project_id, "101");
    assert_eq!(entry.project_name, "Alpha");
    assert_eq!(entry.activity_data, "true$5$101$0");
    assert_eq!(entry.progress, 20);
    assert_eq!(entry.days.len(), 7);
    assert_eq!(entry.days[0].hours, Hours::Num(8.0));
    assert_eq!(entry.days[5].hours, Hours::Blank);
}

#[test]
fn computed_totals_when_no_subtotal_row() {
    let tc = parse_week_timecard(&fixture("", ""), WEEK);
    assert_eq!(tc.daily_totals, vec![8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0]);
    assert!(!tc.totals_authoritative);
}

#[test]
fn subtotal_row_overrides_computed_totals() {
    // Server says Friday was 9 hours even though the row reads 8; the
    // authoritative value wins.
    let subtotal = r#"<tr class="subtotal">
        <td>Total</td><td>8</td><td>8</td><td>8</td><td>8</td><td>9</td><td>0</td><td>0</td>
    </tr>"#;
    let tc = parse_week_timecard(&fixture("", subtotal), WEEK);
    assert_eq!(tc.daily_totals, vec![8.0, 8.0, 8.0, 8.0, 9.0, 0.0, 0.0]);
    assert!(tc.totals_authoritative);
}

#[test]
fn rows_without_selected_project_are_excluded() {
    let empty_row = r#"<tr>
        <td><select name="project1">
          <option value="--" selected>--</option>
        </select></td>
    </tr>"#;
    let tc = parse_week_timecard(&fixture(empty_row, ""), WEEK);
    assert_eq!(tc.entries.len(), 1);
}

#[test]
fn unparsable_hours_are_preserved_verbatim() {
    let odd_row = format!(
        r#"<tr>
          <td><select name="project3">
            <option value="202" selected>Beta</option>
          </select></td>
          {days}
        </tr>"#,
        days = day_inputs(3, &["x8x", "", "", "", "", "", ""]),
    );
    let tc = parse_week_timecard(&fixture(&odd_row, ""), WEEK);

    let beta = tc.entries.iter().find(|e| e.project_id == "202").unwrap();
    assert_eq!(beta.days[0].hours, Hours::Raw("x8x".into()));
    // Unparsable hours never feed the totals
    assert_eq!(tc.daily_totals[0], 8.0);
}

#[test]
fn notes_and_day_progress_are_read() {
    let row = r#"<tr>
        <td><select name="project2">
          <option value="150" selected>Gamma</option>
        </select></td>
        <td><input name="record2_0" value="4.5">
            <input name="note2_0" value="code review">
            <input name="progress2_0" value="35"></td>
    </tr>"#;
    let tc = parse_week_timecard(&fixture(row, ""), WEEK);

    let gamma = tc.entries.iter().find(|e| e.project_id == "150").unwrap();
    assert_eq!(gamma.days[0].hours, Hours::Num(4.5));
    assert_eq!(gamma.days[0].note, "code review");
    assert_eq!(gamma.days[0].progress, 35);
}

#[test]
fn document_without_timecard_table_yields_empty_result() {
    let tc = parse_week_timecard("<html><body><p>login</p></body></html>", WEEK);
    assert!(tc.entries.is_empty());
    assert_eq!(tc.daily_totals, vec![0.0; 7]);
    assert!(!tc.totals_authoritative);
}
