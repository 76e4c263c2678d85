// benches/extract.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tcrs::extract::{projects, week};

fn synth_projects_page(project_count: usize, activities_per: usize) -> String {
    let mut doc = String::from("<html><body><select name=\"project0\">\n");
    for p in 0..project_count {
        doc.push_str(&format!(
            "<option value=\"{}\">Project Number {p}</option>\n",
            100 + p
        ));
    }
    doc.push_str("</select>\n<script>\n");
    for p in 0..project_count {
        for a in 0..activities_per {
            doc.push_str(&format!(
                "act.append('{}','  {a}. Task {a} <<{p}.{a}>>','true','u{p}_{a}','0');\n",
                100 + p
            ));
        }
    }
    doc.push_str("</script></body></html>");
    doc
}

fn synth_week_page(rows: usize) -> String {
    let mut doc = String::from("<html><body><table class=\"timecard_table\">\n");
    for r in 0..rows {
        doc.push_str(&format!(
            "<tr><td><select name=\"project{r}\"><option value=\"{}\" selected>Project {r}</option></select></td>",
            100 + r
        ));
        doc.push_str(&format!(
            "<td><select name=\"activity{r}\"><option value=\"true${r}${}$0\" selected>Task</option></select></td>",
            100 + r
        ));
        doc.push_str(&format!("<td><input name=\"actprogress{r}\" value=\"50\"></td>"));
        for d in 0..7 {
            doc.push_str(&format!(
                "<td><input name=\"record{r}_{d}\" value=\"8\"><input name=\"note{r}_{d}\" value=\"n\"><input name=\"progress{r}_{d}\" value=\"10\"></td>"
            ));
        }
        doc.push_str("</tr>\n");
    }
    doc.push_str("<tr class=\"subtotal\"><td>Total</td><td>8</td><td>8</td><td>8</td><td>8</td><td>8</td><td>0</td><td>0</td></tr>\n");
    doc.push_str("</table></body></html>");
    doc
}

fn bench_extract(c: &mut Criterion) {
    let projects_doc = synth_projects_page(40, 12);
    let week_doc = synth_week_page(25);

    c.bench_function("projects_and_activities", |b| {
        b.iter(|| {
            let out = projects::parse_projects_and_activities(black_box(&projects_doc), "2025-01-06");
            black_box(out.projects.len())
        })
    });

    c.bench_function("week_timecard", |b| {
        b.iter(|| {
            let out = week::parse_week_timecard(black_box(&week_doc), "2025-01-06");
            black_box(out.entries.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
