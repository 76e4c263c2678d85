// src/extract/projects.rs
//
// Recovers the two-level Project -> Activity hierarchy from a week page.
// Two independent sources feed the result:
//   1. the project dropdown (`<option value="NNN">Label</option>`)
//   2. inline script declarations
//      `act.append('pid','label','isBottom','uid','progress')`
// When the dropdown yields nothing, projects are synthesized from the
// activity declarations so that every activity always resolves to a
// project in the result set.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::sanitize::{clean_activity_name, indent_level, project_name_from_activity};
use crate::types::{Activity, Project, ProjectsAndActivities};

// Plain dropdown option
static OPTION_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<option value="(\d+)">([^<]+)</option>"#).unwrap());

// Option with extra attributes before or after value
static OPTION_ATTRS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<option[^>]*\svalue="(\d+)"[^>]*>([^<]+)</option>"#).unwrap());

// Fixed 5-argument activity declaration; anything with fewer quoted
// arguments simply fails to match and is dropped.
static ACT_APPEND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"act\.append\('(\d+)',\s*'([^']+)',\s*'([^']+)',\s*'([^']+)',\s*'([^']+)'\)")
        .unwrap()
});

/// Sentinel "no selection" option value.
const NO_SELECTION: &str = "--";

pub fn parse_projects_and_activities(markup: &str, date: &str) -> ProjectsAndActivities {
    let mut projects: Vec<Project> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    // Pass 1: dropdown options, both patterns, deduplicated on (value, label)
    let mut seen: HashMap<(String, String), bool> = HashMap::new();
    let option_matches = OPTION_PLAIN
        .captures_iter(markup)
        .chain(OPTION_ATTRS.captures_iter(markup));
    for caps in option_matches {
        let value = s!(&caps[1]);
        let name = caps[2].trim().to_string();

        // Skip placeholder entries and the "no selection" sentinel
        if name.is_empty()
            || name.to_lowercase().contains("select project")
            || value == NO_SELECTION
        {
            continue;
        }
        if seen.insert((value.clone(), name.clone()), true).is_some() {
            continue;
        }
        if !index.contains_key(&value) {
            index.insert(value.clone(), projects.len());
            projects.push(Project { id: value, name, activities: Vec::new() });
        }
    }

    let activity_matches: Vec<_> = ACT_APPEND.captures_iter(markup).collect();

    // Pass 2: if the dropdown yielded nothing, synthesize one project per
    // distinct project id, named after its first activity label.
    if projects.is_empty() {
        for caps in &activity_matches {
            let project_id = s!(&caps[1]);
            if index.contains_key(&project_id) {
                continue;
            }
            let name = project_name_from_activity(&caps[2]);
            index.insert(project_id.clone(), projects.len());
            projects.push(Project { id: project_id, name, activities: Vec::new() });
        }
    }

    // Pass 3: attach activities, in source order, synthesizing any project
    // the dropdown never mentioned.
    for caps in &activity_matches {
        let project_id = s!(&caps[1]);
        let raw_label = s!(&caps[2]);
        let is_bottom = caps[3].to_lowercase() == "true";
        let uid = s!(&caps[4]);
        let progress = s!(&caps[5]);

        let slot = match index.get(&project_id) {
            Some(&i) => i,
            None => {
                let i = projects.len();
                index.insert(project_id.clone(), i);
                projects.push(Project {
                    id: project_id.clone(),
                    name: join!("Project ", &project_id),
                    activities: Vec::new(),
                });
                i
            }
        };

        let name = clean_activity_name(&raw_label);
        projects[slot].activities.push(Activity {
            id: format!("{project_id}_{name}_{uid}"),
            project_id,
            name,
            full_name: raw_label,
            is_bottom,
            uid,
            progress,
            indent_level: indent_level(&caps[2]),
        });
    }

    ProjectsAndActivities { date: s!(date), projects }
}
