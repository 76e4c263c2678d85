// src/cli.rs
//
// Subcommand surface. Thin by design: argument handling, date defaults
// and rendering live here; everything of substance happens in the client.

use std::env;
use std::fs;
use std::io::Read;

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, eyre};
use serde::Deserialize;
use serde_json::json;

use crate::client::TcrsClient;
use crate::params::{self, Config};
use crate::types::{Hours, ProjectsAndActivities, SaveEntry, WeekTimecard};

#[derive(Parser)]
#[command(
    name = "tcrs",
    version,
    about = "TCRS CLI - Timecard Recording System",
    long_about = "TCRS CLI is a command-line tool for interacting with the\n\
        Timecard Recording System (TCRS).\n\n\
        It provides commands for:\n  \
        - Authentication (login, logout, status)\n  \
        - Querying projects and activities\n  \
        - Viewing and saving weekly timecards"
)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Login to TCRS
    ///
    /// Credentials can be given as arguments or via TCRS_USER and
    /// TCRS_PASSWORD; arguments take precedence.
    Login {
        user: Option<String>,
        password: Option<String>,
    },
    /// Logout from TCRS and clear saved session cookies
    Logout,
    /// Show login status and session information
    Status,
    /// List projects and activities
    Projects {
        /// Date in YYYY-MM-DD format (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// View week timecard
    Week {
        /// Week start date in YYYY-MM-DD format (default: this week's Monday)
        #[arg(long)]
        date: Option<String>,
    },
    /// Save timecard entries for a week from a JSON file or stdin
    ///
    /// Expected input: {"entries": [{"project_id": "...", "activity_id":
    /// "...", "progress": 0, "days": [{"hours": 8, "note": "",
    /// "progress": 0}, ...]}]}. Use "-" to read from stdin.
    Save {
        /// Week start date in YYYY-MM-DD format (default: this week's Monday)
        #[arg(long)]
        date: Option<String>,
        /// JSON file with entries (use '-' for stdin)
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Deserialize)]
struct SaveInput {
    entries: Vec<SaveEntry>,
}

pub fn run() -> color_eyre::Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::from_env();
    cfg.verbose = cli.verbose;
    cfg.json = cli.json;
    crate::log::init(&cfg.cache_dir);

    match cli.command {
        Command::Login { user, password } => cmd_login(&cfg, user, password),
        Command::Logout => cmd_logout(&cfg),
        Command::Status => cmd_status(&cfg),
        Command::Projects { date } => cmd_projects(&cfg, date),
        Command::Week { date } => cmd_week(&cfg, date),
        Command::Save { date, file } => cmd_save(&cfg, date, file),
    }
}

/* ---------------- commands ---------------- */

fn cmd_login(
    cfg: &Config,
    user: Option<String>,
    password: Option<String>,
) -> color_eyre::Result<()> {
    let user_id = user
        .or_else(|| env::var(params::ENV_USER).ok())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| fail(cfg, "Missing user ID", "provide as argument or set TCRS_USER"))?;
    let password = password
        .or_else(|| env::var(params::ENV_PASSWORD).ok())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            fail(cfg, "Missing password", "provide as argument or set TCRS_PASSWORD")
        })?;

    let mut client = TcrsClient::new(&user_id, cfg)
        .map_err(|e| fail(cfg, "Failed to create client", e))?;

    if cfg.verbose {
        println!("Logging in as {user_id}...");
    }

    client
        .login(&password)
        .map_err(|e| fail(cfg, "Login failed", e))?;

    if cfg.json {
        print_json(&json!({
            "success": true,
            "user_id": user_id,
            "message": "Login successful",
        }));
    } else {
        println!("Successfully logged in as {user_id}");
    }
    Ok(())
}

fn cmd_logout(cfg: &Config) -> color_eyre::Result<()> {
    let Some(user_id) = find_logged_in_user(cfg) else {
        if cfg.json {
            print_json(&json!({ "success": true, "message": "No active session found" }));
        } else {
            println!("No active session found");
        }
        return Ok(());
    };

    let mut client = TcrsClient::new(&user_id, cfg)
        .map_err(|e| fail(cfg, "Failed to create client", e))?;

    if cfg.verbose {
        println!("Logging out {user_id}...");
    }

    client.logout().map_err(|e| fail(cfg, "Logout failed", e))?;

    if cfg.json {
        print_json(&json!({
            "success": true,
            "user_id": user_id,
            "message": "Logout successful",
        }));
    } else {
        println!("Successfully logged out {user_id}");
    }
    Ok(())
}

fn cmd_status(cfg: &Config) -> color_eyre::Result<()> {
    let Some(user_id) = find_logged_in_user(cfg) else {
        if cfg.json {
            print_json(&json!({ "logged_in": false, "message": "Not logged in" }));
        } else {
            println!("Not logged in");
        }
        return Ok(());
    };

    let client = TcrsClient::new(&user_id, cfg)
        .map_err(|e| fail(cfg, "Failed to create client", e))?;
    let info = client
        .session_info()
        .map_err(|e| fail(cfg, "Session info error", e))?;

    let age = Utc::now() - info.created_at;
    let timeout = Duration::hours(params::SESSION_TIMEOUT_HOURS);
    let is_expired = age > timeout;
    let expires_in = timeout - age;

    if cfg.json {
        print_json(&json!({
            "logged_in": !is_expired,
            "user_id": user_id,
            "created_at": info.created_at.to_rfc3339(),
            "session_age": fmt_duration(age),
            "expires_in": fmt_duration(expires_in),
            "is_expired": is_expired,
            "cookie_count": info.cookie_count,
        }));
    } else if is_expired {
        println!("Session expired for user: {user_id}");
        println!("  Session created: {}", info.created_at.format("%Y-%m-%d %H:%M:%S"));
        println!("  Please login again");
    } else {
        println!("Logged in as: {user_id}");
        println!("  Session created: {}", info.created_at.format("%Y-%m-%d %H:%M:%S"));
        println!("  Session age: {}", fmt_duration(age));
        println!("  Expires in: {}", fmt_duration(expires_in));
    }
    Ok(())
}

fn cmd_projects(cfg: &Config, date: Option<String>) -> color_eyre::Result<()> {
    let client = require_login(cfg)?;
    let date = date.unwrap_or_else(today);

    if cfg.verbose {
        println!("Fetching projects for {date}...");
    }

    let result = client
        .projects_and_activities(&date)
        .map_err(|e| fail(cfg, "Failed to get projects", e))?;

    if cfg.json {
        print_json(&serde_json::to_value(&result)?);
    } else {
        print_projects(&result);
    }
    Ok(())
}

fn cmd_week(cfg: &Config, date: Option<String>) -> color_eyre::Result<()> {
    let client = require_login(cfg)?;
    let date = date.unwrap_or_else(this_monday);

    if cfg.verbose {
        println!("Fetching week timecard for {date}...");
    }

    let result = client
        .week_timecard(&date)
        .map_err(|e| fail(cfg, "Failed to get week timecard", e))?;

    if cfg.json {
        print_json(&serde_json::to_value(&result)?);
    } else {
        print_week_timecard(&result);
    }
    Ok(())
}

fn cmd_save(cfg: &Config, date: Option<String>, file: String) -> color_eyre::Result<()> {
    let client = require_login(cfg)?;
    let date = date.unwrap_or_else(this_monday);

    let data = if file == "-" {
        if cfg.verbose {
            println!("Reading from stdin...");
        }
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| fail(cfg, "Failed to read input", e))?;
        buf
    } else {
        if cfg.verbose {
            println!("Reading from {file}...");
        }
        fs::read_to_string(&file).map_err(|e| fail(cfg, "Failed to open file", e))?
    };

    let input: SaveInput =
        serde_json::from_str(&data).map_err(|e| fail(cfg, "Failed to parse JSON", e))?;
    if input.entries.is_empty() {
        return Err(fail(cfg, "No entries to save", "entries array is empty"));
    }

    if cfg.verbose {
        println!("Saving {} entries for week starting {date}...", input.entries.len());
    }

    client
        .save_week_timecard(&date, &input.entries)
        .map_err(|e| fail(cfg, "Failed to save timecard", e))?;

    if cfg.json {
        print_json(&json!({
            "success": true,
            "week_start_date": date,
            "entries_saved": input.entries.len(),
            "message": "Timecard saved successfully",
        }));
    } else {
        println!("Successfully saved {} entries for week starting {date}", input.entries.len());
    }
    Ok(())
}

/* ---------------- helpers ---------------- */

/// Client for the discovered logged-in user; errors out when nobody is
/// logged in or the local session has expired.
fn require_login(cfg: &Config) -> color_eyre::Result<TcrsClient<'_>> {
    let Some(user_id) = find_logged_in_user(cfg) else {
        return Err(fail(
            cfg,
            "Not logged in",
            "please login first with: tcrs login <user> <pass>",
        ));
    };

    let client = TcrsClient::new(&user_id, cfg)
        .map_err(|e| fail(cfg, "Failed to create client", e))?;
    if !client.is_logged_in() {
        return Err(fail(
            cfg,
            "Session expired",
            "please login again with: tcrs login <user> <pass>",
        ));
    }
    Ok(client)
}

/// The user id behind the one `.session` file (with a matching `.cookies`
/// file) in the cache directory.
fn find_logged_in_user(cfg: &Config) -> Option<String> {
    let entries = fs::read_dir(&cfg.cache_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(user_id) = name.strip_suffix(".session") {
            if cfg.cookie_file(user_id).exists() {
                return Some(s!(user_id));
            }
        }
    }
    None
}

/// Expected-failure reporting. JSON mode prints a machine-readable error
/// object and exits; human mode hands a report to color-eyre.
fn fail(cfg: &Config, msg: &str, err: impl ToString) -> Report {
    loge!("{msg}: {}", err.to_string());
    if cfg.json {
        print_json(&json!({
            "success": false,
            "error": err.to_string(),
            "message": msg,
        }));
        std::process::exit(1);
    }
    eyre!("{msg}: {}", err.to_string())
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// This week's Monday, local time.
fn this_monday() -> String {
    let today = Local::now().date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    monday.format("%Y-%m-%d").to_string()
}

fn fmt_duration(d: Duration) -> String {
    let hours = d.num_hours();
    let minutes = d.num_minutes() % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/* ---------------- rendering ---------------- */

fn print_projects(result: &ProjectsAndActivities) {
    println!("Projects for {}:", result.date);
    println!();

    if result.projects.is_empty() {
        println!("No projects found");
        return;
    }

    for proj in &result.projects {
        println!("Project: {} (ID: {})", proj.name, proj.id);

        if proj.activities.is_empty() {
            println!("  No activities");
        } else {
            for act in &proj.activities {
                let indent = if act.indent_level > 0 { "    " } else { "" };
                let leaf = if act.is_bottom { " [leaf]" } else { "" };
                println!("  {indent}- {} (ID: {}){leaf}", act.name, act.id);
            }
        }
        println!();
    }
}

fn print_week_timecard(tc: &WeekTimecard) {
    let start = NaiveDate::parse_from_str(&tc.week_start_date, "%Y-%m-%d")
        .unwrap_or_else(|_| Local::now().date_naive());

    println!("Week Timecard: {}", tc.week_start_date);
    println!();

    let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    print!("{:<30}", "Project/Activity");
    for (i, day) in days.iter().enumerate() {
        let date = start + Duration::days(i as i64);
        print!(" {day}({})", date.format("%m/%d"));
    }
    println!();
    print_separator(days.len());

    if tc.entries.is_empty() {
        println!("No entries");
    } else {
        for entry in &tc.entries {
            let mut name = entry.project_name.clone();
            if name.chars().count() > 28 {
                name = name.chars().take(25).collect();
                name.push_str("...");
            }
            print!("{name:<30}");

            for day in &entry.days {
                let cell = match &day.hours {
                    Hours::Num(v) if *v > 0.0 => format!("{v:>7.1}"),
                    Hours::Raw(s) if !s.is_empty() => format!("{s:>7}"),
                    _ => s!("   -   "),
                };
                print!(" {cell}   ");
            }
            println!();
        }
    }

    print_separator(days.len());
    print!("{:<30}", "Total");
    let mut week_total = 0.0;
    for total in &tc.daily_totals {
        week_total += total;
        if *total > 0.0 {
            print!(" {total:>7.1}   ");
        } else {
            print!("    -      ");
        }
    }
    println!();
    println!();
    println!("Week Total: {week_total:.1} hours");
}

fn print_separator(day_count: usize) {
    print!("------------------------------");
    for _ in 0..day_count {
        print!("-----------");
    }
    println!();
}
