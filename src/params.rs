// src/params.rs
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const ENV_BASE_URL: &str = "TCRS_BASE_URL";
pub const ENV_CACHE_DIR: &str = "TCRS_CACHE_DIR";
pub const ENV_USER: &str = "TCRS_USER";
pub const ENV_PASSWORD: &str = "TCRS_PASSWORD";

pub const DEFAULT_CACHE_DIR: &str = ".tcrs";

// Legacy endpoint family (the only one this tool talks to)
pub const LOGIN_PAGE: &str = "/login.jsp";
pub const VERIF_SERVLET: &str = "/servlet/VerifController";
pub const WEEK_PAGE: &str = "/Timecard/timecard_week/daychoose.jsp";
pub const WEEK_SAVE_PAGE: &str = "/Timecard/timecard_week/weekinfo_deal.jsp";

/// Local-clock session expiry. Never revalidated against the server
/// until the next live request fails.
pub const SESSION_TIMEOUT_HOURS: i64 = 12;

/// The save endpoint parses by fixed slot cardinality: 25 project rows,
/// 7 days each, 25 overtime rows — regardless of actual data volume.
pub const PROJECT_SLOTS: usize = 25;
pub const DAYS_PER_WEEK: usize = 7;

pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Browser-replica headers; the server rejects obviously non-browser clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "zh-TW,zh;q=0.9,en;q=0.8";

/// Cookie names that count as a session cookie (case-insensitive exact match).
pub const SESSION_COOKIE_NAMES: &[&str] = &[
    "JSESSIONID", "session", "sessionid", "sid",
    "_session_id", "ASP.NET_SessionId", "PHPSESSID",
];

/// Application configuration, constructed once and passed by reference.
/// No process-wide mutable globals.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,     // TCRS_BASE_URL; empty = unconfigured
    pub cache_dir: PathBuf,   // per-user session/cookie files live here
    pub verbose: bool,
    pub json: bool,
}

impl Config {
    /// Build from environment, with CLI flags applied by the caller.
    pub fn from_env() -> Self {
        let base_url = env::var(ENV_BASE_URL).unwrap_or_default();
        let cache_dir = env::var(ENV_CACHE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_cache_dir());
        Self { base_url, cache_dir, verbose: false, json: false }
    }

    /// Fail fast before any network attempt when the base URL is unset.
    pub fn validate_base_url(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::BaseUrlNotSet);
        }
        Ok(())
    }

    pub fn cookie_file(&self, user_id: &str) -> PathBuf {
        self.cache_dir.join(join!(user_id, ".cookies"))
    }

    pub fn session_file(&self, user_id: &str) -> PathBuf {
        self.cache_dir.join(join!(user_id, ".session"))
    }

    pub fn ensure_cache_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.cache_dir, fs::Permissions::from_mode(0o700))?;
        }
        Ok(())
    }
}

fn default_cache_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DEFAULT_CACHE_DIR),
        None => PathBuf::from(DEFAULT_CACHE_DIR),
    }
}
