// src/session.rs
//
// Per-user persistence of authentication state: a cookie file (JSON array
// of CookieRecord) and a session-info file (JSON SessionInfo) under the
// cache directory, private to the owner. This module exclusively owns
// that on-disk state; validity is judged purely by the local clock
// against a fixed timeout, never revalidated against the server.

use std::fs;
use std::path::Path;

use chrono::{Duration, Utc};

use crate::error::{Error, Result};
use crate::params::{Config, SESSION_COOKIE_NAMES, SESSION_TIMEOUT_HOURS};
use crate::types::{CookieRecord, SessionInfo};

pub struct SessionStore<'a> {
    user_id: String,
    cfg: &'a Config,
}

impl<'a> SessionStore<'a> {
    pub fn new(user_id: &str, cfg: &'a Config) -> Self {
        Self { user_id: s!(user_id), cfg }
    }

    /// Persisted cookies, provided the session-info file exists and is
    /// not past the 12-hour expiry. Expiry is checked before the cookie
    /// file is touched.
    pub fn load(&self) -> Result<Vec<CookieRecord>> {
        let info = self.session_info()?;
        if expired(&info) {
            return Err(Error::SessionExpired);
        }

        let data = fs::read_to_string(self.cfg.cookie_file(&self.user_id))?;
        let cookies: Vec<CookieRecord> = serde_json::from_str(&data)?;
        Ok(cookies)
    }

    /// Persist the jar snapshot and stamp fresh session metadata.
    ///
    /// An empty snapshot and a snapshot without a recognized session
    /// cookie fail differently: the first means login never set anything,
    /// the second means it set the wrong things.
    pub fn save(&self, cookies: &[CookieRecord]) -> Result<()> {
        if cookies.is_empty() {
            return Err(Error::NoCookies);
        }
        if !cookies.iter().any(|c| is_session_cookie(&c.name)) {
            return Err(Error::NoSessionCookie);
        }

        self.cfg.ensure_cache_dir()?;

        let cookie_json = serde_json::to_vec_pretty(cookies)?;
        write_atomic(&self.cfg.cookie_file(&self.user_id), &cookie_json)?;

        let info = SessionInfo {
            user_id: self.user_id.clone(),
            created_at: Utc::now(),
            cookie_count: cookies.len(),
        };
        let info_json = serde_json::to_vec_pretty(&info)?;
        write_atomic(&self.cfg.session_file(&self.user_id), &info_json)?;

        logf!("saved session for {} ({} cookies)", self.user_id, cookies.len());
        Ok(())
    }

    /// Drop both files. Absence of either is not an error.
    pub fn clear(&self) -> Result<()> {
        for path in [
            self.cfg.cookie_file(&self.user_id),
            self.cfg.session_file(&self.user_id),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        logf!("cleared session for {}", self.user_id);
        Ok(())
    }

    pub fn session_info(&self) -> Result<SessionInfo> {
        let data = fs::read_to_string(self.cfg.session_file(&self.user_id))?;
        let info: SessionInfo = serde_json::from_str(&data)?;
        Ok(info)
    }

    /// Local-clock validity: session info present and younger than the
    /// timeout.
    pub fn is_valid(&self) -> bool {
        match self.session_info() {
            Ok(info) => !expired(&info),
            Err(_) => false,
        }
    }
}

fn expired(info: &SessionInfo) -> bool {
    Utc::now() - info.created_at > Duration::hours(SESSION_TIMEOUT_HOURS)
}

/// Case-insensitive exact match against the session-cookie allowlist.
/// Substring matches don't count: "mysessionid2" is not a session cookie.
pub fn is_session_cookie(name: &str) -> bool {
    SESSION_COOKIE_NAMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

/// Whole-file replace: write to a sibling temp file, then rename over the
/// target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_match_is_exact_not_substring() {
        assert!(is_session_cookie("JSESSIONID"));
        assert!(is_session_cookie("jsessionid"));
        assert!(is_session_cookie("PhpSessId"));
        assert!(!is_session_cookie("JSESSIONID2"));
        assert!(!is_session_cookie("my_session"));
    }
}
