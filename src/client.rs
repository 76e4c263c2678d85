// src/client.rs
//
// Thin orchestrator over the transport, the session store and the
// extraction/form layers. One client handles one user's one command per
// invocation; every operation is synchronous and sequenced.

use crate::core::classify;
use crate::core::net::{Transport, urlencode};
use crate::error::{Error, Result};
use crate::extract::{projects, week};
use crate::form;
use crate::params::{self, Config};
use crate::session::{self, SessionStore};
use crate::types::{ProjectsAndActivities, SaveEntry, SessionInfo, WeekTimecard};

pub struct TcrsClient<'a> {
    cfg: &'a Config,
    transport: Transport,
    store: SessionStore<'a>,
    user_id: String,
    logged_in: bool,
}

impl<'a> TcrsClient<'a> {
    /// Fails fast on an unset base URL, before any network attempt.
    /// A persisted, unexpired session is restored into the jar here.
    pub fn new(user_id: &str, cfg: &'a Config) -> Result<Self> {
        cfg.validate_base_url()?;

        let transport = Transport::new(&cfg.base_url)?;
        let store = SessionStore::new(user_id, cfg);

        // Best-effort restore; a missing or expired session just means we
        // start logged out.
        if let Ok(records) = store.load() {
            transport.import_cookies(&records);
        }
        let logged_in = transport
            .export_cookies()
            .iter()
            .any(|c| session::is_session_cookie(&c.name));

        Ok(Self { cfg, transport, store, user_id: s!(user_id), logged_in })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn session_info(&self) -> Result<SessionInfo> {
        self.store.session_info()
    }

    /// Authenticate: fetch the login page (the server seeds its session
    /// cookie there), post credentials, then verify by fetching a
    /// protected page and checking we were not bounced back to login.
    pub fn login(&mut self, password: &str) -> Result<()> {
        if self.logged_in {
            return Ok(());
        }

        let login_page = self.transport.page_url(params::LOGIN_PAGE);
        self.transport.get(params::LOGIN_PAGE, "failed to get login page")?;

        let body = join!(
            "method=login&name=",
            &urlencode(&self.user_id),
            "&pw=",
            &urlencode(password),
        );
        let resp = self.transport.post_form(
            params::VERIF_SERVLET,
            body,
            Some(login_page),
            false,
            "login request failed",
        )?;

        if classify::has_failure_marker(&resp.body, classify::LOGIN_FAILURE_MARKERS) {
            loge!("login rejected for {}", self.user_id);
            return Err(Error::InvalidCredentials);
        }

        let verify = self.transport.get(params::WEEK_PAGE, "verification failed")?;
        if verify.status.as_u16() == 200 && !classify::landed_on_login_page(&verify.final_url) {
            self.logged_in = true;
            if let Err(e) = self.store.save(&self.transport.export_cookies()) {
                // Session persistence is best-effort; the login itself stands.
                eprintln!("Warning: could not save session cookies: {e}");
                loge!("cookie save failed: {e}");
            }
            logf!("login ok for {}", self.user_id);
            return Ok(());
        }

        Err(Error::LoginFailed)
    }

    /// Best-effort server-side logout, then drop local session state.
    pub fn logout(&mut self) -> Result<()> {
        if !self.logged_in {
            return Ok(());
        }

        let path = join!(params::VERIF_SERVLET, "?method=logout");
        let _ = self.transport.get(&path, "logout request failed");

        self.logged_in = false;
        self.store.clear()
    }

    pub fn projects_and_activities(&self, date: &str) -> Result<ProjectsAndActivities> {
        if !self.logged_in {
            return Err(Error::NotLoggedIn);
        }

        let path = week_page_path(date);
        let resp = self.transport.get(&path, "failed to get projects")?;
        Ok(projects::parse_projects_and_activities(&resp.body, date))
    }

    pub fn week_timecard(&self, week_start_date: &str) -> Result<WeekTimecard> {
        if !self.logged_in {
            return Err(Error::NotLoggedIn);
        }

        let path = week_page_path(week_start_date);
        let resp = self.transport.get(&path, "failed to get week timecard")?;
        Ok(week::parse_week_timecard(&resp.body, week_start_date))
    }

    /// Submit a week. The project listing is re-fetched immediately
    /// before building the payload: activity tokens are only meaningful
    /// relative to the server's current session state, so staleness here
    /// is a correctness hazard, not an optimization opportunity.
    pub fn save_week_timecard(&self, week_start_date: &str, entries: &[SaveEntry]) -> Result<()> {
        if !self.logged_in {
            return Err(Error::NotLoggedIn);
        }

        self.projects_and_activities(week_start_date)?;

        let payload = form::build_save_payload(week_start_date, entries)?;
        let referer = self.transport.page_url(&week_page_path(week_start_date));
        let resp = self.transport.post_form(
            params::WEEK_SAVE_PAGE,
            payload,
            Some(referer),
            true,
            "save request failed",
        )?;

        if classify::has_failure_marker(&resp.body, classify::SAVE_FAILURE_MARKERS) {
            loge!("save rejected for week {week_start_date}");
            return Err(Error::SaveRejected);
        }

        logf!("saved week {week_start_date} ({} entries)", entries.len());
        Ok(())
    }
}

fn week_page_path(date: &str) -> String {
    join!(params::WEEK_PAGE, "?cho_date=", &urlencode(date))
}
