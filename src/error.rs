// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Typed failures surfaced by the client, session store and form builder.
///
/// `NoCookies` and `NoSessionCookie` are deliberately distinct: an empty
/// jar and a populated jar that lacks a recognized session cookie are
/// different failure causes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in")]
    NotLoggedIn,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("login failed")]
    LoginFailed,

    #[error("session expired")]
    SessionExpired,

    #[error("no cookies found")]
    NoCookies,

    #[error("no session cookie found")]
    NoSessionCookie,

    #[error("{var} environment variable is not set", var = crate::params::ENV_BASE_URL)]
    BaseUrlNotSet,

    #[error("too many entries: {0} (the save form has {slots} project slots)", slots = crate::params::PROJECT_SLOTS)]
    TooManyEntries(usize),

    #[error("server indicated save failure")]
    SaveRejected,

    #[error("{context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL: {0}")]
    BadBaseUrl(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a transport error with call-site context.
    pub fn http(context: &'static str) -> impl FnOnce(reqwest::Error) -> Error {
        move |source| Error::Http { context, source }
    }
}
