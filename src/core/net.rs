// src/core/net.rs
// Browser-replica transport: blocking HTTP with a shared cookie jar, fixed
// browser-like headers and a hard request timeout. The rest of the crate
// only sees "send request, receive status + body + final URL" plus a
// queryable/settable jar scoped to the base URL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};
use crate::params;
use crate::types::CookieRecord;

pub struct PageResponse {
    pub status: StatusCode,
    pub body: String,
    /// URL after any redirects; the login heuristics inspect it.
    pub final_url: String,
}

pub struct Transport {
    client: Client,
    jar: Arc<Jar>,
    base: Url,
    base_str: String,
}

impl Transport {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_str = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_str)?;

        let jar = Arc::new(Jar::default());
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(params::USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static(params::ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(params::ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .default_headers(headers)
            .timeout(Duration::from_secs(params::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(Error::http("failed to build http client"))?;

        Ok(Self { client, jar, base, base_str })
    }

    /// Absolute URL for a server path, preserving any base-URL path prefix.
    pub fn page_url(&self, path: &str) -> String {
        join!(&self.base_str, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_str
    }

    pub fn get(&self, path: &str, context: &'static str) -> Result<PageResponse> {
        let url = self.page_url(path);
        logd!("GET {url}");
        let resp = self.client.get(&url).send().map_err(Error::http(context))?;
        read_response(resp, context)
    }

    /// POST a pre-encoded application/x-www-form-urlencoded body. The body
    /// is built by the caller because the save protocol is ordering-
    /// sensitive and must not go through a map-based serializer.
    pub fn post_form(
        &self,
        path: &str,
        body: String,
        referer: Option<String>,
        with_origin: bool,
        context: &'static str,
    ) -> Result<PageResponse> {
        let url = self.page_url(path);
        logd!("POST {url} ({} bytes)", body.len());

        let mut req = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);
        if let Some(referer) = referer {
            req = req.header(header::REFERER, referer);
        }
        if with_origin {
            req = req.header(header::ORIGIN, self.base_str.clone());
        }

        let resp = req.send().map_err(Error::http(context))?;
        read_response(resp, context)
    }

    /// Snapshot the jar as serializable records. The jar only exposes the
    /// name=value pairs it would send to the base URL, so path/domain are
    /// filled with the base-URL defaults.
    pub fn export_cookies(&self) -> Vec<CookieRecord> {
        let Some(header) = self.jar.cookies(&self.base) else {
            return Vec::new();
        };
        let Ok(joined) = header.to_str() else {
            return Vec::new();
        };
        joined
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| CookieRecord {
                name: s!(name),
                value: s!(value),
                path: s!("/"),
                domain: self.base.host_str().unwrap_or_default().to_string(),
                expires: None,
                secure: false,
                http_only: false,
            })
            .collect()
    }

    /// Restore persisted records into the live jar.
    pub fn import_cookies(&self, records: &[CookieRecord]) {
        for record in records {
            let mut cookie = format!("{}={}", record.name, record.value);
            if !record.path.is_empty() {
                cookie.push_str("; Path=");
                cookie.push_str(&record.path);
            }
            if let Some(ts) = record.expires {
                if let Some(when) = Utc.timestamp_opt(ts, 0).single() {
                    cookie.push_str("; Expires=");
                    cookie.push_str(&when.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
                }
            }
            if record.secure {
                cookie.push_str("; Secure");
            }
            if record.http_only {
                cookie.push_str("; HttpOnly");
            }
            self.jar.add_cookie_str(&cookie, &self.base);
        }
    }
}

fn read_response(resp: reqwest::blocking::Response, context: &'static str) -> Result<PageResponse> {
    let status = resp.status();
    let final_url = resp.url().to_string();
    let body = resp.text().map_err(Error::http(context))?;
    Ok(PageResponse { status, body, final_url })
}

/// Percent-encode one value per form-urlencoding rules (space becomes '+').
pub fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
