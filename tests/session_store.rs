// tests/session_store.rs
//
// On-disk session round-trips and the local-clock expiry policy.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use tcrs::Error;
use tcrs::params::Config;
use tcrs::session::SessionStore;
use tcrs::types::{CookieRecord, SessionInfo};

fn test_config(dir: &TempDir) -> Config {
    Config {
        base_url: "http://tcrs.example".to_string(),
        cache_dir: dir.path().to_path_buf(),
        verbose: false,
        json: false,
    }
}

fn cookie(name: &str, value: &str) -> CookieRecord {
    CookieRecord {
        name: name.to_string(),
        value: value.to_string(),
        path: "/".to_string(),
        domain: "tcrs.example".to_string(),
        expires: None,
        secure: false,
        http_only: false,
    }
}

#[test]
fn save_then_load_round_trips_cookies() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&dir);
    let store = SessionStore::new("alice", &cfg);

    let cookies = vec![cookie("JSESSIONID", "abc123"), cookie("theme", "dark")];
    store.save(&cookies).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, cookies);

    let info = store.session_info().unwrap();
    assert_eq!(info.user_id, "alice");
    assert_eq!(info.cookie_count, 2);
    assert!(store.is_valid());
}

#[test]
fn empty_jar_and_missing_session_cookie_fail_differently() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&dir);
    let store = SessionStore::new("alice", &cfg);

    assert!(matches!(store.save(&[]), Err(Error::NoCookies)));
    assert!(matches!(
        store.save(&[cookie("theme", "dark")]),
        Err(Error::NoSessionCookie)
    ));
    // Neither failure leaves files behind
    assert!(store.session_info().is_err());
}

fn write_backdated_session(cfg: &Config, user: &str, hours_ago: i64, cookie_count: usize) {
    let info = SessionInfo {
        user_id: user.to_string(),
        created_at: Utc::now() - Duration::hours(hours_ago),
        cookie_count,
    };
    std::fs::write(cfg.session_file(user), serde_json::to_vec(&info).unwrap()).unwrap();
}

#[test]
fn session_older_than_12_hours_is_expired() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&dir);
    let store = SessionStore::new("alice", &cfg);

    store.save(&[cookie("JSESSIONID", "abc")]).unwrap();
    write_backdated_session(&cfg, "alice", 13, 1);

    assert!(!store.is_valid());
    assert!(matches!(store.load(), Err(Error::SessionExpired)));
}

#[test]
fn session_younger_than_12_hours_is_valid() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&dir);
    let store = SessionStore::new("alice", &cfg);

    store.save(&[cookie("JSESSIONID", "abc")]).unwrap();
    write_backdated_session(&cfg, "alice", 11, 1);

    assert!(store.is_valid());
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn clear_removes_both_files_and_tolerates_absence() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&dir);
    let store = SessionStore::new("alice", &cfg);

    store.save(&[cookie("JSESSIONID", "abc")]).unwrap();
    store.clear().unwrap();
    assert!(!cfg.cookie_file("alice").exists());
    assert!(!cfg.session_file("alice").exists());

    // Clearing an already-empty store is not an error
    store.clear().unwrap();
}

#[test]
fn stores_are_scoped_per_user() {
    let dir = TempDir::new().unwrap();
    let cfg = test_config(&dir);

    SessionStore::new("alice", &cfg)
        .save(&[cookie("JSESSIONID", "a")])
        .unwrap();
    SessionStore::new("bob", &cfg)
        .save(&[cookie("JSESSIONID", "b")])
        .unwrap();

    SessionStore::new("alice", &cfg).clear().unwrap();
    assert!(SessionStore::new("bob", &cfg).is_valid());
    assert_eq!(SessionStore::new("bob", &cfg).load().unwrap()[0].value, "b");
}
