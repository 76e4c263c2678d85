// src/core/classify.rs
// Heuristic success/failure detection. The legacy server has no structured
// status signal: the only contract is the rendered body and the final URL
// after redirects. All checks are local-only; nothing is retried.
//
// Known fragility: the save markers ("error", "failed") can false-positive
// on a response that legitimately echoes such words in unrelated text.
// That matches the behavior this tool replicates; kept behind this seam so
// it can be swapped if the server ever exposes a real status signal.

/// Markers in a login response body that indicate rejected credentials.
pub const LOGIN_FAILURE_MARKERS: &[&str] = &["login failed", "invalid"];

/// Markers in a save response body that indicate the server rejected the
/// submission.
pub const SAVE_FAILURE_MARKERS: &[&str] = &["error", "failed"];

/// Case-insensitive scan of a response body for failure markers.
pub fn has_failure_marker(body: &str, markers: &[&str]) -> bool {
    let lc = body.to_lowercase();
    markers.iter().any(|m| lc.contains(m))
}

/// After the post-login verification fetch, a final URL still containing
/// "login" means we were bounced back to the login page.
pub fn landed_on_login_page(final_url: &str) -> bool {
    final_url.to_lowercase().contains("login")
}
