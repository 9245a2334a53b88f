//! Minimal cookie reading/writing for the single admin session cookie.

use axum::http::HeaderMap;

use crate::config;

/// Read a cookie value from the Cookie header
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get("cookie")?.to_str().ok()?;

    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?;
        if key == name {
            let value = parts.next().unwrap_or("");
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }
    }
    None
}

/// Set-Cookie value establishing the admin session: HTTP-only,
/// SameSite=Lax, path `/`, Secure per environment, multi-day max-age.
pub fn session_cookie(token: &str) -> String {
    let session = &config::config().session;
    let max_age = u64::from(session.max_age_days) * 24 * 60 * 60;

    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        session.cookie_name, token, max_age
    );
    if session.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that expires the admin session immediately
pub fn clear_session_cookie() -> String {
    let session = &config::config().session;

    let mut cookie =
        format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax", session.cookie_name);
    if session.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_get_finds_named_cookie() {
        let headers = headers_with_cookie("theme=dark; admin_token=abc123; lang=en");
        assert_eq!(get(&headers, "admin_token").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_get_missing_or_empty() {
        let headers = headers_with_cookie("theme=dark; admin_token=");
        assert_eq!(get(&headers, "admin_token"), None);
        assert_eq!(get(&headers, "other"), None);
        assert_eq!(get(&HeaderMap::new(), "admin_token"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        // 7 days by default
        assert!(cookie.contains(&format!("Max-Age={}", 7 * 24 * 60 * 60)));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
