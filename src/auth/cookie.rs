//! Session cookie extraction.

use axum::http::{header::COOKIE, HeaderMap};

/// Cookie Saasform sets after login.
pub const SESSION_COOKIE_NAME: &str = "__session";

/// Return the `__session` cookie value, if present and non-empty.
///
/// All `Cookie` headers are searched; the first match wins.
#[must_use]
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                let val = val.trim().trim_matches('"');
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_static(cookie));
        }
        headers
    }

    #[test]
    fn missing_cookie_header() {
        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let headers = headers(&["theme=dark; __session=abc.def.ghi; lang=en"]);
        assert_eq!(
            extract_session_cookie(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn skips_malformed_pairs() {
        let headers = headers(&["flag; __session=tok"]);
        assert_eq!(extract_session_cookie(&headers), Some("tok".to_string()));
    }

    #[test]
    fn searches_every_cookie_header() {
        let headers = headers(&["a=1", "__session=tok"]);
        assert_eq!(extract_session_cookie(&headers), Some("tok".to_string()));
    }

    #[test]
    fn ignores_similar_names_and_empty_values() {
        assert_eq!(extract_session_cookie(&headers(&["session=tok"])), None);
        assert_eq!(extract_session_cookie(&headers(&["__session_old=tok"])), None);
        assert_eq!(extract_session_cookie(&headers(&["__session="])), None);
    }

    #[test]
    fn strips_quotes() {
        let headers = headers(&["__session=\"tok\""]);
        assert_eq!(extract_session_cookie(&headers), Some("tok".to_string()));
    }
}
