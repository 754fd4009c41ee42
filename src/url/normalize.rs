use crate::UrlError;
use url::Url;

/// Normalizes a URL for frontier admission and visited-set membership
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme and a host
/// 3. Lowercase scheme and host, strip default ports (done by the parser)
/// 4. Remove the fragment
/// 5. Collapse repeated slashes in the path, keeping the leading `/`
/// 6. Percent-decode unreserved characters in the path
///
/// Query parameters are deliberately left untouched: their order and encoding
/// are retained verbatim, since some sites are query-order-sensitive. A
/// trailing slash is preserved as provided. Control characters are already
/// percent-encoded by the parser.
///
/// # Examples
///
/// ```
/// use kumo_research::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM:80//a//b#frag").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a/b");
/// ```
pub fn normalize_url(raw: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let path = url.path().to_string();
    let normalized_path = decode_unreserved(&collapse_slashes(&path));
    if normalized_path != path {
        url.set_path(&normalized_path);
    }

    Ok(url)
}

/// Collapses runs of `/` in a path into a single slash
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_was_slash = false;

    for c in path.chars() {
        if c == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        out.push(c);
    }

    out
}

/// Decodes percent-encoded triplets whose byte is an unreserved character
///
/// Reserved and non-ASCII bytes keep their original encoding so that the
/// normalized form stays comparable with what servers actually serve.
fn decode_unreserved(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                let byte = high * 16 + low;
                if is_unreserved(byte) {
                    out.push(byte as char);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }

    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// RFC 3986 unreserved characters
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_scheme_and_host() {
        let url = normalize_url("HTTP://EXAMPLE.COM/Page").unwrap();
        assert_eq!(url.as_str(), "http://example.com/Page");
    }

    #[test]
    fn test_strip_default_http_port() {
        let url = normalize_url("http://example.com:80/page").unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_strip_default_https_port() {
        let url = normalize_url("https://example.com:443/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_non_default_port() {
        let url = normalize_url("http://example.com:8080/page").unwrap();
        assert_eq!(url.as_str(), "http://example.com:8080/page");
    }

    #[test]
    fn test_remove_fragment() {
        let url = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_collapse_repeated_slashes() {
        let url = normalize_url("https://example.com///a//b///c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/b/c");
    }

    #[test]
    fn test_preserve_trailing_slash() {
        let url = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page/");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        let url = normalize_url("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_decode_unreserved_percent_encoding() {
        let url = normalize_url("https://example.com/%61%62%63").unwrap();
        assert_eq!(url.as_str(), "https://example.com/abc");
    }

    #[test]
    fn test_decode_unreserved_keeps_reserved_encoding() {
        let url = normalize_url("https://example.com/a%2Fb%20c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a%2Fb%20c");
    }

    #[test]
    fn test_query_order_retained_verbatim() {
        let url = normalize_url("https://example.com/page?b=2&a=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?b=2&a=1");
    }

    #[test]
    fn test_query_encoding_retained_verbatim() {
        let url = normalize_url("https://example.com/page?q=a%20b").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?q=a%20b");
    }

    #[test]
    fn test_reject_non_http_scheme() {
        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_reject_malformed_url() {
        let result = normalize_url("not a url");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_alias_forms_normalize_identically() {
        let a = normalize_url("http://x.example/").unwrap();
        let b = normalize_url("HTTP://X.EXAMPLE:80/#top").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }
}
