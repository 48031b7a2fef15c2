//! Shared utilities for link handlers and field mapping: host normalization,
//! lenient URL parsing, and count/duration text parsing.

use regex::Regex;
use url::Url;

use crate::error::ExtractionError;

/// Compiles a regex at static init; panics on invalid pattern.
pub fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Normalizes a host string: trim, strip leading "www.", trailing '.', and lowercases.
#[must_use]
pub fn canonical_host(host: &str) -> String {
    host.trim()
        .trim_start_matches("www.")
        .trim_end_matches('.')
        .to_ascii_lowercase()
}

/// Returns true if the two host strings refer to the same host after normalization.
#[must_use]
pub fn hosts_match(lhs: &str, rhs: &str) -> bool {
    canonical_host(lhs) == canonical_host(rhs)
}

/// Returns true if `url`'s host matches any of `hosts` after normalization.
#[must_use]
pub fn host_is_one_of(url: &Url, hosts: &[&str]) -> bool {
    url.host_str()
        .is_some_and(|host| hosts.iter().any(|candidate| hosts_match(host, candidate)))
}

/// Parses a URL, reading a missing scheme as `https://`.
///
/// # Errors
///
/// Returns [`ExtractionError::Parsing`] when the input is not a URL even with a scheme added.
pub fn parse_lenient_url(raw: &str) -> Result<Url, ExtractionError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}"))
            .map_err(|error| ExtractionError::parsing(raw, &format!("not a valid URL: {error}"))),
        Err(error) => Err(ExtractionError::parsing(
            raw,
            &format!("not a valid URL: {error}"),
        )),
    }
}

/// Returns the non-empty path segments of `url`.
#[must_use]
pub fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Parses English count text such as `1.2M subscribers`, `12,345 views` or `3K`.
///
/// The leading token must be a whole English-formatted number: digits with
/// `,` in groups of three, or a decimal with a `K`/`M`/`B` suffix. Anything
/// else (`No views`, `1,5 Mio.`, `1.234 Aufrufe`) is `None`, never a guess.
#[must_use]
pub fn parse_count(text: &str) -> Option<u64> {
    let token = text.split_whitespace().next()?;
    let (number, multiplier) = match token.char_indices().last()? {
        (at, 'K' | 'k') => (&token[..at], 1_000_u64),
        (at, 'M' | 'm') => (&token[..at], 1_000_000),
        (at, 'B' | 'b') => (&token[..at], 1_000_000_000),
        _ => return parse_grouped(token),
    };
    parse_scaled(number, multiplier)
}

/// `12345` or `12,345`; commas only between full groups of three.
fn parse_grouped(token: &str) -> Option<u64> {
    let mut groups = token.split(',');
    let head = groups.next()?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits = head.to_string();
    if token.contains(',') {
        if head.len() > 3 {
            return None;
        }
        for group in groups {
            if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.push_str(group);
        }
    }
    digits.parse().ok()
}

/// `1.5` scaled by a suffix multiplier, computed without floats.
fn parse_scaled(number: &str, multiplier: u64) -> Option<u64> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    if number.ends_with('.') {
        return None;
    }
    let mut value = whole.parse::<u64>().ok()?.checked_mul(multiplier)?;
    let mut scale = multiplier;
    for digit in fraction.bytes() {
        scale /= 10;
        value = value.checked_add(u64::from(digit - b'0') * scale)?;
    }
    Some(value)
}

/// Parses clock-style durations (`SS`, `MM:SS`, `HH:MM:SS`) into seconds.
#[must_use]
pub fn parse_duration_text(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split(':').try_fold(0_u64, |total, part| {
        let value: u64 = part.trim().parse().ok()?;
        total.checked_mul(60)?.checked_add(value)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_host_trim_www_and_trailing_dot_lowercase() {
        assert_eq!(canonical_host("  www.YouTube.COM.  "), "youtube.com");
        assert_eq!(canonical_host("media.ccc.de"), "media.ccc.de");
        // Only literal "www." (lowercase) is stripped; "WWW." remains and is lowercased
        assert_eq!(canonical_host("WWW.CCC.DE."), "www.ccc.de");
    }

    #[test]
    fn test_hosts_match_same_host_after_normalization() {
        assert!(hosts_match("www.youtube.com", "youtube.com"));
        assert!(!hosts_match("m.youtube.com", "youtube.com"));
    }

    #[test]
    fn test_host_is_one_of() {
        let url = Url::parse("https://www.youtube.com/channel/x").unwrap();
        assert!(host_is_one_of(&url, &["m.youtube.com", "youtube.com"]));
        assert!(!host_is_one_of(&url, &["media.ccc.de"]));
    }

    #[test]
    fn test_parse_lenient_url_adds_missing_scheme() {
        let url = parse_lenient_url("media.ccc.de/c/36c3").unwrap();
        assert_eq!(url.as_str(), "https://media.ccc.de/c/36c3");
    }

    #[test]
    fn test_parse_lenient_url_rejects_garbage() {
        let err = parse_lenient_url("http://").unwrap_err();
        assert!(matches!(err, ExtractionError::Parsing { .. }));
    }

    #[test]
    fn test_path_segments_skip_empty() {
        let url = Url::parse("https://example.com//a/b/").unwrap();
        assert_eq!(path_segments(&url), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_count_plain_and_grouped() {
        assert_eq!(parse_count("12,345 views"), Some(12_345));
        assert_eq!(parse_count("42"), Some(42));
    }

    #[test]
    fn test_parse_count_suffixes() {
        assert_eq!(parse_count("1.2M subscribers"), Some(1_200_000));
        assert_eq!(parse_count("3K"), Some(3_000));
        assert_eq!(parse_count("2.5B views"), Some(2_500_000_000));
    }

    #[test]
    fn test_parse_count_no_number() {
        assert_eq!(parse_count("No views"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("K views"), None);
    }

    #[test]
    fn test_parse_count_rejects_non_english_formats() {
        assert_eq!(parse_count("1,5 Mio. Abonnenten"), None);
        assert_eq!(parse_count("2,3 k abonnés"), None);
        assert_eq!(parse_count("1.234 Aufrufe"), None);
        assert_eq!(parse_count("1.234.567 Aufrufe"), None);
        assert_eq!(parse_count("12,34,567 views"), None);
        assert_eq!(parse_count("1234,567 views"), None);
        assert_eq!(parse_count("1.M"), None);
    }

    #[test]
    fn test_parse_count_english_formats() {
        assert_eq!(parse_count("1,234 views"), Some(1_234));
        assert_eq!(parse_count("1,234,567 views"), Some(1_234_567));
        assert_eq!(parse_count("1.5M subscribers"), Some(1_500_000));
        assert_eq!(parse_count("12.34K views"), Some(12_340));
    }

    #[test]
    fn test_parse_duration_text() {
        assert_eq!(parse_duration_text("59"), Some(59));
        assert_eq!(parse_duration_text("4:05"), Some(245));
        assert_eq!(parse_duration_text("1:02:03"), Some(3723));
        assert_eq!(parse_duration_text("LIVE"), None);
        assert_eq!(parse_duration_text(""), None);
    }
}
