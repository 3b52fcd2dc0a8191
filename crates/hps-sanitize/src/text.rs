//! String sanitizers.
//!
//! Lengths are counted in characters, not bytes, and limits apply to the
//! final (escaped) output.
//!
//! Student names are not entity-escaped: they are compared and matched
//! downstream, so markup is stripped instead and escaping happens wherever
//! a name is rendered as HTML.

use hps_model::RawText;

/// Maximum length of free text after escaping.
pub const MAX_TEXT_LEN: usize = 500;
/// Maximum length of a student name.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of a student ID.
pub const MAX_STUDENT_ID_LEN: usize = 50;
/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Escapes `& < > " ' /` as HTML entities.
///
/// Returns an empty string for input that is not text.
///
/// # Examples
///
/// ```
/// use hps_sanitize::escape_html;
/// use serde_json::json;
///
/// assert_eq!(escape_html("a < b"), "a &lt; b");
/// assert_eq!(escape_html(&json!(null)), "");
/// assert_eq!(escape_html(&json!(12)), "");
/// ```
pub fn escape_html<T: RawText + ?Sized>(input: &T) -> String {
    match input.raw_text() {
        Some(text) => html_escape::encode_safe(text).into_owned(),
        None => String::new(),
    }
}

/// Trims, escapes, then truncates to [`MAX_TEXT_LEN`] characters.
pub fn sanitize_text<T: RawText + ?Sized>(input: &T) -> String {
    let Some(text) = input.raw_text() else {
        return String::new();
    };
    let escaped = escape_html(text.trim());
    truncate_chars(&escaped, MAX_TEXT_LEN)
}

/// Normalizes a student name for display.
///
/// Angle brackets and control characters are dropped, whitespace runs
/// collapse to one space, every space- or hyphen-delimited segment is
/// title-cased (hyphens are kept), and the result is capped at
/// [`MAX_NAME_LEN`] characters. Apostrophes survive as-is.
///
/// ```
/// use hps_sanitize::sanitize_student_name;
///
/// assert_eq!(sanitize_student_name("  john   smith "), "John Smith");
/// assert_eq!(sanitize_student_name("mary-jane watson"), "Mary-Jane Watson");
/// assert_eq!(sanitize_student_name("sean o'neil"), "Sean O'neil");
/// ```
pub fn sanitize_student_name<T: RawText + ?Sized>(input: &T) -> String {
    let Some(text) = input.raw_text() else {
        return String::new();
    };
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>') && (c.is_whitespace() || !c.is_control()))
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let titled = title_case_segments(&collapsed);
    truncate_chars(&titled, MAX_NAME_LEN)
}

/// Keeps ASCII letters and digits, uppercased, capped at [`MAX_STUDENT_ID_LEN`].
///
/// ```
/// use hps_sanitize::sanitize_student_id;
///
/// assert_eq!(sanitize_student_id("ABC-123_test!"), "ABC123TEST");
/// ```
pub fn sanitize_student_id<T: RawText + ?Sized>(input: &T) -> String {
    let Some(text) = input.raw_text() else {
        return String::new();
    };
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_STUDENT_ID_LEN)
        .collect()
}

/// Trims and lowercases an email address, escaping any markup.
pub fn sanitize_email<T: RawText + ?Sized>(input: &T) -> String {
    let Some(text) = input.raw_text() else {
        return String::new();
    };
    let lowered = text.trim().to_lowercase();
    truncate_chars(&escape_html(lowered.as_str()), MAX_EMAIL_LEN)
}

/// Returns at most `max` characters of `value`.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

fn title_case_segments(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_segment_start = true;
    for c in value.chars() {
        if at_segment_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_segment_start = c == ' ' || c == '-';
    }
    out
}
