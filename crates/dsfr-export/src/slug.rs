//! Filename sanitization for exported articles.
//!
//! Turns a free-form article title into a lowercase, hyphen-separated ASCII
//! slug that is safe to use as a file or directory name on every platform.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Slug returned when a title is empty or sanitizes to nothing.
pub const UNTITLED_SLUG: &str = "article_sans_titre";

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 100;

/// Sanitize an optional title into a slug.
///
/// `None` and `Some("")` both produce [`UNTITLED_SLUG`].
pub fn sanitize(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => sanitize_title(title),
        _ => UNTITLED_SLUG.to_owned(),
    }
}

/// Sanitize a title into a slug.
///
/// Steps:
/// 1. decompose (NFD) and drop combining marks, so `é` becomes `e`
/// 2. drop everything except ASCII letters, digits, `_`, whitespace and `-`
/// 3. collapse runs of whitespace and `-` into one `-`, trimmed at both ends
/// 4. truncate to [`MAX_SLUG_LEN`] without leaving a trailing `-`
/// 5. lowercase
///
/// The result matches `^[a-z0-9_]+(-[a-z0-9_]+)*$`, or is [`UNTITLED_SLUG`].
///
/// # Examples
///
/// ```
/// use dsfr_export::sanitize_title;
///
/// assert_eq!(sanitize_title("Café – à 100%"), "cafe-a-100");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_separator = true;
        }
    }

    // Only ASCII remains, so byte and character lengths agree
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        let trimmed_len = slug.trim_end_matches('-').len();
        slug.truncate(trimmed_len);
    }

    if slug.is_empty() {
        return UNTITLED_SLUG.to_owned();
    }
    slug
}
