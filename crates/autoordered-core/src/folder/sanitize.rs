//! Folder name sanitization.

/// Maximum length of a folder name, in characters.
pub const MAX_NAME_LEN: usize = 120;

/// Name used when nothing usable is left.
pub const FALLBACK_NAME: &str = "unknown";

/// Make an arbitrary string safe to use as a single folder name.
///
/// Path separators and control characters become `_`, leading and
/// trailing dots are removed and the result is cut to [`MAX_NAME_LEN`]
/// characters. Never returns an empty string.
#[must_use]
pub fn sanitize_name(name: Option<&str>) -> String {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return FALLBACK_NAME.to_string();
    };

    let replaced: String = name
        .chars()
        .map(|c| if is_unsafe(c) { '_' } else { c })
        .collect();
    let sanitized: String = replaced.trim_matches('.').chars().take(MAX_NAME_LEN).collect();

    if sanitized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

const fn is_unsafe(c: char) -> bool {
    matches!(c, '\\' | '/' | '\u{0}'..='\u{1f}' | '\u{7f}')
}
