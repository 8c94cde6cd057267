//! Filename sanitization for cache entries.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Returns the terminal name component of `name`, treating both `/` and `\`
/// as separators. Trailing separators are ignored (`a/b/` yields `b`).
fn terminal_component(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or_default()
}

/// Reduces a candidate filename to something that can only ever name a file
/// directly inside the cache directory.
///
/// - Keeps only the terminal name component (any directory prefix is dropped)
/// - Replaces NUL and control characters with `_`
/// - Maps `.` and `..` to the empty string
/// - Limits length to 255 bytes
///
/// Returns `None` only when `name` is `None`. Applying it twice gives the
/// same result as applying it once.
pub fn sanitize_filename(name: Option<&str>) -> Option<String> {
    let name = name?;
    let terminal = terminal_component(name);

    let mut out: String = terminal
        .chars()
        .map(|c| if c == '\0' || c.is_control() { '_' } else { c })
        .collect();

    if out == "." || out == ".." {
        return Some(String::new());
    }

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out.truncate(take);
    }
    Some(out)
}
