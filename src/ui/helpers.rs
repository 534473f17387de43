//! Column helpers for fixed-width text layout.
//!
//! Widths are counted in `char`s, not bytes, so accented country names line up.

/// Cuts `text` to at most `width` characters, marking the cut with `…`.
///
/// # Examples
///
/// ```
/// use jsonland::ui::helpers::truncate;
///
/// assert_eq!(truncate("Switzerland", 6), "Switz…");
/// assert_eq!(truncate("Chad", 6), "Chad");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Truncates then right-pads `text` with spaces to exactly `width` characters.
#[must_use]
pub fn column(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{cut}{}", " ".repeat(pad))
}
