use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cuts `s` to at most `max_width` terminal columns, ending in "..." when
/// something was dropped.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Right-pads `s` with spaces to `width` columns. Glyphs are double width,
/// so padding by `len()` misaligns legend columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let current = s.width();
    if current >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - current))
    }
}

/// Terminal columns taken by `s`, for placing the cursor after typed text.
pub fn display_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

pub fn mask(s: &str) -> String {
    "*".repeat(s.chars().count())
}
