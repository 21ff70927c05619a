use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Blank run shown between the end of the text and its next repetition.
pub const GAP: &str = "    ";

/// The visible part of `text` scrolled `offset` characters to the left,
/// looping back to the start after [`GAP`]. Text that fits is returned as is.
pub fn scroll(text: &str, width: usize, offset: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let looped: Vec<char> = text.chars().chain(GAP.chars()).collect();
    let start = offset % looped.len();

    let mut visible = String::new();
    let mut used = 0;
    for &c in looped.iter().cycle().skip(start) {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        visible.push(c);
        used += w;
    }
    visible
}

/// Cuts `text` to `width` columns, ending with an ellipsis when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut cut = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        cut.push(c);
        used += w;
    }
    cut.push('…');
    cut
}
