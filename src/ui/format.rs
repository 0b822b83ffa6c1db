//! Text formatting helpers shared by the views.

use std::time::Duration;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Human-readable byte count using binary units (`"7.3 GB"`).
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: f64 = 1024.0;
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= UNIT && exp < UNITS.len() - 1 {
        value /= UNIT;
        exp += 1;
    }
    format!("{value:.1} {}", UNITS[exp])
}

/// Compact duration: `"3d 4h 12m"`, `"4h 12m"` or `"12m 5s"`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let days = secs / 86_400;
    let hours = secs / 3_600 % 24;
    let minutes = secs / 60 % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {}s", secs % 60)
    }
}

/// Short label for a time span, as used in graph captions (`"60s"`, `"5m"`).
pub fn format_span(span: Duration) -> String {
    let secs = span.as_secs();
    match secs {
        0 => format!("{}ms", span.as_millis()),
        1..=119 => format!("{secs}s"),
        120..=7_199 if secs % 60 == 0 => format!("{}m", secs / 60),
        120..=7_199 => format!("{}m{}s", secs / 60, secs % 60),
        _ => format!("{}h{}m", secs / 3_600, secs / 60 % 60),
    }
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(&"..."[..max.min(3)]);
    out
}

/// Pad with trailing spaces (or cut) to exactly `width` display columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let fitted = fit(text, width);
    let pad = width.saturating_sub(fitted.width());
    format!("{fitted}{}", " ".repeat(pad))
}

/// Pad with leading spaces (or cut) to exactly `width` display columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let fitted = fit(text, width);
    let pad = width.saturating_sub(fitted.width());
    format!("{}{fitted}", " ".repeat(pad))
}

/// Longest prefix of `text` no wider than `width` columns.
fn fit(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[..idx];
        }
    }
    text
}
