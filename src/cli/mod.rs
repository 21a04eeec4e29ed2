//! CLI command implementations

pub mod definition;
pub mod run;
pub mod speech;

pub use definition::{Cli, Commands};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shorten `s` to at most `max` terminal columns, marking the cut with `...`
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }

    let budget = if max <= 3 { max } else { max - 3 };
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }

    if max > 3 {
        out.push_str("...");
    }
    out
}
