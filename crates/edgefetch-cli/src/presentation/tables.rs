//! Table formatting helpers.

use indicatif::HumanBytes;

/// Print a horizontal rule of `width` dashes.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Truncate `s` to at most `max_len` characters, ending with `...` when cut.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Human-readable byte count, e.g. `1.50 MiB`.
pub fn format_size(bytes: u64) -> String {
    HumanBytes(bytes).to_string()
}
