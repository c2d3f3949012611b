// src/core/sanitize.rs

/// Collapse whitespace runs (NBSP included) to single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// "1,234,567" → 1234567. Anything but digits and separators is rejected.
pub fn parse_grouped_u32(s: &str) -> Option<u32> {
    let t = normalize_ws(s);
    if t.is_empty() { return None; }
    let mut digits = String::with_capacity(t.len());
    for ch in t.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            ',' | '.' | ' ' => {}
            _ => return None,
        }
    }
    digits.parse().ok()
}

/// Canonical form of a display name: Jagex treats space, `_`, `-` and NBSP
/// as the same character, and names are case-insensitive.
pub fn name_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_space = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() || matches!(ch, '_' | '-' | '\u{a0}') {
            if !prev_space { out.push(' '); prev_space = true; }
        } else {
            out.extend(ch.to_lowercase());
            prev_space = false;
        }
    }
    out.trim().to_string()
}

pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}
