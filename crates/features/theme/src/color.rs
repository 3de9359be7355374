//! Hex color parsing for the `-rgb` companion variables.

/// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (alpha ignored) into channels.
#[must_use]
pub fn hex_to_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// `"#00F0FF"` becomes `"0, 240, 255"`, the form consumed by `rgba(var(--x-rgb), .5)`.
#[must_use]
pub fn rgb_channels(value: &str) -> Option<String> {
    hex_to_rgb(value).map(|(r, g, b)| format!("{r}, {g}, {b}"))
}
