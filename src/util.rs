//! Utility functions for property names and identifiers.

/// Converts a camelCase property name to its CSS form.
///
/// Vendor prefixes written with a leading capital (`WebkitTextFillColor`) or
/// the lowercase `ms` prefix gain a leading dash. Custom properties (`--x`) and
/// names that are already kebab-case are returned unchanged.
///
/// # Example
///
/// ```rust
/// use stitchwork::to_kebab_case;
///
/// assert_eq!(to_kebab_case("fontSize"), "font-size");
/// assert_eq!(to_kebab_case("WebkitTextFillColor"), "-webkit-text-fill-color");
/// assert_eq!(to_kebab_case("--accent"), "--accent");
/// ```
pub fn to_kebab_case(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    if name.starts_with("ms") && name[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Formats a number in lowercase base 36.
pub(crate) fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}
