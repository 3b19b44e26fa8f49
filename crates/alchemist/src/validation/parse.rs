//! Lenient cell parsers shared by the validators and the query filter.

/// Parse the leading integer of a string.
///
/// Leading whitespace and an optional sign are accepted, then digits up to
/// the first non-digit: `"12abc"` is 12, `"2.9"` is 2, `"abc"` and `""` are
/// `None`. Values beyond `i64` saturate.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }

    let mut acc: i64 = 0;
    for b in digits[..digit_len].bytes() {
        let d = i64::from(b - b'0');
        acc = match acc.checked_mul(10).and_then(|v| {
            if negative {
                v.checked_sub(d)
            } else {
                v.checked_add(d)
            }
        }) {
            Some(v) => v,
            None => return Some(if negative { i64::MIN } else { i64::MAX }),
        };
    }
    Some(acc)
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse one number the way a browser `Number()` call would.
///
/// Blank text is 0. `NaN` is rejected.
fn loose_number(value: &str) -> Option<f64> {
    let t = value.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(rest) = t.strip_prefix(prefix) {
            return u64::from_str_radix(rest, radix).ok().map(|v| v as f64);
        }
    }

    // Rust accepts "inf"/"nan" spellings that a browser does not.
    let lower = t.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }

    t.parse::<f64>().ok()
}

/// Parse an `AvailableSlots` cell.
///
/// A bracket-delimited value is first tried as a JSON array of numbers. If
/// that fails (or the value is not bracketed) the text is split on commas and
/// every segment must be a number. `None` means the cell is malformed.
pub fn parse_available_slots(value: &str) -> Option<Vec<f64>> {
    let trimmed = value.trim();

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            let numbers: Option<Vec<f64>> = items.iter().map(|v| v.as_f64()).collect();
            if let Some(numbers) = numbers {
                return Some(numbers);
            }
        }
    }

    trimmed.split(',').map(loose_number).collect()
}
