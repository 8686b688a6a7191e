//! The `1h30m` / `300ms` duration grammar: a sequence of decimal numbers,
//! each with an optional fraction and a required unit suffix.

use std::time::Duration;

const MAX_NANOS: u64 = i64::MAX as u64;

const UNITS: &[(&str, u64)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000), // U+00B5 micro sign
    ("μs", 1_000), // U+03BC greek mu
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

/// Parses a duration such as `"300ms"`, `"1.5h"` or `"2h45m"`.
///
/// A bare `"0"` is accepted without a unit. Negative durations cannot be
/// represented and are rejected.
pub(crate) fn parse(text: &str) -> Result<Duration, &'static str> {
    let mut s = text;
    if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    } else if s.starts_with('-') {
        return Err("negative duration");
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("invalid duration");
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err("invalid duration");
        }

        let (whole, rest) = leading_int(s).ok_or("invalid duration")?;
        let pre = rest.len() != s.len();
        s = rest;

        let mut frac = 0u64;
        let mut scale = 1f64;
        let mut post = false;
        if let Some(rest) = s.strip_prefix('.') {
            let (f, sc, rest2) = leading_fraction(rest);
            post = rest2.len() != rest.len();
            frac = f;
            scale = sc;
            s = rest2;
        }
        if !pre && !post {
            return Err("invalid duration");
        }

        let end = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        let (unit, rest) = s.split_at(end);
        s = rest;
        if unit.is_empty() {
            return Err("missing unit in duration");
        }
        let unit = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, nanos)| *nanos)
            .ok_or("unknown unit in duration")?;

        let mut v = whole.checked_mul(unit).filter(|v| *v <= MAX_NANOS).ok_or("invalid duration")?;
        if frac > 0 {
            v = v
                .checked_add((frac as f64 * (unit as f64 / scale)) as u64)
                .filter(|v| *v <= MAX_NANOS)
                .ok_or("invalid duration")?;
        }
        total = total.checked_add(v).filter(|v| *v <= MAX_NANOS).ok_or("invalid duration")?;
    }
    Ok(Duration::from_nanos(total))
}

/// Consumes leading decimal digits. `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    for b in s[..end].bytes() {
        x = x.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        if x > MAX_NANOS {
            return None;
        }
    }
    Some((x, &s[end..]))
}

/// Consumes leading fraction digits, dropping precision that would overflow.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    let mut scale = 1f64;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        match x.checked_mul(10).and_then(|y| y.checked_add(u64::from(b - b'0'))) {
            Some(y) if y <= MAX_NANOS => {
                x = y;
                scale *= 10.0;
            }
            _ => overflow = true,
        }
    }
    (x, scale, &s[end..])
}

/// Formats as `72h3m0.5s`, using `ms`/`µs`/`ns` below one second. Zero is `0s`.
pub(crate) fn format(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000_000_000 {
        let (unit, prec) = match nanos {
            0..1_000 => ("ns", 0),
            1_000..1_000_000 => ("µs", 3),
            _ => ("ms", 6),
        };
        let (int, frac) = split(nanos, prec);
        return format!("{int}{frac}{unit}");
    }

    let (secs, frac) = split(nanos, 9);
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if h > 0 || m > 0 {
        out.push_str(&format!("{m}m"));
    }
    out.push_str(&format!("{s}{frac}s"));
    out
}

fn split(v: u128, prec: u32) -> (u128, String) {
    let scale = 10u128.pow(prec);
    let frac = v % scale;
    if frac == 0 {
        return (v / scale, String::new());
    }
    let digits = format!("{frac:0width$}", width = prec as usize);
    (v / scale, format!(".{}", digits.trim_end_matches('0')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_values() {
        assert_eq!(parse("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse("1.5h"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse("2h45m10.5s"), Ok(Duration::from_millis(9_910_500)));
        assert_eq!(parse("+5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse(".5s"), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn micro_unit_spellings() {
        let want = Ok(Duration::from_micros(7));
        assert_eq!(parse("7us"), want);
        assert_eq!(parse("7\u{b5}s"), want);
        assert_eq!(parse("7\u{3bc}s"), want);
    }

    #[test]
    fn bare_zero_needs_no_unit() {
        assert_eq!(parse("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(parse(""), Err("invalid duration"));
        assert_eq!(parse("a"), Err("invalid duration"));
        assert_eq!(parse("."), Err("invalid duration"));
        assert_eq!(parse("10"), Err("missing unit in duration"));
        assert_eq!(parse("3x"), Err("unknown unit in duration"));
        assert_eq!(parse("-1s"), Err("negative duration"));
        assert_eq!(parse("9999999999h"), Err("invalid duration"));
    }

    #[test]
    fn formats_like_the_parser_reads() {
        assert_eq!(format(Duration::ZERO), "0s");
        assert_eq!(format(Duration::from_nanos(123)), "123ns");
        assert_eq!(format(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format(Duration::from_millis(300)), "300ms");
        assert_eq!(format(Duration::from_secs(1)), "1s");
        assert_eq!(format(Duration::from_secs(60)), "1m0s");
        assert_eq!(format(Duration::from_secs(86_400)), "24h0m0s");
        assert_eq!(format(Duration::from_millis(3_723_500)), "1h2m3.5s");
    }
}
