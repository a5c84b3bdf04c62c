//! Language-level numeric semantics.
//!
//! Integer and float helpers that differ from Rust's native operators:
//! division and modulo round toward negative infinity, shifts are logical
//! and reverse direction on a negative amount, and conversions report
//! failure instead of truncating.

// ── Floor division / modulo ─────────────────────────────────────────

/// Integer floor division.
///
/// # Panics
/// Panics if `b` is zero; callers check the divisor first.
pub fn ifloor_div(a: i64, b: i64) -> i64 {
    if b == -1 {
        // i64::MIN / -1 overflows
        return a.wrapping_neg();
    }
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
}

pub fn ffloor_div(a: f64, b: f64) -> f64 {
    (a / b).floor()
}

/// Integer modulo whose result takes the sign of the divisor.
///
/// # Panics
/// Panics if `b` is zero; callers check the divisor first.
pub fn imod(a: i64, b: i64) -> i64 {
    if b == -1 {
        return 0;
    }
    let m = a % b;
    if m != 0 && (m ^ b) < 0 { m + b } else { m }
}

/// Float modulo whose result takes the sign of the divisor.
pub fn fmod(a: f64, b: f64) -> f64 {
    let m = a % b;
    if m * b < 0.0 { m + b } else { m }
}

// ── Shifts ──────────────────────────────────────────────────────────

pub fn shift_left(a: i64, n: i64) -> i64 {
    if n <= -64 || n >= 64 {
        0
    } else if n < 0 {
        ((a as u64) >> -n) as i64
    } else {
        ((a as u64) << n) as i64
    }
}

pub fn shift_right(a: i64, n: i64) -> i64 {
    if n <= -64 || n >= 64 {
        0
    } else if n < 0 {
        ((a as u64) << -n) as i64
    } else {
        ((a as u64) >> n) as i64
    }
}

// ── Conversions ─────────────────────────────────────────────────────

/// Converts `f` to an integer only when it has an exact integer
/// representation within `i64` range.
pub fn float_to_integer(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it is out of range
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    if f.floor() == f && (-TWO_63..TWO_63).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// Parses a decimal or `0x` hexadecimal integer. Hex literals wrap
/// around on overflow; decimal literals that overflow are rejected.
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (neg, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        if hex.is_empty() {
            return None;
        }
        let mut n: i64 = 0;
        for c in hex.chars() {
            let d = c.to_digit(16)? as i64;
            n = n.wrapping_mul(16).wrapping_add(d);
        }
        return Some(if neg { n.wrapping_neg() } else { n });
    }

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // parse with the sign attached so i64::MIN round-trips
    if neg {
        format!("-{digits}").parse().ok()
    } else {
        digits.parse().ok()
    }
}

/// Parses a decimal or `0x` hexadecimal float. The `inf`/`nan` spellings
/// Rust accepts are not numerals in the language and are rejected.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let (neg, unsigned) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if let Some(hex) = unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        let f = parse_hex_float(hex)?;
        return Some(if neg { -f } else { f });
    }

    if s.bytes().any(|b| matches!(b, b'n' | b'N' | b'i' | b'I')) {
        return None;
    }
    s.parse().ok()
}

/// Hex digits with an optional `.` fraction and an optional binary
/// exponent `p[+-]digits`, without the `0x` prefix.
fn parse_hex_float(s: &str) -> Option<f64> {
    let (mantissa, exp) = match s.find(['p', 'P']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let mut m = 0.0f64;
    let mut e: i64 = 0;
    let mut digits = 0;
    let mut seen_dot = false;
    for c in mantissa.chars() {
        if c == '.' {
            if seen_dot {
                return None;
            }
            seen_dot = true;
            continue;
        }
        m = m * 16.0 + c.to_digit(16)? as f64;
        digits += 1;
        if seen_dot {
            e -= 4;
        }
    }
    if digits == 0 {
        return None;
    }

    if let Some(exp) = exp {
        let body = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // saturate; anything this large is already inf or zero
        let n: i64 = body.parse().unwrap_or(i64::from(i32::MAX));
        e = if exp.starts_with('-') { e.saturating_sub(n) } else { e.saturating_add(n) };
    }
    Some(scale_by_pow2(m, e))
}

/// `m * 2^e` without overflowing the intermediate power.
fn scale_by_pow2(mut m: f64, mut e: i64) -> f64 {
    while e > 1023 && m.is_finite() && m != 0.0 {
        m *= 2f64.powi(1023);
        e -= 1023;
    }
    while e < -1022 && m != 0.0 {
        m *= 2f64.powi(-1022);
        e += 1022;
    }
    if m == 0.0 || !m.is_finite() {
        return m;
    }
    m * 2f64.powi(e as i32)
}

// ── Formatting ──────────────────────────────────────────────────────

/// Formats `n` like C's `%.14g`, then appends `.0` when the result would
/// read back as an integer.
pub fn format_float(n: f64) -> String {
    let mut out = if n.is_nan() {
        if n.is_sign_negative() { "-nan".to_string() } else { "nan".to_string() }
    } else if n.is_infinite() {
        if n < 0.0 { "-inf".to_string() } else { "inf".to_string() }
    } else if n == 0.0 {
        if n.is_sign_negative() { "-0".to_string() } else { "0".to_string() }
    } else {
        format_g14(n)
    };
    if out.bytes().all(|b| b == b'-' || b.is_ascii_digit()) {
        out.push_str(".0");
    }
    out
}

fn format_g14(n: f64) -> String {
    const PRECISION: i32 = 14;
    // the exponent after rounding to 14 significant digits picks the style
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, n);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.unsigned_abs())
    } else {
        let fixed = format!("{:.*}", (PRECISION - 1 - exp) as usize, n);
        trim_fraction(&fixed).to_string()
    }
}

/// Drops trailing zeros after the decimal point, and the point itself.
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert_eq!(ifloor_div(-7, 2), -4);
        assert_eq!(ifloor_div(7, 2), 3);
        assert_eq!(ifloor_div(7, -2), -4);
        assert_eq!(ifloor_div(-7, -2), 3);
        assert_eq!(ifloor_div(-8, 2), -4);
        assert_eq!(ifloor_div(i64::MIN, -1), i64::MIN);
        assert_eq!(ffloor_div(-7.0, 2.0), -4.0);
        assert_eq!(ffloor_div(7.5, 2.0), 3.0);
    }

    #[test]
    fn modulo_follows_divisor_sign() {
        assert_eq!(imod(-7, 2), 1);
        assert_eq!(imod(7, -2), -1);
        assert_eq!(imod(-7, -2), -1);
        assert_eq!(imod(6, 3), 0);
        assert_eq!(imod(i64::MIN, -1), 0);
        assert_eq!(fmod(-7.0, 2.0), 1.0);
        assert_eq!(fmod(7.0, -2.0), -1.0);
        assert_eq!(fmod(5.5, 2.0), 1.5);
        assert_eq!(fmod(5.0, f64::INFINITY), 5.0);
        assert_eq!(fmod(-5.0, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn shifts_are_logical_and_reversible() {
        assert_eq!(shift_left(1, 4), 16);
        assert_eq!(shift_left(16, -4), 1);
        assert_eq!(shift_right(-1, 63), 1);
        assert_eq!(shift_right(1, -4), 16);
        assert_eq!(shift_left(1, 64), 0);
        assert_eq!(shift_right(-1, 64), 0);
        assert_eq!(shift_left(1, i64::MIN), 0);
    }

    #[test]
    fn float_to_integer_is_exact() {
        assert_eq!(float_to_integer(3.0), Some(3));
        assert_eq!(float_to_integer(-0.0), Some(0));
        assert_eq!(float_to_integer(3.5), None);
        assert_eq!(float_to_integer(f64::NAN), None);
        assert_eq!(float_to_integer(f64::INFINITY), None);
        assert_eq!(float_to_integer(9_223_372_036_854_775_808.0), None);
        assert_eq!(float_to_integer(-9_223_372_036_854_775_808.0), Some(i64::MIN));
    }

    #[test]
    fn parse_integer_forms() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("  -17 \n"), Some(-17));
        assert_eq!(parse_integer("+5"), Some(5));
        assert_eq!(parse_integer("0x10"), Some(16));
        assert_eq!(parse_integer("-0XfF"), Some(-255));
        assert_eq!(parse_integer("0xffffffffffffffff"), Some(-1));
        assert_eq!(parse_integer("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_integer("9223372036854775808"), None);
        assert_eq!(parse_integer("1.5"), None);
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("12a"), None);
    }

    #[test]
    fn parse_float_forms() {
        assert_eq!(parse_float("3.5"), Some(3.5));
        assert_eq!(parse_float(" 1e3 "), Some(1000.0));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("-2"), Some(-2.0));
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn format_float_matches_percent_g14() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(370.5), "370.5");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(0.1 + 0.2), "0.3");
        assert_eq!(format_float(1e100), "1e+100");
        assert_eq!(format_float(1e14), "1e+14");
        assert_eq!(format_float(1e13), "10000000000000.0");
        assert_eq!(format_float(123456789012346.0), "1.2345678901235e+14");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(3.14159265358979), "3.1415926535898");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(12345.678), "12345.678");
        assert_eq!(format_float(99999999999999.99), "1e+14");
    }

    #[test]
    fn parse_hex_float_forms() {
        assert_eq!(parse_float("0x1p4"), Some(16.0));
        assert_eq!(parse_float("0x1.8p1"), Some(3.0));
        assert_eq!(parse_float("-0x.8"), Some(-0.5));
        assert_eq!(parse_float(" 0XA "), Some(10.0));
        assert_eq!(parse_float("0x1P-2"), Some(0.25));
        assert_eq!(parse_float("0x1p+1"), Some(2.0));
        assert_eq!(parse_float("0x1p1024"), Some(f64::INFINITY));
        assert_eq!(parse_float("0x1p-1074"), Some(f64::from_bits(1)));
        assert_eq!(parse_float("0x"), None);
        assert_eq!(parse_float("0x."), None);
        assert_eq!(parse_float("0x1p"), None);
        assert_eq!(parse_float("0x1.2.3"), None);
        assert_eq!(parse_float("0xg"), None);
    }
}
