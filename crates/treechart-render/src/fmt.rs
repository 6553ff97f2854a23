// Number formatting for SVG path data.

use std::fmt::Write as _;

pub(crate) fn fmt_path_into(out: &mut String, v: f64) {
    // D3's `d3-path` rounds path coordinates to 3 fractional digits
    // (`Math.round(x * 1000) / 1000`, ties half-up, including for negatives).
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }

    let scaled = v * 1000.0;
    let k = (scaled + 0.5).floor() as i64;
    if k == 0 {
        out.push('0');
        return;
    }
    append_fixed_3dp_trimmed(out, k);
}

/// Unrounded path number, printed like JS `Number#toString()`.
pub(crate) fn fmt_js_number_into(out: &mut String, v: f64) {
    if !v.is_finite() || v == 0.0 {
        out.push('0');
        return;
    }
    let mut buf = ryu_js::Buffer::new();
    out.push_str(buf.format_finite(v));
}

fn append_fixed_3dp_trimmed(out: &mut String, k: i64) {
    let neg = k.is_negative();
    let abs = k.unsigned_abs();
    let int_part = abs / 1000;
    let frac = abs % 1000;

    if neg {
        out.push('-');
    }
    let _ = write!(out, "{int_part}");
    if frac == 0 {
        return;
    }

    let digits = [frac / 100, (frac / 10) % 10, frac % 10];
    let mut end = 3usize;
    while end > 0 && digits[end - 1] == 0 {
        end -= 1;
    }
    out.push('.');
    for d in &digits[..end] {
        out.push(char::from(b'0' + *d as u8));
    }
}

/// Plain attribute formatting: integral values print without a fraction, `-0` becomes `0`.
pub(crate) fn fmt_attr(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        v = 0.0;
    }
    format!("{v}")
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
