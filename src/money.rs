//! Rupiah formatting for chart labels and table cells.
//!
//! Amounts use the Indonesian thousands separator (`.`). Large amounts on
//! charts are abbreviated: `M` for milyar (10^9) and `jt` for juta (10^6).

const MILYAR: f64 = 1_000_000_000.0;
const JUTA: f64 = 1_000_000.0;

/// Compact form used on chart axes and tooltips: `Rp 1.2M`, `Rp 3.4jt`,
/// `Rp 12.345`.
pub fn format_rupiah_short(value: f64) -> String {
    if !value.is_finite() {
        return "Rp 0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs_value = value.abs();

    if abs_value >= MILYAR {
        format!("{}Rp {:.1}M", sign, abs_value / MILYAR)
    } else if abs_value >= JUTA {
        format!("{}Rp {:.1}jt", sign, abs_value / JUTA)
    } else {
        format!("{}Rp {}", sign, format_with_thousands(abs_value.round() as i64))
    }
}

/// Full amount rounded to whole Rupiah: `Rp1.234.567`.
pub fn format_rupiah_full(value: f64) -> String {
    if !value.is_finite() {
        return "Rp0".to_string();
    }

    let rounded = value.round() as i64;
    if rounded < 0 {
        format!("-Rp{}", format_with_thousands(rounded.abs()))
    } else {
        format!("Rp{}", format_with_thousands(rounded))
    }
}

fn format_with_thousands(n: i64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let chars: Vec<char> = s.chars().rev().collect();
    let mut result = Vec::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}
