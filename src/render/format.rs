use crate::processing::summary::StatsSummary;

/// Shown in place of NaN or infinite values.
pub const NO_VALUE: &str = "\u{2014}";

pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        NO_VALUE.to_string()
    }
}

/// `y = a + b·x`, folding a negative slope into the operator.
pub fn format_equation(summary: &StatsSummary, decimals: usize) -> String {
    let a = format_value(summary.a, decimals);
    let (op, b) = if summary.b.is_finite() && summary.b.is_sign_negative() {
        ('-', format_value(-summary.b, decimals))
    } else {
        ('+', format_value(summary.b, decimals))
    };
    format!("y = {a} {op} {b}\u{00b7}x")
}
