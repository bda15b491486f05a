use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{CardError, CardResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> CardResult<f64> {
    value.to_f64().ok_or_else(|| {
        CardError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Formats a fraction as a whole percentage, rounding halves away from zero.
///
/// Non-finite input is rendered as-is (`NaN%`) so malformed weights stay
/// visible in the output.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    let percent = fraction * 100.0;
    if !percent.is_finite() {
        return format!("{percent}%");
    }
    let rounded = percent.round();
    // Avoid printing "-0%".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}%")
}

#[cfg(test)]
mod tests {
    use super::format_percent;

    #[test]
    fn percent_rounds_half_away_from_zero() {
        assert_eq!(format_percent(0.125), "13%");
        assert_eq!(format_percent(0.15), "15%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(-0.001), "0%");
        assert_eq!(format_percent(f64::NAN), "NaN%");
    }
}
