//! Numeric helpers shared by every vertical scorer.

use crate::attributes::AttributeValue;

/// Clamps `x` into `[0, 1]`. NaN maps to 0.
pub fn clamp(x: f64) -> f64 {
	if x.is_nan() {
		return 0.0;
	}

	x.clamp(0.0, 1.0)
}

/// Linearly rescales `value` from `[low, high]` onto `[0, 1]`, saturating outside the range.
///
/// A degenerate range (`high == low`) has no meaningful slope and yields the midpoint 0.5.
pub fn normalize(value: f64, low: f64, high: f64) -> f64 {
	if high == low {
		return 0.5;
	}

	clamp((value - low) / (high - low))
}

/// Case-insensitive lookup of a qualitative attribute in a tier table.
///
/// Missing, non-text or unknown values score 0.
pub fn tier(value: Option<&AttributeValue>, mapping: &[(&str, f64)]) -> f64 {
	let Some(AttributeValue::Text(raw)) = value else {
		return 0.0;
	};
	let key = raw.trim().to_lowercase();

	mapping.iter().find(|(label, _)| *label == key).map(|(_, score)| *score).unwrap_or(0.0)
}

/// Coerces an attribute into a finite number.
///
/// Numbers pass through when finite; text is accepted when it parses as a finite number after
/// trimming. Booleans and blank text are not numeric.
pub fn as_number(value: Option<&AttributeValue>) -> Option<f64> {
	let number = match value? {
		AttributeValue::Number(number) => *number,
		AttributeValue::Text(raw) => raw.trim().parse::<f64>().ok()?,
		AttributeValue::Bool(_) => return None,
	};

	number.is_finite().then_some(number)
}
