//! Per-vertical value scorers.
//!
//! Every scorer reduces `{category, attributes, effective price}` to a value in `[0, 1]`, or
//! `None` when the item cannot be ranked (unsupported category, missing or non-numeric required
//! attribute, absent or non-positive price). Scorers never fail.

pub mod home_appliances;
pub mod supplements;
pub mod tech;

use crate::{
	attributes::Attributes,
	normalize::{clamp, normalize},
	taxonomy::{self, Vertical},
};

#[derive(Clone, Copy, Debug)]
pub struct ValueScoreInput<'a> {
	pub category: &'a str,
	pub attributes: &'a Attributes,
	/// Promotional price when present, else list price.
	pub effective_price: Option<f64>,
}

/// Category price bounds and the performance share of the final blend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceBand {
	pub low: f64,
	pub high: f64,
	pub perf_weight: f64,
}
impl PriceBand {
	pub const fn new(low: f64, high: f64, perf_weight: f64) -> Self {
		Self { low, high, perf_weight }
	}

	/// `clamp(perf * w + (1 - penalty) * (1 - w))` with `penalty = normalize(price, low, high)`.
	pub fn blend(&self, perf: f64, price: f64) -> f64 {
		let penalty = normalize(price, self.low, self.high);

		clamp(perf * self.perf_weight + (1.0 - penalty) * (1.0 - self.perf_weight))
	}
}

/// Scores an item using the vertical that owns its category.
pub fn compute_value_score(input: &ValueScoreInput<'_>) -> Option<f64> {
	let price = valid_price(input.effective_price)?;
	let category = category_key(input.category);
	let vertical = taxonomy::vertical_for_category(&category)?;

	score_category(vertical, &category, input.attributes, price)
}

/// Scores an item with a specific vertical's scorer; categories foreign to it are unscored.
pub fn score_for_vertical(vertical: Vertical, input: &ValueScoreInput<'_>) -> Option<f64> {
	let price = valid_price(input.effective_price)?;
	let category = category_key(input.category);

	if !vertical.taxonomy().has_category(&category) {
		return None;
	}

	score_category(vertical, &category, input.attributes, price)
}

/// Price band of a value-scored category.
pub fn price_band(category: &str) -> Option<PriceBand> {
	let category = category_key(category);

	match taxonomy::vertical_for_category(&category)? {
		Vertical::Tech => tech::price_band(&category),
		Vertical::HomeAppliances => home_appliances::price_band(&category),
		Vertical::Supplements => supplements::price_band(&category),
		Vertical::Pharmaceuticals | Vertical::Beauty | Vertical::PetGoods => None,
	}
}

fn score_category(
	vertical: Vertical,
	category: &str,
	attributes: &Attributes,
	price: f64,
) -> Option<f64> {
	match vertical {
		Vertical::Tech => tech::score(category, attributes, price),
		Vertical::HomeAppliances => home_appliances::score(category, attributes, price),
		Vertical::Supplements => supplements::score(category, attributes, price),
		Vertical::Pharmaceuticals | Vertical::Beauty | Vertical::PetGoods => None,
	}
}

fn valid_price(price: Option<f64>) -> Option<f64> {
	price.filter(|price| price.is_finite() && *price > 0.0)
}

fn category_key(category: &str) -> String {
	category.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attributes::AttributeValue;

	fn attrs(pairs: &[(&str, AttributeValue)]) -> Attributes {
		pairs.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
	}

	#[test]
	fn non_positive_or_missing_price_is_unscored() {
		let attributes = attrs(&[
			("cpu_score", 8_000.0.into()),
			("ram_gb", 16.0.into()),
			("storage_gb", 512.0.into()),
		]);

		for price in [None, Some(0.0), Some(-10.0), Some(f64::NAN), Some(f64::INFINITY)] {
			let input = ValueScoreInput {
				category: "laptops",
				attributes: &attributes,
				effective_price: price,
			};

			assert_eq!(compute_value_score(&input), None, "price {price:?}");
		}
	}

	#[test]
	fn category_key_is_trimmed_and_case_insensitive() {
		let attributes = attrs(&[("capacity_l", 600.0.into())]);
		let input = ValueScoreInput {
			category: "  Fridges ",
			attributes: &attributes,
			effective_price: Some(1_500.0),
		};

		assert!(compute_value_score(&input).is_some());
	}

	#[test]
	fn unsupported_categories_are_unscored() {
		let attributes = attrs(&[
			("capacity_l", 600.0.into()),
			("cpu_score", 8_000.0.into()),
			("protein_per_serving_g", 25.0.into()),
		]);

		for category in ["skincare", "otc", "pet-food", "appliances", "vitamins", "unknown"] {
			let input =
				ValueScoreInput { category, attributes: &attributes, effective_price: Some(50.0) };

			assert_eq!(compute_value_score(&input), None, "{category}");
		}
	}

	#[test]
	fn vertical_scorer_ignores_foreign_categories() {
		let attributes = attrs(&[("capacity_l", 600.0.into())]);
		let input = ValueScoreInput {
			category: "fridges",
			attributes: &attributes,
			effective_price: Some(900.0),
		};

		assert_eq!(score_for_vertical(Vertical::Tech, &input), None);
		assert!(score_for_vertical(Vertical::HomeAppliances, &input).is_some());
	}

	#[test]
	fn price_bands_exist_only_for_scored_categories() {
		assert_eq!(price_band("laptops"), Some(PriceBand::new(700.0, 4_500.0, 0.85)));
		assert_eq!(price_band("protein"), Some(PriceBand::new(30.0, 200.0, 0.8)));
		assert_eq!(price_band("makeup"), None);
		assert_eq!(price_band("appliances"), None);
	}

	#[test]
	fn blend_stays_in_unit_interval() {
		let band = PriceBand::new(100.0, 200.0, 0.8);

		for perf in [-1.0, 0.0, 0.5, 1.0, 3.0] {
			for price in [1.0, 100.0, 150.0, 200.0, 10_000.0] {
				let score = band.blend(perf, price);

				assert!((0.0..=1.0).contains(&score), "perf {perf} price {price} -> {score}");
			}
		}
	}
}
