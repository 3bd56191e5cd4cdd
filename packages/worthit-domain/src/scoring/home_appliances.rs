use crate::{
	attributes::Attributes,
	normalize::{as_number, normalize},
	scoring::PriceBand,
};

const FRIDGES: PriceBand = PriceBand::new(500.0, 5_000.0, 0.8);
const WASHING_MACHINES: PriceBand = PriceBand::new(400.0, 3_000.0, 0.8);
const DISHWASHERS: PriceBand = PriceBand::new(500.0, 2_500.0, 0.8);

/// Neutral energy contribution when no usable star rating is present.
const UNRATED_ENERGY: f64 = 0.5;

pub fn score(category: &str, attributes: &Attributes, price: f64) -> Option<f64> {
	let (capacity_key, low, high, band) = match category {
		"fridges" => ("capacity_l", 200.0, 1_000.0, FRIDGES),
		"washing-machines" => ("capacity_kg", 5.0, 16.0, WASHING_MACHINES),
		"dishwashers" => ("place_settings", 6.0, 16.0, DISHWASHERS),
		_ => return None,
	};
	let capacity = as_number(attributes.get(capacity_key))?;
	let perf = 0.5 * normalize(capacity, low, high) + 0.5 * energy(attributes);

	Some(band.blend(perf, price))
}

pub fn price_band(category: &str) -> Option<PriceBand> {
	match category {
		"fridges" => Some(FRIDGES),
		"washing-machines" => Some(WASHING_MACHINES),
		"dishwashers" => Some(DISHWASHERS),
		_ => None,
	}
}

// A zero rating means "unrated" on retailer pages.
fn energy(attributes: &Attributes) -> f64 {
	as_number(attributes.get("energy_rating"))
		.filter(|rating| *rating != 0.0)
		.map(|rating| normalize(rating, 1.0, 6.0))
		.unwrap_or(UNRATED_ENERGY)
}
