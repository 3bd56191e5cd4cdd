use crate::{
	attributes::Attributes,
	normalize::{as_number, normalize},
	scoring::PriceBand,
};

const PROTEIN: PriceBand = PriceBand::new(30.0, 200.0, 0.8);

pub fn score(category: &str, attributes: &Attributes, price: f64) -> Option<f64> {
	match category {
		"protein" => protein(attributes, price),
		_ => None,
	}
}

pub fn price_band(category: &str) -> Option<PriceBand> {
	match category {
		"protein" => Some(PROTEIN),
		_ => None,
	}
}

fn protein(attributes: &Attributes, price: f64) -> Option<f64> {
	let grams = as_number(attributes.get("protein_per_serving_g"))?;
	let servings = as_number(attributes.get("servings"))?;
	let perf = 0.6 * normalize(grams, 15.0, 30.0) + 0.4 * normalize(servings, 10.0, 100.0);

	Some(PROTEIN.blend(perf, price))
}
