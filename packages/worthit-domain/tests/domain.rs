use std::collections::BTreeSet;

use worthit_domain::{
	AttributeValue, Attributes, FiltersPatch, ProductFilters, Sort, ValueScoreInput, Vertical,
	compute_value_score, filters, supports_value_sort, taxonomy,
};

fn attrs(pairs: &[(&str, AttributeValue)]) -> Attributes {
	pairs.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
}

fn score(category: &str, attributes: &Attributes, price: Option<f64>) -> Option<f64> {
	compute_value_score(&ValueScoreInput { category, attributes, effective_price: price })
}

#[test]
fn supported_categories_always_score_within_unit_interval() {
	let extremes = [-1.0e9, -1.0, 0.0, 1.0, 7.5, 64.0, 1_000.0, 1.0e9];
	let texts = ["flagship", "ENTRY", "oled", "tn", "4k", "1080p", "mystery", ""];

	for vertical in Vertical::ALL {
		for category in vertical.taxonomy().value_score_categories {
			for (index, number) in extremes.iter().enumerate() {
				let attributes = attrs(&[
					("capacity_l", (*number).into()),
					("capacity_kg", (*number).into()),
					("place_settings", (*number).into()),
					("energy_rating", (*number).into()),
					("protein_per_serving_g", (*number).into()),
					("servings", (*number).into()),
					("cpu_score", (*number).into()),
					("ram_gb", (*number).into()),
					("storage_gb", (*number).into()),
					("battery_mah", (*number).into()),
					("refresh_rate_hz", (*number).into()),
					("chipset_tier", texts[index].into()),
					("panel_type", texts[index].into()),
					("resolution", texts[index].into()),
				]);

				for price in [0.01, 1.0, 500.0, 5_000.0, 1.0e9] {
					let value = score(category, &attributes, Some(price))
						.unwrap_or_else(|| panic!("{category} should score"));

					assert!((0.0..=1.0).contains(&value), "{category}: {value}");
				}
			}
		}
	}
}

#[test]
fn unscored_verticals_never_score() {
	let attributes = attrs(&[("capacity_l", 500.0.into()), ("servings", 30.0.into())]);

	for vertical in [Vertical::Beauty, Vertical::Pharmaceuticals, Vertical::PetGoods] {
		for category in vertical.taxonomy().categories {
			assert_eq!(score(category, &attributes, Some(50.0)), None, "{category}");
		}
	}
}

#[test]
fn fridge_missing_capacity_is_not_applicable() {
	let attributes = attrs(&[("energy_rating", 6.0.into())]);

	assert_eq!(score("fridges", &attributes, Some(1_200.0)), None);
}

#[test]
fn laptop_scenario_matches_formula() {
	let attributes = attrs(&[
		("cpu_score", 8_000.0.into()),
		("ram_gb", 16.0.into()),
		("storage_gb", 512.0.into()),
	]);
	let value = score("laptops", &attributes, Some(1_500.0)).expect("laptop scores");

	assert!((value - 0.48800).abs() < 5e-4, "{value}");
}

#[test]
fn value_sort_gate_matches_taxonomy() {
	for vertical in Vertical::ALL {
		let taxonomy = taxonomy::taxonomy(vertical);

		for category in taxonomy.categories {
			assert_eq!(
				supports_value_sort(vertical, category),
				taxonomy.value_score_categories.contains(category)
			);
		}
	}
}

#[test]
fn filter_state_walkthrough() {
	let mut state = filters::parse("vertical=tech&category=laptops&page=3");

	assert_eq!(state.sort, Sort::ValueDesc);

	state = filters::patch(&state, &FiltersPatch::page(4));

	assert_eq!(state.page, 4);
	assert_eq!(state.category, "laptops");

	state = filters::patch(
		&state,
		&FiltersPatch {
			retailers: Some(BTreeSet::from(["apple".to_string()])),
			..Default::default()
		},
	);

	assert_eq!(state.page, 1);

	state = filters::patch(&state, &FiltersPatch::switch_vertical(Vertical::Beauty));

	assert_eq!(state, ProductFilters::for_vertical(Vertical::Beauty));
	assert_eq!(state.sort, Sort::PriceAsc);
	assert_eq!(filters::serialize(&state), "vertical=beauty");
	assert_eq!(filters::parse(&filters::serialize(&state)), state);
}
