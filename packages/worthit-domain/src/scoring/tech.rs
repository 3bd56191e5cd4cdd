use crate::{
	attributes::Attributes,
	normalize::{as_number, normalize, tier},
	scoring::PriceBand,
};

const LAPTOPS: PriceBand = PriceBand::new(700.0, 4_500.0, 0.85);
const PHONES: PriceBand = PriceBand::new(350.0, 2_400.0, 0.82);
const MONITORS: PriceBand = PriceBand::new(200.0, 2_500.0, 0.8);

const CHIPSET_TIERS: [(&str, f64); 4] =
	[("entry", 0.4), ("mid", 0.65), ("high", 0.85), ("flagship", 1.0)];
const PANEL_TIERS: [(&str, f64); 4] = [("tn", 0.4), ("ips", 0.75), ("va", 0.7), ("oled", 1.0)];
const RESOLUTION_TIERS: [(&str, f64); 3] = [("1080p", 0.55), ("1440p", 0.8), ("4k", 1.0)];
const DEFAULT_BATTERY_MAH: f64 = 4_000.0;

pub fn score(category: &str, attributes: &Attributes, price: f64) -> Option<f64> {
	match category {
		"laptops" => laptop(attributes, price),
		"phones" => phone(attributes, price),
		"monitors" => monitor(attributes, price),
		_ => None,
	}
}

pub fn price_band(category: &str) -> Option<PriceBand> {
	match category {
		"laptops" => Some(LAPTOPS),
		"phones" => Some(PHONES),
		"monitors" => Some(MONITORS),
		_ => None,
	}
}

fn laptop(attributes: &Attributes, price: f64) -> Option<f64> {
	let cpu = as_number(attributes.get("cpu_score"))?;
	let ram = as_number(attributes.get("ram_gb"))?;
	let storage = as_number(attributes.get("storage_gb"))?;
	let perf = 0.45 * normalize(cpu, 1_000.0, 10_000.0)
		+ 0.30 * normalize(ram, 4.0, 64.0)
		+ 0.25 * normalize(storage, 128.0, 4_000.0);

	Some(LAPTOPS.blend(perf, price))
}

fn phone(attributes: &Attributes, price: f64) -> Option<f64> {
	let chipset = attributes.get("chipset_tier")?;
	let ram = as_number(attributes.get("ram_gb"))?;
	let storage = as_number(attributes.get("storage_gb"))?;
	let battery = as_number(attributes.get("battery_mah"))
		.filter(|mah| *mah != 0.0)
		.unwrap_or(DEFAULT_BATTERY_MAH);
	let perf = 0.4 * tier(Some(chipset), &CHIPSET_TIERS)
		+ 0.2 * normalize(ram, 4.0, 16.0)
		+ 0.25 * normalize(storage, 64.0, 1_024.0)
		+ 0.15 * normalize(battery, 3_000.0, 6_000.0);

	Some(PHONES.blend(perf, price))
}

fn monitor(attributes: &Attributes, price: f64) -> Option<f64> {
	let refresh = as_number(attributes.get("refresh_rate_hz"))?;
	let panel = attributes.get("panel_type")?;
	let resolution = attributes.get("resolution")?;
	let perf = 0.5 * normalize(refresh, 60.0, 240.0)
		+ 0.25 * tier(Some(panel), &PANEL_TIERS)
		+ 0.25 * tier(Some(resolution), &RESOLUTION_TIERS);

	Some(MONITORS.blend(perf, price))
}
