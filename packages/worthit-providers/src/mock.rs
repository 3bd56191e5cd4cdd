//! Deterministic synthetic data for running without a live backend.
//!
//! Catalog values are derived from a BLAKE3 stream keyed by the caller's inputs. Lookups use the
//! browser extension's 32-bit FNV-1a seed so both produce the same fixtures. The same inputs
//! always produce byte-identical output. Nothing here reads the clock; callers pass `now`.

use reqwest::Url;
use time::{Date, Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use worthit_domain::{
	AttributeValue, Attributes, ComparePrice, CurrentPrice, HistoryPoint, LookupProduct,
	LookupResponse, Offer, ProductDetail, StoreInfo, Vertical, catalog::format_cents, scoring,
};

pub const BRAND_POOL: [&str; 6] = ["Acme", "Nova", "Orbit", "Vertex", "Everline", "Summit"];
pub const SIZE_POOL: [&str; 6] = ["250ml", "500g", "1L", "2-pack", "Standard", "Large"];

const LOOKUP_MIN_CENTS: i64 = 1_499;
const LOOKUP_MAX_CENTS: i64 = 45_999;
const PRICE_FLOOR_CENTS: i64 = 999;
const LOOKUP_HISTORY_WEEKS: i64 = 12;
const CATALOG_HISTORY_WEEKS: i64 = 8;
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// A deterministic stream of pseudo-random draws.
pub struct Draws {
	reader: blake3::OutputReader,
}
impl Draws {
	pub fn new(parts: &[&str]) -> Self {
		let mut hasher = blake3::Hasher::new();

		for part in parts {
			hasher.update(part.as_bytes());
			hasher.update(b"|");
		}

		Self { reader: hasher.finalize_xof() }
	}

	pub fn next_u64(&mut self) -> u64 {
		let mut buf = [0_u8; 8];

		self.reader.fill(&mut buf);

		u64::from_le_bytes(buf)
	}

	/// Uniform integer in `[min, max]`.
	pub fn range(&mut self, min: i64, max: i64) -> i64 {
		if max <= min {
			return min;
		}

		let span = (max - min) as u64 + 1;

		min + (self.next_u64() % span) as i64
	}

	/// Uniform float in `[min, max)`.
	pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
		let unit = (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64;

		min + unit * (max - min)
	}

	pub fn chance(&mut self, probability: f64) -> bool {
		self.uniform(0.0, 1.0) < probability
	}

	pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
		let index = self.next_u64() % items.len().max(1) as u64;

		&items[index as usize]
	}
}

/// Seed of a lookup request: 32-bit FNV-1a over the UTF-16 code units of `"{url}|{title}"`.
pub fn lookup_seed(page_url: &str, title: &str) -> u32 {
	format!("{page_url}|{title}")
		.encode_utf16()
		.fold(FNV_OFFSET_BASIS, |hash, unit| (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME))
}

/// Synthesises a legacy lookup response for a product page.
pub fn mock_lookup(page_url: &str, title: &str, now: OffsetDateTime) -> LookupResponse {
	let seed = lookup_seed(page_url, title);
	let price_cents = seeded_value(seed, LOOKUP_MIN_CENTS, LOOKUP_MAX_CENTS);
	let name = match title.trim() {
		"" => "Unknown Product".to_string(),
		trimmed => trimmed.to_string(),
	};
	let compare = [("Shop Alpha", -220), ("Shop Beta", 180), ("Shop Gamma", -90)]
		.into_iter()
		.map(|(store, delta)| {
			let cents = (price_cents + delta).max(PRICE_FLOOR_CENTS);

			ComparePrice { store: store.to_string(), price_cents: cents, display: format_cents(cents) }
		})
		.collect();

	LookupResponse {
		store: detect_store(page_url),
		product: LookupProduct {
			name,
			brand: BRAND_POOL[seed as usize % BRAND_POOL.len()].to_string(),
			size: SIZE_POOL[signed_shift(seed, 4).rem_euclid(SIZE_POOL.len() as i32) as usize]
				.to_string(),
			matched_by: "title+url-hash".to_string(),
		},
		current_price: CurrentPrice {
			cents: price_cents,
			display: format_cents(price_cents),
			captured_at: timestamp(now),
		},
		history: lookup_history(price_cents, seed, now.date()),
		compare,
	}
}

/// Derives a display name from a page URL's host: `www.jb-hi-fi.co.nz` becomes `Jb Hi Fi`.
pub fn detect_store(page_url: &str) -> StoreInfo {
	let host = Url::parse(page_url).ok().and_then(|url| url.host_str().map(str::to_string));
	let Some(host) = host.filter(|host| !host.is_empty()) else {
		return StoreInfo {
			name: "Unknown Store".to_string(),
			detected_from_url: "invalid-url".to_string(),
		};
	};
	let hostname = host.strip_prefix("www.").unwrap_or(&host).to_string();
	let first_label = hostname.split('.').next().unwrap_or_default();
	let name = first_label.split('-').map(capitalize).collect::<Vec<_>>().join(" ");

	StoreInfo { name, detected_from_url: hostname }
}

/// Synthesises a catalog for one vertical: `per_category` products in every category.
pub fn mock_catalog(
	vertical: Vertical,
	seed: u64,
	per_category: u32,
	today: Date,
) -> Vec<ProductDetail> {
	let taxonomy = vertical.taxonomy();
	let seed = seed.to_string();
	let mut products = Vec::with_capacity(taxonomy.categories.len() * per_category as usize);

	for category in taxonomy.categories {
		for index in 0..per_category {
			let mut draws = Draws::new(&[&seed, vertical.as_str(), category, &index.to_string()]);

			products.push(mock_product(vertical, category, index, today, &mut draws));
		}
	}

	products
}

fn mock_product(
	vertical: Vertical,
	category: &str,
	index: u32,
	today: Date,
	draws: &mut Draws,
) -> ProductDetail {
	let brand = draws.pick(&BRAND_POOL).to_string();
	let attributes = mock_attributes(category, draws);
	let base_price = match scoring::price_band(category) {
		Some(band) => draws.uniform(band.low * 0.8, band.high * 1.1),
		None => draws.uniform(8.0, 150.0),
	};
	let retailers = taxonomy_retailers(vertical, draws);
	let captured_at = today.to_string();
	let offers: Vec<Offer> = retailers
		.iter()
		.map(|retailer| {
			let price = round_price(base_price * draws.uniform(0.92, 1.08));
			let promo = draws.chance(0.3).then(|| round_price(price * draws.uniform(0.75, 0.95)));
			let availability = if draws.chance(0.85) { "in_stock" } else { "out_of_stock" };

			Offer {
				retailer: retailer.to_string(),
				retailer_product_id: format!("{retailer}-{category}-{index:03}"),
				title: format!("{brand} {} {}", category_label(category), index + 1),
				url: format!("https://{retailer}.example/{category}/{index}"),
				image_url: None,
				availability: Some(availability.to_string()),
				price_nzd: price,
				promo_price_nzd: promo,
				promo_text: promo.map(|_| "Limited time".to_string()),
				discount_pct: promo.map(|promo| ((1.0 - promo / price) * 100.0).round()),
				captured_at: captured_at.clone(),
			}
		})
		.collect();
	let mut product = ProductDetail {
		id: format!("{}-{category}-{index:03}", vertical.as_str()),
		canonical_name: format!("{brand} {} {}", category_label(category), index + 1),
		vertical: vertical.as_str().to_string(),
		brand,
		category: category.to_string(),
		model_number: Some(format!("M{:05}", draws.range(0, 99_999))),
		gtin: None,
		mpn: None,
		image_url: None,
		attributes,
		offers,
		value_score: None,
		history: None,
	};

	product.history = product.best_offer().map(|offer| catalog_history(offer, today, draws));
	product.value_score = product.to_list_item().computed_value_score();

	product
}

fn mock_attributes(category: &str, draws: &mut Draws) -> Attributes {
	let mut attributes = Attributes::new();
	let mut set = |key: &str, value: AttributeValue| {
		attributes.insert(key.to_string(), value);
	};

	match category {
		"laptops" => {
			set("cpu_score", (draws.range(15, 98) * 100).into());
			set("ram_gb", (*draws.pick(&[8_i64, 16, 32, 64])).into());
			set("storage_gb", (*draws.pick(&[256_i64, 512, 1_024, 2_048])).into());
		},
		"phones" => {
			set("chipset_tier", (*draws.pick(&["entry", "mid", "high", "flagship"])).into());
			set("ram_gb", (*draws.pick(&[4_i64, 6, 8, 12, 16])).into());
			set("storage_gb", (*draws.pick(&[64_i64, 128, 256, 512, 1_024])).into());
			set("battery_mah", (draws.range(35, 55) * 100).into());
		},
		"monitors" => {
			set("refresh_rate_hz", (*draws.pick(&[60_i64, 75, 144, 165, 240])).into());
			set("panel_type", (*draws.pick(&["tn", "ips", "va", "oled"])).into());
			set("resolution", (*draws.pick(&["1080p", "1440p", "4k"])).into());
		},
		"fridges" => {
			set("capacity_l", (draws.range(20, 90) * 10).into());
			set("energy_rating", (draws.range(2, 12) as f64 / 2.0).into());
		},
		"washing-machines" => {
			set("capacity_kg", (draws.range(10, 28) as f64 / 2.0).into());
			set("energy_rating", (draws.range(2, 12) as f64 / 2.0).into());
		},
		"dishwashers" => {
			set("place_settings", draws.range(8, 16).into());
			set("energy_rating", (draws.range(2, 12) as f64 / 2.0).into());
		},
		"protein" => {
			set("protein_per_serving_g", draws.range(18, 30).into());
			set("servings", (draws.range(4, 20) * 5).into());
		},
		_ => {
			set("size", (*draws.pick(&SIZE_POOL)).into());
		},
	}

	attributes
}

fn taxonomy_retailers(vertical: Vertical, draws: &mut Draws) -> Vec<&'static str> {
	let mut pool = vertical.taxonomy().retailers.to_vec();
	let count = draws.range(1, 3.min(pool.len() as i64)) as usize;
	let mut chosen = Vec::with_capacity(count);

	while chosen.len() < count && !pool.is_empty() {
		let index = (draws.next_u64() % pool.len() as u64) as usize;

		chosen.push(pool.swap_remove(index));
	}

	chosen
}

fn catalog_history(best: &Offer, today: Date, draws: &mut Draws) -> Vec<Offer> {
	(0..CATALOG_HISTORY_WEEKS)
		.map(|week| {
			let date = weeks_before(today, CATALOG_HISTORY_WEEKS - 1 - week);
			let price = round_price(best.price_nzd * draws.uniform(0.94, 1.06));

			Offer {
				price_nzd: price,
				promo_price_nzd: None,
				promo_text: None,
				discount_pct: None,
				captured_at: date.to_string(),
				..best.clone()
			}
		})
		.collect()
}

fn lookup_history(base_cents: i64, seed: u32, today: Date) -> Vec<HistoryPoint> {
	(0..LOOKUP_HISTORY_WEEKS)
		.map(|week| {
			let date = weeks_before(today, LOOKUP_HISTORY_WEEKS - 1 - week);
			let delta = i64::from(signed_shift(seed, (week % 16) as u32) % 900) - 450;

			HistoryPoint {
				date: date.to_string(),
				price_cents: (base_cents + delta).max(PRICE_FLOOR_CENTS),
			}
		})
		.collect()
}

fn seeded_value(seed: u32, min: i64, max: i64) -> i64 {
	min + i64::from(seed) % (max - min + 1)
}

/// Arithmetic shift of the seed read as a signed 32-bit integer; seeds at or above `2^31` shift
/// to negative values.
fn signed_shift(seed: u32, bits: u32) -> i32 {
	(seed as i32) >> bits
}

fn weeks_before(today: Date, weeks: i64) -> Date {
	today.checked_sub(Duration::weeks(weeks)).unwrap_or(today)
}

fn timestamp(now: OffsetDateTime) -> String {
	now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string())
}

fn round_price(price: f64) -> f64 {
	(price * 100.0).round() / 100.0
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn category_label(category: &str) -> String {
	category.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}
