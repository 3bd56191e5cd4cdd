//! Canonical product filter state and its query-string form.
//!
//! `ProductFilters` is the single source of truth for what gets fetched. It is only ever
//! produced by [`parse`] or [`patch`], both of which uphold two invariants:
//!
//! - `sort` is allowed for the current vertical and category; an unsupported `value_desc` is
//!   replaced by the default sort.
//! - touching any filter field other than `page` and `page_size` resets `page` to 1.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::taxonomy::{self, Vertical};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 24;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
	ValueDesc,
	PriceAsc,
	PriceDesc,
	DiscountDesc,
	Relevance,
}
impl Sort {
	pub const ALL: [Self; 5] =
		[Self::ValueDesc, Self::PriceAsc, Self::PriceDesc, Self::DiscountDesc, Self::Relevance];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::ValueDesc => "value_desc",
			Self::PriceAsc => "price_asc",
			Self::PriceDesc => "price_desc",
			Self::DiscountDesc => "discount_desc",
			Self::Relevance => "relevance",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"value_desc" => Some(Self::ValueDesc),
			"price_asc" => Some(Self::PriceAsc),
			"price_desc" => Some(Self::PriceDesc),
			"discount_desc" => Some(Self::DiscountDesc),
			"relevance" => Some(Self::Relevance),
			_ => None,
		}
	}
}
impl fmt::Display for Sort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Value-scoring verticals default to best value, everything else to cheapest first.
pub fn default_sort(vertical: Vertical, category: &str) -> Sort {
	if taxonomy::supports_value_sort(vertical, category) { Sort::ValueDesc } else { Sort::PriceAsc }
}

pub fn allowed_sorts(vertical: Vertical, category: &str) -> Vec<Sort> {
	let value_sort = taxonomy::supports_value_sort(vertical, category);

	Sort::ALL.into_iter().filter(|sort| *sort != Sort::ValueDesc || value_sort).collect()
}

pub fn is_sort_allowed(vertical: Vertical, category: &str, sort: Sort) -> bool {
	sort != Sort::ValueDesc || taxonomy::supports_value_sort(vertical, category)
}

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
	let page_size = u64::from(page_size.max(1));
	let pages = total.div_ceil(page_size).max(1);

	u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
	pub vertical: Vertical,
	pub q: String,
	pub category: String,
	pub brand: String,
	pub retailers: BTreeSet<String>,
	pub promo_only: bool,
	pub price_min: Option<f64>,
	pub price_max: Option<f64>,
	pub sort: Sort,
	pub page: u32,
	pub page_size: u32,
}
impl ProductFilters {
	pub fn for_vertical(vertical: Vertical) -> Self {
		Self {
			vertical,
			q: String::new(),
			category: String::new(),
			brand: String::new(),
			retailers: BTreeSet::new(),
			promo_only: false,
			price_min: None,
			price_max: None,
			sort: default_sort(vertical, ""),
			page: DEFAULT_PAGE,
			page_size: DEFAULT_PAGE_SIZE,
		}
	}

	pub fn default_sort(&self) -> Sort {
		default_sort(self.vertical, &self.category)
	}

	pub fn allows_value_sort(&self) -> bool {
		taxonomy::supports_value_sort(self.vertical, &self.category)
	}

	/// Comma-joined retailer slugs, as sent on the wire.
	pub fn retailers_param(&self) -> String {
		self.retailers.iter().map(String::as_str).collect::<Vec<_>>().join(",")
	}

	pub fn can_go_previous(&self) -> bool {
		self.page > 1
	}

	pub fn can_go_next(&self, total: u64) -> bool {
		self.page < total_pages(total, self.page_size)
	}

	/// Full parameter list for `GET /v2/products`, skipping empty text fields.
	pub fn api_params(&self) -> Vec<(&'static str, String)> {
		let mut params = vec![("vertical", self.vertical.as_str().to_string())];

		for (key, value) in [("q", &self.q), ("category", &self.category), ("brand", &self.brand)] {
			if !value.is_empty() {
				params.push((key, value.clone()));
			}
		}
		if !self.retailers.is_empty() {
			params.push(("retailers", self.retailers_param()));
		}

		params.push(("promo_only", self.promo_only.to_string()));

		if let Some(price_min) = self.price_min {
			params.push(("price_min", price_min.to_string()));
		}
		if let Some(price_max) = self.price_max {
			params.push(("price_max", price_max.to_string()));
		}

		params.push(("sort", self.sort.as_str().to_string()));
		params.push(("page", self.page.to_string()));
		params.push(("page_size", self.page_size.to_string()));

		params
	}

	fn coerce_sort(&mut self) {
		if !is_sort_allowed(self.vertical, &self.category, self.sort) {
			self.sort = self.default_sort();
		}
	}
}
impl Default for ProductFilters {
	fn default() -> Self {
		Self::for_vertical(Vertical::default())
	}
}

/// A partial update of [`ProductFilters`].
///
/// `None` leaves a field untouched. Empty values (`""`, `false`, `Some(None)`, page 0) reset the
/// field to its default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FiltersPatch {
	pub vertical: Option<Vertical>,
	pub q: Option<String>,
	pub category: Option<String>,
	pub brand: Option<String>,
	pub retailers: Option<BTreeSet<String>>,
	pub promo_only: Option<bool>,
	pub price_min: Option<Option<f64>>,
	pub price_max: Option<Option<f64>>,
	pub sort: Option<Option<Sort>>,
	pub page: Option<u32>,
	pub page_size: Option<u32>,
}
impl FiltersPatch {
	pub fn vertical(vertical: Vertical) -> Self {
		Self { vertical: Some(vertical), ..Default::default() }
	}

	pub fn query(q: impl Into<String>) -> Self {
		Self { q: Some(q.into()), ..Default::default() }
	}

	pub fn category(category: impl Into<String>) -> Self {
		Self { category: Some(category.into()), ..Default::default() }
	}

	pub fn sort(sort: Sort) -> Self {
		Self { sort: Some(Some(sort)), ..Default::default() }
	}

	pub fn page(page: u32) -> Self {
		Self { page: Some(page), ..Default::default() }
	}

	/// Switching verticals clears the vertical-specific narrowing fields.
	pub fn switch_vertical(vertical: Vertical) -> Self {
		Self {
			vertical: Some(vertical),
			category: Some(String::new()),
			brand: Some(String::new()),
			retailers: Some(BTreeSet::new()),
			promo_only: Some(false),
			sort: Some(None),
			..Default::default()
		}
	}

	/// Reads a patch from query-string syntax. Present keys are applied; unknown keys are ignored.
	pub fn from_query(query: &str) -> Self {
		let mut patch = Self::default();

		for (key, value) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
			match key.as_ref() {
				"vertical" => patch.vertical = Some(Vertical::parse_or_default(&value)),
				"q" => patch.q = Some(value.into_owned()),
				"category" => patch.category = Some(value.into_owned()),
				"brand" => patch.brand = Some(value.into_owned()),
				"retailers" => patch.retailers = Some(split_retailers(&value)),
				"promo_only" => patch.promo_only = Some(parse_flag(&value)),
				"price_min" => patch.price_min = Some(parse_price(&value)),
				"price_max" => patch.price_max = Some(parse_price(&value)),
				"sort" => patch.sort = Some(Sort::parse(&value)),
				"page" => patch.page = Some(value.trim().parse().unwrap_or(0)),
				"page_size" => patch.page_size = Some(value.trim().parse().unwrap_or(0)),
				_ => {},
			}
		}

		patch
	}

	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	fn touches_filter_fields(&self) -> bool {
		self.vertical.is_some()
			|| self.q.is_some()
			|| self.category.is_some()
			|| self.brand.is_some()
			|| self.retailers.is_some()
			|| self.promo_only.is_some()
			|| self.price_min.is_some()
			|| self.price_max.is_some()
			|| self.sort.is_some()
	}
}

/// Builds filters from a query string, coercing every absent or invalid field to its default.
pub fn parse(query: &str) -> ProductFilters {
	let mut vertical = None;
	let mut q = None;
	let mut category = None;
	let mut brand = None;
	let mut retailers = None;
	let mut promo_only = None;
	let mut price_min = None;
	let mut price_max = None;
	let mut sort = None;
	let mut page = None;
	let mut page_size = None;

	// First occurrence of a key wins.
	for (key, value) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
		let slot = match key.as_ref() {
			"vertical" => &mut vertical,
			"q" => &mut q,
			"category" => &mut category,
			"brand" => &mut brand,
			"retailers" => &mut retailers,
			"promo_only" => &mut promo_only,
			"price_min" => &mut price_min,
			"price_max" => &mut price_max,
			"sort" => &mut sort,
			"page" => &mut page,
			"page_size" => &mut page_size,
			_ => continue,
		};

		if slot.is_none() {
			*slot = Some(value.into_owned());
		}
	}

	let vertical = vertical.as_deref().map(Vertical::parse_or_default).unwrap_or_default();
	let category = clean_text(category.as_deref().unwrap_or_default());
	let mut filters = ProductFilters {
		vertical,
		q: clean_text(q.as_deref().unwrap_or_default()),
		brand: clean_text(brand.as_deref().unwrap_or_default()),
		retailers: retailers.as_deref().map(split_retailers).unwrap_or_default(),
		promo_only: promo_only.as_deref().is_some_and(parse_flag),
		price_min: price_min.as_deref().and_then(parse_price),
		price_max: price_max.as_deref().and_then(parse_price),
		sort: sort
			.as_deref()
			.and_then(Sort::parse)
			.unwrap_or_else(|| default_sort(vertical, &category)),
		page: page.as_deref().map(parse_page).unwrap_or(DEFAULT_PAGE),
		page_size: page_size.as_deref().map(parse_page_size).unwrap_or(DEFAULT_PAGE_SIZE),
		category,
	};

	filters.coerce_sort();

	filters
}

/// Merges `partial` into `current`, upholding the canonical-state invariants.
pub fn patch(current: &ProductFilters, partial: &FiltersPatch) -> ProductFilters {
	let mut next = current.clone();

	if let Some(vertical) = partial.vertical {
		next.vertical = vertical;
	}
	if let Some(q) = &partial.q {
		next.q = clean_text(q);
	}
	if let Some(category) = &partial.category {
		next.category = clean_text(category);
	}
	if let Some(brand) = &partial.brand {
		next.brand = clean_text(brand);
	}
	if let Some(retailers) = &partial.retailers {
		next.retailers = retailers.iter().flat_map(|raw| split_retailers(raw)).collect();
	}
	if let Some(promo_only) = partial.promo_only {
		next.promo_only = promo_only;
	}
	if let Some(price_min) = partial.price_min {
		next.price_min = price_min.filter(|price| is_valid_price(*price));
	}
	if let Some(price_max) = partial.price_max {
		next.price_max = price_max.filter(|price| is_valid_price(*price));
	}
	if let Some(page) = partial.page {
		next.page = page.max(DEFAULT_PAGE);
	}
	if let Some(page_size) = partial.page_size {
		next.page_size = clamp_page_size(page_size);
	}

	match partial.sort {
		Some(Some(sort)) => next.sort = sort,
		Some(None) => next.sort = next.default_sort(),
		None if next.vertical != current.vertical => next.sort = next.default_sort(),
		None => {},
	}

	next.coerce_sort();

	if partial.touches_filter_fields() {
		next.page = DEFAULT_PAGE;
	}

	next
}

/// Canonical query string: fields at their default or empty value are omitted.
pub fn serialize(filters: &ProductFilters) -> String {
	let mut out = form_urlencoded::Serializer::new(String::new());

	if filters.vertical != Vertical::default() {
		out.append_pair("vertical", filters.vertical.as_str());
	}

	for (key, value) in
		[("q", &filters.q), ("category", &filters.category), ("brand", &filters.brand)]
	{
		if !value.is_empty() {
			out.append_pair(key, value);
		}
	}

	if !filters.retailers.is_empty() {
		out.append_pair("retailers", &filters.retailers_param());
	}
	if filters.promo_only {
		out.append_pair("promo_only", "true");
	}
	if let Some(price_min) = filters.price_min {
		out.append_pair("price_min", &price_min.to_string());
	}
	if let Some(price_max) = filters.price_max {
		out.append_pair("price_max", &price_max.to_string());
	}
	if filters.sort != filters.default_sort() {
		out.append_pair("sort", filters.sort.as_str());
	}
	if filters.page != DEFAULT_PAGE {
		out.append_pair("page", &filters.page.to_string());
	}
	if filters.page_size != DEFAULT_PAGE_SIZE {
		out.append_pair("page_size", &filters.page_size.to_string());
	}

	out.finish()
}

fn strip_question_mark(query: &str) -> &str {
	query.trim().strip_prefix('?').unwrap_or(query.trim())
}

fn clean_text(raw: &str) -> String {
	raw.trim().to_string()
}

fn split_retailers(raw: &str) -> BTreeSet<String> {
	raw.split(',').map(str::trim).filter(|slug| !slug.is_empty()).map(str::to_string).collect()
}

fn parse_flag(raw: &str) -> bool {
	let raw = raw.trim();

	raw.eq_ignore_ascii_case("true") || raw == "1"
}

fn parse_price(raw: &str) -> Option<f64> {
	raw.trim().parse::<f64>().ok().filter(|price| is_valid_price(*price))
}

fn is_valid_price(price: f64) -> bool {
	price.is_finite() && price >= 0.0
}

fn parse_page(raw: &str) -> u32 {
	raw.trim().parse::<u32>().ok().filter(|page| *page >= 1).unwrap_or(DEFAULT_PAGE)
}

fn parse_page_size(raw: &str) -> u32 {
	raw.trim().parse::<u32>().map(clamp_page_size).unwrap_or(DEFAULT_PAGE_SIZE)
}

fn clamp_page_size(page_size: u32) -> u32 {
	if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size.min(MAX_PAGE_SIZE) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_query_yields_defaults() {
		let filters = parse("");

		assert_eq!(filters, ProductFilters::default());
		assert_eq!(filters.vertical, Vertical::Tech);
		assert_eq!(filters.sort, Sort::ValueDesc);
		assert_eq!(filters.page, 1);
		assert_eq!(filters.page_size, 24);
	}

	#[test]
	fn invalid_values_coerce_to_defaults() {
		let filters = parse("vertical=gardening&page=-3&page_size=abc&sort=cheapest&price_min=-5");

		assert_eq!(filters.vertical, Vertical::Tech);
		assert_eq!(filters.page, 1);
		assert_eq!(filters.page_size, 24);
		assert_eq!(filters.sort, Sort::ValueDesc);
		assert_eq!(filters.price_min, None);
	}

	#[test]
	fn first_occurrence_wins_and_text_is_decoded() {
		let filters = parse("?q=gaming+laptop&q=phone&brand=Acme%20Co&retailers=pb-tech,%20apple,,");

		assert_eq!(filters.q, "gaming laptop");
		assert_eq!(filters.brand, "Acme Co");
		assert_eq!(
			filters.retailers.iter().map(String::as_str).collect::<Vec<_>>(),
			vec!["apple", "pb-tech"]
		);
	}

	#[test]
	fn page_size_is_capped() {
		assert_eq!(parse("page_size=500").page_size, MAX_PAGE_SIZE);
		assert_eq!(parse("page_size=0").page_size, DEFAULT_PAGE_SIZE);
	}

	#[test]
	fn parse_rejects_unsupported_value_sort() {
		let filters = parse("vertical=beauty&sort=value_desc");

		assert_eq!(filters.sort, Sort::PriceAsc);

		let filters = parse("vertical=home-appliances&category=appliances&sort=value_desc");

		assert_eq!(filters.sort, Sort::PriceAsc);
	}

	#[test]
	fn capitalised_scored_category_keeps_value_sort() {
		let filters = parse("category=Laptops");

		assert_eq!(filters.sort, Sort::ValueDesc);
		assert_eq!(parse("category=Laptops&sort=value_desc").sort, Sort::ValueDesc);

		let next = patch(&ProductFilters::default(), &FiltersPatch::category("Monitors"));

		assert_eq!(next.sort, Sort::ValueDesc);
	}

	#[test]
	fn pharma_alias_parses() {
		let filters = parse("vertical=pharma");

		assert_eq!(filters.vertical, Vertical::Pharmaceuticals);
		assert_eq!(filters.sort, Sort::PriceAsc);
	}

	#[test]
	fn serialize_omits_defaults() {
		assert_eq!(serialize(&ProductFilters::default()), "");

		let filters = parse("vertical=beauty&page=3&promo_only=true&sort=price_asc");

		assert_eq!(serialize(&filters), "vertical=beauty&promo_only=true&page=3");
	}

	#[test]
	fn category_change_resets_page() {
		let current = parse("page=4");
		let next = patch(&current, &FiltersPatch::category("laptops"));

		assert_eq!(next.category, "laptops");
		assert_eq!(next.page, 1);
	}

	#[test]
	fn page_only_patch_changes_nothing_else() {
		let current = parse("vertical=supplements&category=protein&brand=Nova&promo_only=true");
		let next = patch(&current, &FiltersPatch::page(5));

		assert_eq!(next.page, 5);
		assert_eq!(ProductFilters { page: current.page, ..next }, current);
	}

	#[test]
	fn page_zero_is_clamped() {
		let next = patch(&ProductFilters::default(), &FiltersPatch::page(0));

		assert_eq!(next.page, 1);
	}

	#[test]
	fn vertical_switch_forces_default_sort() {
		let current = parse("sort=value_desc");
		let next = patch(&current, &FiltersPatch::vertical(Vertical::PetGoods));

		assert_eq!(next.sort, Sort::PriceAsc);

		let next = patch(
			&current,
			&FiltersPatch {
				vertical: Some(Vertical::PetGoods),
				sort: Some(Some(Sort::ValueDesc)),
				..Default::default()
			},
		);

		assert_eq!(next.sort, Sort::PriceAsc);
	}

	#[test]
	fn vertical_switch_without_sort_uses_new_default() {
		let current = parse("vertical=beauty&sort=price_desc");
		let next = patch(&current, &FiltersPatch::vertical(Vertical::Supplements));

		assert_eq!(next.sort, Sort::ValueDesc);
	}

	#[test]
	fn explicit_sort_survives_vertical_switch() {
		let next = patch(
			&ProductFilters::default(),
			&FiltersPatch {
				vertical: Some(Vertical::Beauty),
				sort: Some(Some(Sort::DiscountDesc)),
				..Default::default()
			},
		);

		assert_eq!(next.sort, Sort::DiscountDesc);
	}

	#[test]
	fn empty_values_clear_fields() {
		let current = parse("q=tv&brand=Acme&retailers=apple&promo_only=true&price_max=900");
		let next = patch(
			&current,
			&FiltersPatch {
				q: Some(String::new()),
				brand: Some("  ".to_string()),
				retailers: Some(BTreeSet::new()),
				promo_only: Some(false),
				price_max: Some(None),
				..Default::default()
			},
		);

		assert_eq!(next, ProductFilters::default());
	}

	#[test]
	fn switch_vertical_clears_narrowing() {
		let current = parse("category=laptops&brand=Acme&retailers=apple&promo_only=true&page=2");
		let next = patch(&current, &FiltersPatch::switch_vertical(Vertical::HomeAppliances));

		assert_eq!(next, ProductFilters::for_vertical(Vertical::HomeAppliances));
	}

	#[test]
	fn patch_from_query_applies_present_keys() {
		let patch_value = FiltersPatch::from_query("category=&page=3&sort=");

		assert_eq!(patch_value.category, Some(String::new()));
		assert_eq!(patch_value.page, Some(3));
		assert_eq!(patch_value.sort, Some(None));
		assert_eq!(patch_value.q, None);
		assert!(FiltersPatch::from_query("unknown=1").is_empty());
	}

	#[test]
	fn patched_filters_round_trip() {
		let mut filters = ProductFilters::default();
		let patches = [
			FiltersPatch::switch_vertical(Vertical::HomeAppliances),
			FiltersPatch::category("fridges"),
			FiltersPatch::query("french door & ice"),
			FiltersPatch {
				retailers: Some(["harvey-norman".to_string(), "farmers".to_string()].into()),
				price_min: Some(Some(899.5)),
				..Default::default()
			},
			FiltersPatch::sort(Sort::DiscountDesc),
			FiltersPatch { page: Some(3), page_size: Some(48), ..Default::default() },
		];

		for partial in &patches {
			filters = patch(&filters, partial);

			assert_eq!(parse(&serialize(&filters)), filters);
		}

		assert_eq!(filters.page, 3);
		assert_eq!(filters.page_size, 48);
	}

	#[test]
	fn api_params_carry_every_active_field() {
		let filters = parse("vertical=supplements&category=protein&retailers=b,a&price_max=120");
		let params = filters.api_params();

		assert!(params.contains(&("vertical", "supplements".to_string())));
		assert!(params.contains(&("retailers", "a,b".to_string())));
		assert!(params.contains(&("promo_only", "false".to_string())));
		assert!(params.contains(&("price_max", "120".to_string())));
		assert!(params.contains(&("sort", "value_desc".to_string())));
		assert!(!params.iter().any(|(key, _)| *key == "q"));
	}

	#[test]
	fn pagination_helpers() {
		assert_eq!(total_pages(0, 24), 1);
		assert_eq!(total_pages(24, 24), 1);
		assert_eq!(total_pages(25, 24), 2);
		assert_eq!(total_pages(10, 0), 10);

		let filters = parse("page=2");

		assert!(filters.can_go_previous());
		assert!(filters.can_go_next(49));
		assert!(!filters.can_go_next(48));
	}

	#[test]
	fn allowed_sorts_follow_value_support() {
		assert_eq!(allowed_sorts(Vertical::Tech, "").len(), 5);
		assert!(!allowed_sorts(Vertical::Beauty, "").contains(&Sort::ValueDesc));
	}
}
