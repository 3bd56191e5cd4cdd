//! [`CatalogProvider`] implementations: the remote HTTP API and the seeded in-memory catalog.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};
use time::Date;

use crate::{BoxFuture, CatalogProvider, Error, Result};
use worthit_domain::{
	MetaResponse, ProductDetail, ProductFilters, ProductListItem, ProductsResponse, RetailerRef,
	Vertical, filters, ranking,
};
use worthit_providers::{CatalogClient, mock};

pub struct HttpCatalog {
	client: CatalogClient,
	include_history: bool,
}
impl HttpCatalog {
	pub fn new(cfg: &worthit_config::Catalog, include_history: bool) -> Result<Self> {
		Ok(Self { client: CatalogClient::new(cfg)?, include_history })
	}
}
impl CatalogProvider for HttpCatalog {
	fn products<'a>(
		&'a self,
		filters: &'a ProductFilters,
	) -> BoxFuture<'a, Result<ProductsResponse>> {
		Box::pin(async move { Ok(self.client.products(filters).await?) })
	}

	fn product_detail<'a>(
		&'a self,
		product_id: &'a str,
		vertical: Vertical,
	) -> BoxFuture<'a, Result<ProductDetail>> {
		Box::pin(async move {
			Ok(self.client.product_detail(product_id, vertical, self.include_history).await?)
		})
	}

	fn meta<'a>(&'a self, vertical: Vertical) -> BoxFuture<'a, Result<MetaResponse>> {
		Box::pin(async move { Ok(self.client.meta(vertical).await?) })
	}
}

/// Seeded catalog answering the same contract as the HTTP API, for running offline.
pub struct MockCatalog {
	products: BTreeMap<Vertical, Vec<ProductDetail>>,
	include_history: bool,
}
impl MockCatalog {
	pub fn new(cfg: &worthit_config::Mock, include_history: bool, today: Date) -> Self {
		let products = Vertical::ALL
			.into_iter()
			.map(|vertical| {
				(vertical, mock::mock_catalog(vertical, cfg.seed, cfg.products_per_category, today))
			})
			.collect();

		Self { products, include_history }
	}

	pub fn from_products(products: Vec<ProductDetail>, include_history: bool) -> Self {
		let mut by_vertical: BTreeMap<Vertical, Vec<ProductDetail>> = BTreeMap::new();

		for product in products {
			let vertical = Vertical::parse_or_default(&product.vertical);

			by_vertical.entry(vertical).or_default().push(product);
		}

		Self { products: by_vertical, include_history }
	}

	fn vertical_products(&self, vertical: Vertical) -> &[ProductDetail] {
		self.products.get(&vertical).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn search(&self, filters: &ProductFilters) -> ProductsResponse {
		let mut items: Vec<ProductListItem> = self
			.vertical_products(filters.vertical)
			.iter()
			.map(ProductDetail::to_list_item)
			.filter(|item| matches_filters(item, filters))
			.collect();

		ranking::rank_page(&mut items, filters.sort);

		let total = items.len() as u64;
		let page_size = filters.page_size.max(1);
		let start = (filters.page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
		let items = items.into_iter().skip(start).take(page_size as usize).collect();

		ProductsResponse { items, total, page: filters.page, page_size }
	}

	pub fn detail(&self, product_id: &str, vertical: Vertical) -> Result<ProductDetail> {
		let product = self
			.vertical_products(vertical)
			.iter()
			.find(|product| product.id == product_id)
			.ok_or_else(|| Error::NotFound { message: format!("Product {product_id}.") })?;
		let mut product = product.clone();

		if !self.include_history {
			product.history = None;
		}

		Ok(product)
	}

	pub fn meta_for(&self, vertical: Vertical) -> MetaResponse {
		let taxonomy = vertical.taxonomy();
		let products = self.vertical_products(vertical);
		let brands: BTreeSet<&str> =
			products.iter().map(|product| product.brand.as_str()).collect();
		let sorts = filters::allowed_sorts(vertical, "")
			.into_iter()
			.map(|sort| sort.as_str().to_string())
			.collect();
		let mut scoring_config = Map::new();

		scoring_config.insert(
			"value_score_categories".to_string(),
			json!(taxonomy.value_score_categories),
		);
		scoring_config.insert(
			"default_sort".to_string(),
			Value::String(filters::default_sort(vertical, "").as_str().to_string()),
		);

		MetaResponse {
			vertical: Some(vertical.as_str().to_string()),
			categories: taxonomy.categories.iter().map(|category| category.to_string()).collect(),
			brands: brands.into_iter().map(str::to_string).collect(),
			retailers: taxonomy
				.retailers
				.iter()
				.map(|slug| RetailerRef { slug: slug.to_string(), name: retailer_name(slug) })
				.collect(),
			filters: BTreeMap::from([("sort".to_string(), sorts)]),
			scoring_config,
		}
	}
}
impl CatalogProvider for MockCatalog {
	fn products<'a>(
		&'a self,
		filters: &'a ProductFilters,
	) -> BoxFuture<'a, Result<ProductsResponse>> {
		Box::pin(async move { Ok(self.search(filters)) })
	}

	fn product_detail<'a>(
		&'a self,
		product_id: &'a str,
		vertical: Vertical,
	) -> BoxFuture<'a, Result<ProductDetail>> {
		Box::pin(async move { self.detail(product_id, vertical) })
	}

	fn meta<'a>(&'a self, vertical: Vertical) -> BoxFuture<'a, Result<MetaResponse>> {
		Box::pin(async move { Ok(self.meta_for(vertical)) })
	}
}

fn matches_filters(item: &ProductListItem, filters: &ProductFilters) -> bool {
	let q = filters.q.trim().to_lowercase();

	if !q.is_empty()
		&& !item.canonical_name.to_lowercase().contains(&q)
		&& !item.brand.to_lowercase().contains(&q)
	{
		return false;
	}
	if !filters.category.is_empty() && !item.category.eq_ignore_ascii_case(&filters.category) {
		return false;
	}
	if !filters.brand.is_empty() && !item.brand.eq_ignore_ascii_case(&filters.brand) {
		return false;
	}

	let Some(offer) = item.best_offer.as_ref() else {
		return filters.retailers.is_empty()
			&& !filters.promo_only
			&& filters.price_min.is_none()
			&& filters.price_max.is_none();
	};
	let price = offer.effective_price();

	(filters.retailers.is_empty() || filters.retailers.contains(&offer.retailer))
		&& (!filters.promo_only || offer.on_promo())
		&& filters.price_min.is_none_or(|min| price >= min)
		&& filters.price_max.is_none_or(|max| price <= max)
}

fn retailer_name(slug: &str) -> String {
	slug.split('-')
		.map(|word| {
			let mut chars = word.chars();

			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;
	use worthit_domain::{FiltersPatch, Sort};

	fn catalog() -> MockCatalog {
		let cfg = worthit_config::Mock { seed: 11, products_per_category: 10 };

		MockCatalog::new(&cfg, false, date!(2025 - 03 - 14))
	}

	#[test]
	fn pages_are_bounded_and_totals_are_stable() {
		let catalog = catalog();
		let mut filters = ProductFilters::for_vertical(Vertical::Tech);

		filters.page_size = 7;

		let first = catalog.search(&filters);

		filters.page = 5;

		let last = catalog.search(&filters);

		assert_eq!(first.total, 30);
		assert_eq!(first.items.len(), 7);
		assert_eq!(last.total, 30);
		assert_eq!(last.items.len(), 2);
	}

	#[test]
	fn value_sort_orders_scores_descending() {
		let catalog = catalog();
		let filters = filters::patch(
			&ProductFilters::for_vertical(Vertical::Tech),
			&FiltersPatch::category("laptops"),
		);

		assert_eq!(filters.sort, Sort::ValueDesc);

		let page = catalog.search(&filters);
		let scores: Vec<f64> = page.items.iter().filter_map(|item| item.value_score).collect();

		assert_eq!(scores.len(), page.items.len());
		assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
		assert!(page.items.iter().all(|item| item.category == "laptops"));
	}

	#[test]
	fn price_bounds_and_promo_filter_apply_to_best_offer() {
		let catalog = catalog();
		let filters = ProductFilters {
			promo_only: true,
			price_min: Some(10.0),
			price_max: Some(120.0),
			page_size: 100,
			..ProductFilters::for_vertical(Vertical::Beauty)
		};

		for item in catalog.search(&filters).items {
			let offer = item.best_offer.expect("Expected a best offer.");

			assert!(offer.on_promo());
			assert!((10.0..=120.0).contains(&offer.effective_price()));
		}
	}

	#[test]
	fn detail_strips_history_unless_requested() {
		let catalog = catalog();
		let id = catalog.search(&ProductFilters::default()).items[0].id.clone();
		let detail = catalog.detail(&id, Vertical::Tech).expect("Expected product detail.");

		assert!(detail.history.is_none());
		assert!(matches!(
			catalog.detail("missing", Vertical::Tech),
			Err(Error::NotFound { .. })
		));
	}

	#[test]
	fn meta_lists_taxonomy_and_brands() {
		let meta = catalog().meta_for(Vertical::PetGoods);

		assert_eq!(meta.vertical.as_deref(), Some("pet-goods"));
		assert_eq!(meta.categories.len(), 7);
		assert!(!meta.brands.is_empty());
		assert_eq!(meta.retailers[1], RetailerRef {
			slug: "petdirect".to_string(),
			name: "Petdirect".to_string(),
		});
		assert_eq!(meta.filters["sort"], vec![
			"price_asc",
			"price_desc",
			"discount_desc",
			"relevance"
		]);
	}
}
