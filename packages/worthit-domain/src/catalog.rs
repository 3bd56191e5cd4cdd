//! Wire types of the catalog API (`/v2/products`, `/v2/products/{id}`, `/v2/meta`, `/lookup`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	attributes::{self, Attributes},
	scoring::{self, ValueScoreInput},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
	pub retailer: String,
	#[serde(default)]
	pub retailer_product_id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub availability: Option<String>,
	pub price_nzd: f64,
	#[serde(default)]
	pub promo_price_nzd: Option<f64>,
	#[serde(default)]
	pub promo_text: Option<String>,
	#[serde(default)]
	pub discount_pct: Option<f64>,
	#[serde(default)]
	pub captured_at: String,
}
impl Offer {
	/// Promotional price when present and positive, else the list price.
	pub fn effective_price(&self) -> f64 {
		self.promo_price_nzd.filter(|promo| *promo > 0.0).unwrap_or(self.price_nzd)
	}

	pub fn on_promo(&self) -> bool {
		self.promo_price_nzd.is_some_and(|promo| promo > 0.0 && promo < self.price_nzd)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductListItem {
	pub id: String,
	pub canonical_name: String,
	pub vertical: String,
	#[serde(default)]
	pub brand: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default, deserialize_with = "attributes::deserialize")]
	pub attributes: Attributes,
	#[serde(default)]
	pub best_offer: Option<Offer>,
	#[serde(default)]
	pub offers_count: u32,
	#[serde(default)]
	pub value_score: Option<f64>,
}
impl ProductListItem {
	pub fn effective_price(&self) -> Option<f64> {
		self.best_offer.as_ref().map(Offer::effective_price)
	}

	/// Recomputes the value score from raw attributes and the best offer.
	pub fn computed_value_score(&self) -> Option<f64> {
		scoring::compute_value_score(&ValueScoreInput {
			category: &self.category,
			attributes: &self.attributes,
			effective_price: self.effective_price(),
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
	pub items: Vec<ProductListItem>,
	pub total: u64,
	pub page: u32,
	pub page_size: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
	pub id: String,
	pub canonical_name: String,
	pub vertical: String,
	#[serde(default)]
	pub brand: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub model_number: Option<String>,
	#[serde(default)]
	pub gtin: Option<String>,
	#[serde(default)]
	pub mpn: Option<String>,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default, deserialize_with = "attributes::deserialize")]
	pub attributes: Attributes,
	#[serde(default)]
	pub offers: Vec<Offer>,
	#[serde(default)]
	pub value_score: Option<f64>,
	#[serde(default)]
	pub history: Option<Vec<Offer>>,
}
impl ProductDetail {
	/// Offer with the lowest effective price.
	pub fn best_offer(&self) -> Option<&Offer> {
		self.offers
			.iter()
			.min_by(|left, right| left.effective_price().total_cmp(&right.effective_price()))
	}

	pub fn to_list_item(&self) -> ProductListItem {
		ProductListItem {
			id: self.id.clone(),
			canonical_name: self.canonical_name.clone(),
			vertical: self.vertical.clone(),
			brand: self.brand.clone(),
			category: self.category.clone(),
			image_url: self.image_url.clone(),
			attributes: self.attributes.clone(),
			best_offer: self.best_offer().cloned(),
			offers_count: self.offers.len() as u32,
			value_score: self.value_score,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerRef {
	pub slug: String,
	pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaResponse {
	#[serde(default)]
	pub vertical: Option<String>,
	#[serde(default)]
	pub categories: Vec<String>,
	#[serde(default)]
	pub brands: Vec<String>,
	#[serde(default)]
	pub retailers: Vec<RetailerRef>,
	#[serde(default)]
	pub filters: BTreeMap<String, Vec<String>>,
	#[serde(default)]
	pub scoring_config: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
	pub name: String,
	pub detected_from_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupProduct {
	pub name: String,
	pub brand: String,
	pub size: String,
	pub matched_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPrice {
	pub cents: i64,
	pub display: String,
	pub captured_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
	pub date: String,
	pub price_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparePrice {
	pub store: String,
	pub price_cents: i64,
	pub display: String,
}

/// Legacy single-product lookup payload used by the browser extension popup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
	pub store: StoreInfo,
	pub product: LookupProduct,
	pub current_price: CurrentPrice,
	#[serde(default)]
	pub history: Vec<HistoryPoint>,
	#[serde(default)]
	pub compare: Vec<ComparePrice>,
}

/// Formats cents as `$12.34`.
pub fn format_cents(cents: i64) -> String {
	let sign = if cents < 0 { "-" } else { "" };
	let abs = cents.unsigned_abs();

	format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
