use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::{Error, Result};
use worthit_domain::{
	LookupResponse, MetaResponse, ProductDetail, ProductFilters, ProductsResponse, Vertical,
};

/// HTTP client for the remote catalog API.
#[derive(Clone, Debug)]
pub struct CatalogClient {
	http: Client,
	api_base: Url,
}
impl CatalogClient {
	pub fn new(cfg: &worthit_config::Catalog) -> Result<Self> {
		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::default_headers(&cfg.default_headers)?)
			.build()?;
		let api_base = Url::parse(&cfg.api_base)
			.map_err(|err| Error::InvalidUrl { message: format!("{}: {err}", cfg.api_base) })?;

		if api_base.cannot_be_a_base() {
			return Err(Error::InvalidUrl {
				message: format!("{} cannot be a base.", cfg.api_base),
			});
		}

		Ok(Self { http, api_base })
	}

	/// `GET /v2/products` for the given filter state.
	pub async fn products(&self, filters: &ProductFilters) -> Result<ProductsResponse> {
		let url = self.endpoint(&["v2", "products"])?;

		self.get_json("products", url, &filters.api_params()).await
	}

	/// `GET /v2/products/{id}`.
	pub async fn product_detail(
		&self,
		product_id: &str,
		vertical: Vertical,
		include_history: bool,
	) -> Result<ProductDetail> {
		let url = self.endpoint(&["v2", "products", product_id])?;
		let mut query = vec![("vertical", vertical.as_str().to_string())];

		if include_history {
			query.push(("include_history", "true".to_string()));
		}

		self.get_json("product detail", url, &query).await
	}

	/// `GET /v2/meta`.
	pub async fn meta(&self, vertical: Vertical) -> Result<MetaResponse> {
		let url = self.endpoint(&["v2", "meta"])?;

		self.get_json("meta", url, &[("vertical", vertical.as_str().to_string())]).await
	}

	/// Legacy `GET /lookup` used by the browser extension popup.
	pub async fn lookup(&self, page_url: &str, title: &str) -> Result<LookupResponse> {
		let url = self.endpoint(&["lookup"])?;

		let query = [("url", page_url.to_string()), ("title", title.to_string())];

		self.get_json("lookup", url, &query).await
	}

	fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| Error::InvalidUrl {
				message: format!("{} cannot be a base.", self.api_base),
			})?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	async fn get_json<T>(
		&self,
		resource: &'static str,
		url: Url,
		query: &[(&str, String)],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		tracing::debug!(resource, url = %url, "Fetching catalog resource.");

		let res = self.http.get(url).query(query).send().await?;
		let status = res.status();

		if !status.is_success() {
			tracing::warn!(resource, status = status.as_u16(), "Catalog request failed.");

			return Err(Error::Status { resource, status: status.as_u16() });
		}

		let body = res.bytes().await?;

		Ok(serde_json::from_slice(&body)?)
	}
}
