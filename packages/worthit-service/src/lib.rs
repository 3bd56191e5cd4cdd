pub mod catalog;
pub mod lookup;
pub mod orchestrator;
pub mod store;

mod error;

pub use catalog::{HttpCatalog, MockCatalog};
pub use error::{Error, Result};
pub use lookup::{LookupReport, LookupService, LookupSource};
pub use orchestrator::Orchestrator;
pub use store::{LoadState, Resource, ResourceKind, ResultsStore};

use std::{future::Future, pin::Pin, sync::Arc};

use worthit_config::Config;
use worthit_domain::{MetaResponse, ProductDetail, ProductFilters, ProductsResponse, Vertical};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of catalog pages, product details and vertical metadata.
pub trait CatalogProvider
where
	Self: Send + Sync,
{
	fn products<'a>(
		&'a self,
		filters: &'a ProductFilters,
	) -> BoxFuture<'a, Result<ProductsResponse>>;

	fn product_detail<'a>(
		&'a self,
		product_id: &'a str,
		vertical: Vertical,
	) -> BoxFuture<'a, Result<ProductDetail>>;

	fn meta<'a>(&'a self, vertical: Vertical) -> BoxFuture<'a, Result<MetaResponse>>;
}

/// Builds the provider selected by `catalog.mode`.
pub fn catalog_provider(cfg: &Config) -> Result<Arc<dyn CatalogProvider>> {
	if cfg.catalog.is_mock() {
		let today = time::OffsetDateTime::now_utc().date();

		tracing::info!(
			seed = cfg.mock.seed,
			products_per_category = cfg.mock.products_per_category,
			"Using mock catalog."
		);

		return Ok(Arc::new(MockCatalog::new(&cfg.mock, cfg.search.include_history, today)));
	}

	Ok(Arc::new(HttpCatalog::new(&cfg.catalog, cfg.search.include_history)?))
}
