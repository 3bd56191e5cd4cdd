use std::{
	sync::{Arc, Mutex},
	time::Duration,
};

use worthit_domain::{
	FiltersPatch, MetaResponse, ProductDetail, ProductFilters, ProductListItem, ProductsResponse,
	Vertical,
};
use worthit_service::{BoxFuture, CatalogProvider, Error, LoadState, Orchestrator, Result};

const DEBOUNCE: Duration = Duration::from_millis(220);

/// Catalog double with per-request latency and a request log.
#[derive(Default)]
struct ScriptedCatalog {
	products_calls: Mutex<Vec<ProductFilters>>,
	meta_calls: Mutex<Vec<Vertical>>,
	detail_calls: Mutex<Vec<String>>,
}
impl ScriptedCatalog {
	fn products_calls(&self) -> Vec<ProductFilters> {
		self.products_calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn meta_calls(&self) -> Vec<Vertical> {
		self.meta_calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn detail_calls(&self) -> Vec<String> {
		self.detail_calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl CatalogProvider for ScriptedCatalog {
	fn products<'a>(
		&'a self,
		filters: &'a ProductFilters,
	) -> BoxFuture<'a, Result<ProductsResponse>> {
		self.products_calls.lock().unwrap_or_else(|err| err.into_inner()).push(filters.clone());

		Box::pin(async move {
			// The first page is slow so a later page can overtake it.
			let latency = if filters.page == 1 { 300 } else { 10 };

			tokio::time::sleep(Duration::from_millis(latency)).await;

			match filters.q.as_str() {
				"boom" => Err(Error::Provider {
					message: "Failed to fetch products (503).".to_string(),
				}),
				"nothing" => Ok(page(filters, &[])),
				_ => Ok(page(filters, &["p-1", "p-2"])),
			}
		})
	}

	fn product_detail<'a>(
		&'a self,
		product_id: &'a str,
		vertical: Vertical,
	) -> BoxFuture<'a, Result<ProductDetail>> {
		self.detail_calls
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(product_id.to_string());

		Box::pin(async move {
			tokio::time::sleep(Duration::from_millis(50)).await;

			Ok(ProductDetail {
				id: product_id.to_string(),
				canonical_name: product_id.to_string(),
				vertical: vertical.as_str().to_string(),
				brand: String::new(),
				category: String::new(),
				model_number: None,
				gtin: None,
				mpn: None,
				image_url: None,
				attributes: Default::default(),
				offers: Vec::new(),
				value_score: None,
				history: None,
			})
		})
	}

	fn meta<'a>(&'a self, vertical: Vertical) -> BoxFuture<'a, Result<MetaResponse>> {
		self.meta_calls.lock().unwrap_or_else(|err| err.into_inner()).push(vertical);

		Box::pin(async move {
			tokio::time::sleep(Duration::from_millis(20)).await;

			Ok(MetaResponse { vertical: Some(vertical.as_str().to_string()), ..Default::default() })
		})
	}
}

fn page(filters: &ProductFilters, ids: &[&str]) -> ProductsResponse {
	let items = ids
		.iter()
		.map(|id| ProductListItem {
			id: id.to_string(),
			canonical_name: id.to_string(),
			vertical: filters.vertical.as_str().to_string(),
			brand: String::new(),
			category: String::new(),
			image_url: None,
			attributes: Default::default(),
			best_offer: None,
			offers_count: 0,
			value_score: None,
		})
		.collect();

	ProductsResponse {
		items,
		total: 50,
		page: filters.page,
		page_size: filters.page_size,
	}
}

fn start() -> (Arc<ScriptedCatalog>, Orchestrator) {
	let catalog = Arc::new(ScriptedCatalog::default());
	let filters = ProductFilters::for_vertical(Vertical::Tech);
	let orchestrator = Orchestrator::spawn(catalog.clone(), DEBOUNCE, filters);

	(catalog, orchestrator)
}

#[tokio::test(start_paused = true)]
async fn stale_products_response_is_dropped() {
	let (catalog, orchestrator) = start();

	// The page 1 request goes out at 220ms and resolves at 520ms.
	tokio::time::sleep(Duration::from_millis(250)).await;

	orchestrator.patch(FiltersPatch::page(2)).await.expect("Failed to patch filters.");

	let settled = orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(settled.products().data.as_ref().map(|data| data.page), Some(2));

	tokio::time::sleep(Duration::from_millis(500)).await;

	let snapshot = orchestrator.snapshot();
	let pages: Vec<u32> = catalog.products_calls().iter().map(|filters| filters.page).collect();

	assert_eq!(pages, vec![1, 2]);
	assert_eq!(snapshot.products().data.as_ref().map(|data| data.page), Some(2));
	assert_eq!(snapshot.products().state, LoadState::Ready);
}

#[tokio::test(start_paused = true)]
async fn rapid_patches_issue_one_products_fetch() {
	let (catalog, orchestrator) = start();

	for q in ["z", "ze", "zen"] {
		orchestrator.patch(FiltersPatch::query(q)).await.expect("Failed to patch filters.");
		tokio::time::sleep(Duration::from_millis(50)).await;
	}

	let settled = orchestrator.settled().await.expect("Orchestrator stopped.");
	let calls = catalog.products_calls();

	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].q, "zen");
	assert_eq!(settled.products().state, LoadState::Ready);
}

#[tokio::test(start_paused = true)]
async fn patch_is_visible_before_fetch_completes() {
	let (_catalog, orchestrator) = start();

	orchestrator.patch(FiltersPatch::category("laptops")).await.expect("Failed to patch filters.");

	let snapshot = orchestrator.snapshot();

	assert_eq!(snapshot.filters().category, "laptops");
	assert_eq!(snapshot.products().state, LoadState::Loading);
}

#[tokio::test(start_paused = true)]
async fn meta_follows_vertical_changes_only() {
	let (catalog, orchestrator) = start();

	orchestrator.settled().await.expect("Orchestrator stopped.");
	orchestrator.patch(FiltersPatch::query("zen")).await.expect("Failed to patch filters.");
	orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(catalog.meta_calls(), vec![Vertical::Tech]);

	orchestrator
		.patch(FiltersPatch::switch_vertical(Vertical::Beauty))
		.await
		.expect("Failed to patch filters.");

	let settled = orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(catalog.meta_calls(), vec![Vertical::Tech, Vertical::Beauty]);
	assert_eq!(
		settled.meta().data.as_ref().and_then(|meta| meta.vertical.as_deref()),
		Some("beauty")
	);
}

#[tokio::test(start_paused = true)]
async fn empty_results_clear_selection_and_detail() {
	let (catalog, orchestrator) = start();

	orchestrator.settled().await.expect("Orchestrator stopped.");
	orchestrator.select(Some("p-1".to_string())).await.expect("Failed to select product.");

	let settled = orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(settled.detail().data.as_ref().map(|detail| detail.id.as_str()), Some("p-1"));
	assert_eq!(catalog.detail_calls(), vec!["p-1".to_string()]);

	orchestrator.patch(FiltersPatch::query("nothing")).await.expect("Failed to patch filters.");

	let settled = orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(settled.selected_id(), None);
	assert!(settled.detail().data.is_none());
	assert_eq!(settled.detail().state, LoadState::Idle);
}

#[tokio::test(start_paused = true)]
async fn clearing_selection_clears_detail_without_waiting() {
	let (_catalog, orchestrator) = start();

	orchestrator.select(Some("p-2".to_string())).await.expect("Failed to select product.");
	orchestrator.settled().await.expect("Orchestrator stopped.");
	orchestrator.select(None).await.expect("Failed to clear selection.");

	let snapshot = orchestrator.snapshot();

	assert_eq!(snapshot.selected_id(), None);
	assert!(snapshot.detail().data.is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_data() {
	let (_catalog, orchestrator) = start();
	let before = orchestrator.settled().await.expect("Orchestrator stopped.");

	orchestrator.patch(FiltersPatch::query("boom")).await.expect("Failed to patch filters.");

	let after = orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(after.products().state, LoadState::Failed);
	assert_eq!(after.products().data, before.products().data);
	assert_eq!(after.meta().state, LoadState::Ready);
	assert_eq!(after.error(), Some("Failed to fetch products (503)."));
}

#[tokio::test(start_paused = true)]
async fn refresh_skips_debounce() {
	let (catalog, orchestrator) = start();

	orchestrator.refresh().await.expect("Failed to refresh.");
	orchestrator.settled().await.expect("Orchestrator stopped.");

	assert_eq!(catalog.products_calls().len(), 1);
	assert_eq!(catalog.meta_calls().len(), 2);
}
