//! Synchronous state of one browsing session: canonical filters, the three fetched resources,
//! the selected product and the latest error.
//!
//! Every resource carries an epoch. Starting a fetch hands out the current epoch; a result is
//! applied only if its epoch is still current, so responses to superseded requests are dropped on
//! arrival regardless of the order in which they complete.

use serde::Serialize;

use worthit_domain::{
	FiltersPatch, MetaResponse, ProductDetail, ProductFilters, ProductsResponse, Vertical, filters,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
	#[default]
	Idle,
	Loading,
	Ready,
	Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	Meta,
	Products,
	Detail,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resource<T> {
	pub state: LoadState,
	/// Last successfully loaded value; kept while reloading and after a failure.
	pub data: Option<T>,
	#[serde(skip)]
	epoch: u64,
}
impl<T> Resource<T> {
	pub fn is_loading(&self) -> bool {
		self.state == LoadState::Loading
	}

	fn invalidate(&mut self) -> u64 {
		self.epoch += 1;
		self.state = LoadState::Loading;

		self.epoch
	}

	fn clear(&mut self) {
		self.epoch += 1;
		self.state = LoadState::Idle;
		self.data = None;
	}

	fn is_current(&self, epoch: u64) -> bool {
		self.epoch == epoch && self.is_loading()
	}
}
impl<T> Default for Resource<T> {
	fn default() -> Self {
		Self { state: LoadState::Idle, data: None, epoch: 0 }
	}
}

/// What a filter patch changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterChange {
	/// Epoch of the products fetch the new state requires, if the state changed at all.
	pub products_epoch: Option<u64>,
	/// Epoch of the meta fetch, if the vertical changed.
	pub meta_epoch: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultsStore {
	filters: ProductFilters,
	meta: Resource<MetaResponse>,
	products: Resource<ProductsResponse>,
	detail: Resource<ProductDetail>,
	selected_id: Option<String>,
	error: Option<String>,
	#[serde(skip)]
	error_source: Option<ResourceKind>,
}
impl ResultsStore {
	pub fn new(filters: ProductFilters) -> Self {
		Self {
			filters,
			meta: Resource::default(),
			products: Resource::default(),
			detail: Resource::default(),
			selected_id: None,
			error: None,
			error_source: None,
		}
	}

	pub fn filters(&self) -> &ProductFilters {
		&self.filters
	}

	pub fn meta(&self) -> &Resource<MetaResponse> {
		&self.meta
	}

	pub fn products(&self) -> &Resource<ProductsResponse> {
		&self.products
	}

	pub fn detail(&self) -> &Resource<ProductDetail> {
		&self.detail
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.selected_id.as_deref()
	}

	/// Most recent fetch failure, cleared once the failing resource loads again.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// No fetch is outstanding.
	pub fn is_settled(&self) -> bool {
		!self.meta.is_loading() && !self.products.is_loading() && !self.detail.is_loading()
	}

	/// Marks every resource the initial state needs as pending.
	pub fn start(&mut self) -> FilterChange {
		FilterChange {
			products_epoch: Some(self.products.invalidate()),
			meta_epoch: Some(self.meta.invalidate()),
		}
	}

	/// Merges `patch` into the canonical filters and invalidates what depends on them.
	///
	/// A vertical change also invalidates meta and drops the selection.
	pub fn apply_patch(&mut self, patch: &FiltersPatch) -> FilterChange {
		let next = filters::patch(&self.filters, patch);

		if next == self.filters {
			return FilterChange { products_epoch: None, meta_epoch: None };
		}

		let vertical_changed = next.vertical != self.filters.vertical;

		self.filters = next;

		if vertical_changed {
			self.select(None);
		}

		FilterChange {
			products_epoch: Some(self.products.invalidate()),
			meta_epoch: vertical_changed.then(|| self.meta.invalidate()),
		}
	}

	/// Filters to fetch for `epoch`, or `None` when a newer change superseded it.
	/// Whether `epoch` is the products load still waiting for its result.
	pub fn is_current_products(&self, epoch: u64) -> bool {
		self.products.is_current(epoch)
	}

	pub fn products_request(&self, epoch: u64) -> Option<ProductFilters> {
		self.products.is_current(epoch).then(|| self.filters.clone())
	}

	pub fn meta_request(&self, epoch: u64) -> Option<Vertical> {
		self.meta.is_current(epoch).then_some(self.filters.vertical)
	}

	/// Applies a products result. Returns `false` when the result is stale and was dropped.
	///
	/// An empty page clears the selection and its detail.
	pub fn finish_products(
		&mut self,
		epoch: u64,
		result: Result<ProductsResponse, String>,
	) -> bool {
		if !self.products.is_current(epoch) {
			return false;
		}

		match result {
			Ok(response) => {
				let empty = response.items.is_empty();

				self.products.data = Some(response);
				self.products.state = LoadState::Ready;
				self.clear_error(ResourceKind::Products);

				if empty {
					self.select(None);
				}
			},
			Err(message) => self.fail(ResourceKind::Products, message),
		}

		true
	}

	pub fn finish_meta(&mut self, epoch: u64, result: Result<MetaResponse, String>) -> bool {
		if !self.meta.is_current(epoch) {
			return false;
		}

		match result {
			Ok(meta) => {
				self.meta.data = Some(meta);
				self.meta.state = LoadState::Ready;
				self.clear_error(ResourceKind::Meta);
			},
			Err(message) => self.fail(ResourceKind::Meta, message),
		}

		true
	}

	/// Changes the selection. Returns the detail epoch to fetch for, if any.
	///
	/// Clearing the selection clears the detail immediately.
	pub fn select(&mut self, product_id: Option<String>) -> Option<u64> {
		let product_id = product_id.filter(|id| !id.trim().is_empty());

		if product_id == self.selected_id {
			return None;
		}

		self.selected_id = product_id;

		if self.selected_id.is_none() {
			self.detail.clear();

			if self.error_source == Some(ResourceKind::Detail) {
				self.error = None;
				self.error_source = None;
			}

			return None;
		}

		Some(self.detail.invalidate())
	}

	pub fn detail_request(&self, epoch: u64) -> Option<(String, Vertical)> {
		if !self.detail.is_current(epoch) {
			return None;
		}

		self.selected_id.clone().map(|id| (id, self.filters.vertical))
	}

	pub fn finish_detail(&mut self, epoch: u64, result: Result<ProductDetail, String>) -> bool {
		if !self.detail.is_current(epoch) {
			return false;
		}

		match result {
			Ok(detail) => {
				self.detail.data = Some(detail);
				self.detail.state = LoadState::Ready;
				self.clear_error(ResourceKind::Detail);
			},
			Err(message) => self.fail(ResourceKind::Detail, message),
		}

		true
	}

	fn fail(&mut self, kind: ResourceKind, message: String) {
		match kind {
			ResourceKind::Meta => self.meta.state = LoadState::Failed,
			ResourceKind::Products => self.products.state = LoadState::Failed,
			ResourceKind::Detail => self.detail.state = LoadState::Failed,
		}

		self.error = Some(message);
		self.error_source = Some(kind);
	}

	fn clear_error(&mut self, kind: ResourceKind) {
		if self.error_source == Some(kind) {
			self.error = None;
			self.error_source = None;
		}
	}
}
impl Default for ResultsStore {
	fn default() -> Self {
		Self::new(ProductFilters::default())
	}
}
