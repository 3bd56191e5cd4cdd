//! Debouncing fetch orchestrator.
//!
//! A single actor task owns the [`ResultsStore`]; it is the only writer. Commands from the
//! [`Orchestrator`] handle and completions of its own timers and fetches arrive on channels and
//! are applied one at a time. Each state change is published on a `watch` channel.
//!
//! - `products` is fetched after `debounce` has elapsed without a further filter change.
//! - `meta` is fetched immediately, and only when the vertical changes.
//! - `detail` is fetched when the selection changes.
//!
//! In-flight fetches are never aborted. Their results carry the epoch they were issued for and
//! the store drops them if that epoch is no longer current.

use std::{sync::Arc, time::Duration};

use tokio::{
	sync::{mpsc, oneshot, watch},
	task::JoinHandle,
};

use crate::{
	CatalogProvider, Error, Result,
	store::{FilterChange, ResultsStore},
};
use worthit_domain::{FiltersPatch, MetaResponse, ProductDetail, ProductFilters, ProductsResponse};

enum Command {
	Patch { patch: FiltersPatch, ack: oneshot::Sender<()> },
	Select { product_id: Option<String>, ack: oneshot::Sender<()> },
	Refresh { ack: oneshot::Sender<()> },
}

enum Event {
	DebounceElapsed { epoch: u64 },
	Products { epoch: u64, result: std::result::Result<ProductsResponse, String> },
	Meta { epoch: u64, result: std::result::Result<MetaResponse, String> },
	Detail { epoch: u64, result: std::result::Result<ProductDetail, String> },
}

/// Handle to a running orchestrator. Dropping it stops the actor.
pub struct Orchestrator {
	commands: mpsc::UnboundedSender<Command>,
	snapshots: watch::Receiver<ResultsStore>,
	task: JoinHandle<()>,
}
impl Orchestrator {
	/// Starts the actor for `filters`: meta is requested at once, products after the debounce.
	pub fn spawn(
		provider: Arc<dyn CatalogProvider>,
		debounce: Duration,
		filters: ProductFilters,
	) -> Self {
		let mut store = ResultsStore::new(filters);
		let initial = store.start();
		let (commands, command_rx) = mpsc::unbounded_channel();
		let (events, event_rx) = mpsc::unbounded_channel();
		let (snapshot_tx, snapshots) = watch::channel(store.clone());
		let actor = Actor {
			provider,
			debounce,
			store,
			events,
			debounce_task: None,
			snapshots: snapshot_tx,
		};
		let task = tokio::spawn(actor.run(initial, command_rx, event_rx));

		Self { commands, snapshots, task }
	}

	/// Applies a filter patch. When this returns the new state is already published.
	pub async fn patch(&self, patch: FiltersPatch) -> Result<()> {
		self.send(|ack| Command::Patch { patch, ack }).await
	}

	/// Changes the selection. Clearing it clears the detail before this returns.
	pub async fn select(&self, product_id: Option<String>) -> Result<()> {
		self.send(|ack| Command::Select { product_id, ack }).await
	}

	/// Refetches meta and products for the current filters, skipping the debounce.
	pub async fn refresh(&self) -> Result<()> {
		self.send(|ack| Command::Refresh { ack }).await
	}

	pub fn snapshot(&self) -> ResultsStore {
		self.snapshots.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<ResultsStore> {
		self.snapshots.clone()
	}

	/// Waits until no fetch is outstanding and returns that state.
	pub async fn settled(&self) -> Result<ResultsStore> {
		let mut snapshots = self.snapshots.clone();
		let store = snapshots.wait_for(ResultsStore::is_settled).await.map_err(|_| Error::Closed)?;

		Ok(store.clone())
	}

	async fn send(&self, command: impl FnOnce(oneshot::Sender<()>) -> Command) -> Result<()> {
		let (ack, done) = oneshot::channel();

		self.commands.send(command(ack)).map_err(|_| Error::Closed)?;

		done.await.map_err(|_| Error::Closed)
	}
}
impl Drop for Orchestrator {
	fn drop(&mut self) {
		self.task.abort();
	}
}

struct Actor {
	provider: Arc<dyn CatalogProvider>,
	debounce: Duration,
	store: ResultsStore,
	events: mpsc::UnboundedSender<Event>,
	debounce_task: Option<JoinHandle<()>>,
	snapshots: watch::Sender<ResultsStore>,
}
impl Actor {
	async fn run(
		mut self,
		initial: FilterChange,
		mut commands: mpsc::UnboundedReceiver<Command>,
		mut events: mpsc::UnboundedReceiver<Event>,
	) {
		self.apply_change(initial);

		loop {
			tokio::select! {
				command = commands.recv() => {
					let Some(command) = command else {
						break;
					};

					self.handle_command(command);
				},
				Some(event) = events.recv() => self.handle_event(event),
			}
		}

		if let Some(task) = self.debounce_task.take() {
			task.abort();
		}

		tracing::debug!("Orchestrator stopped.");
	}

	fn handle_command(&mut self, command: Command) {
		let ack = match command {
			Command::Patch { patch, ack } => {
				let change = self.store.apply_patch(&patch);

				self.apply_change(change);

				ack
			},
			Command::Select { product_id, ack } => {
				if let Some(epoch) = self.store.select(product_id) {
					self.fetch_detail(epoch);
				}

				ack
			},
			Command::Refresh { ack } => {
				let change = self.store.start();

				if let Some(task) = self.debounce_task.take() {
					task.abort();
				}
				if let Some(epoch) = change.products_epoch {
					self.fetch_products(epoch);
				}
				if let Some(epoch) = change.meta_epoch {
					self.fetch_meta(epoch);
				}

				ack
			},
		};

		self.publish();

		let _ = ack.send(());
	}

	fn handle_event(&mut self, event: Event) {
		let applied = match event {
			Event::DebounceElapsed { epoch } => {
				// A superseded timer must not detach the handle of the one still pending.
				if self.store.is_current_products(epoch) {
					self.debounce_task = None;
				}

				self.fetch_products(epoch);

				false
			},
			Event::Products { epoch, result } => {
				let applied = self.store.finish_products(epoch, result);

				if !applied {
					tracing::debug!(epoch, "Dropped stale products response.");
				}

				applied
			},
			Event::Meta { epoch, result } => self.store.finish_meta(epoch, result),
			Event::Detail { epoch, result } => self.store.finish_detail(epoch, result),
		};

		if applied {
			self.publish();
		}
	}

	fn apply_change(&mut self, change: FilterChange) {
		if let Some(epoch) = change.meta_epoch {
			self.fetch_meta(epoch);
		}
		if let Some(epoch) = change.products_epoch {
			self.schedule_products(epoch);
		}
	}

	fn schedule_products(&mut self, epoch: u64) {
		if let Some(task) = self.debounce_task.take() {
			task.abort();
		}

		let events = self.events.clone();
		let debounce = self.debounce;

		self.debounce_task = Some(tokio::spawn(async move {
			tokio::time::sleep(debounce).await;

			let _ = events.send(Event::DebounceElapsed { epoch });
		}));
	}

	fn fetch_products(&self, epoch: u64) {
		let Some(filters) = self.store.products_request(epoch) else {
			return;
		};
		let provider = self.provider.clone();
		let events = self.events.clone();

		tracing::debug!(
			epoch,
			page = filters.page,
			vertical = %filters.vertical,
			"Fetching products."
		);

		tokio::spawn(async move {
			let result = provider.products(&filters).await.map_err(|err| failure("products", err));

			let _ = events.send(Event::Products { epoch, result });
		});
	}

	fn fetch_meta(&self, epoch: u64) {
		let Some(vertical) = self.store.meta_request(epoch) else {
			return;
		};
		let provider = self.provider.clone();
		let events = self.events.clone();

		tracing::debug!(epoch, vertical = %vertical, "Fetching meta.");

		tokio::spawn(async move {
			let result = provider.meta(vertical).await.map_err(|err| failure("meta", err));

			let _ = events.send(Event::Meta { epoch, result });
		});
	}

	fn fetch_detail(&self, epoch: u64) {
		let Some((product_id, vertical)) = self.store.detail_request(epoch) else {
			return;
		};
		let provider = self.provider.clone();
		let events = self.events.clone();

		tracing::debug!(epoch, product_id = %product_id, "Fetching product detail.");

		tokio::spawn(async move {
			let result = provider
				.product_detail(&product_id, vertical)
				.await
				.map_err(|err| failure("product detail", err));

			let _ = events.send(Event::Detail { epoch, result });
		});
	}

	fn publish(&self) {
		self.snapshots.send_replace(self.store.clone());
	}
}

fn failure(resource: &str, err: Error) -> String {
	tracing::warn!(resource, error = %err, "Catalog fetch failed.");

	match err {
		Error::Provider { message } => message,
		other => other.to_string(),
	}
}
