//! Legacy single-product lookup used by the browser extension popup.

use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;

use crate::Result;
use worthit_config::Config;
use worthit_domain::{
	HistoryPoint, LookupResponse,
	history::{self, PriceStats},
};
use worthit_providers::{CatalogClient, mock};

const LOWEST_POINTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
	Api,
	Mock,
	/// The API failed and the mock generator answered instead.
	MockFallback,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LookupReport {
	pub source: LookupSource,
	pub response: LookupResponse,
	pub stats: Option<PriceStats>,
	pub lowest: Vec<HistoryPoint>,
}
impl LookupReport {
	fn new(source: LookupSource, response: LookupResponse) -> Self {
		let stats = history::price_stats(&response.history);
		let lowest = history::lowest_points(&response.history, LOWEST_POINTS);

		Self { source, response, stats, lowest }
	}
}

pub struct LookupService {
	client: Option<CatalogClient>,
	mock_latency: Duration,
	fallback_to_mock: bool,
}
impl LookupService {
	pub fn new(cfg: &Config) -> Result<Self> {
		let client =
			if cfg.lookup.is_api() { Some(CatalogClient::new(&cfg.catalog)?) } else { None };

		Ok(Self {
			client,
			mock_latency: Duration::from_millis(cfg.lookup.mock_latency_ms),
			fallback_to_mock: cfg.lookup.fallback_to_mock,
		})
	}

	pub async fn lookup(&self, page_url: &str, title: &str) -> Result<LookupReport> {
		let Some(client) = self.client.as_ref() else {
			return Ok(LookupReport::new(LookupSource::Mock, self.mock(page_url, title).await));
		};

		match client.lookup(page_url, title).await {
			Ok(response) => Ok(LookupReport::new(LookupSource::Api, response)),
			Err(err) if self.fallback_to_mock => {
				tracing::warn!(error = %err, "Lookup API failed. Falling back to mock data.");

				Ok(LookupReport::new(LookupSource::MockFallback, self.mock(page_url, title).await))
			},
			Err(err) => Err(err.into()),
		}
	}

	async fn mock(&self, page_url: &str, title: &str) -> LookupResponse {
		if !self.mock_latency.is_zero() {
			tokio::time::sleep(self.mock_latency).await;
		}

		mock::mock_lookup(page_url, title, OffsetDateTime::now_utc())
	}
}
