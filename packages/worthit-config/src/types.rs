use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub catalog: Catalog,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub lookup: Lookup,
	#[serde(default)]
	pub mock: Mock,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
	/// Either "live" (HTTP catalog API) or "mock" (seeded in-memory catalog).
	pub mode: String,
	pub api_base: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl Catalog {
	pub fn is_mock(&self) -> bool {
		self.mode == "mock"
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
	#[serde(default)]
	pub include_history: bool,
}
impl Default for Search {
	fn default() -> Self {
		Self { debounce_ms: default_debounce_ms(), include_history: false }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Lookup {
	/// Either "mock" or "api".
	#[serde(default = "default_lookup_mode")]
	pub mode: String,
	#[serde(default = "default_mock_latency_ms")]
	pub mock_latency_ms: u64,
	#[serde(default = "default_true")]
	pub fallback_to_mock: bool,
}
impl Lookup {
	pub fn is_api(&self) -> bool {
		self.mode == "api"
	}
}
impl Default for Lookup {
	fn default() -> Self {
		Self {
			mode: default_lookup_mode(),
			mock_latency_ms: default_mock_latency_ms(),
			fallback_to_mock: true,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Mock {
	#[serde(default)]
	pub seed: u64,
	#[serde(default = "default_products_per_category")]
	pub products_per_category: u32,
}
impl Default for Mock {
	fn default() -> Self {
		Self { seed: 0, products_per_category: default_products_per_category() }
	}
}

fn default_debounce_ms() -> u64 {
	220
}

fn default_lookup_mode() -> String {
	"mock".to_string()
}

fn default_mock_latency_ms() -> u64 {
	180
}

fn default_true() -> bool {
	true
}

fn default_products_per_category() -> u32 {
	12
}
