mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Catalog, Config, Lookup, Mock, Search, Service};

use std::{fs, path::Path};

pub const MAX_DEBOUNCE_MS: u64 = 10_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse_at(&raw, path)
}

/// Parses, normalizes and validates an in-memory TOML document.
pub fn parse(raw: &str) -> Result<Config> {
	parse_at(raw, Path::new("<inline>"))
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !matches!(cfg.catalog.mode.as_str(), "live" | "mock") {
		return Err(Error::Validation {
			message: "catalog.mode must be one of live or mock.".to_string(),
		});
	}
	if cfg.catalog.mode == "live" && cfg.catalog.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.api_base must be non-empty when catalog.mode is live.".to_string(),
		});
	}
	if cfg.catalog.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "catalog.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.catalog.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("catalog.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.search.debounce_ms > MAX_DEBOUNCE_MS {
		return Err(Error::Validation {
			message: format!("search.debounce_ms must be {MAX_DEBOUNCE_MS} or less."),
		});
	}
	if !matches!(cfg.lookup.mode.as_str(), "mock" | "api") {
		return Err(Error::Validation {
			message: "lookup.mode must be one of mock or api.".to_string(),
		});
	}
	if cfg.lookup.mode == "api" && cfg.catalog.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.api_base must be non-empty when lookup.mode is api.".to_string(),
		});
	}
	if cfg.mock.products_per_category == 0 {
		return Err(Error::Validation {
			message: "mock.products_per_category must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn parse_at(raw: &str, path: &Path) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.catalog.api_base.trim().trim_end_matches('/').to_string();

	cfg.catalog.api_base = trimmed;
	cfg.catalog
		.default_headers
		.retain(|_, value| value.as_str().map(|raw| !raw.trim().is_empty()).unwrap_or(true));
}
