pub mod browse;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use worthit_domain::{
	ProductFilters, ProductsResponse, ValueScoreInput, attributes, compute_value_score, filters,
	ranking,
};
use worthit_service::{CatalogProvider, LookupService};

#[derive(Debug, Parser)]
#[command(
	version = worthit_cli::VERSION,
	rename_all = "kebab",
	styles = worthit_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Computes the value score of one product.
	Score {
		#[arg(long, value_name = "CATEGORY")]
		category: String,
		/// Effective price in NZD.
		#[arg(long, value_name = "NZD")]
		price: Option<f64>,
		/// Attribute bag as a JSON object.
		#[arg(long, value_name = "JSON", default_value = "{}")]
		attributes: String,
	},
	/// Fetches and ranks one page of products for a filter query string.
	Search {
		#[arg(value_name = "QUERY", default_value = "")]
		query: String,
	},
	/// Looks up a single product page.
	Lookup {
		#[arg(long, value_name = "URL")]
		url: String,
		#[arg(long, value_name = "TITLE", default_value = "")]
		title: String,
	},
	/// Drives an interactive session from stdin, one command per line.
	Browse {
		#[arg(value_name = "QUERY", default_value = "")]
		query: String,
	},
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ScoreOutput {
	pub category: String,
	pub effective_price: Option<f64>,
	pub value_score: Option<f64>,
	/// Score with four decimals, or `unranked`.
	pub label: String,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
	/// Canonical query string of the filters that were fetched.
	pub query: String,
	pub filters: ProductFilters,
	pub total_pages: u32,
	pub can_go_previous: bool,
	pub can_go_next: bool,
	#[serde(flatten)]
	pub response: ProductsResponse,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = worthit_config::load(&args.config)?;
	init_tracing(&config)?;

	match args.command {
		Command::Score { category, price, attributes } =>
			print_json(&score(&category, price, &attributes)?),
		Command::Search { query } => print_json(&search(&config, &query).await?),
		Command::Lookup { url, title } => {
			let service = LookupService::new(&config)?;
			let report = service.lookup(&url, &title).await?;

			print_json(&report)
		},
		Command::Browse { query } => {
			let stdin = tokio::io::BufReader::new(tokio::io::stdin());

			browse::run(&config, &query, stdin, tokio::io::stdout()).await
		},
	}
}

pub fn score(
	category: &str,
	price: Option<f64>,
	raw_attributes: &str,
) -> color_eyre::Result<ScoreOutput> {
	let value: Value = serde_json::from_str(raw_attributes)?;
	let Value::Object(object) = value else {
		return Err(eyre::eyre!("Attributes must be a JSON object."));
	};
	let attributes = attributes::from_json_object(&object);
	let value_score = compute_value_score(&ValueScoreInput {
		category,
		attributes: &attributes,
		effective_price: price,
	});
	let label = value_score.map_or_else(|| "unranked".to_string(), |score| format!("{score:.4}"));

	Ok(ScoreOutput { category: category.to_string(), effective_price: price, value_score, label })
}

pub async fn search(
	config: &worthit_config::Config,
	query: &str,
) -> color_eyre::Result<SearchOutput> {
	let filters = filters::parse(query);
	let provider = worthit_service::catalog_provider(config)?;
	let mut response = provider.products(&filters).await?;

	ranking::rank_page(&mut response.items, filters.sort);

	tracing::info!(
		total = response.total,
		items = response.items.len(),
		query = %filters::serialize(&filters),
		"Fetched products."
	);

	Ok(SearchOutput {
		query: filters::serialize(&filters),
		total_pages: filters::total_pages(response.total, filters.page_size),
		can_go_previous: filters.can_go_previous(),
		can_go_next: filters.can_go_next(response.total),
		filters,
		response,
	})
}

fn print_json(value: &impl Serialize) -> color_eyre::Result<()> {
	let json = serde_json::to_string_pretty(value)?;

	println!("{json}");

	Ok(())
}

fn init_tracing(config: &worthit_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
	Ok(())
}
