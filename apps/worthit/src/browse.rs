//! Line-driven browsing session on top of the orchestrator.
//!
//! Each input line is one of:
//!
//! - a query-string patch such as `category=laptops&page=2`,
//! - `select <id>` or `clear`,
//! - `refresh`, `show` or `quit`.
//!
//! After every line the settled state is written as one JSON object per line.

use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use worthit_domain::{FiltersPatch, filters};
use worthit_service::{Orchestrator, ResultsStore};

#[derive(Debug, PartialEq)]
pub enum BrowseCommand {
	Patch(FiltersPatch),
	Select(String),
	Clear,
	Refresh,
	Show,
	Quit,
}

#[derive(Serialize)]
struct View<'a> {
	query: String,
	#[serde(flatten)]
	store: &'a ResultsStore,
}

/// Parses one input line. Blank lines and empty patches yield `None`.
pub fn parse_line(line: &str) -> Option<BrowseCommand> {
	let line = line.trim();

	match line {
		"" => None,
		"clear" => Some(BrowseCommand::Clear),
		"refresh" => Some(BrowseCommand::Refresh),
		"show" => Some(BrowseCommand::Show),
		"quit" | "exit" => Some(BrowseCommand::Quit),
		_ => {
			if let Some(id) = line.strip_prefix("select ") {
				let id = id.trim();

				return (!id.is_empty()).then(|| BrowseCommand::Select(id.to_string()));
			}

			let patch = FiltersPatch::from_query(line);

			(!patch.is_empty()).then_some(BrowseCommand::Patch(patch))
		},
	}
}

pub async fn run<R, W>(
	config: &worthit_config::Config,
	query: &str,
	input: R,
	mut output: W,
) -> color_eyre::Result<()>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let provider = worthit_service::catalog_provider(config)?;
	let orchestrator = Orchestrator::spawn(
		provider,
		Duration::from_millis(config.search.debounce_ms),
		filters::parse(query),
	);
	let mut lines = input.lines();

	write_view(&mut output, &orchestrator.settled().await?).await?;

	while let Some(line) = lines.next_line().await? {
		let Some(command) = parse_line(&line) else {
			tracing::debug!(line = %line, "Ignored browse input.");

			continue;
		};

		match command {
			BrowseCommand::Patch(patch) => orchestrator.patch(patch).await?,
			BrowseCommand::Select(id) => orchestrator.select(Some(id)).await?,
			BrowseCommand::Clear => orchestrator.select(None).await?,
			BrowseCommand::Refresh => orchestrator.refresh().await?,
			BrowseCommand::Show => {},
			BrowseCommand::Quit => break,
		}

		write_view(&mut output, &orchestrator.settled().await?).await?;
	}

	Ok(())
}

async fn write_view<W>(output: &mut W, store: &ResultsStore) -> color_eyre::Result<()>
where
	W: AsyncWrite + Unpin,
{
	let view = View { query: filters::serialize(store.filters()), store };
	let mut json = serde_json::to_vec(&view)?;

	json.push(b'\n');
	output.write_all(&json).await?;
	output.flush().await?;

	Ok(())
}
