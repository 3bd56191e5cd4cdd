use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = worthit::Args::parse();
	worthit::run(args).await
}
