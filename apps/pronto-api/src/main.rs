use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = pronto_api::Args::parse();
	pronto_api::run(args).await
}
