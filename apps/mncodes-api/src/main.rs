use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = mncodes_api::Args::parse();
	mncodes_api::run(args).await
}
