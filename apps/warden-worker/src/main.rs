use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = warden_worker::Args::parse();

	warden_worker::run(args).await
}
