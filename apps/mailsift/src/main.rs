use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mailsift::Args::parse();

	mailsift::run(args).await
}
