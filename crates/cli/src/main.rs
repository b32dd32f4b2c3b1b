use clap::Parser;
use livechat_cli::{app, cli::Cli, logging};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = app::run(cli).await {
		error!(target = "livechat", error = %err, "capture failed");
		std::process::exit(1);
	}
}
