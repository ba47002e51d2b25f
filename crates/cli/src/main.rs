use clap::Parser;
use tixbuy_cli::cli::Cli;
use tixbuy_cli::config::RunConfig;
use tixbuy_cli::error::Result;
use tixbuy_cli::session::shutdown_signal;
use tixbuy_cli::{commands, logging, output};
use tixbuy_runtime::TonicDialer;
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = run(cli).await {
		error!(target = "tixbuy", phase = %err.phase(), error = %err, "session failed");
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> Result<()> {
	let config = RunConfig::from_cli(cli)?;
	let dialer = TonicDialer::new(config.flavor);
	let mut reporter = output::stdout_reporter(config.format);
	commands::execute(config, &dialer, reporter.as_mut(), shutdown_signal()).await?;
	Ok(())
}
