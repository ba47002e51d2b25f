use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` overrides the `-v` count.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(verbose >= 2)
		.try_init();
}

fn default_directives(verbose: u8) -> String {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	// Dependencies (h2, hyper, tower) stay at warn unless RUST_LOG says otherwise.
	format!("warn,tixbuy={level},tixbuy_cli={level},tixbuy_runtime={level}")
}
