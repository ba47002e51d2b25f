//! Immutable run configuration, built once from parsed flags.

use std::path::PathBuf;
use std::time::Duration;

use tixbuy_protocol::{Passphrase, ServiceFlavor};
use tixbuy_runtime::{ChannelConfig, Security, normalize_endpoint};
use tracing::warn;

use crate::cli::Cli;
use crate::error::{Result, TixError};
use crate::output::OutputFormat;
use crate::session::SessionParams;

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:19110";
pub const DEFAULT_CA_FILE: &str = "rpc.cert";
pub const DEFAULT_WAIT_SECS: u64 = 10 * 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 30;

/// Everything one session run needs. Components borrow the parts they use.
#[derive(Debug, Clone)]
pub struct RunConfig {
	pub channel: ChannelConfig,
	pub flavor: ServiceFlavor,
	pub session: SessionParams,
	pub hold: Duration,
	pub describe: bool,
	pub stop_timeout: Duration,
	pub format: OutputFormat,
}

impl RunConfig {
	pub fn from_cli(cli: Cli) -> Result<Self> {
		let endpoint = normalize_endpoint(&cli.server_addr, cli.tls).map_err(|err| TixError::InvalidInput(err.to_string()))?;

		if cli.connect_timeout == 0 {
			return Err(TixError::InvalidInput("--connect-timeout must be at least 1 second".into()));
		}
		if cli.rpc_timeout == Some(0) {
			return Err(TixError::InvalidInput("--rpc-timeout must be at least 1 second".into()));
		}
		if cli.stop_timeout == 0 {
			return Err(TixError::InvalidInput("--stop-timeout must be at least 1 second".into()));
		}

		let security = Security::from_flags(cli.tls, Some(PathBuf::from(cli.ca_file)), cli.tls_server_name);
		if !cli.tls {
			warn!(target = "tixbuy", endpoint = %endpoint, "TLS disabled; wallet traffic, passphrase included, is sent in the clear");
		}

		let describe = cli.describe && cli.service.supports_describe();

		Ok(Self {
			channel: ChannelConfig {
				endpoint,
				security,
				connect_timeout: Duration::from_secs(cli.connect_timeout),
				rpc_timeout: cli.rpc_timeout.map(Duration::from_secs),
			},
			flavor: cli.service,
			session: SessionParams {
				passphrase: Passphrase::from(cli.pass.unwrap_or_default()),
				account: cli.account,
				balance: cli.balance,
				max_fee: cli.max_fee,
				max_price: cli.max_price,
				ticket_address: cli.ticket_address,
			},
			hold: Duration::from_secs(cli.wait),
			describe,
			stop_timeout: Duration::from_secs(cli.stop_timeout),
			format: cli.format,
		})
	}
}
