use clap::{ArgAction, Parser};
use tixbuy_protocol::ServiceFlavor;

use crate::config::{DEFAULT_CA_FILE, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_SERVER_ADDR, DEFAULT_STOP_TIMEOUT_SECS, DEFAULT_WAIT_SECS};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tixbuy")]
#[command(about = "Run a wallet's automatic ticket buyer for a fixed time, then stop it")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8,

	/// Report format for lifecycle milestones
	#[arg(short, long, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Wallet passphrase
	#[arg(long, env = "TIXBUY_PASS", hide_env_values = true, value_name = "PASSPHRASE")]
	pub pass: Option<String>,

	/// Time in seconds to keep the ticket buyer running
	#[arg(long, default_value_t = DEFAULT_WAIT_SECS, value_name = "SECONDS")]
	pub wait: u64,

	/// Use TLS for the connection; --tls=false selects plain TCP
	#[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
	pub tls: bool,

	/// CA root certificate bundle (PEM); empty to trust the system roots
	#[arg(long = "ca-file", alias = "ca_file", default_value = DEFAULT_CA_FILE, value_name = "FILE")]
	pub ca_file: String,

	/// Name to verify in the wallet's certificate (defaults to the address host)
	#[arg(long, value_name = "NAME")]
	pub tls_server_name: Option<String>,

	/// Wallet RPC address
	#[arg(long = "server-addr", alias = "server_addr", default_value = DEFAULT_SERVER_ADDR, value_name = "HOST:PORT")]
	pub server_addr: String,

	/// Account to purchase from
	#[arg(long, default_value = "")]
	pub account: String,

	/// Balance to maintain, in coins
	#[arg(long, default_value_t = 0.0, allow_negative_numbers = true, value_name = "COINS")]
	pub balance: f64,

	/// Max ticket price, in coins
	#[arg(long = "maxprice", default_value_t = 0.0, allow_negative_numbers = true, value_name = "COINS")]
	pub max_price: f64,

	/// Max ticket fee, in coins
	#[arg(long = "maxfee", default_value_t = 0.0, allow_negative_numbers = true, value_name = "COINS")]
	pub max_fee: f64,

	/// Ticket address
	#[arg(long = "address", default_value = "", value_name = "ADDRESS")]
	pub ticket_address: String,

	/// Remote method set: ticket-buyer or auto-buyer
	#[arg(long, default_value = "ticket-buyer", value_name = "FLAVOR")]
	pub service: ServiceFlavor,

	/// Fetch and report the effective config after starting
	#[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
	pub describe: bool,

	/// Seconds allowed for establishing the connection
	#[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS, value_name = "SECONDS")]
	pub connect_timeout: u64,

	/// Deadline in seconds for each remote call
	#[arg(long, value_name = "SECONDS")]
	pub rpc_timeout: Option<u64>,

	/// Seconds to wait for the wallet to answer the final stop call
	#[arg(long, default_value_t = DEFAULT_STOP_TIMEOUT_SECS, value_name = "SECONDS")]
	pub stop_timeout: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_documented_values() {
		let cli = Cli::try_parse_from(["tixbuy"]).unwrap();
		assert_eq!(cli.wait, 600);
		assert!(cli.tls);
		assert!(cli.describe);
		assert_eq!(cli.ca_file, "rpc.cert");
		assert_eq!(cli.server_addr, "127.0.0.1:19110");
		assert_eq!(cli.service, ServiceFlavor::TicketBuyer);
		assert_eq!(cli.format, OutputFormat::Text);
		assert_eq!(cli.rpc_timeout, None);
		assert_eq!(cli.stop_timeout, 30);
	}

	#[test]
	fn parse_session_scenario() {
		let args = [
			"tixbuy",
			"--wait=5",
			"--tls=false",
			"--balance=10.5",
			"--maxfee=0.001",
			"--maxprice=150.25",
			"--account=default",
			"--address=TsExampleAddr",
		];
		let cli = Cli::try_parse_from(args).unwrap();

		assert_eq!(cli.wait, 5);
		assert!(!cli.tls);
		assert_eq!(cli.balance, 10.5);
		assert_eq!(cli.max_fee, 0.001);
		assert_eq!(cli.max_price, 150.25);
		assert_eq!(cli.account, "default");
		assert_eq!(cli.ticket_address, "TsExampleAddr");
	}

	#[test]
	fn bool_flags_accept_bare_and_separate_values() {
		let cli = Cli::try_parse_from(["tixbuy", "--tls", "--describe", "false"]).unwrap();
		assert!(cli.tls);
		assert!(!cli.describe);
	}

	#[test]
	fn underscore_aliases_are_accepted() {
		let cli = Cli::try_parse_from(["tixbuy", "--ca_file", "wallet.cert", "--server_addr", "10.0.0.2:9111"]).unwrap();
		assert_eq!(cli.ca_file, "wallet.cert");
		assert_eq!(cli.server_addr, "10.0.0.2:9111");
	}

	#[test]
	fn service_flavor_parses() {
		let cli = Cli::try_parse_from(["tixbuy", "--service", "auto-buyer"]).unwrap();
		assert_eq!(cli.service, ServiceFlavor::AutoBuyer);
		assert!(Cli::try_parse_from(["tixbuy", "--service", "nope"]).is_err());
	}

	#[test]
	fn verbose_flag_short_and_long() {
		let cli = Cli::try_parse_from(["tixbuy", "-vv"]).unwrap();
		assert_eq!(cli.verbose, 2);
		let cli = Cli::try_parse_from(["tixbuy", "--verbose"]).unwrap();
		assert_eq!(cli.verbose, 1);
	}

	#[test]
	fn non_numeric_amount_fails() {
		assert!(Cli::try_parse_from(["tixbuy", "--balance", "lots"]).is_err());
	}
}
