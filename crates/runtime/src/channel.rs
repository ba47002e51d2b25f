//! Channel configuration and dialing.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint, Uri};
use tracing::debug;

use crate::credentials::{Security, TransportCredentials};
use crate::error::{Error, Result};

/// Where and how to reach the remote wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
	/// Normalized endpoint URI, see [`normalize_endpoint`].
	pub endpoint: String,
	pub security: Security,
	pub connect_timeout: Duration,
	/// Per-call deadline; `None` leaves calls unbounded.
	pub rpc_timeout: Option<Duration>,
}

/// Turns a `host:port` address into an endpoint URI whose scheme matches the
/// security mode. Explicit schemes are accepted only when they agree with `tls`.
pub fn normalize_endpoint(addr: &str, tls: bool) -> Result<String> {
	let addr = addr.trim();
	let invalid = |reason: &str| Error::InvalidEndpoint {
		endpoint: addr.to_string(),
		reason: reason.to_string(),
	};

	if addr.is_empty() {
		return Err(invalid("address is empty"));
	}

	let uri = match addr.split_once("://") {
		Some(("https", _)) if !tls => return Err(invalid("https scheme requires TLS")),
		Some(("http", _)) if tls => return Err(invalid("http scheme cannot be used with TLS")),
		Some(("http" | "https", _)) => addr.to_string(),
		Some((scheme, _)) => return Err(invalid(&format!("unsupported scheme {scheme:?}"))),
		None if tls => format!("https://{addr}"),
		None => format!("http://{addr}"),
	};

	let parsed = uri.parse::<Uri>().map_err(|err| invalid(&err.to_string()))?;
	if parsed.authority().is_none() {
		return Err(invalid("missing host"));
	}

	Ok(uri)
}

/// Opens the channel. The returned channel closes when dropped.
pub async fn open_channel(config: &ChannelConfig, credentials: TransportCredentials) -> Result<Channel> {
	let connect_err = |source| Error::Connect {
		endpoint: config.endpoint.clone(),
		source,
	};

	let mut endpoint = Endpoint::from_shared(config.endpoint.clone())
		.map_err(|err| Error::InvalidEndpoint {
			endpoint: config.endpoint.clone(),
			reason: err.to_string(),
		})?
		.connect_timeout(config.connect_timeout);

	if let Some(timeout) = config.rpc_timeout {
		endpoint = endpoint.timeout(timeout);
	}

	if let TransportCredentials::Tls(tls) = credentials {
		endpoint = endpoint.tls_config(tls).map_err(connect_err)?;
	}

	debug!(target = "tixbuy.transport", endpoint = %config.endpoint, "dialing");
	let channel = endpoint.connect().await.map_err(connect_err)?;
	debug!(target = "tixbuy.transport", endpoint = %config.endpoint, "channel established");
	Ok(channel)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_address_gets_scheme_from_tls_flag() {
		assert_eq!(normalize_endpoint("127.0.0.1:19110", true).unwrap(), "https://127.0.0.1:19110");
		assert_eq!(normalize_endpoint(" localhost:19110 ", false).unwrap(), "http://localhost:19110");
	}

	#[test]
	fn explicit_scheme_must_match_tls_flag() {
		assert!(normalize_endpoint("https://wallet:19110", true).is_ok());
		assert!(normalize_endpoint("http://wallet:19110", false).is_ok());
		assert!(matches!(normalize_endpoint("http://wallet:19110", true), Err(Error::InvalidEndpoint { .. })));
		assert!(matches!(normalize_endpoint("https://wallet:19110", false), Err(Error::InvalidEndpoint { .. })));
	}

	#[test]
	fn rejects_unusable_addresses() {
		assert!(normalize_endpoint("", false).is_err());
		assert!(normalize_endpoint("unix:///tmp/wallet.sock", false).is_err());
		assert!(normalize_endpoint("wallet host:1", false).is_err());
	}

	#[tokio::test]
	async fn dial_to_closed_port_is_a_connect_error() {
		let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
		let port = listener.local_addr().unwrap().port();
		drop(listener);

		let config = ChannelConfig {
			endpoint: normalize_endpoint(&format!("127.0.0.1:{port}"), false).unwrap(),
			security: Security::Plaintext,
			connect_timeout: Duration::from_secs(2),
			rpc_timeout: None,
		};

		let err = open_channel(&config, TransportCredentials::Insecure).await.unwrap_err();
		assert!(matches!(err, Error::Connect { .. }), "got {err:?}");
	}
}
