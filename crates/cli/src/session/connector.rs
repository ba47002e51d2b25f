//! Credential resolution and dialing, in that order.

use tixbuy_runtime::{ChannelConfig, Dialer, PurchaseService, resolve_credentials};
use tracing::{debug, info};

use crate::error::{Result, TixError};

/// Resolves transport credentials, then dials. A credential failure returns
/// before the dialer is touched.
pub async fn open_service(config: &ChannelConfig, dialer: &dyn Dialer) -> Result<Box<dyn PurchaseService>> {
	let credentials = resolve_credentials(&config.security).map_err(TixError::CredentialLoad)?;
	debug!(target = "tixbuy.transport", endpoint = %config.endpoint, "credentials ready");

	let service = dialer.dial(config, credentials).await.map_err(TixError::Channel)?;
	info!(target = "tixbuy.transport", endpoint = %config.endpoint, flavor = %service.flavor(), "connected");
	Ok(service)
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tixbuy_protocol::ServiceFlavor;
	use tixbuy_runtime::{FakeDialer, FakePurchaseService, FakeScript, Security};

	use super::*;
	use crate::error::Phase;

	fn channel(security: Security) -> ChannelConfig {
		ChannelConfig {
			endpoint: "https://127.0.0.1:19110".into(),
			security,
			connect_timeout: Duration::from_secs(1),
			rpc_timeout: None,
		}
	}

	fn dialer() -> FakeDialer {
		FakeDialer::new(FakePurchaseService::new(ServiceFlavor::TicketBuyer, FakeScript::default()))
	}

	#[tokio::test]
	async fn missing_ca_never_dials() {
		let dir = tempfile::tempdir().unwrap();
		let security = Security::Tls {
			ca_file: Some(dir.path().join("rpc.cert")),
			server_name: None,
		};
		let dialer = dialer();

		let err = open_service(&channel(security), &dialer).await.err().unwrap();
		assert_eq!(err.phase(), Phase::Credential);
		assert_eq!(dialer.dial_count(), 0);
	}

	#[tokio::test]
	async fn plaintext_dials_once() {
		let dialer = dialer();
		let service = open_service(&channel(Security::Plaintext), &dialer).await.unwrap();
		assert_eq!(service.flavor(), ServiceFlavor::TicketBuyer);
		assert_eq!(dialer.dial_count(), 1);
	}

	#[tokio::test]
	async fn dial_failure_is_channel_error() {
		let dialer = dialer();
		let config = channel(Security::Plaintext);
		let _first = open_service(&config, &dialer).await.unwrap();

		let err = open_service(&config, &dialer).await.err().unwrap();
		assert_eq!(err.phase(), Phase::Dial);
	}
}
