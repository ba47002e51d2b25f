//! Top-level session run: build the request, open the service, drive the
//! lifecycle.

use std::future::Future;

use tixbuy_runtime::Dialer;
use tracing::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::output::Reporter;
use crate::session::{LifecycleController, LifecycleOptions, LifecycleOutcome, open_service};

/// Runs one full session. Input is validated before any network activity,
/// and credentials are resolved before dialing. The channel closes when the
/// service client drops at the end of this call.
pub async fn execute<F>(config: RunConfig, dialer: &dyn Dialer, reporter: &mut dyn Reporter, shutdown: F) -> Result<LifecycleOutcome>
where
	F: Future<Output = ()>,
{
	let RunConfig {
		channel,
		flavor,
		session,
		hold,
		describe,
		stop_timeout,
		format: _,
	} = config;

	let request = session.build()?;
	info!(target = "tixbuy", endpoint = %channel.endpoint, %flavor, hold_secs = hold.as_secs(), "starting session");

	let mut service = open_service(&channel, dialer).await?;
	let options = LifecycleOptions {
		hold,
		describe,
		stop_timeout,
	};
	LifecycleController::new(service.as_mut(), reporter, options).run(request, shutdown).await
}
