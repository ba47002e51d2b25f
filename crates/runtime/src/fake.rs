//! In-memory purchase service for testing session orchestration.
//!
//! Behaves like the remote service's state machine (start fails while a
//! session is active, stop fails when none is) and records every call so tests
//! can assert ordering. [`FakeWallet`](crate::FakeWallet) serves the same
//! state machine over a real gRPC listener.
//!
//! # Example
//!
//! ```ignore
//! let fake = FakePurchaseService::new(ServiceFlavor::TicketBuyer, FakeScript::default());
//! let calls = fake.call_log();
//! run_session(Box::new(fake)).await?;
//! assert_eq!(calls.kinds(), ["start", "describe", "stop"]);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tixbuy_protocol::{ServiceFlavor, SessionConfig, SessionRequest, method_name};
use tonic::Status;

use crate::channel::ChannelConfig;
use crate::client::{Dialer, PurchaseService};
use crate::credentials::TransportCredentials;
use crate::error::{Error, Result};

/// A call observed by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
	Start(SessionRequest),
	Describe,
	Stop,
}

impl FakeCall {
	pub fn kind(&self) -> &'static str {
		match self {
			FakeCall::Start(_) => "start",
			FakeCall::Describe => "describe",
			FakeCall::Stop => "stop",
		}
	}
}

/// Scripted failures and the snapshot returned by describe.
#[derive(Debug, Clone, Default)]
pub struct FakeScript {
	pub start_error: Option<Status>,
	pub describe_error: Option<Status>,
	pub stop_error: Option<Status>,
	/// Stop is recorded but never answered.
	pub hang_stop: bool,
	pub config: SessionConfig,
}

impl FakeScript {
	pub fn fail_start(mut self, status: Status) -> Self {
		self.start_error = Some(status);
		self
	}

	pub fn fail_describe(mut self, status: Status) -> Self {
		self.describe_error = Some(status);
		self
	}

	pub fn fail_stop(mut self, status: Status) -> Self {
		self.stop_error = Some(status);
		self
	}

	pub fn hang_stop(mut self) -> Self {
		self.hang_stop = true;
		self
	}

	pub fn with_config(mut self, config: SessionConfig) -> Self {
		self.config = config;
		self
	}
}

/// Shared handle onto the fake's call log.
#[derive(Debug, Clone, Default)]
pub struct FakeCallLog(Arc<Mutex<Vec<FakeCall>>>);

impl FakeCallLog {
	pub fn snapshot(&self) -> Vec<FakeCall> {
		self.0.lock().clone()
	}

	pub fn kinds(&self) -> Vec<&'static str> {
		self.0.lock().iter().map(FakeCall::kind).collect()
	}

	pub(crate) fn push(&self, call: FakeCall) {
		self.0.lock().push(call);
	}
}

/// Remote-side state machine shared by [`FakePurchaseService`] and the
/// in-process [`FakeWallet`](crate::FakeWallet).
#[derive(Debug)]
pub(crate) struct FakeState {
	script: FakeScript,
	active: bool,
	calls: FakeCallLog,
}

impl FakeState {
	pub(crate) fn new(script: FakeScript) -> Self {
		Self {
			script,
			active: false,
			calls: FakeCallLog::default(),
		}
	}

	pub(crate) fn calls(&self) -> FakeCallLog {
		self.calls.clone()
	}

	pub(crate) fn is_active(&self) -> bool {
		self.active
	}

	pub(crate) fn hangs_on_stop(&self) -> bool {
		self.script.hang_stop
	}

	pub(crate) fn start(&mut self, request: SessionRequest) -> std::result::Result<(), Status> {
		self.calls.push(FakeCall::Start(request));
		if let Some(status) = self.script.start_error.clone() {
			return Err(status);
		}
		if self.active {
			return Err(Status::failed_precondition("ticket purchaser already started"));
		}
		self.active = true;
		Ok(())
	}

	pub(crate) fn describe(&mut self) -> std::result::Result<SessionConfig, Status> {
		self.calls.push(FakeCall::Describe);
		match self.script.describe_error.clone() {
			Some(status) => Err(status),
			None => Ok(self.script.config.clone()),
		}
	}

	/// Records the call. A scripted hang is left to the caller.
	pub(crate) fn stop(&mut self) -> std::result::Result<(), Status> {
		self.calls.push(FakeCall::Stop);
		if let Some(status) = self.script.stop_error.clone() {
			return Err(status);
		}
		if !self.active {
			return Err(Status::failed_precondition("ticket purchaser is not running"));
		}
		self.active = false;
		Ok(())
	}
}

#[derive(Debug)]
pub struct FakePurchaseService {
	flavor: ServiceFlavor,
	state: FakeState,
}

impl FakePurchaseService {
	pub fn new(flavor: ServiceFlavor, script: FakeScript) -> Self {
		Self {
			flavor,
			state: FakeState::new(script),
		}
	}

	/// Handle that stays valid after the fake is boxed or moved.
	pub fn call_log(&self) -> FakeCallLog {
		self.state.calls()
	}

	pub fn is_active(&self) -> bool {
		self.state.is_active()
	}
}

fn rpc_err(path: &'static str) -> impl FnOnce(Status) -> Error {
	move |status| Error::Rpc {
		method: method_name(path),
		status,
	}
}

#[async_trait]
impl PurchaseService for FakePurchaseService {
	fn flavor(&self) -> ServiceFlavor {
		self.flavor
	}

	async fn start(&mut self, request: SessionRequest) -> Result<()> {
		self.state.start(request).map_err(rpc_err(self.flavor.methods().start))
	}

	async fn describe(&mut self) -> Result<Option<SessionConfig>> {
		let Some(path) = self.flavor.methods().describe else {
			return Ok(None);
		};
		self.state.describe().map(Some).map_err(rpc_err(path))
	}

	async fn stop(&mut self) -> Result<()> {
		if self.state.hangs_on_stop() {
			self.state.calls.push(FakeCall::Stop);
			return std::future::pending().await;
		}
		self.state.stop().map_err(rpc_err(self.flavor.methods().stop))
	}
}

/// Dialer handing out a prepared fake, counting dial attempts.
#[derive(Debug)]
pub struct FakeDialer {
	service: Mutex<Option<FakePurchaseService>>,
	dials: Mutex<usize>,
}

impl FakeDialer {
	pub fn new(service: FakePurchaseService) -> Self {
		Self {
			service: Mutex::new(Some(service)),
			dials: Mutex::new(0),
		}
	}

	pub fn dial_count(&self) -> usize {
		*self.dials.lock()
	}
}

#[async_trait]
impl Dialer for FakeDialer {
	async fn dial(&self, _config: &ChannelConfig, _credentials: TransportCredentials) -> Result<Box<dyn PurchaseService>> {
		*self.dials.lock() += 1;
		let service = self.service.lock().take().ok_or_else(|| Error::Rpc {
			method: "dial",
			status: Status::unavailable("fake dialer already used"),
		})?;
		Ok(Box::new(service))
	}
}
