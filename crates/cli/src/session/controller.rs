//! The start, describe, hold, stop sequence over one service client.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tixbuy_protocol::{SessionConfig, SessionRequest, method_name};
use tixbuy_runtime::{Error as RuntimeError, PurchaseService, Status};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::hold::{HoldOutcome, hold};
use crate::error::{Result, TixError};
use crate::output::Reporter;

/// Where the controller is in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
	Idle,
	Starting,
	Active,
	Stopping,
	Stopped,
}

impl fmt::Display for LifecycleState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			LifecycleState::Idle => "idle",
			LifecycleState::Starting => "starting",
			LifecycleState::Active => "active",
			LifecycleState::Stopping => "stopping",
			LifecycleState::Stopped => "stopped",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleOptions {
	pub hold: Duration,
	/// Read and report the effective config after starting.
	pub describe: bool,
	/// Upper bound on waiting for the stop call's answer.
	pub stop_timeout: Duration,
}

/// What happened to the optional config read.
#[derive(Debug, Clone, PartialEq)]
pub enum DescribeOutcome {
	Reported(SessionConfig),
	Disabled,
	/// The flavor has no config call.
	Unsupported,
	Failed { message: String },
}

/// Summary of a run that reached a successful stop.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleOutcome {
	pub describe: DescribeOutcome,
	pub hold: HoldOutcome,
}

/// Drives one session. Stop is issued exactly once whenever start succeeded,
/// and never otherwise. An unanswered stop ends as `StopFailed` after
/// `stop_timeout`.
pub struct LifecycleController<'a> {
	service: &'a mut dyn PurchaseService,
	reporter: &'a mut dyn Reporter,
	options: LifecycleOptions,
	state: LifecycleState,
}

impl<'a> LifecycleController<'a> {
	pub fn new(service: &'a mut dyn PurchaseService, reporter: &'a mut dyn Reporter, options: LifecycleOptions) -> Self {
		Self {
			service,
			reporter,
			options,
			state: LifecycleState::Idle,
		}
	}

	pub fn state(&self) -> LifecycleState {
		self.state
	}

	fn transition(&mut self, next: LifecycleState) {
		debug!(target = "tixbuy.session", from = %self.state, to = %next, "lifecycle transition");
		self.state = next;
	}

	/// Runs the whole sequence. `shutdown` may end the hold early; the stop
	/// call is still made.
	pub async fn run<F>(&mut self, request: SessionRequest, shutdown: F) -> Result<LifecycleOutcome>
	where
		F: Future<Output = ()>,
	{
		let flavor = self.service.flavor();

		self.transition(LifecycleState::Starting);
		if let Err(err) = self.service.start(request).await {
			self.state = LifecycleState::Idle;
			return Err(TixError::StartRejected(err));
		}
		self.transition(LifecycleState::Active);
		info!(target = "tixbuy.session", %flavor, "ticket buyer started");
		self.reporter.started(flavor);

		let describe = self.describe().await;

		self.reporter.holding(self.options.hold);
		let held = hold(self.options.hold, shutdown).await;
		if let HoldOutcome::Interrupted { elapsed } = held {
			warn!(target = "tixbuy.session", elapsed_ms = elapsed.as_millis() as u64, "shutdown requested; stopping early");
			self.reporter.interrupted(elapsed);
		}

		self.transition(LifecycleState::Stopping);
		self.reporter.stopping();
		let limit = self.options.stop_timeout;
		let stopped = timeout(limit, self.service.stop()).await.unwrap_or_else(|_| {
			Err(RuntimeError::Rpc {
				method: method_name(flavor.methods().stop),
				status: Status::deadline_exceeded(format!("no answer within {}s", limit.as_secs())),
			})
		});
		self.transition(LifecycleState::Stopped);

		match stopped {
			Ok(()) => {
				info!(target = "tixbuy.session", "ticket buyer stopped");
				self.reporter.stopped();
				Ok(LifecycleOutcome { describe, hold: held })
			}
			Err(err) => {
				let err = TixError::StopFailed(err);
				self.reporter.stop_failed(&err);
				Err(err)
			}
		}
	}

	async fn describe(&mut self) -> DescribeOutcome {
		let flavor = self.service.flavor();
		if !self.options.describe {
			return DescribeOutcome::Disabled;
		}
		if !flavor.supports_describe() {
			self.reporter.describe_unsupported(flavor);
			return DescribeOutcome::Unsupported;
		}

		match self.service.describe().await {
			Ok(Some(config)) => {
				self.reporter.config(&config);
				DescribeOutcome::Reported(config)
			}
			Ok(None) => {
				self.reporter.describe_unsupported(flavor);
				DescribeOutcome::Unsupported
			}
			Err(err) => {
				let err = TixError::DescribeFailed(err);
				warn!(target = "tixbuy.session", error = %err, "continuing without config");
				self.reporter.describe_failed(&err);
				DescribeOutcome::Failed { message: err.to_string() }
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::future::pending;

	use tixbuy_protocol::{Amount, Passphrase, ServiceFlavor};
	use tixbuy_runtime::{Code, FakePurchaseService, FakeScript};
	use tokio::time::{Instant, sleep};

	use super::*;
	use crate::output::TextReporter;

	fn request() -> SessionRequest {
		SessionRequest {
			passphrase: Passphrase::new("pw"),
			account: "default".into(),
			balance_to_maintain: Amount::from_atoms(1_050_000_000),
			max_fee: Amount::from_atoms(100_000),
			max_price_absolute: Amount::from_atoms(15_025_000_000),
			ticket_address: "TsExampleAddr".into(),
		}
	}

	fn options(secs: u64) -> LifecycleOptions {
		LifecycleOptions {
			hold: Duration::from_secs(secs),
			describe: true,
			stop_timeout: Duration::from_secs(30),
		}
	}

	fn output(reporter: &TextReporter<Vec<u8>>) -> String {
		String::from_utf8(reporter.get_ref().clone()).unwrap()
	}

	#[tokio::test(start_paused = true)]
	async fn happy_path_starts_describes_holds_and_stops() {
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, FakeScript::default());
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());
		let began = Instant::now();

		let mut controller = LifecycleController::new(&mut service, &mut reporter, options(5));
		let outcome = controller.run(request(), pending()).await.unwrap();
		assert_eq!(controller.state(), LifecycleState::Stopped);

		assert!(began.elapsed() >= Duration::from_secs(5));
		assert_eq!(outcome.hold, HoldOutcome::Elapsed);
		assert!(matches!(outcome.describe, DescribeOutcome::Reported(_)));
		assert_eq!(log.kinds(), ["start", "describe", "stop"]);
		assert!(!service.is_active());

		let out = output(&reporter);
		let started = out.find("Ticket buyer started").unwrap();
		let config = out.find("=== Ticket buyer config ===").unwrap();
		let stopped = out.find("Ticket buyer stopped").unwrap();
		assert!(started < config && config < stopped);
	}

	#[tokio::test(start_paused = true)]
	async fn rejected_start_never_stops() {
		let script = FakeScript::default().fail_start(Status::invalid_argument("bad passphrase"));
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, script);
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());

		let mut controller = LifecycleController::new(&mut service, &mut reporter, options(5));
		let err = controller.run(request(), pending()).await.unwrap_err();
		assert_eq!(controller.state(), LifecycleState::Idle);

		assert!(matches!(err, TixError::StartRejected(_)));
		assert!(err.to_string().contains("bad passphrase"));
		assert_eq!(log.kinds(), ["start"]);
		assert!(output(&reporter).is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn describe_failure_still_holds_and_stops() {
		let script = FakeScript::default().fail_describe(Status::unavailable("config busy"));
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, script);
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());
		let began = Instant::now();

		let outcome = LifecycleController::new(&mut service, &mut reporter, options(5))
			.run(request(), pending())
			.await
			.unwrap();

		assert!(began.elapsed() >= Duration::from_secs(5));
		assert!(matches!(outcome.describe, DescribeOutcome::Failed { ref message } if message.contains("config busy")));
		assert_eq!(log.kinds(), ["start", "describe", "stop"]);
		assert!(output(&reporter).contains("Warning: could not read ticket buyer config"));
	}

	#[tokio::test(start_paused = true)]
	async fn stop_failure_is_reported_and_returned() {
		let script = FakeScript::default().fail_stop(Status::internal("wallet locked"));
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, script);
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());

		let mut controller = LifecycleController::new(&mut service, &mut reporter, options(1));
		let err = controller.run(request(), pending()).await.unwrap_err();
		assert_eq!(controller.state(), LifecycleState::Stopped);

		assert!(matches!(err, TixError::StopFailed(_)));
		assert_eq!(log.kinds(), ["start", "describe", "stop"]);
		assert!(output(&reporter).contains("Error: ticket buyer did not stop"));
	}

	#[tokio::test(start_paused = true)]
	async fn interrupt_stops_once_and_early() {
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, FakeScript::default());
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());
		let began = Instant::now();

		let outcome = LifecycleController::new(&mut service, &mut reporter, options(600))
			.run(request(), sleep(Duration::from_secs(2)))
			.await
			.unwrap();

		assert!(began.elapsed() < Duration::from_secs(600));
		assert!(matches!(outcome.hold, HoldOutcome::Interrupted { .. }));
		assert_eq!(log.kinds(), ["start", "describe", "stop"]);
		assert!(output(&reporter).contains("stopping early"));
	}

	#[tokio::test(start_paused = true)]
	async fn auto_buyer_skips_describe() {
		let mut service = FakePurchaseService::new(ServiceFlavor::AutoBuyer, FakeScript::default());
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());

		let outcome = LifecycleController::new(&mut service, &mut reporter, options(1))
			.run(request(), pending())
			.await
			.unwrap();

		assert_eq!(outcome.describe, DescribeOutcome::Unsupported);
		assert_eq!(log.kinds(), ["start", "stop"]);
	}

	#[tokio::test(start_paused = true)]
	async fn describe_can_be_disabled() {
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, FakeScript::default());
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());
		let options = LifecycleOptions {
			describe: false,
			..options(1)
		};

		let outcome = LifecycleController::new(&mut service, &mut reporter, options)
			.run(request(), pending())
			.await
			.unwrap();

		assert_eq!(outcome.describe, DescribeOutcome::Disabled);
		assert_eq!(log.kinds(), ["start", "stop"]);
	}

	#[tokio::test(start_paused = true)]
	async fn unanswered_stop_fails_after_stop_timeout() {
		let script = FakeScript::default().hang_stop();
		let mut service = FakePurchaseService::new(ServiceFlavor::TicketBuyer, script);
		let log = service.call_log();
		let mut reporter = TextReporter::new(Vec::new());
		let began = Instant::now();

		let mut controller = LifecycleController::new(&mut service, &mut reporter, options(5));
		let err = controller.run(request(), pending()).await.unwrap_err();
		assert_eq!(controller.state(), LifecycleState::Stopped);

		assert!(began.elapsed() >= Duration::from_secs(35));
		assert!(began.elapsed() < Duration::from_secs(60));
		match err {
			TixError::StopFailed(ref inner) => assert_eq!(inner.rpc_code(), Some(Code::DeadlineExceeded)),
			ref other => panic!("expected stop failure, got {other:?}"),
		}
		assert!(err.to_string().contains("StopTicketPurchase failed: no answer within 30s"));
		assert_eq!(log.kinds(), ["start", "describe", "stop"]);
		assert!(output(&reporter).contains("Error: ticket buyer did not stop"));
	}
}
