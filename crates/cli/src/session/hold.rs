//! Bounded wait between start and stop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

/// How the hold ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
	/// The full duration passed.
	Elapsed,
	/// A shutdown request cut the hold short.
	Interrupted { elapsed: Duration },
}

/// Waits for `duration` or until `shutdown` resolves, whichever comes first.
/// When both are ready at once the elapsed timer wins.
pub async fn hold<F>(duration: Duration, shutdown: F) -> HoldOutcome
where
	F: Future<Output = ()>,
{
	let started = Instant::now();
	debug!(target = "tixbuy.session", seconds = duration.as_secs(), "holding session");

	tokio::select! {
		biased;
		_ = sleep(duration) => HoldOutcome::Elapsed,
		_ = shutdown => {
			let elapsed = started.elapsed();
			debug!(target = "tixbuy.session", elapsed_ms = elapsed.as_millis() as u64, "hold interrupted");
			HoldOutcome::Interrupted { elapsed }
		}
	}
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			debug!(target = "tixbuy", error = %err, "ctrl-c handler unavailable");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		use tokio::signal::unix::{SignalKind, signal};
		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(err) => {
				debug!(target = "tixbuy", error = %err, "SIGTERM handler unavailable");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {}
		_ = terminate => {}
	}
}

#[cfg(test)]
mod tests {
	use std::future::pending;

	use super::*;

	#[tokio::test(start_paused = true)]
	async fn runs_full_duration_without_shutdown() {
		let started = Instant::now();
		let outcome = hold(Duration::from_secs(600), pending()).await;
		assert_eq!(outcome, HoldOutcome::Elapsed);
		assert!(started.elapsed() >= Duration::from_secs(600));
	}

	#[tokio::test(start_paused = true)]
	async fn shutdown_cuts_hold_short() {
		let shutdown = sleep(Duration::from_secs(3));
		let outcome = hold(Duration::from_secs(600), shutdown).await;
		match outcome {
			HoldOutcome::Interrupted { elapsed } => {
				assert!(elapsed >= Duration::from_secs(3));
				assert!(elapsed < Duration::from_secs(600));
			}
			other => panic!("expected interrupt, got {other:?}"),
		}
	}
}
