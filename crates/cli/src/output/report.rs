//! Reporting sinks. Write failures are ignored so reporting can never change
//! the lifecycle's outcome.

use std::io::{self, Write};
use std::time::Duration;

use tixbuy_protocol::{ServiceFlavor, SessionConfig};

use super::format::OutputFormat;
use super::model::LifecycleEvent;
use crate::error::TixError;

/// Receives lifecycle milestones in the order they happen.
pub trait Reporter: Send {
	fn started(&mut self, service: ServiceFlavor);
	fn config(&mut self, config: &SessionConfig);
	/// The session is running even though its config could not be read.
	fn describe_failed(&mut self, error: &TixError);
	fn describe_unsupported(&mut self, service: ServiceFlavor);
	fn holding(&mut self, hold: Duration);
	fn interrupted(&mut self, elapsed: Duration);
	fn stopping(&mut self);
	fn stopped(&mut self);
	fn stop_failed(&mut self, error: &TixError);
}

/// Reporter for the selected format, writing to stdout.
pub fn stdout_reporter(format: OutputFormat) -> Box<dyn Reporter> {
	match format {
		OutputFormat::Text => Box::new(TextReporter::new(io::stdout())),
		OutputFormat::Json => Box::new(JsonReporter::new(io::stdout())),
	}
}

/// Human-readable lines.
pub struct TextReporter<W> {
	out: W,
}

impl<W: Write + Send> TextReporter<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn get_ref(&self) -> &W {
		&self.out
	}

	fn line(&mut self, text: std::fmt::Arguments<'_>) {
		let _ = writeln!(self.out, "{text}");
		let _ = self.out.flush();
	}
}

impl<W: Write + Send> Reporter for TextReporter<W> {
	fn started(&mut self, service: ServiceFlavor) {
		self.line(format_args!("Ticket buyer started ({service})"));
	}

	fn config(&mut self, config: &SessionConfig) {
		self.line(format_args!("=== Ticket buyer config ==="));
		self.line(format_args!("account: {}", config.account));
		self.line(format_args!("balance to maintain: {}", config.balance_to_maintain));
		self.line(format_args!("max fee: {}", config.max_fee));
		self.line(format_args!("max per block: {}", config.max_per_block));
		self.line(format_args!("max price absolute: {}", config.max_price_absolute));
		self.line(format_args!("max price relative: {}", config.max_price_relative));
		self.line(format_args!("pool address: {}", config.pool_address));
		self.line(format_args!("pool fees: {}", config.pool_fees));
		self.line(format_args!("ticket address: {}", config.ticket_address));
	}

	fn describe_failed(&mut self, error: &TixError) {
		self.line(format_args!("Warning: {error} (purchasing continues)"));
	}

	fn describe_unsupported(&mut self, service: ServiceFlavor) {
		self.line(format_args!("Config is not available from the {service} service"));
	}

	fn holding(&mut self, hold: Duration) {
		self.line(format_args!("Purchasing for {}s", hold.as_secs()));
	}

	fn interrupted(&mut self, elapsed: Duration) {
		self.line(format_args!("Interrupted after {}s; stopping early", elapsed.as_secs()));
	}

	fn stopping(&mut self) {
		self.line(format_args!("Stopping ticket buyer"));
	}

	fn stopped(&mut self) {
		self.line(format_args!("Ticket buyer stopped"));
	}

	fn stop_failed(&mut self, error: &TixError) {
		self.line(format_args!("Error: {error}"));
	}
}

/// Newline-delimited JSON events.
pub struct JsonReporter<W> {
	out: W,
}

impl<W: Write + Send> JsonReporter<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn get_ref(&self) -> &W {
		&self.out
	}

	fn emit(&mut self, event: LifecycleEvent<'_>) {
		if serde_json::to_writer(&mut self.out, &event).is_ok() {
			let _ = self.out.write_all(b"\n");
			let _ = self.out.flush();
		}
	}
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
	fn started(&mut self, service: ServiceFlavor) {
		self.emit(LifecycleEvent::Started { service });
	}

	fn config(&mut self, config: &SessionConfig) {
		self.emit(LifecycleEvent::Config { config });
	}

	fn describe_failed(&mut self, error: &TixError) {
		self.emit(LifecycleEvent::DescribeFailed { message: error.to_string() });
	}

	fn describe_unsupported(&mut self, service: ServiceFlavor) {
		self.emit(LifecycleEvent::DescribeUnsupported { service });
	}

	fn holding(&mut self, hold: Duration) {
		self.emit(LifecycleEvent::Holding { seconds: hold.as_secs() });
	}

	fn interrupted(&mut self, elapsed: Duration) {
		self.emit(LifecycleEvent::Interrupted {
			elapsed_ms: elapsed.as_millis() as u64,
		});
	}

	fn stopping(&mut self) {
		self.emit(LifecycleEvent::Stopping);
	}

	fn stopped(&mut self) {
		self.emit(LifecycleEvent::Stopped);
	}

	fn stop_failed(&mut self, error: &TixError) {
		self.emit(LifecycleEvent::StopFailed { message: error.to_string() });
	}
}
