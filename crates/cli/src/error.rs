use std::fmt;

use thiserror::Error;
use tixbuy_runtime::Error as RuntimeError;

pub type Result<T> = std::result::Result<T, TixError>;

/// Failures of one session run, tagged by the phase that produced them.
#[derive(Debug, Error)]
pub enum TixError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("could not load TLS credentials: {0}")]
	CredentialLoad(#[source] RuntimeError),

	#[error("could not reach wallet: {0}")]
	Channel(#[source] RuntimeError),

	#[error("ticket buyer refused to start: {0}")]
	StartRejected(#[source] RuntimeError),

	/// Non-fatal: the session keeps running without a config snapshot.
	#[error("could not read ticket buyer config: {0}")]
	DescribeFailed(#[source] RuntimeError),

	#[error("ticket buyer did not stop: {0}")]
	StopFailed(#[source] RuntimeError),
}

/// Lifecycle phase named in fatal error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Input,
	Credential,
	Dial,
	Start,
	Describe,
	Stop,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Phase::Input => "input",
			Phase::Credential => "credential",
			Phase::Dial => "dial",
			Phase::Start => "start",
			Phase::Describe => "describe",
			Phase::Stop => "stop",
		};
		f.write_str(name)
	}
}

impl TixError {
	pub fn phase(&self) -> Phase {
		match self {
			TixError::InvalidInput(_) => Phase::Input,
			TixError::CredentialLoad(_) => Phase::Credential,
			TixError::Channel(_) => Phase::Dial,
			TixError::StartRejected(_) => Phase::Start,
			TixError::DescribeFailed(_) => Phase::Describe,
			TixError::StopFailed(_) => Phase::Stop,
		}
	}
}
