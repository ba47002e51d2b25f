//! Error types for credential resolution, dialing, and remote calls.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	#[error("failed to read CA certificate {}: {source}", path.display())]
	CredentialLoad {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("CA certificate {} is not usable: {reason}", path.display())]
	InvalidCertificate { path: PathBuf, reason: String },

	#[error("invalid server address {endpoint:?}: {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	#[error("failed to connect to {endpoint}: {source}")]
	Connect {
		endpoint: String,
		#[source]
		source: tonic::transport::Error,
	},

	#[error("{method} failed: {}", .status.message())]
	Rpc { method: &'static str, status: tonic::Status },
}

impl Error {
	/// `true` for failures raised before any network activity.
	pub fn is_credential(&self) -> bool {
		matches!(self, Error::CredentialLoad { .. } | Error::InvalidCertificate { .. })
	}

	/// gRPC status code for remote call failures.
	pub fn rpc_code(&self) -> Option<tonic::Code> {
		match self {
			Error::Rpc { status, .. } => Some(status.code()),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rpc_error_shows_method_and_status_message() {
		let err = Error::Rpc {
			method: "StartTicketPurchase",
			status: tonic::Status::failed_precondition("ticket buyer already started"),
		};
		assert_eq!(err.to_string(), "StartTicketPurchase failed: ticket buyer already started");
		assert_eq!(err.rpc_code(), Some(tonic::Code::FailedPrecondition));
		assert!(!err.is_credential());
	}

	#[test]
	fn credential_errors_are_classified() {
		let err = Error::InvalidCertificate {
			path: PathBuf::from("rpc.cert"),
			reason: "no certificates found".into(),
		};
		assert!(err.is_credential());
		assert_eq!(err.rpc_code(), None);
		assert!(err.to_string().contains("rpc.cert"));
	}
}
