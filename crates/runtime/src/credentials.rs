//! Transport credential resolution.
//!
//! Resolution is purely local: it may read the CA bundle from disk but never
//! opens a connection. A bad bundle therefore fails the run before any dial.

use std::path::{Path, PathBuf};

use tonic::transport::{Certificate, ClientTlsConfig};
use tracing::debug;

use crate::error::{Error, Result};

/// Operator-selected channel security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Security {
	/// No encryption and no server identity check. Only for trusted local links.
	Plaintext,
	/// TLS, trusting `ca_file` when given and the system roots otherwise.
	Tls {
		ca_file: Option<PathBuf>,
		server_name: Option<String>,
	},
}

impl Security {
	/// Builds the security mode from raw flags. With `tls` off the CA path is
	/// discarded, so it can never be read.
	pub fn from_flags(tls: bool, ca_file: Option<PathBuf>, server_name: Option<String>) -> Self {
		if !tls {
			return Security::Plaintext;
		}
		Security::Tls {
			ca_file: ca_file.filter(|path| !path.as_os_str().is_empty()),
			server_name: server_name.filter(|name| !name.is_empty()),
		}
	}
}

/// Credentials ready to be attached to a channel endpoint.
#[derive(Debug, Clone)]
pub enum TransportCredentials {
	Insecure,
	Tls(ClientTlsConfig),
}

impl TransportCredentials {
	pub fn is_insecure(&self) -> bool {
		matches!(self, TransportCredentials::Insecure)
	}
}

/// Resolves `security` into channel credentials.
pub fn resolve_credentials(security: &Security) -> Result<TransportCredentials> {
	let Security::Tls { ca_file, server_name } = security else {
		debug!(target = "tixbuy.transport", "using plaintext channel");
		return Ok(TransportCredentials::Insecure);
	};

	let mut tls = match ca_file {
		Some(path) => {
			let ca = load_ca_bundle(path)?;
			debug!(target = "tixbuy.transport", ca_file = %path.display(), "using TLS with custom CA");
			ClientTlsConfig::new().ca_certificate(ca)
		}
		None => {
			debug!(target = "tixbuy.transport", "using TLS with system roots");
			ClientTlsConfig::new().with_native_roots()
		}
	};

	if let Some(name) = server_name {
		tls = tls.domain_name(name.clone());
	}

	Ok(TransportCredentials::Tls(tls))
}

/// Reads a PEM bundle and checks that every certificate in it parses as a
/// trust anchor.
fn load_ca_bundle(path: &Path) -> Result<Certificate> {
	let pem = std::fs::read(path).map_err(|source| Error::CredentialLoad {
		path: path.to_path_buf(),
		source,
	})?;

	let invalid = |reason: String| Error::InvalidCertificate {
		path: path.to_path_buf(),
		reason,
	};

	let mut roots = rustls::RootCertStore::empty();
	let mut reader = pem.as_slice();
	for cert in rustls_pemfile::certs(&mut reader) {
		let cert = cert.map_err(|err| invalid(err.to_string()))?;
		roots.add(cert).map_err(|err| invalid(err.to_string()))?;
	}

	if roots.is_empty() {
		return Err(invalid("no PEM certificates found".to_string()));
	}

	Ok(Certificate::from_pem(pem))
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	fn fixture_ca() -> PathBuf {
		PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata").join("ca.pem")
	}

	#[test]
	fn plaintext_ignores_ca_path() {
		let security = Security::from_flags(false, Some(PathBuf::from("/definitely/not/here.pem")), None);
		assert_eq!(security, Security::Plaintext);

		let creds = resolve_credentials(&security).expect("plaintext never reads files");
		assert!(creds.is_insecure());
	}

	#[test]
	fn empty_ca_path_means_system_roots() {
		let security = Security::from_flags(true, Some(PathBuf::new()), Some(String::new()));
		assert_eq!(
			security,
			Security::Tls {
				ca_file: None,
				server_name: None
			}
		);
	}

	#[test]
	fn system_roots_resolve_without_file() {
		let security = Security::from_flags(true, None, None);
		let creds = resolve_credentials(&security).unwrap();
		assert!(matches!(creds, TransportCredentials::Tls(_)));
	}

	#[test]
	fn missing_ca_file_is_a_load_error() {
		let tmp = tempfile::tempdir().unwrap();
		let path = tmp.path().join("missing.cert");
		let err = resolve_credentials(&Security::from_flags(true, Some(path.clone()), None)).unwrap_err();

		match err {
			Error::CredentialLoad { path: reported, source } => {
				assert_eq!(reported, path);
				assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
			}
			other => panic!("expected CredentialLoad, got {other:?}"),
		}
	}

	#[test]
	fn non_pem_file_is_rejected() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "this is not a certificate").unwrap();

		let err = resolve_credentials(&Security::from_flags(true, Some(file.path().to_path_buf()), None)).unwrap_err();
		assert!(matches!(err, Error::InvalidCertificate { .. }), "got {err:?}");
		assert!(err.is_credential());
	}

	#[test]
	fn corrupt_certificate_body_is_rejected() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----").unwrap();

		let err = resolve_credentials(&Security::from_flags(true, Some(file.path().to_path_buf()), None)).unwrap_err();
		assert!(matches!(err, Error::InvalidCertificate { .. }), "got {err:?}");
	}

	#[test]
	fn valid_ca_bundle_resolves_to_tls() {
		let security = Security::from_flags(true, Some(fixture_ca()), Some("localhost".into()));
		let creds = resolve_credentials(&security).unwrap();
		assert!(matches!(creds, TransportCredentials::Tls(_)));
	}
}
